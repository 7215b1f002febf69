use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::domain::availability::{has_free_table, AvailabilityPolicy};
use crate::domain::hours::Hours;
use crate::domain::slots::surrounding_slots;
use crate::domain::table_inventory::TableInventory;
use crate::models::{Booking, Restaurant};

// Free-text location input: digits are taken as a postal code, anything
// else as a city name. Sniffing only; no postal format validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery{
    City(String),
    Zip(i32)
}

impl LocationQuery {
    pub fn classify(raw: &str) -> Option<LocationQuery>{
        let raw = raw.trim();
        if raw.is_empty() {
            return None
        }

        match raw.parse::<i32>() {
            Ok(zip) => Some(LocationQuery::Zip(zip)),
            Err(_) => Some(LocationQuery::City(raw.to_string()))
        }
    }
}

// Viewport filter promoted from the client's map: restaurants without
// coordinates cannot be placed, so they drop out when bounds are given.
#[derive(Debug, Clone, Copy)]
pub struct GeoBounds{
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64
}

impl GeoBounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool{
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lng
            && longitude <= self.max_lng
    }
}

#[derive(Debug, Clone)]
pub struct SearchCriteria{
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: i32,
    pub location: Option<LocationQuery>,
    pub bounds: Option<GeoBounds>
}

#[derive(Debug, Clone)]
pub struct SearchHit{
    pub restaurant: Restaurant,
    pub available_slots: Vec<NaiveTime>
}

fn matches_location(restaurant: &Restaurant, location: &LocationQuery) -> bool{
    match location {
        LocationQuery::City(city) => restaurant.city.eq_ignore_ascii_case(city),
        LocationQuery::Zip(zip) => {
            match restaurant.zip_code.parse::<i32>() {
                Ok(candidate) => (candidate - zip).abs() <= 5,
                Err(_) => false
            }
        }
    }
}

fn matches_bounds(restaurant: &Restaurant, bounds: &GeoBounds) -> bool{
    match (restaurant.latitude, restaurant.longitude) {
        (Some(lat), Some(lng)) => bounds.contains(lat, lng),
        _ => false
    }
}

// Fan the request across the candidate restaurants: location and viewport
// filters, an open-hours gate, then per-restaurant availability via the
// resolver. Restaurants whose stored hours or inventory fail to parse are
// skipped rather than failing the whole search.
//
// Ordering is deterministic: name ascending, restaurant id as tiebreak.
pub fn search_restaurants(
    candidates: Vec<Restaurant>,
    ledger: &HashMap<Uuid, Vec<Booking>>,
    criteria: &SearchCriteria,
    policy: &AvailabilityPolicy
) -> Vec<SearchHit>{
    let weekday = criteria.date.weekday();
    let no_bookings: Vec<Booking> = Vec::new();

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter(|r| r.is_approved)
        .filter(|r| {
            criteria.location
                .as_ref()
                .map(|location| matches_location(r, location))
                .unwrap_or(true)
        })
        .filter(|r| {
            criteria.bounds
                .as_ref()
                .map(|bounds| matches_bounds(r, bounds))
                .unwrap_or(true)
        })
        .filter(|r| {
            Hours::parse(&r.hours)
                .map(|hours| hours.is_open_at(weekday, criteria.time))
                .unwrap_or(false)
        })
        .filter_map(|r| {
            let inventory = TableInventory::parse(&r.tables).ok()?;
            let bookings = ledger.get(&r.restaurant_id).unwrap_or(&no_bookings);

            if has_free_table(&inventory, bookings, criteria.time, criteria.party_size, policy) {
                Some(SearchHit{
                    restaurant: r,
                    available_slots: surrounding_slots(criteria.time)
                })
            } else {
                None
            }
        })
        .collect();

    hits.sort_by(|a, b| {
        a.restaurant.name
            .cmp(&b.restaurant.name)
            .then(a.restaurant.restaurant_id.cmp(&b.restaurant.restaurant_id))
    });

    hits
}
