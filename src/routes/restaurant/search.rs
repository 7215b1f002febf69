use std::collections::HashMap;
use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::configuration::BookingSettings;
use crate::db_interaction::{list_approved_restaurants, list_bookings_for_restaurants_on_date};
use crate::domain::availability::AvailabilityPolicy;
use crate::domain::search::{GeoBounds, LocationQuery, SearchCriteria};
use crate::models::Booking;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

use super::RestaurantResponse;

#[derive(Deserialize, Debug)]
pub struct SearchQuery{
    pub date: String,
    pub time: String,
    pub party_size: i32,
    pub location: Option<String>,
    pub min_lat: Option<f64>,
    pub min_lng: Option<f64>,
    pub max_lat: Option<f64>,
    pub max_lng: Option<f64>
}

#[derive(Serialize, Debug)]
pub struct SearchResult{
    #[serde(flatten)]
    pub restaurant: RestaurantResponse,
    pub available_slots: Vec<String>
}

#[derive(Error)]
pub enum SearchError{
    #[error("{0}")]
    ValidationError(String),
    // distinct from an empty result: the ledger could not be consulted
    #[error("Failed to fetch restaurant or booking data")]
    FetchError(#[source] anyhow::Error),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for SearchError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            SearchError::ValidationError(_) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            _ => HttpResponse::InternalServerError().body(format!("{}", self))
        }
    }
}

fn parse_bounds(query: &SearchQuery) -> Result<Option<GeoBounds>, SearchError>{
    match (query.min_lat, query.min_lng, query.max_lat, query.max_lng) {
        (None, None, None, None) => Ok(None),
        (Some(min_lat), Some(min_lng), Some(max_lat), Some(max_lng)) => {
            Ok(Some(GeoBounds{min_lat, max_lat, min_lng, max_lng}))
        },
        _ => Err(SearchError::ValidationError(
            "map bounds need all of min_lat, min_lng, max_lat, max_lng".to_string()
        ))
    }
}

#[tracing::instrument(
    "Searching restaurants with availability",
    skip(pool, settings)
)]
pub async fn search_restaurants(
    pool: web::Data<DbPool>,
    query: web::Query<SearchQuery>,
    settings: web::Data<BookingSettings>
) -> Result<HttpResponse, SearchError>{
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| SearchError::ValidationError("date must be formatted YYYY-MM-DD".to_string()))?;
    let time = NaiveTime::parse_from_str(&query.time, "%H:%M")
        .map_err(|_| SearchError::ValidationError("time must be formatted HH:MM".to_string()))?;

    if query.party_size < 1 {
        return Err(SearchError::ValidationError("party_size must be positive".to_string()))
    }

    let criteria = SearchCriteria{
        date,
        time,
        party_size: query.party_size,
        location: query.location.as_deref().and_then(LocationQuery::classify),
        bounds: parse_bounds(&query)?
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| SearchError::FetchError(e.into()))?;
    let candidates = list_approved_restaurants(conn)
        .await
        .map_err(SearchError::FetchError)?;

    let candidate_ids: Vec<Uuid> = candidates
        .iter()
        .map(|r| r.restaurant_id)
        .collect();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| SearchError::FetchError(e.into()))?;
    let bookings = list_bookings_for_restaurants_on_date(conn, candidate_ids, date)
        .await
        .map_err(SearchError::FetchError)?;

    let mut ledger: HashMap<Uuid, Vec<Booking>> = HashMap::new();
    for booking in bookings {
        ledger.entry(booking.restaurant_id).or_default().push(booking);
    }

    let policy = AvailabilityPolicy::from(settings.get_ref());
    let hits = crate::domain::search::search_restaurants(candidates, &ledger, &criteria, &policy);

    let response: Vec<SearchResult> = hits
        .into_iter()
        .map(|hit| SearchResult{
            restaurant: hit.restaurant.into(),
            available_slots: hit.available_slots
                .into_iter()
                .map(|slot| slot.format("%H:%M").to_string())
                .collect()
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
