use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::hours::Hours;
use crate::domain::table_inventory::TableInventory;
use crate::models::Restaurant;

pub mod availability;
pub mod delete;
pub mod get;
pub mod post;
pub mod search;
pub mod update;

pub use availability::get_table_availability;
pub use delete::delete_restaurant;
pub use get::{get_manager_restaurants, get_restaurant_details};
pub use post::post_restaurant;
pub use search::search_restaurants;
pub use update::update_restaurant;

// Listing fields a manager submits when creating or editing a restaurant
#[derive(Deserialize, Debug, Clone)]
pub struct ListingForm{
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub description: String,
    pub cuisine: String,
    pub cost_rating: String,
    pub hours: BTreeMap<String, String>,
    pub tables: BTreeMap<String, i32>,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>
}

impl ListingForm {
    // Field checks mirror what the listing forms promise: two-letter state,
    // five-digit zip, $ to $$$ cost tier, digits-and-dashes phone. Hours and
    // tables go through their domain parsers and come back as the canonical
    // JSON strings the row stores.
    pub fn validate(&self) -> Result<(String, String), String>{
        if self.name.trim().is_empty(){
            return Err("name must not be blank".to_string())
        }
        if self.address.trim().is_empty(){
            return Err("address must not be blank".to_string())
        }
        if self.city.trim().is_empty(){
            return Err("city must not be blank".to_string())
        }
        if self.state.len() != 2 || !self.state.chars().all(|c| c.is_ascii_alphabetic()){
            return Err("state must be a two letter code".to_string())
        }
        if self.zip_code.len() != 5 || !self.zip_code.chars().all(|c| c.is_ascii_digit()){
            return Err("zip_code must be five digits".to_string())
        }
        if !["$", "$$", "$$$"].contains(&self.cost_rating.as_str()){
            return Err("cost_rating must be one of $, $$ or $$$".to_string())
        }

        let phone_ok = !self.phone.is_empty()
            && self.phone.split('-').all(|part| {
                !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
            });
        if !phone_ok {
            return Err("phone must be digits separated by dashes".to_string())
        }

        let hours_json = serde_json::to_string(&self.hours)
            .expect("string maps always serialize");
        Hours::parse(&hours_json)?;

        let tables_json = serde_json::to_string(&self.tables)
            .expect("string maps always serialize");
        TableInventory::parse(&tables_json)?;

        Ok((hours_json, tables_json))
    }
}

// Struct to represent a restaurant in responses, with the stored JSON
// columns expanded back into objects
#[derive(Serialize, Debug)]
pub struct RestaurantResponse{
    pub restaurant_id: Uuid,
    pub manager_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub description: String,
    pub cuisine: String,
    pub cost_rating: String,
    pub hours: BTreeMap<String, String>,
    pub tables: BTreeMap<String, i32>,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_approved: bool,
    pub created_at: String
}

impl From<Restaurant> for RestaurantResponse {
    fn from(r: Restaurant) -> Self {
        RestaurantResponse{
            restaurant_id: r.restaurant_id,
            manager_id: r.manager_id,
            name: r.name,
            address: r.address,
            city: r.city,
            state: r.state,
            zip_code: r.zip_code,
            phone: r.phone,
            description: r.description,
            cuisine: r.cuisine,
            cost_rating: r.cost_rating,
            hours: serde_json::from_str(&r.hours).unwrap_or_default(),
            tables: serde_json::from_str(&r.tables).unwrap_or_default(),
            photo_url: r.photo_url,
            latitude: r.latitude,
            longitude: r.longitude,
            is_approved: r.is_approved,
            created_at: r.created_at.to_rfc3339()
        }
    }
}
