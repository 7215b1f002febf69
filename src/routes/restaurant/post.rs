use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::extractors::IsManager;
use crate::db_interaction::{insert_restaurant_and_notify_admin, RestaurantInsertError};
use crate::geocoding_client::GeocodingClient;
use crate::models::Restaurant;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

use super::{ListingForm, RestaurantResponse};

#[derive(Error)]
pub enum PostRestaurantError{
    #[error("Only managers can add restaurants")]
    NotAManager,
    #[error("{0}")]
    ValidationError(String),
    #[error("a restaurant with this name already exists")]
    NameTaken(#[source] RestaurantInsertError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostRestaurantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostRestaurantError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostRestaurantError::NotAManager => {
                HttpResponse::Forbidden().body(format!("{}", self))
            },
            PostRestaurantError::ValidationError(_) | PostRestaurantError::NameTaken(_) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            PostRestaurantError::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(format!("{}", self))
            }
        }
    }
}

// New listings start unapproved. Missing coordinates are filled in by a
// best-effort geocoding call; its failure never fails the listing.
#[tracing::instrument(
    "Creating restaurant listing",
    skip(pool, geocoder, form, uid)
)]
pub async fn post_restaurant(
    pool: web::Data<DbPool>,
    geocoder: web::Data<GeocodingClient>,
    form: web::Json<ListingForm>,
    uid: IsManager
) -> Result<HttpResponse, PostRestaurantError>{
    let IsManager(manager_id, is_admin) = uid;
    if is_admin {
        return Err(PostRestaurantError::NotAManager)
    }

    let (hours_json, tables_json) = form.validate()
        .map_err(PostRestaurantError::ValidationError)?;

    let (latitude, longitude) = match (form.latitude, form.longitude) {
        (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
        _ => {
            let full_address = format!(
                "{}, {}, {} {}",
                form.address, form.city, form.state, form.zip_code
            );

            match geocoder.get_coordinates(&full_address, &form.zip_code).await {
                Ok((lat, lng)) => (Some(lat), Some(lng)),
                Err(e) => {
                    tracing::warn!("Failed to geocode address {}: {:?}", full_address, e);
                    (None, None)
                }
            }
        }
    };

    let restaurant = Restaurant{
        restaurant_id: Uuid::new_v4(),
        manager_id,
        name: form.0.name,
        address: form.0.address,
        city: form.0.city,
        state: form.0.state,
        zip_code: form.0.zip_code,
        phone: form.0.phone,
        description: form.0.description,
        cuisine: form.0.cuisine,
        cost_rating: form.0.cost_rating,
        hours: hours_json,
        tables: tables_json,
        photo_url: form.0.photo_url,
        latitude,
        longitude,
        is_approved: false,
        created_at: Utc::now()
    };
    let response = RestaurantResponse::from(restaurant.clone());

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    insert_restaurant_and_notify_admin(conn, restaurant)
        .await
        .map_err(|e| {
            match e {
                RestaurantInsertError::NameNotUnique(_) => PostRestaurantError::NameTaken(e),
                RestaurantInsertError::UnexpectedError(_) => PostRestaurantError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Created().json(response))
}
