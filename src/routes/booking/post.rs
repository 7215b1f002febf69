use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::extractors::IsCustomer;
use crate::configuration::BookingSettings;
use crate::db_interaction::{create_booking, CreateBookingError};
use crate::domain::availability::AvailabilityPolicy;
use crate::domain::booking_status::BookingStatus;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

use super::BookingResponse;

#[derive(Deserialize, Debug)]
pub struct BookingForm{
    pub restaurant_id: Uuid,
    pub date: String,
    pub time: String,
    pub party_size: i32,
    pub note: Option<String>
}

#[derive(Error)]
pub enum PostBookingError{
    #[error("{0}")]
    ValidationError(String),
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("No available table found for the requested time and size")]
    NoTableAvailable,
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostBookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostBookingError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostBookingError::ValidationError(_) | PostBookingError::NoTableAvailable => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            PostBookingError::RestaurantNotFound => {
                HttpResponse::NotFound().body(format!("{}", self))
            },
            PostBookingError::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(format!("{}", self))
            }
        }
    }
}

#[tracing::instrument(
    "Booking a table",
    skip(pool, settings, uid)
)]
pub async fn post_booking(
    pool: web::Data<DbPool>,
    form: web::Json<BookingForm>,
    settings: web::Data<BookingSettings>,
    uid: IsCustomer
) -> Result<HttpResponse, PostBookingError>{
    let date = NaiveDate::parse_from_str(&form.date, "%Y-%m-%d")
        .map_err(|_| PostBookingError::ValidationError("date must be formatted YYYY-MM-DD".to_string()))?;
    let time = NaiveTime::parse_from_str(&form.time, "%H:%M")
        .map_err(|_| PostBookingError::ValidationError("time must be formatted HH:MM".to_string()))?;

    if form.party_size < 1 {
        return Err(PostBookingError::ValidationError("party_size must be positive".to_string()))
    }

    let initial_status = if settings.auto_confirm {
        BookingStatus::Confirmed
    } else {
        BookingStatus::Pending
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let booking = create_booking(
        conn,
        uid.0,
        form.0.restaurant_id,
        date,
        time,
        form.0.party_size,
        form.0.note,
        AvailabilityPolicy::from(settings.get_ref()),
        initial_status
    )
    .await
    .map_err(|e| {
        match e {
            CreateBookingError::NoRestaurantIdError(_) => PostBookingError::RestaurantNotFound,
            CreateBookingError::NoTableAvailable => PostBookingError::NoTableAvailable,
            other => PostBookingError::UnexpectedError(anyhow::anyhow!(other))
        }
    })?;

    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}
