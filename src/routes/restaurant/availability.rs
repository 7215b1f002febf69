use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::configuration::BookingSettings;
use crate::db_interaction::{get_restaurant_by_id, list_bookings_on_date};
use crate::domain::availability::{resolve_tables, AvailabilityPolicy, TableStatus};
use crate::domain::table_inventory::TableInventory;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct AvailabilityQuery{
    pub date: String,
    pub time: String
}

#[derive(Serialize, Debug)]
pub struct TableAvailabilityResponse{
    pub restaurant_id: Uuid,
    pub date: String,
    pub time: String,
    pub tables: Vec<TableStatus>
}

#[derive(Error)]
pub enum AvailabilityError{
    #[error("{0}")]
    ValidationError(String),
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("the stored table inventory could not be read")]
    MalformedInventory(#[source] anyhow::Error),
    // a failed ledger fetch must never read as "everything is free"
    #[error("Failed to fetch booking data")]
    LedgerUnavailable(#[source] anyhow::Error)
}

impl Debug for AvailabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for AvailabilityError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            AvailabilityError::ValidationError(_) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            AvailabilityError::RestaurantNotFound => {
                HttpResponse::NotFound().body(format!("{}", self))
            },
            _ => HttpResponse::InternalServerError().body(format!("{}", self))
        }
    }
}

#[tracing::instrument(
    "Resolving table availability",
    skip(pool, settings)
)]
pub async fn get_table_availability(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<AvailabilityQuery>,
    settings: web::Data<BookingSettings>
) -> Result<HttpResponse, AvailabilityError>{
    let restaurant_id = path.into_inner();

    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AvailabilityError::ValidationError("date must be formatted YYYY-MM-DD".to_string()))?;
    let time = NaiveTime::parse_from_str(&query.time, "%H:%M")
        .map_err(|_| AvailabilityError::ValidationError("time must be formatted HH:MM".to_string()))?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| AvailabilityError::LedgerUnavailable(e.into()))?;
    let restaurant = get_restaurant_by_id(conn, restaurant_id)
        .await
        .map_err(AvailabilityError::LedgerUnavailable)?
        .ok_or(AvailabilityError::RestaurantNotFound)?;

    let inventory = TableInventory::parse(&restaurant.tables)
        .map_err(|e| AvailabilityError::MalformedInventory(anyhow::anyhow!(e)))?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| AvailabilityError::LedgerUnavailable(e.into()))?;
    let ledger = list_bookings_on_date(conn, restaurant_id, date)
        .await
        .map_err(AvailabilityError::LedgerUnavailable)?;

    let policy = AvailabilityPolicy::from(settings.get_ref());
    let tables = resolve_tables(&inventory, &ledger, time, &policy);

    Ok(HttpResponse::Ok().json(TableAvailabilityResponse{
        restaurant_id,
        date: date.format("%Y-%m-%d").to_string(),
        time: time.format("%H:%M").to_string(),
        tables
    }))
}
