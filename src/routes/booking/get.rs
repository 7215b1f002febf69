use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{
    list_all_bookings, list_bookings_by_user, list_bookings_for_manager, list_bookings_on_date
};
use crate::domain::user_role::UserRole;
use crate::utils::{get_pooled_connection, DbPool};

use super::BookingResponse;

// Customers see their own bookings, managers the ledger of their
// restaurants, admins everything
#[tracing::instrument(
    "Listing bookings visible to the logged in user",
    skip(pool, uid)
)]
pub async fn get_my_bookings(
    pool: web::Data<DbPool>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let IsUser(user_id, role) = uid;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let bookings = match role {
        UserRole::Customer => list_bookings_by_user(conn, user_id).await,
        UserRole::RestaurantManager => list_bookings_for_manager(conn, user_id).await,
        UserRole::Admin => list_all_bookings(conn).await
    }
    .map_err(ErrorInternalServerError)?;

    let response: Vec<BookingResponse> = bookings
        .into_iter()
        .map(BookingResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Deserialize, Debug)]
pub struct RestaurantBookingsQuery{
    pub date: String
}

// The day's ledger for one restaurant; drives the table visualisation
#[tracing::instrument(
    "Listing bookings for restaurant on date",
    skip(pool, _uid)
)]
pub async fn get_restaurant_bookings(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<RestaurantBookingsQuery>,
    _uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let restaurant_id = path.into_inner();
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ErrorBadRequest("date must be formatted YYYY-MM-DD"))?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let bookings = list_bookings_on_date(conn, restaurant_id, date)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<BookingResponse> = bookings
        .into_iter()
        .map(BookingResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
