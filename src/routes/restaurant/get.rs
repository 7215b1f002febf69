use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::extractors::IsManager;
use crate::db_interaction::{
    count_bookings_on_date, get_restaurant_by_id, list_restaurants_by_manager, rating_summary
};
use crate::utils::{get_pooled_connection, DbPool};

use super::RestaurantResponse;

// Detail card: the listing plus read-time review aggregates and today's
// booking count
#[derive(Serialize, Debug)]
pub struct RestaurantDetailsResponse{
    #[serde(flatten)]
    pub restaurant: RestaurantResponse,
    pub average_rating: Option<f64>,
    pub total_reviews: i64,
    pub bookings_today: i64
}

#[tracing::instrument(
    "Getting restaurant details",
    skip(pool)
)]
pub async fn get_restaurant_details(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, actix_web::Error>{
    let restaurant_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let restaurant = get_restaurant_by_id(conn, restaurant_id)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("Restaurant not found"))?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let (total_reviews, average_rating) = rating_summary(conn, restaurant_id)
        .await
        .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let bookings_today = count_bookings_on_date(conn, restaurant_id, Utc::now().date_naive())
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(RestaurantDetailsResponse{
        restaurant: restaurant.into(),
        average_rating,
        total_reviews,
        bookings_today
    }))
}

#[tracing::instrument(
    "Listing restaurants owned by the logged in manager",
    skip(pool, uid)
)]
pub async fn get_manager_restaurants(
    pool: web::Data<DbPool>,
    uid: IsManager
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let restaurants = list_restaurants_by_manager(conn, uid.0)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<RestaurantResponse> = restaurants
        .into_iter()
        .map(RestaurantResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
