use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use uuid::Uuid;

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::{
    approve_restaurant_and_notify_manager, list_all_restaurants, list_pending_restaurants,
    ApproveRestaurantError
};
use crate::routes::restaurant::RestaurantResponse;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Listing all restaurants for admin",
    skip(pool, _uid)
)]
pub async fn get_all_restaurants(
    pool: web::Data<DbPool>,
    _uid: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let restaurants = list_all_restaurants(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<RestaurantResponse> = restaurants
        .into_iter()
        .map(RestaurantResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(
    "Listing restaurants pending approval",
    skip(pool, _uid)
)]
pub async fn get_pending_restaurants(
    pool: web::Data<DbPool>,
    _uid: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let restaurants = list_pending_restaurants(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<RestaurantResponse> = restaurants
        .into_iter()
        .map(RestaurantResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(
    "Approving restaurant",
    skip(pool, _uid)
)]
pub async fn approve_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    _uid: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let restaurant_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let approved = approve_restaurant_and_notify_manager(conn, restaurant_id)
        .await
        .map_err(|e| {
            match e {
                ApproveRestaurantError::NoRestaurantIdError(_) => {
                    ErrorNotFound("Restaurant not found")
                },
                other => ErrorInternalServerError(other)
            }
        })?;

    Ok(HttpResponse::Ok().json(RestaurantResponse::from(approved)))
}
