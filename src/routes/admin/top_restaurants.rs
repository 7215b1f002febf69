use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::top_booked_restaurants;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize, Debug)]
pub struct TopRestaurant{
    pub restaurant_id: Uuid,
    pub booking_count: i64
}

#[tracing::instrument(
    "Ranking most booked restaurants",
    skip(pool, _uid)
)]
pub async fn get_top_restaurants(
    pool: web::Data<DbPool>,
    _uid: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let top = top_booked_restaurants(conn, 5)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<TopRestaurant> = top
        .into_iter()
        .map(|(restaurant_id, booking_count)| TopRestaurant{restaurant_id, booking_count})
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
