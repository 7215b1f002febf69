use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use uuid::Uuid;

use crate::db_interaction::list_reviews_for_restaurant;
use crate::utils::{get_pooled_connection, DbPool};

use super::ReviewResponse;

#[tracing::instrument(
    "Listing reviews for restaurant",
    skip(pool)
)]
pub async fn get_restaurant_reviews(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, actix_web::Error>{
    let restaurant_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let reviews = list_reviews_for_restaurant(conn, restaurant_id)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<ReviewResponse> = reviews
        .into_iter()
        .map(|(review, email)| ReviewResponse::from_review(review, email))
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
