use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::extractors::IsCustomer;
use crate::db_interaction::{
    get_restaurant_by_id, get_user_by_id, insert_review, ReviewInsertError
};
use crate::models::Review;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

use super::ReviewResponse;

#[derive(Deserialize, Debug)]
pub struct CreateReviewForm{
    pub restaurant_id: Uuid,
    pub rating: i32,
    pub comment: String
}

#[derive(Error)]
pub enum PostReviewError{
    #[error("{0}")]
    ValidationError(String),
    #[error("Restaurant not found")]
    RestaurantNotFound,
    // one review per user per restaurant; the server is the authority and
    // rejects duplicates no matter what the client pre-checked
    #[error("user has already reviewed this restaurant")]
    AlreadyReviewed,
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostReviewError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostReviewError::ValidationError(_) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            PostReviewError::RestaurantNotFound => {
                HttpResponse::NotFound().body(format!("{}", self))
            },
            PostReviewError::AlreadyReviewed => {
                HttpResponse::Forbidden().body(format!("{}", self))
            },
            PostReviewError::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(format!("{}", self))
            }
        }
    }
}

#[tracing::instrument(
    "Submitting review",
    skip(pool, uid)
)]
pub async fn post_review(
    pool: web::Data<DbPool>,
    form: web::Json<CreateReviewForm>,
    uid: IsCustomer
) -> Result<HttpResponse, PostReviewError>{
    if !(1..=5).contains(&form.rating) {
        return Err(PostReviewError::ValidationError("rating must be between 1 and 5".to_string()))
    }
    if form.comment.trim().is_empty() || form.comment.len() > 400 {
        return Err(PostReviewError::ValidationError("comment must be 1 to 400 characters".to_string()))
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;
    get_restaurant_by_id(conn, form.restaurant_id)
        .await
        .context("Failed to look up restaurant")?
        .ok_or(PostReviewError::RestaurantNotFound)?;

    let review = Review{
        review_id: Uuid::new_v4(),
        restaurant_id: form.restaurant_id,
        user_id: uid.0,
        rating: form.rating,
        comment: form.0.comment,
        created_at: Utc::now()
    };
    let saved = review.clone();

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;
    insert_review(conn, review)
        .await
        .map_err(|e| {
            match e {
                ReviewInsertError::AlreadyReviewed => PostReviewError::AlreadyReviewed,
                other => PostReviewError::UnexpectedError(anyhow::anyhow!(other))
            }
        })?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;
    let author = get_user_by_id(conn, saved.user_id)
        .await
        .context("Failed to look up review author")?;

    Ok(HttpResponse::Created().json(ReviewResponse::from_review(saved, author.email)))
}
