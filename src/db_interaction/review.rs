use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::dsl::{count_star, sum};
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Review;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with submitting a review
#[derive(Error)]
pub enum ReviewInsertError{
    #[error("user has already reviewed this restaurant")]
    AlreadyReviewed,
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for ReviewInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// One review per (user, restaurant). The unique index is the authoritative
// gate; the explicit lookup only shapes the error before the insert races.
#[tracing::instrument(
    "Inserting review into the database",
    skip(conn, review)
)]
pub async fn insert_review(
    mut conn: DbConnection,
    review: Review
) -> Result<(), ReviewInsertError> {

    spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;

        conn.transaction::<(), ReviewInsertError, _>(|conn| {
            let existing: i64 = reviews::table
                .filter(reviews::user_id.eq(review.user_id))
                .filter(reviews::restaurant_id.eq(review.restaurant_id))
                .count()
                .get_result(conn)?;

            if existing > 0 {
                return Err(ReviewInsertError::AlreadyReviewed)
            }

            diesel::insert_into(reviews::table)
                .values(&review)
                .execute(conn)
                .map_err(|e|{
                    match e {
                        diesel::result::Error::DatabaseError(
                            diesel::result::DatabaseErrorKind::UniqueViolation,
                            _
                        ) => ReviewInsertError::AlreadyReviewed,

                        _ => ReviewInsertError::RunQueryError(e)
                    }
                })?;

            Ok(())
        })
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Listing reviews for restaurant",
    skip(conn)
)]
pub async fn list_reviews_for_restaurant(
    mut conn: DbConnection,
    restaurant_id: Uuid
) -> Result<Vec<(Review, String)>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;
        use crate::schema::users;

        reviews::table
            .inner_join(users::table)
            .filter(reviews::restaurant_id.eq(restaurant_id))
            .select((reviews::all_columns, users::email))
            .order(reviews::created_at.desc())
            .load::<(Review, String)>(&mut conn)
            .context("Failed to load reviews for restaurant")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// (review count, average rating); averages are derived on read instead of
// being cached on the restaurant row
#[tracing::instrument(
    "Summarising restaurant rating",
    skip(conn)
)]
pub async fn rating_summary(
    mut conn: DbConnection,
    restaurant_id: Uuid
) -> Result<(i64, Option<f64>), anyhow::Error> {
    let (total, rating_sum) = spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;

        reviews::table
            .filter(reviews::restaurant_id.eq(restaurant_id))
            .select((count_star(), sum(reviews::rating)))
            .get_result::<(i64, Option<i64>)>(&mut conn)
            .context("Failed to summarise restaurant rating")
    })
    .await
    .context("Failed due to threadpool error")??;

    let average = rating_sum
        .filter(|_| total > 0)
        .map(|s| s as f64 / total as f64);

    Ok((total, average))
}

#[tracing::instrument(
    "Getting review by id",
    skip(conn)
)]
pub async fn get_review_by_id(
    mut conn: DbConnection,
    review_id: Uuid
) -> Result<Option<Review>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;

        reviews::table
            .find(review_id)
            .first::<Review>(&mut conn)
            .optional()
            .context("Failed to get review by id")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Deleting review by id",
    skip(conn)
)]
pub async fn delete_review(
    mut conn: DbConnection,
    review_id: Uuid
) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;

        diesel::delete(reviews::table)
            .filter(reviews::review_id.eq(review_id))
            .execute(&mut conn)
            .context("Failed to delete review")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}
