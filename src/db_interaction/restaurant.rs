use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user_role::UserRole;
use crate::models::{Notification, Restaurant, RestaurantUpdate};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with inserting a restaurant listing
#[derive(Error)]
pub enum RestaurantInsertError{
    #[error("restaurant name is not unique")]
    NameNotUnique(#[source] anyhow::Error),
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RestaurantInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<diesel::result::Error> for RestaurantInsertError {
    fn from(e: diesel::result::Error) -> Self {
        RestaurantInsertError::UnexpectedError(anyhow::Error::new(e))
    }
}

// New listings await admin approval, so an admin gets a notification in the
// same transaction as the insert
#[tracing::instrument(
    "Inserting restaurant and notifying an admin",
    skip_all
)]
pub async fn insert_restaurant_and_notify_admin(
    mut conn: DbConnection,
    restaurant: Restaurant
) -> Result<(), RestaurantInsertError> {

    spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;
        use crate::schema::restaurants;
        use crate::schema::users;

        conn.transaction::<(), RestaurantInsertError, _>(|conn| {
            let message = format!(
                "A new restaurant '{}' was submitted for approval by manager {}",
                restaurant.name,
                restaurant.manager_id
            );

            diesel::insert_into(restaurants::table)
                .values(&restaurant)
                .execute(conn)
                .map_err(|e|{
                    match e {
                        diesel::result::Error::DatabaseError(
                            diesel::result::DatabaseErrorKind::UniqueViolation,
                            a
                        ) => {
                            RestaurantInsertError::NameNotUnique(anyhow::anyhow!(a.message().to_string()))
                        },

                        _ => RestaurantInsertError::UnexpectedError(anyhow::anyhow!("Unexpected diesel / database error"))
                    }
                })?;

            let admin_id: Option<Uuid> = users::table
                .select(users::user_id)
                .filter(users::role.eq(UserRole::Admin.as_str()))
                .order(users::created_at.asc())
                .first::<Uuid>(conn)
                .optional()
                .context("Failed to look up an admin account")?;

            if let Some(admin_id) = admin_id {
                let notification = Notification{
                    notification_id: Uuid::new_v4(),
                    user_id: admin_id,
                    message,
                    read: false,
                    created_at: Utc::now()
                };

                diesel::insert_into(notifications::table)
                    .values(notification)
                    .execute(conn)
                    .context("Failed to insert approval notification")?;
            }

            Ok(())
        })
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(RestaurantInsertError::UnexpectedError)??;

    Ok(())
}

#[tracing::instrument(
    "Getting restaurant by id",
    skip(conn)
)]
pub async fn get_restaurant_by_id(
    mut conn: DbConnection,
    restaurant_id: Uuid
) -> Result<Option<Restaurant>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::restaurants;

        restaurants::table
            .find(restaurant_id)
            .first::<Restaurant>(&mut conn)
            .optional()
            .context("Failed to get restaurant by id")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing approved restaurants",
    skip_all
)]
pub async fn list_approved_restaurants(
    mut conn: DbConnection
) -> Result<Vec<Restaurant>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::restaurants;

        restaurants::table
            .filter(restaurants::is_approved.eq(true))
            .load::<Restaurant>(&mut conn)
            .context("Failed to load approved restaurants")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing restaurants pending approval",
    skip_all
)]
pub async fn list_pending_restaurants(
    mut conn: DbConnection
) -> Result<Vec<Restaurant>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::restaurants;

        restaurants::table
            .filter(restaurants::is_approved.eq(false))
            .load::<Restaurant>(&mut conn)
            .context("Failed to load pending restaurants")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing all restaurants",
    skip_all
)]
pub async fn list_all_restaurants(
    mut conn: DbConnection
) -> Result<Vec<Restaurant>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::restaurants;

        restaurants::table
            .load::<Restaurant>(&mut conn)
            .context("Failed to load restaurants")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing restaurants owned by manager",
    skip(conn)
)]
pub async fn list_restaurants_by_manager(
    mut conn: DbConnection,
    manager_id: Uuid
) -> Result<Vec<Restaurant>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::restaurants;

        restaurants::table
            .filter(restaurants::manager_id.eq(manager_id))
            .load::<Restaurant>(&mut conn)
            .context("Failed to load restaurants by manager")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Error associated with approving a restaurant listing
#[derive(Error)]
pub enum ApproveRestaurantError{
    #[error("restaurant_id: {0} doesn't exist")]
    NoRestaurantIdError(Uuid),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for ApproveRestaurantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Approving restaurant and notifying its manager",
    skip(conn)
)]
pub async fn approve_restaurant_and_notify_manager(
    mut conn: DbConnection,
    restaurant_id: Uuid
) -> Result<Restaurant, ApproveRestaurantError> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;
        use crate::schema::restaurants;

        conn.transaction::<Restaurant, ApproveRestaurantError, _>(|conn| {
            let restaurant = diesel::update(restaurants::table)
                .filter(restaurants::restaurant_id.eq(restaurant_id))
                .set(restaurants::is_approved.eq(true))
                .get_result::<Restaurant>(conn)
                .optional()?
                .ok_or(ApproveRestaurantError::NoRestaurantIdError(restaurant_id))?;

            let notification = Notification{
                notification_id: Uuid::new_v4(),
                user_id: restaurant.manager_id,
                message: format!(
                    "Your restaurant '{}' has been approved by the admin!",
                    restaurant.name
                ),
                read: false,
                created_at: Utc::now()
            };

            diesel::insert_into(notifications::table)
                .values(notification)
                .execute(conn)?;

            Ok(restaurant)
        })
    })
    .await??;

    Ok(res)
}

// Error associated with updating a restaurant listing
#[derive(Error)]
pub enum UpdateRestaurantError{
    #[error("restaurant_id: {0} doesn't exist")]
    NoRestaurantIdError(Uuid),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for UpdateRestaurantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Updating restaurant attributes",
    skip(conn, changes)
)]
pub async fn update_restaurant(
    mut conn: DbConnection,
    restaurant_id: Uuid,
    changes: RestaurantUpdate
) -> Result<Restaurant, UpdateRestaurantError> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::restaurants;

        diesel::update(restaurants::table)
            .filter(restaurants::restaurant_id.eq(restaurant_id))
            .set(changes)
            .get_result::<Restaurant>(&mut conn)
            .optional()?
            .ok_or(UpdateRestaurantError::NoRestaurantIdError(restaurant_id))
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Deleting restaurant by id",
    skip(conn)
)]
pub async fn delete_restaurant(
    mut conn: DbConnection,
    restaurant_id: Uuid
) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::restaurants;

        conn.transaction::<(), anyhow::Error, _>(|conn| {
            diesel::delete(restaurants::table)
                .filter(restaurants::restaurant_id.eq(restaurant_id))
                .execute(conn)
                .context("Failed to delete restaurant")?;

            Ok(())
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}
