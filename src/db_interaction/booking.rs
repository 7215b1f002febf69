use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime, Utc};
use diesel::dsl::count_star;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::availability::{first_free_table, AvailabilityPolicy};
use crate::domain::booking_status::BookingStatus;
use crate::domain::table_inventory::TableInventory;
use crate::models::{Booking, Notification, Restaurant, User};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with placing a booking
#[derive(Error)]
pub enum CreateBookingError{
    #[error("restaurant_id: {0} doesn't exist")]
    NoRestaurantIdError(Uuid),
    #[error("No available table found for the requested time and size")]
    NoTableAvailable,
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for CreateBookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Table placement and the insert run in one transaction, with the
// restaurant row locked for its duration. Two customers racing for the last
// table serialize here; the loser sees the winner's booking in the ledger
// and gets NoTableAvailable.
#[tracing::instrument(
    "Placing booking and notifying manager and customer",
    skip(conn, policy)
)]
pub async fn create_booking(
    mut conn: DbConnection,
    user_id: Uuid,
    restaurant_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    party_size: i32,
    note: Option<String>,
    policy: AvailabilityPolicy,
    initial_status: BookingStatus
) -> Result<Booking, CreateBookingError> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;
        use crate::schema::notifications;
        use crate::schema::restaurants;
        use crate::schema::users;

        conn.transaction::<Booking, CreateBookingError, _>(|conn| {
            let restaurant = restaurants::table
                .find(restaurant_id)
                .for_update()
                .first::<Restaurant>(conn)
                .optional()?
                .ok_or(CreateBookingError::NoRestaurantIdError(restaurant_id))?;

            let inventory = TableInventory::parse(&restaurant.tables)
                .map_err(|e| CreateBookingError::UnexpectedError(anyhow::anyhow!(e)))?;

            let ledger: Vec<Booking> = bookings::table
                .filter(bookings::restaurant_id.eq(restaurant_id))
                .filter(bookings::date.eq(date))
                .filter(bookings::status.eq_any([
                    BookingStatus::Pending.as_str(),
                    BookingStatus::Confirmed.as_str()
                ]))
                .load::<Booking>(conn)?;

            let table = first_free_table(&inventory, &ledger, time, party_size, &policy)
                .ok_or(CreateBookingError::NoTableAvailable)?;

            let booking = Booking{
                booking_id: Uuid::new_v4(),
                user_id,
                restaurant_id,
                table_id: table.table_id,
                date,
                time,
                party_size,
                status: initial_status.as_str().to_string(),
                note,
                created_at: Utc::now()
            };

            diesel::insert_into(bookings::table)
                .values(&booking)
                .execute(conn)?;

            let customer: User = users::table
                .find(user_id)
                .first::<User>(conn)?;

            let manager_message = format!(
                "New booking at {} on {} at {} by {}",
                restaurant.name,
                booking.date.format("%Y-%m-%d"),
                booking.time.format("%H:%M"),
                customer.name
            );
            let customer_message = match initial_status {
                BookingStatus::Pending => format!(
                    "Your booking request at {} on {} at {} is awaiting confirmation",
                    restaurant.name,
                    booking.date.format("%Y-%m-%d"),
                    booking.time.format("%H:%M")
                ),
                _ => format!(
                    "Your booking is confirmed at {} on {} at {}",
                    restaurant.name,
                    booking.date.format("%Y-%m-%d"),
                    booking.time.format("%H:%M")
                )
            };

            let alerts = vec![
                Notification{
                    notification_id: Uuid::new_v4(),
                    user_id: restaurant.manager_id,
                    message: manager_message,
                    read: false,
                    created_at: Utc::now()
                },
                Notification{
                    notification_id: Uuid::new_v4(),
                    user_id,
                    message: customer_message,
                    read: false,
                    created_at: Utc::now()
                },
            ];

            diesel::insert_into(notifications::table)
                .values(alerts)
                .execute(conn)?;

            Ok(booking)
        })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Listing bookings made by user",
    skip(conn)
)]
pub async fn list_bookings_by_user(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Vec<Booking>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;

        bookings::table
            .filter(bookings::user_id.eq(user_id))
            .order(bookings::created_at.desc())
            .load::<Booking>(&mut conn)
            .context("Failed to load bookings by user")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing bookings at restaurants owned by manager",
    skip(conn)
)]
pub async fn list_bookings_for_manager(
    mut conn: DbConnection,
    manager_id: Uuid
) -> Result<Vec<Booking>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;
        use crate::schema::restaurants;

        bookings::table
            .inner_join(restaurants::table)
            .filter(restaurants::manager_id.eq(manager_id))
            .select(bookings::all_columns)
            .order(bookings::created_at.desc())
            .load::<Booking>(&mut conn)
            .context("Failed to load bookings for manager")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing all bookings",
    skip_all
)]
pub async fn list_all_bookings(
    mut conn: DbConnection
) -> Result<Vec<Booking>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;

        bookings::table
            .order(bookings::created_at.desc())
            .load::<Booking>(&mut conn)
            .context("Failed to load bookings")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// The full ledger for one restaurant and date, cancelled entries included;
// readers decide what counts
#[tracing::instrument(
    "Listing bookings for restaurant on date",
    skip(conn)
)]
pub async fn list_bookings_on_date(
    mut conn: DbConnection,
    restaurant_id: Uuid,
    date: NaiveDate
) -> Result<Vec<Booking>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;

        bookings::table
            .filter(bookings::restaurant_id.eq(restaurant_id))
            .filter(bookings::date.eq(date))
            .order(bookings::created_at.asc())
            .load::<Booking>(&mut conn)
            .context("Failed to load bookings on date")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing bookings for candidate restaurants on date",
    skip(conn, restaurant_ids)
)]
pub async fn list_bookings_for_restaurants_on_date(
    mut conn: DbConnection,
    restaurant_ids: Vec<Uuid>,
    date: NaiveDate
) -> Result<Vec<Booking>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;

        bookings::table
            .filter(bookings::restaurant_id.eq_any(restaurant_ids))
            .filter(bookings::date.eq(date))
            .load::<Booking>(&mut conn)
            .context("Failed to load bookings for candidate restaurants")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting booking by id",
    skip(conn)
)]
pub async fn get_booking_by_id(
    mut conn: DbConnection,
    booking_id: Uuid
) -> Result<Option<Booking>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;

        bookings::table
            .find(booking_id)
            .first::<Booking>(&mut conn)
            .optional()
            .context("Failed to get booking by id")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Error associated with updating booking status
#[derive(Error)]
pub enum UpdateBookingStatusError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("booking_id: {0} doesn't exist")]
    NoBookingIdError(Uuid)
}

impl Debug for UpdateBookingStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Updating booking status",
    skip(conn)
)]
pub async fn update_booking_status(
    mut conn: DbConnection,
    booking_id: Uuid,
    status: BookingStatus,
    notify: Option<Notification>
) -> Result<(), UpdateBookingStatusError> {

    spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;
        use crate::schema::notifications;

        conn.transaction::<(), UpdateBookingStatusError, _>(|conn| {
            let affected_rows = diesel::update(bookings::table)
                .filter(bookings::booking_id.eq(booking_id))
                .set(bookings::status.eq(status.as_str()))
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(UpdateBookingStatusError::NoBookingIdError(booking_id))
            }

            if let Some(notification) = notify {
                diesel::insert_into(notifications::table)
                    .values(notification)
                    .execute(conn)?;
            }

            Ok(())
        })
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Counting bookings for restaurant on date",
    skip(conn)
)]
pub async fn count_bookings_on_date(
    mut conn: DbConnection,
    restaurant_id: Uuid,
    date: NaiveDate
) -> Result<i64, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;

        bookings::table
            .filter(bookings::restaurant_id.eq(restaurant_id))
            .filter(bookings::date.eq(date))
            .count()
            .get_result::<i64>(&mut conn)
            .context("Failed to count bookings on date")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Ranking restaurants by booking count",
    skip(conn)
)]
pub async fn top_booked_restaurants(
    mut conn: DbConnection,
    limit: i64
) -> Result<Vec<(Uuid, i64)>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bookings;

        bookings::table
            .group_by(bookings::restaurant_id)
            .select((bookings::restaurant_id, count_star()))
            .order(count_star().desc())
            .limit(limit)
            .load::<(Uuid, i64)>(&mut conn)
            .context("Failed to rank restaurants by bookings")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
