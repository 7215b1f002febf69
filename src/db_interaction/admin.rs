use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use serde::Serialize;

use crate::domain::booking_status::BookingStatus;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::DbConnection;

// Struct to represent the platform-wide totals the admin dashboard renders
#[derive(Serialize, Debug)]
pub struct PlatformStats{
    pub total_restaurants: i64,
    pub approved_restaurants: i64,
    pub pending_restaurants: i64,
    pub total_users: i64,
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64
}

#[tracing::instrument(
    "Gathering platform statistics",
    skip_all
)]
pub async fn gather_platform_stats(
    mut conn: DbConnection
) -> Result<PlatformStats, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || -> Result<PlatformStats, anyhow::Error> {
        use crate::schema::bookings;
        use crate::schema::restaurants;
        use crate::schema::users;

        let total_restaurants: i64 = restaurants::table
            .count()
            .get_result(&mut conn)
            .context("Failed to count restaurants")?;

        let approved_restaurants: i64 = restaurants::table
            .filter(restaurants::is_approved.eq(true))
            .count()
            .get_result(&mut conn)
            .context("Failed to count approved restaurants")?;

        let total_users: i64 = users::table
            .count()
            .get_result(&mut conn)
            .context("Failed to count users")?;

        let total_bookings: i64 = bookings::table
            .count()
            .get_result(&mut conn)
            .context("Failed to count bookings")?;

        let pending_bookings: i64 = bookings::table
            .filter(bookings::status.eq(BookingStatus::Pending.as_str()))
            .count()
            .get_result(&mut conn)
            .context("Failed to count pending bookings")?;

        let confirmed_bookings: i64 = bookings::table
            .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
            .count()
            .get_result(&mut conn)
            .context("Failed to count confirmed bookings")?;

        Ok(PlatformStats{
            total_restaurants,
            approved_restaurants,
            pending_restaurants: total_restaurants - approved_restaurants,
            total_users,
            total_bookings,
            pending_bookings,
            confirmed_bookings
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
