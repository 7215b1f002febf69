use actix_web::{error::{ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use uuid::Uuid;

use crate::auth::extractors::IsManager;
use crate::db_interaction::{
    get_booking_by_id, get_restaurant_by_id, new_notification, update_booking_status
};
use crate::domain::booking_status::BookingStatus;
use crate::utils::{get_pooled_connection, DbPool};

// PENDING -> CONFIRMED, by an admin or the manager of the booked restaurant
#[tracing::instrument(
    "Confirming booking",
    skip(pool, uid)
)]
pub async fn confirm_booking(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    uid: IsManager
) -> Result<HttpResponse, actix_web::Error>{
    let booking_id = path.into_inner();
    let IsManager(user_id, is_admin) = uid;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let booking = get_booking_by_id(conn, booking_id)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("Booking not found"))?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let restaurant = get_restaurant_by_id(conn, booking.restaurant_id)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("Restaurant not found"))?;

    if !is_admin && restaurant.manager_id != user_id {
        return Err(ErrorForbidden("You are not authorized to confirm this booking"))
    }

    let current = BookingStatus::parse(&booking.status)
        .map_err(|e| ErrorInternalServerError(anyhow::anyhow!(e)))?;
    if !current.can_transition_to(BookingStatus::Confirmed) {
        return Err(ErrorForbidden("Booking not found or already confirmed"))
    }

    let notification = new_notification(
        booking.user_id,
        format!(
            "Your booking at {} on {} at {} is CONFIRMED",
            restaurant.name,
            booking.date.format("%Y-%m-%d"),
            booking.time.format("%H:%M")
        )
    );

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    update_booking_status(conn, booking_id, BookingStatus::Confirmed, Some(notification))
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().body("Booking confirmed successfully"))
}
