use actix_web::{error::{ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{get_booking_by_id, update_booking_status};
use crate::domain::booking_status::BookingStatus;
use crate::domain::user_role::UserRole;
use crate::utils::{get_pooled_connection, DbPool};

// Customers cancel their own bookings, admins anyone's; managers are not
// allowed to cancel at all
#[tracing::instrument(
    "Cancelling booking",
    skip(pool, uid)
)]
pub async fn cancel_booking(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let booking_id = path.into_inner();
    let IsUser(user_id, role) = uid;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let booking = get_booking_by_id(conn, booking_id)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("Booking not found"))?;

    match role {
        UserRole::RestaurantManager => {
            return Err(ErrorForbidden("Managers are not allowed to cancel bookings"))
        },
        UserRole::Customer if booking.user_id != user_id => {
            return Err(ErrorForbidden("You can only cancel your own bookings"))
        },
        _ => {}
    }

    let current = BookingStatus::parse(&booking.status)
        .map_err(|e| ErrorInternalServerError(anyhow::anyhow!(e)))?;
    if !current.can_transition_to(BookingStatus::Cancelled) {
        return Err(ErrorForbidden("Booking is already cancelled"))
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    update_booking_status(conn, booking_id, BookingStatus::Cancelled, None)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Booking cancelled successfully" })))
}
