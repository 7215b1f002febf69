use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::auth::extractors::IsUser;
use crate::db_interaction::list_unread_notifications;
use crate::utils::{get_pooled_connection, DbPool};

use super::NotificationResponse;

// Clients poll this on a timer and replace their local list with the
// returned snapshot
#[tracing::instrument(
    "Listing unread notifications",
    skip(pool, uid)
)]
pub async fn get_notifications(
    pool: web::Data<DbPool>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let notifications = list_unread_notifications(conn, uid.0)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<NotificationResponse> = notifications
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
