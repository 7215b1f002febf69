use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{mark_notification_read as mark_read, MarkNotificationReadError};
use crate::utils::{get_pooled_connection, DbPool};

use super::NotificationResponse;

#[tracing::instrument(
    "Marking notification as read",
    skip(pool, uid)
)]
pub async fn mark_notification_read(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let notification_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let unread = mark_read(conn, notification_id, uid.0)
        .await
        .map_err(|e| {
            match e {
                MarkNotificationReadError::NoNotificationIdError(_) => {
                    ErrorNotFound("Notification not found")
                },
                other => ErrorInternalServerError(other)
            }
        })?;

    let response: Vec<NotificationResponse> = unread
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
