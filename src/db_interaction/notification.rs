use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Notification;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

pub fn new_notification(user_id: Uuid, message: String) -> Notification{
    Notification{
        notification_id: Uuid::new_v4(),
        user_id,
        message,
        read: false,
        created_at: Utc::now()
    }
}

#[tracing::instrument(
    "Listing unread notifications for user",
    skip(conn)
)]
pub async fn list_unread_notifications(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Vec<Notification>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;

        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::read.eq(false))
            .order(notifications::created_at.desc())
            .load::<Notification>(&mut conn)
            .context("Failed to load unread notifications")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Error associated with marking a notification as read
#[derive(Error)]
pub enum MarkNotificationReadError{
    #[error("notification_id: {0} doesn't exist for this user")]
    NoNotificationIdError(Uuid),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for MarkNotificationReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Marks one notification read and hands back what is still unread, so the
// polling client can swap its local list in one round trip
#[tracing::instrument(
    "Marking notification as read",
    skip(conn)
)]
pub async fn mark_notification_read(
    mut conn: DbConnection,
    notification_id: Uuid,
    user_id: Uuid
) -> Result<Vec<Notification>, MarkNotificationReadError> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;

        conn.transaction::<Vec<Notification>, MarkNotificationReadError, _>(|conn| {
            let affected_rows = diesel::update(notifications::table)
                .filter(notifications::notification_id.eq(notification_id))
                .filter(notifications::user_id.eq(user_id))
                .set(notifications::read.eq(true))
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(MarkNotificationReadError::NoNotificationIdError(notification_id))
            }

            let unread = notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::read.eq(false))
                .order(notifications::created_at.desc())
                .load::<Notification>(conn)?;

            Ok(unread)
        })
    })
    .await??;

    Ok(res)
}
