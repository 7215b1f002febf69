use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user_role::UserRole;
use crate::models::User;
use crate::password::compute_password_hash;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with inserting a user into the users table
#[derive(Error)]
pub enum UserInsertError{
    #[error("email field is not unique")]
    EmailNotUnique(#[source] anyhow::Error),
    #[error("unexpected database / hashing error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip(conn, password)
)]
pub async fn insert_user(
    mut conn: DbConnection,
    name: String,
    email: String,
    password: SecretString,
    role: UserRole,
    phone: Option<String>
) -> Result<Uuid, UserInsertError> {

    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(password)
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserInsertError::UnexpectedError)?
    .map_err(UserInsertError::UnexpectedError)?;

    let user = User{
        user_id: Uuid::new_v4(),
        name,
        email,
        password: password_hash.expose_secret().to_string(),
        role: role.as_str().to_string(),
        phone,
        created_at: Utc::now()
    };
    let uid = user.user_id;

    spawn_blocking_with_tracing(move || {
        use crate::schema::users;

        diesel::insert_into(users::table)
            .values(user)
            .execute(&mut conn)
            .map_err(|e|{
                match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        a
                    ) => {
                        UserInsertError::EmailNotUnique(anyhow::anyhow!(a.message().to_string()))
                    },

                    _ => UserInsertError::UnexpectedError(anyhow::anyhow!("Unexpected diesel / database error"))
                }
            })
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserInsertError::UnexpectedError)??;

    Ok(uid)
}

#[tracing::instrument(
    "Getting user by email",
    skip(conn)
)]
pub async fn get_user_by_email(
    mut conn: DbConnection,
    email_string: String
) -> Result<Option<User>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::users;

        users::table
            .filter(users::email.eq(email_string))
            .first::<User>(&mut conn)
            .optional()
            .context("Failed to query user by email")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting user by id",
    skip(conn)
)]
pub async fn get_user_by_id(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<User, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::users;

        users::table
            .find(user_id)
            .first::<User>(&mut conn)
            .context("Failed to get user by id")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
