use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::db_interaction::{insert_user, UserInsertError};
use crate::domain::phone_number::PhoneNumberDomain;
use crate::domain::user_email::UserEmail;
use crate::domain::user_role::UserRole;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct RegistrationForm{
    email: String,
    name: String,
    password: SecretString,
    confirm_password: SecretString,
    role: String,
    phone: Option<String>
}

#[derive(Error)]
enum RegisterError{
    #[error("the password and confirm passwords don't match")]
    PasswordNotMatching,
    #[error("user already exists")]
    UserAlreadyExists(#[from] UserInsertError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegisterError{
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            RegisterError::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(format!("{}", self))
            },
            _ => HttpResponse::BadRequest().body(format!("{}", self))
        }
    }
}

#[tracing::instrument(
    "User registration started",
    skip(form, pool)
)]
pub async fn register(
    form: web::Json<RegistrationForm>,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {

    if form.password.expose_secret() != form.confirm_password.expose_secret(){
        return Err(RegisterError::PasswordNotMatching.into())
    }

    let email = match UserEmail::parse(form.email.clone()){
        Ok(email) => email,
        Err(e) => return Ok(HttpResponse::BadRequest().body(e))
    };

    let role = match UserRole::parse(&form.role){
        Ok(role) => role,
        Err(e) => return Ok(HttpResponse::BadRequest().body(e))
    };

    let phone = match form.0.phone {
        Some(number) => {
            match PhoneNumberDomain::parse(number){
                Ok(number) => Some(number.inner()),
                Err(e) => return Ok(HttpResponse::BadRequest().body(e))
            }
        },
        None => None
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")
        .map_err(RegisterError::UnexpectedError)?;

    let user_id = insert_user(conn, form.0.name, email.inner(), form.0.password, role, phone)
        .await
        .map_err(|e| {
            match e {
                UserInsertError::EmailNotUnique(_) => RegisterError::UserAlreadyExists(e),
                UserInsertError::UnexpectedError(_) => RegisterError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user_id": user_id })))
}
