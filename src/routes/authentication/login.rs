use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorUnauthorized}, web, HttpResponse};
use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::Tokenizer;
use crate::db_interaction::get_user_by_email;
use crate::domain::user_email::UserEmail;
use crate::domain::user_role::UserRole;
use crate::password::verify_password;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct LoginForm{
    pub email: String,
    pub password: SecretString
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse{
    pub token: String
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, form, tokenizer)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    form: web::Json<LoginForm>,
    tokenizer: web::Data<Tokenizer>
) -> Result<HttpResponse, actix_web::Error>{
    let email = UserEmail::parse(form.0.email)
                    .map_err(ErrorBadRequest)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let user_info = match get_user_by_email(conn, email.inner()).await
                                .map_err(ErrorInternalServerError)?{
        Some(p) => p,
        None => return Err(ErrorBadRequest(anyhow::anyhow!("No user registered with this email")))
    };

    match verify_password(form.0.password, user_info.password.clone()).await{
        Ok(res) => {
            if !res {
                tracing::info!("Passwords did not match");
                return Err(ErrorUnauthorized("Email or password is incorrect"))
            }
        },
        Err(e) => {
            let err = e.to_string();
            tracing::error!(err);
            return Err(ErrorInternalServerError("Failed to login"));
        }
    }

    let role = UserRole::parse(&user_info.role)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Stored user role is not recognised")
        .map_err(ErrorInternalServerError)?;

    let token = tokenizer.generate_key(user_info.user_id, user_info.email, role);

    Ok(HttpResponse::Ok().json(LoginResponse{ token }))
}
