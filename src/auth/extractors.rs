use actix_web::{error::ErrorUnauthorized, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::domain::user_role::UserRole;

use super::jwt::{Claims, Tokenizer};

// Extractor for admin role
pub struct IsAdmin(pub Uuid);

// Extractor for restaurant managers; admins pass too, flagged in .1
pub struct IsManager(pub Uuid, pub bool);

// Extractor for customer role
pub struct IsCustomer(pub Uuid);

// Extractor for any authenticated user
pub struct IsUser(pub Uuid, pub UserRole);

fn decode_bearer_claims(req: &HttpRequest) -> Result<Claims, actix_web::Error>{
    let tokenizer: &web::Data<Tokenizer> = req.app_data()
        .expect("Tokenizer missing from app data");

    let header = req.headers()
        .get("Authorization")
        .ok_or_else(|| ErrorUnauthorized("Missing bearer token"))?;

    let token = header.to_str()
        .map_err(|_| ErrorUnauthorized("Invalid token"))?
        .split("Bearer")
        .nth(1)
        .ok_or_else(|| ErrorUnauthorized("Invalid token"))?
        .trim();

    tokenizer.decode_key(token.to_string())
        .ok_or_else(|| ErrorUnauthorized("Invalid Token"))
}

impl FromRequest for IsAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(decode_bearer_claims(req).and_then(|claims| {
            match claims.role {
                UserRole::Admin => Ok(IsAdmin(claims.sub)),
                _ => Err(ErrorUnauthorized("Unauthorized Role"))
            }
        }))
    }
}

impl FromRequest for IsManager {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(decode_bearer_claims(req).and_then(|claims| {
            match claims.role {
                UserRole::RestaurantManager => Ok(IsManager(claims.sub, false)),
                UserRole::Admin => Ok(IsManager(claims.sub, true)),
                _ => Err(ErrorUnauthorized("Unauthorized Role"))
            }
        }))
    }
}

impl FromRequest for IsCustomer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(decode_bearer_claims(req).and_then(|claims| {
            match claims.role {
                UserRole::Customer => Ok(IsCustomer(claims.sub)),
                _ => Err(ErrorUnauthorized("Unauthorized Role"))
            }
        }))
    }
}

impl FromRequest for IsUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(decode_bearer_claims(req).map(|claims| IsUser(claims.sub, claims.role)))
    }
}
