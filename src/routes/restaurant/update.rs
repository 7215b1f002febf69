use actix_web::{error::{ErrorBadRequest, ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use uuid::Uuid;

use crate::auth::extractors::IsManager;
use crate::db_interaction::{self, get_restaurant_by_id, UpdateRestaurantError};
use crate::models::RestaurantUpdate;
use crate::utils::{get_pooled_connection, DbPool};

use super::{ListingForm, RestaurantResponse};

#[tracing::instrument(
    "Updating restaurant listing",
    skip(pool, form, uid)
)]
pub async fn update_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    form: web::Json<ListingForm>,
    uid: IsManager
) -> Result<HttpResponse, actix_web::Error>{
    let restaurant_id = path.into_inner();
    let IsManager(user_id, is_admin) = uid;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let restaurant = get_restaurant_by_id(conn, restaurant_id)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("Restaurant not found"))?;

    if !is_admin && restaurant.manager_id != user_id {
        return Err(ErrorForbidden("You are not authorized to update this restaurant"))
    }

    let (hours_json, tables_json) = form.validate()
        .map_err(ErrorBadRequest)?;

    let changes = RestaurantUpdate{
        name: form.0.name,
        address: form.0.address,
        city: form.0.city,
        state: form.0.state,
        zip_code: form.0.zip_code,
        phone: form.0.phone,
        description: form.0.description,
        cuisine: form.0.cuisine,
        cost_rating: form.0.cost_rating,
        hours: hours_json,
        tables: tables_json,
        photo_url: form.0.photo_url,
        latitude: form.0.latitude,
        longitude: form.0.longitude
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let updated = db_interaction::update_restaurant(conn, restaurant_id, changes)
        .await
        .map_err(|e| {
            match e {
                UpdateRestaurantError::NoRestaurantIdError(_) => ErrorNotFound("Restaurant not found"),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Ok().json(RestaurantResponse::from(updated)))
}
