use actix_web::{error::{ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{self, get_restaurant_by_id};
use crate::domain::user_role::UserRole;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Deleting restaurant listing",
    skip(pool, uid)
)]
pub async fn delete_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let restaurant_id = path.into_inner();
    let IsUser(user_id, role) = uid;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let restaurant = get_restaurant_by_id(conn, restaurant_id)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("Restaurant not found"))?;

    let authorized = match role {
        UserRole::Admin => true,
        UserRole::RestaurantManager => restaurant.manager_id == user_id,
        UserRole::Customer => false
    };
    if !authorized {
        return Err(ErrorForbidden("You are not authorized to delete this restaurant"))
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    db_interaction::delete_restaurant(conn, restaurant_id)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().body("Restaurant deleted successfully"))
}
