use actix_web::{error::{ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use uuid::Uuid;

use crate::auth::extractors::IsCustomer;
use crate::db_interaction::{self, get_review_by_id};
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Deleting review",
    skip(pool, uid)
)]
pub async fn delete_review(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    uid: IsCustomer
) -> Result<HttpResponse, actix_web::Error>{
    let review_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let review = get_review_by_id(conn, review_id)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("Review not found"))?;

    if review.user_id != uid.0 {
        return Err(ErrorForbidden("You are not authorized to delete this review"))
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    db_interaction::delete_review(conn, review_id)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}
