use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::gather_platform_stats;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Getting platform statistics",
    skip(pool, _uid)
)]
pub async fn get_admin_stats(
    pool: web::Data<DbPool>,
    _uid: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let stats = gather_platform_stats(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(stats))
}
