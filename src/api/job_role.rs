use crate::auth::auth::AuthUser;
use crate::notify::NotificationHub;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{MySqlPool, prelude::FromRow};
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct JobRoleReq {
    #[schema(example = "Software Engineer")]
    pub title: String,
    #[schema(example = "Builds the product")]
    pub description: Option<String>,
    #[schema(example = 2)]
    pub department_id: Option<u64>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct JobRoleResponse {
    pub id: u64,
    #[schema(example = "Software Engineer")]
    pub title: String,
    pub description: Option<String>,
    pub department_id: Option<u64>,
    #[schema(example = "Engineering", nullable = true)]
    pub department_name: Option<String>,
}

const JOB_ROLE_SELECT: &str = r#"
    SELECT
        r.id,
        r.title,
        r.description,
        r.department_id,
        d.name AS department_name
    FROM job_roles r
    LEFT JOIN departments d ON d.id = r.department_id
"#;

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses((status = 200, description = "All job roles", body = [JobRoleResponse])),
    security(("bearer_auth" = [])),
    tag = "JobRole"
)]
pub async fn list_job_roles(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let sql = format!("{} ORDER BY r.title", JOB_ROLE_SELECT);
    let roles = sqlx::query_as::<_, JobRoleResponse>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch job roles");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(roles))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{role_id}",
    params(("role_id" = u64, Path, description = "Job role ID")),
    responses(
        (status = 200, description = "Job role found", body = JobRoleResponse),
        (status = 404, description = "Job role not found")
    ),
    security(("bearer_auth" = [])),
    tag = "JobRole"
)]
pub async fn get_job_role(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let role_id = path.into_inner();

    let sql = format!("{} WHERE r.id = ?", JOB_ROLE_SELECT);
    let role = sqlx::query_as::<_, JobRoleResponse>(&sql)
        .bind(role_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, role_id, "Failed to fetch job role");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match role {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Job role not found"
        }))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = JobRoleReq,
    responses(
        (status = 201, description = "Job role created"),
        (status = 400, description = "Empty title"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "JobRole"
)]
pub async fn create_job_role(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    payload: web::Json<JobRoleReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Job role title must not be empty"
        })));
    }

    sqlx::query("INSERT INTO job_roles (title, description, department_id) VALUES (?, ?, ?)")
        .bind(title)
        .bind(&payload.description)
        .bind(payload.department_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create job role");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    hub.system_update("JobRoles");

    Ok(HttpResponse::Created().json(json!({
        "message": "Job role created"
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/roles/{role_id}",
    params(("role_id" = u64, Path, description = "Job role ID")),
    request_body = JobRoleReq,
    responses(
        (status = 200, description = "Job role updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Job role not found")
    ),
    security(("bearer_auth" = [])),
    tag = "JobRole"
)]
pub async fn update_job_role(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    path: web::Path<u64>,
    payload: web::Json<JobRoleReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let role_id = path.into_inner();

    let result =
        sqlx::query("UPDATE job_roles SET title = ?, description = ?, department_id = ? WHERE id = ?")
            .bind(payload.title.trim())
            .bind(&payload.description)
            .bind(payload.department_id)
            .bind(role_id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, role_id, "Failed to update job role");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Job role not found"
        })));
    }

    hub.system_update("JobRoles");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Job role updated"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/roles/{role_id}",
    params(("role_id" = u64, Path, description = "Job role ID")),
    responses(
        (status = 200, description = "Job role deleted"),
        (status = 400, description = "Job role still held by employees"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Job role not found")
    ),
    security(("bearer_auth" = [])),
    tag = "JobRole"
)]
pub async fn delete_job_role(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let role_id = path.into_inner();

    let in_use = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE job_role_id = ? LIMIT 1)",
    )
    .bind(role_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, role_id, "Job role in-use check failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if in_use {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Cannot delete a job role that employees still hold"
        })));
    }

    let result = sqlx::query("DELETE FROM job_roles WHERE id = ?")
        .bind(role_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, role_id, "Failed to delete job role");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Job role not found"
        })));
    }

    hub.system_update("JobRoles");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Job role deleted"
    })))
}
