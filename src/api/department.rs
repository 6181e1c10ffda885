use crate::auth::auth::AuthUser;
use crate::notify::NotificationHub;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{MySqlPool, prelude::FromRow};
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct DepartmentReq {
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = "Software Development")]
    pub description: Option<String>,
    /// Employee id of the department head
    #[schema(example = 1001)]
    pub manager_id: Option<u64>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct DepartmentResponse {
    pub id: u64,
    #[schema(example = "Engineering")]
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<u64>,
    #[schema(example = "Jane Manager", nullable = true)]
    pub manager_name: Option<String>,
    /// Active employees in this department
    #[schema(example = 12)]
    pub employee_count: i64,
}

const DEPARTMENT_SELECT: &str = r#"
    SELECT
        d.id,
        d.name,
        d.description,
        d.manager_id,
        CONCAT(m.first_name, ' ', m.last_name) AS manager_name,
        (SELECT COUNT(*) FROM employees e
         WHERE e.department_id = d.id AND e.is_active = TRUE) AS employee_count
    FROM departments d
    LEFT JOIN employees m ON m.id = d.manager_id
"#;

#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses((status = 200, description = "All departments", body = [DepartmentResponse])),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn list_departments(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let sql = format!("{} ORDER BY d.name", DEPARTMENT_SELECT);
    let departments = sqlx::query_as::<_, DepartmentResponse>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch departments");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(departments))
}

#[utoipa::path(
    get,
    path = "/api/v1/departments/{department_id}",
    params(("department_id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department found", body = DepartmentResponse),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn get_department(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let department_id = path.into_inner();

    let sql = format!("{} WHERE d.id = ?", DEPARTMENT_SELECT);
    let department = sqlx::query_as::<_, DepartmentResponse>(&sql)
        .bind(department_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to fetch department");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match department {
        Some(d) => Ok(HttpResponse::Ok().json(d)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        }))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = DepartmentReq,
    responses(
        (status = 201, description = "Department created"),
        (status = 400, description = "Empty name"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Name already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn create_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    payload: web::Json<DepartmentReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Department name must not be empty"
        })));
    }

    let result =
        sqlx::query("INSERT INTO departments (name, description, manager_id) VALUES (?, ?, ?)")
            .bind(name)
            .bind(&payload.description)
            .bind(payload.manager_id)
            .execute(pool.get_ref())
            .await;

    match result {
        Ok(_) => {
            hub.system_update("Departments");
            Ok(HttpResponse::Created().json(json!({
                "message": "Department created"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "A department with this name already exists"
                    })));
                }
            }
            error!(error = %e, "Failed to create department");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}",
    params(("department_id" = u64, Path, description = "Department ID")),
    request_body = DepartmentReq,
    responses(
        (status = 200, description = "Department updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn update_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    path: web::Path<u64>,
    payload: web::Json<DepartmentReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let department_id = path.into_inner();

    let result = sqlx::query(
        "UPDATE departments SET name = ?, description = ?, manager_id = ? WHERE id = ?",
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(payload.manager_id)
    .bind(department_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, department_id, "Failed to update department");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    hub.system_update("Departments");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department updated"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}",
    params(("department_id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 400, description = "Department still has employees"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn delete_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let department_id = path.into_inner();

    let in_use = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE department_id = ? LIMIT 1)",
    )
    .bind(department_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, department_id, "Department in-use check failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if in_use {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Cannot delete a department that still has employees"
        })));
    }

    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(department_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to delete department");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    hub.system_update("Departments");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department deleted"
    })))
}
