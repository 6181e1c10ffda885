use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 42)]
    pub total_employees: i64,
    #[schema(example = 5)]
    pub total_departments: i64,
    #[schema(example = 3)]
    pub pending_leave_requests: i64,
    /// Checked in today and not yet checked out
    #[schema(example = 17)]
    pub checked_in_now: i64,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct DepartmentStat {
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = 12)]
    pub employee_count: i64,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceTrend {
    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = 30)]
    pub count: i64,
}

async fn scalar(pool: &MySqlPool, sql: &str) -> Result<i64, actix_web::Error> {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            error!(error = %e, sql, "Dashboard count failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    responses((status = 200, description = "Headline counts", body = DashboardStats)),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn stats(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let pool = pool.get_ref();

    let stats = DashboardStats {
        total_employees: scalar(pool, "SELECT COUNT(*) FROM employees WHERE is_active = TRUE")
            .await?,
        total_departments: scalar(pool, "SELECT COUNT(*) FROM departments").await?,
        pending_leave_requests: scalar(
            pool,
            "SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'",
        )
        .await?,
        checked_in_now: scalar(
            pool,
            "SELECT COUNT(*) FROM attendance WHERE date = CURDATE() AND check_out IS NULL",
        )
        .await?,
    };

    Ok(HttpResponse::Ok().json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/departments",
    responses((status = 200, description = "Active head-count per department", body = [DepartmentStat])),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn department_distribution(
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, DepartmentStat>(
        r#"
        SELECT d.name,
               (SELECT COUNT(*) FROM employees e
                WHERE e.department_id = d.id AND e.is_active = TRUE) AS employee_count
        FROM departments d
        ORDER BY d.name
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch department distribution");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/attendance-trend",
    responses((status = 200, description = "Check-ins per day, last 7 days", body = [AttendanceTrend])),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn attendance_trend(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, AttendanceTrend>(
        r#"
        SELECT date, COUNT(*) AS count
        FROM attendance
        WHERE date >= CURDATE() - INTERVAL 6 DAY
        GROUP BY date
        ORDER BY date
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch attendance trend");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}
