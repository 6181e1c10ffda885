use crate::auth::auth::AuthUser;
use crate::model::attendance::{hours_worked, status_for_check_in};
use crate::model::role::Role;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CheckInReq {
    #[schema(example = "Working from the office")]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Managers/Admins may scope to one employee
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-04-30", value_type = String, format = "date")]
    pub end_date: Option<NaiveDate>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceResponse {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "08:57:00", value_type = String, nullable = true)]
    pub check_in: Option<NaiveTime>,
    #[schema(example = "17:30:00", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,
    pub hours_worked: Option<f64>,
    #[schema(example = "present", value_type = String)]
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body(content = CheckInReq, content_type = "application/json"),
    responses(
        (status = 200, description = "Checked in", body = Object, example = json!({
            "message": "Checked in successfully",
            "status": "present"
        })),
        (status = 400, description = "Already checked in today"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins do not check in / no employee profile"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: Option<web::Json<CheckInReq>>,
) -> actix_web::Result<impl Responder> {
    if auth.role == Role::Admin {
        return Err(actix_web::error::ErrorForbidden(
            "Administrators are not required to check in",
        ));
    }

    let employee_id = auth.require_employee_profile()?;

    let now = Utc::now();
    let status = status_for_check_in(now.time());
    let notes = payload.and_then(|p| p.into_inner().notes);

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, check_in, status, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(now.date_naive())
    .bind(now.time())
    .bind(status.as_ref())
    .bind(notes)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            tracing::info!(employee_id, status = status.as_ref(), "Checked in");
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Checked in successfully",
                "status": status.as_ref()
            })))
        }

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = Object, example = json!({
            "message": "Checked out successfully",
            "hours_worked": 8.5
        })),
        (status = 400, description = "No active check-in found for today"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins do not check out / no employee profile"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    if auth.role == Role::Admin {
        return Err(actix_web::error::ErrorForbidden(
            "Administrators are not required to check out",
        ));
    }

    let employee_id = auth.require_employee_profile()?;

    let now = Utc::now();

    let open = sqlx::query_as::<_, (u64, Option<NaiveTime>)>(
        r#"
        SELECT id, check_in
        FROM attendance
        WHERE employee_id = ? AND date = ? AND check_out IS NULL
        "#,
    )
    .bind(employee_id)
    .bind(now.date_naive())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some((attendance_id, check_in_time)) = open else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    };

    let hours = check_in_time
        .map(|start| hours_worked(start, now.time()))
        .unwrap_or(0.0);

    sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = ?, hours_worked = ?, updated_at = NOW()
        WHERE id = ?
        "#,
    )
    .bind(now.time())
    .bind(hours)
    .bind(attendance_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(employee_id, hours, "Checked out");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully",
        "hours_worked": hours
    })))
}

/// Attendance history (role-aware)
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance records", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(20).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if auth.is_manager_or_admin() {
        if let Some(employee_id) = query.employee_id {
            where_sql.push_str(" AND att.employee_id = ?");
            args.push(FilterValue::U64(employee_id));
        }
    } else {
        // employees only ever see their own history
        let own = auth.require_employee_profile()?;
        where_sql.push_str(" AND att.employee_id = ?");
        args.push(FilterValue::U64(own));
    }

    if let Some(start) = query.start_date {
        where_sql.push_str(" AND att.date >= ?");
        args.push(FilterValue::Date(start));
    }

    if let Some(end) = query.end_date {
        where_sql.push_str(" AND att.date <= ?");
        args.push(FilterValue::Date(end));
    }

    let count_sql = format!("SELECT COUNT(*) FROM attendance att{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count attendance records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT
            att.id,
            att.employee_id,
            CONCAT(e.first_name, ' ', e.last_name) AS employee_name,
            att.date,
            att.check_in,
            att.check_out,
            att.hours_worked,
            att.status,
            att.notes
        FROM attendance att
        JOIN employees e ON e.id = att.employee_id
        {}
        ORDER BY att.date DESC, att.id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let records = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance records");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
