use crate::auth::auth::AuthUser;
use crate::leave_policy::{self, LeaveBalances};
use crate::model::leave_request::{LeaveStatus, LeaveType, total_days};
use crate::model::role::Role;
use crate::notify::NotificationHub;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-04-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-04-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    /// "approved" or "rejected"
    #[schema(example = "approved")]
    pub status: LeaveStatus,
    #[schema(example = "Enjoy!")]
    pub comments: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "annual", value_type = String)]
    pub leave_type: String,
    #[schema(example = "2026-04-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-04-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
    #[schema(example = "pending", value_type = String)]
    pub status: String,
    pub approved_by_id: Option<u64>,
    #[schema(example = "Jane Admin", nullable = true)]
    pub approved_by_name: Option<String>,
    pub approver_comments: Option<String>,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub approved_at: Option<DateTime<Utc>>,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

pub(crate) const LEAVE_SELECT: &str = r#"
    SELECT
        lr.id,
        lr.employee_id,
        CONCAT(e.first_name, ' ', e.last_name) AS employee_name,
        lr.leave_type,
        lr.start_date,
        lr.end_date,
        lr.reason,
        lr.status,
        lr.approved_by_id,
        CONCAT(a.first_name, ' ', a.last_name) AS approved_by_name,
        lr.approver_comments,
        lr.approved_at,
        lr.created_at
    FROM leave_requests lr
    JOIN employees e ON e.id = lr.employee_id
    LEFT JOIN employees a ON a.id = lr.approved_by_id
    LEFT JOIN users u ON u.employee_id = lr.employee_id
"#;

/// Visibility predicate for the caller. Employees see their own rows;
/// Managers see everything except rows owned by other Manager accounts;
/// Admins see everything. The optional bind is the caller's employee id.
pub(crate) fn visibility_sql(auth: &AuthUser) -> (String, Option<u64>) {
    match auth.role {
        Role::Admin => (String::new(), None),
        Role::Manager => (
            format!(
                " AND (lr.employee_id = ? OR u.role_id IS NULL OR u.role_id <> {})",
                Role::Manager.id()
            ),
            Some(auth.employee_id.unwrap_or(0)),
        ),
        Role::Employee => (
            " AND lr.employee_id = ?".to_string(),
            Some(auth.employee_id.unwrap_or(0)),
        ),
    }
}

struct LeaveRow {
    employee_id: u64,
    leave_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    owner_user_id: Option<u64>,
    owner_role_id: Option<u8>,
}

async fn fetch_leave_row(
    pool: &MySqlPool,
    leave_id: u64,
) -> Result<Option<LeaveRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, (u64, String, NaiveDate, NaiveDate, String, Option<u64>, Option<u8>)>(
        r#"
        SELECT lr.employee_id, lr.leave_type, lr.start_date, lr.end_date, lr.status,
               u.id, u.role_id
        FROM leave_requests lr
        LEFT JOIN users u ON u.employee_id = lr.employee_id
        WHERE lr.id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(employee_id, leave_type, start_date, end_date, status, owner_user_id, owner_role_id)| {
            LeaveRow {
                employee_id,
                leave_type,
                start_date,
                end_date,
                status,
                owner_user_id,
                owner_role_id,
            }
        },
    ))
}

/// A Manager may not act on a request filed by another Manager account.
fn manager_guard(auth: &AuthUser, row: &LeaveRow) -> actix_web::Result<()> {
    if auth.role == Role::Manager
        && row.owner_role_id == Some(Role::Manager.id())
        && auth.employee_id != Some(row.employee_id)
    {
        return Err(actix_web::error::ErrorForbidden(
            "Managers cannot act on requests from other managers",
        ));
    }
    Ok(())
}

/// Why a submission was refused; shared by the JSON endpoint and the HTML form.
pub enum SubmitError {
    Policy(String),
    PendingExists,
    EmployeeMissing,
    Db,
}

/// Validate and insert a new request for `employee_id`, then fan out the
/// approver notification. Both front doors route through here so the policy
/// engine is applied exactly once.
pub async fn submit_leave(
    pool: &MySqlPool,
    hub: &NotificationHub,
    employee_id: u64,
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
) -> Result<(), SubmitError> {
    let employee = sqlx::query_as::<_, (String, String, Option<String>, i32, i32, i32)>(
        r#"
        SELECT first_name, last_name, gender,
               annual_leave_balance, sick_leave_balance, personal_leave_balance
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to load employee for leave request");
        SubmitError::Db
    })?;

    let Some((first_name, last_name, gender, annual, sick, personal)) = employee else {
        return Err(SubmitError::EmployeeMissing);
    };

    let balances = LeaveBalances {
        annual,
        sick,
        personal,
    };
    let gender = gender.as_deref().and_then(|g| g.parse().ok());

    leave_policy::validate_request(leave_type, start_date, end_date, gender, &balances)
        .map_err(|violation| SubmitError::Policy(violation.to_string()))?;

    // one open request at a time
    let has_pending = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM leave_requests WHERE employee_id = ? AND status = 'pending')",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Pending-request check failed");
        SubmitError::Db
    })?;

    if has_pending {
        return Err(SubmitError::PendingExists);
    }

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type, start_date, end_date, reason)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(leave_type.as_ref())
    .bind(start_date)
    .bind(end_date)
    .bind(reason.trim())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        SubmitError::Db
    })?;

    // privacy-aware: only approvers hear about new requests
    hub.notify_admins_and_managers(format!(
        "New leave request from {} {}",
        first_name, last_name
    ));
    hub.system_update("LeaveRequests");

    Ok(())
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "status": "pending"
        })),
        (status = 400, description = "Policy violation or pending request exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;

    match submit_leave(
        pool.get_ref(),
        hub.get_ref(),
        employee_id,
        payload.leave_type,
        payload.start_date,
        payload.end_date,
        &payload.reason,
    )
    .await
    {
        Ok(()) => Ok(HttpResponse::Created().json(serde_json::json!({
            "message": "Leave request submitted",
            "status": "pending"
        }))),
        Err(SubmitError::Policy(message)) => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({ "message": message })))
        }
        Err(SubmitError::PendingExists) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "You already have a pending leave request"
        }))),
        Err(SubmitError::EmployeeMissing) => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Employee record not found"
            })))
        }
        Err(SubmitError::Db) => Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        )),
    }
}

/* =========================
Approve / reject (Manager/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/status",
    params(("leave_id" = u64, Path, description = "ID of the leave request to decide")),
    request_body = DecideLeave,
    responses(
        (status = 200, description = "Decision recorded", body = Object, example = json!({
            "message": "Leave request approved"
        })),
        (status = 400, description = "Not pending, bad status, or missing rejection comments"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let leave_id = path.into_inner();

    let decision = payload.status;
    if !matches!(decision, LeaveStatus::Approved | LeaveStatus::Rejected) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Status must be approved or rejected"
        })));
    }

    if decision == LeaveStatus::Rejected
        && payload
            .comments
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "A reason is required when rejecting a leave request"
        })));
    }

    let row = fetch_leave_row(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(row) = row else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    };

    manager_guard(&auth, &row)?;

    if row.status != LeaveStatus::Pending.as_ref() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    let leave_type: LeaveType = row.leave_type.parse().map_err(|_| {
        tracing::error!(leave_id, leave_type = %row.leave_type, "Unknown stored leave type");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let days = total_days(row.start_date, row.end_date);

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, approved_by_id = ?, approver_comments = ?, approved_at = NOW()
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(decision.as_ref())
    .bind(auth.employee_id)
    .bind(payload.comments.as_deref().map(str::trim))
    .bind(leave_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Decide leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        // raced with another approver
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    // balance deduction happens in the same transaction as the status flip
    if decision == LeaveStatus::Approved {
        if let Some(column) = leave_policy::balance_column(leave_type) {
            let sql = format!(
                "UPDATE employees SET {col} = {col} - ? WHERE id = ?",
                col = column
            );
            sqlx::query(&sql)
                .bind(days)
                .bind(row.employee_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, leave_id, "Balance deduction failed");
                    actix_web::error::ErrorInternalServerError("Internal Server Error")
                })?;
        }
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to commit leave decision");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if let Some(user_id) = row.owner_user_id {
        hub.notify_user(
            user_id,
            format!("Your leave request was {}", decision.as_ref()),
        );
    }
    hub.system_update("LeaveRequests");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Leave request {}", decision.as_ref())
    })))
}

/* =========================
Cancel own pending request
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(("leave_id" = u64, Path, description = "ID of the leave request to cancel")),
    responses(
        (status = 200, description = "Cancelled"),
        (status = 400, description = "Not found, not yours, or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;
    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'cancelled'
        WHERE id = ? AND employee_id = ? AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Cancel leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    hub.system_update("LeaveRequests");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request cancelled"
    })))
}

/* =========================
Get one
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let row = fetch_leave_row(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(row) = row else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    };

    if auth.role == Role::Employee && auth.employee_id != Some(row.employee_id) {
        return Err(actix_web::error::ErrorForbidden("Not your request"));
    }
    manager_guard(&auth, &row)?;

    let sql = format!("{} WHERE lr.id = ?", LEAVE_SELECT);
    let leave = sqlx::query_as::<_, LeaveResponse>(&sql)
        .bind(leave_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
List (role-aware)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    if auth.role == Role::Employee && auth.employee_id.is_none() {
        return Err(actix_web::error::ErrorForbidden("No employee profile"));
    }

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    let (vis_sql, vis_bind) = visibility_sql(&auth);
    where_sql.push_str(&vis_sql);
    if let Some(own) = vis_bind {
        args.push(FilterValue::U64(own));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND lr.status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!(
        r#"
        SELECT COUNT(*)
        FROM leave_requests lr
        LEFT JOIN users u ON u.employee_id = lr.employee_id
        {}
        "#,
        where_sql
    );

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "{} {} ORDER BY lr.created_at DESC LIMIT ? OFFSET ?",
        LEAVE_SELECT, where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Delete (Admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to delete")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
        .bind(leave_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Delete leave failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    }

    hub.system_update("LeaveRequests");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request deleted"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser {
            user_id: 1,
            email: "test@ems.com".to_string(),
            role,
            employee_id,
        }
    }

    fn row(employee_id: u64, owner_role_id: Option<u8>) -> LeaveRow {
        LeaveRow {
            employee_id,
            leave_type: "annual".to_string(),
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            status: "pending".to_string(),
            owner_user_id: Some(9),
            owner_role_id,
        }
    }

    #[test]
    fn manager_blocked_on_other_managers_request() {
        let caller = auth(Role::Manager, Some(10));
        let other_manager = row(20, Some(Role::Manager.id()));
        assert!(manager_guard(&caller, &other_manager).is_err());
    }

    #[test]
    fn manager_may_act_on_own_and_employee_requests() {
        let caller = auth(Role::Manager, Some(10));
        assert!(manager_guard(&caller, &row(10, Some(Role::Manager.id()))).is_ok());
        assert!(manager_guard(&caller, &row(20, Some(Role::Employee.id()))).is_ok());
        // requests from employees with no account at all are fair game
        assert!(manager_guard(&caller, &row(20, None)).is_ok());
    }

    #[test]
    fn admin_is_never_blocked() {
        let caller = auth(Role::Admin, None);
        assert!(manager_guard(&caller, &row(20, Some(Role::Manager.id()))).is_ok());
    }

    #[test]
    fn visibility_scopes_by_role() {
        let (sql, bind) = visibility_sql(&auth(Role::Admin, None));
        assert!(sql.is_empty());
        assert!(bind.is_none());

        let (sql, bind) = visibility_sql(&auth(Role::Employee, Some(7)));
        assert_eq!(sql, " AND lr.employee_id = ?");
        assert_eq!(bind, Some(7));

        let (sql, bind) = visibility_sql(&auth(Role::Manager, Some(7)));
        assert!(sql.contains("u.role_id <> 2"));
        assert!(sql.contains("u.role_id IS NULL"));
        assert_eq!(bind, Some(7));
    }
}
