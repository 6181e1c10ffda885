//! Server-rendered pages. Thin handlers over the same queries the JSON API
//! runs; authentication rides in the access-token cookie set at login.

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, web};
use askama::Template;
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::error;

use crate::api::leave_request::{
    LEAVE_SELECT, LeaveResponse, SubmitError, submit_leave, visibility_sql,
};
use crate::auth::auth::{AUTH_COOKIE, AuthUser};
use crate::auth::handlers::{LoginError, authenticate};
use crate::auth::jwt::generate_access_token;
use crate::config::Config;
use crate::model::leave_request::LeaveType;
use crate::model::role::Role;
use crate::notify::NotificationHub;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    user_name: String,
    role: String,
    total_employees: i64,
    total_departments: i64,
    pending_leave_requests: i64,
    checked_in_now: i64,
}

struct EmployeeRow {
    name: String,
    email: String,
    department: String,
    job_role: String,
    status: String,
}

#[derive(Template)]
#[template(path = "employees.html")]
struct EmployeesTemplate {
    rows: Vec<EmployeeRow>,
}

struct LeaveRowView {
    id: u64,
    employee: String,
    leave_type: String,
    start_date: String,
    end_date: String,
    reason: String,
    status: String,
    decided_by: String,
}

#[derive(Template)]
#[template(path = "leave.html")]
struct LeaveTemplate {
    error: String,
    can_request: bool,
    can_decide: bool,
    rows: Vec<LeaveRowView>,
}

struct AttendanceRowView {
    date: String,
    employee: String,
    check_in: String,
    check_out: String,
    hours: String,
    status: String,
}

#[derive(Template)]
#[template(path = "attendance.html")]
struct AttendanceTemplate {
    can_check: bool,
    rows: Vec<AttendanceRowView>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LeaveForm {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

fn render(template: impl Template) -> actix_web::Result<HttpResponse> {
    let body = template.render().map_err(|e| {
        error!(error = %e, "Template render failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

fn redirect(to: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, to))
        .finish()
}

pub async fn login_form(user: Option<AuthUser>) -> actix_web::Result<impl Responder> {
    if user.is_some() {
        return Ok(redirect("/"));
    }
    render(LoginTemplate {
        error: String::new(),
    })
}

pub async fn login_submit(
    form: web::Form<LoginForm>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let user = match authenticate(pool.get_ref(), form.email.trim(), &form.password).await {
        Ok(u) => u,
        Err(LoginError::InvalidCredentials) => {
            return render(LoginTemplate {
                error: "Invalid email or password".to_string(),
            });
        }
        Err(LoginError::Db) => {
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        }
    };

    let token = generate_access_token(
        user.id,
        user.email.clone(),
        user.role_id,
        user.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let cookie = Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.access_token_ttl as i64))
        .finish();

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish())
}

pub async fn logout() -> impl Responder {
    let expired = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .cookie(expired)
        .finish()
}

async fn count(pool: &MySqlPool, sql: &str) -> actix_web::Result<i64> {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            error!(error = %e, sql, "Dashboard count failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

pub async fn dashboard(
    user: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let Some(user) = user else {
        return Ok(redirect("/login"));
    };

    let pool = pool.get_ref();

    let user_name = sqlx::query_scalar::<_, Option<String>>(
        "SELECT full_name FROM users WHERE id = ?",
    )
    .bind(user.user_id)
    .fetch_optional(pool)
    .await
    .ok()
    .flatten()
    .flatten()
    .unwrap_or_else(|| user.email.clone());

    render(DashboardTemplate {
        user_name,
        role: user.role.as_str().to_string(),
        total_employees: count(pool, "SELECT COUNT(*) FROM employees WHERE is_active = TRUE")
            .await?,
        total_departments: count(pool, "SELECT COUNT(*) FROM departments").await?,
        pending_leave_requests: count(
            pool,
            "SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'",
        )
        .await?,
        checked_in_now: count(
            pool,
            "SELECT COUNT(*) FROM attendance WHERE date = CURDATE() AND check_out IS NULL",
        )
        .await?,
    })
}

pub async fn employees(
    user: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    if user.is_none() {
        return Ok(redirect("/login"));
    }

    let rows = sqlx::query_as::<_, (String, String, Option<String>, Option<String>, bool)>(
        r#"
        SELECT CONCAT(e.first_name, ' ', e.last_name),
               e.email,
               d.name,
               r.title,
               e.is_active
        FROM employees e
        LEFT JOIN departments d ON d.id = e.department_id
        LEFT JOIN job_roles r ON r.id = e.job_role_id
        ORDER BY e.id DESC
        LIMIT 100
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch employees page");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let rows = rows
        .into_iter()
        .map(|(name, email, department, job_role, is_active)| EmployeeRow {
            name,
            email,
            department: department.unwrap_or_default(),
            job_role: job_role.unwrap_or_default(),
            status: if is_active { "active" } else { "inactive" }.to_string(),
        })
        .collect();

    render(EmployeesTemplate { rows })
}

async fn render_leave_page(
    user: &AuthUser,
    pool: &MySqlPool,
    error_message: String,
) -> actix_web::Result<HttpResponse> {
    let (vis_sql, vis_bind) = visibility_sql(user);

    let sql = format!(
        "{} WHERE 1=1{} ORDER BY lr.created_at DESC LIMIT 100",
        LEAVE_SELECT, vis_sql
    );

    let mut query = sqlx::query_as::<_, LeaveResponse>(&sql);
    if let Some(own) = vis_bind {
        query = query.bind(own);
    }

    let requests = query.fetch_all(pool).await.map_err(|e| {
        error!(error = %e, "Failed to fetch leave page");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let can_request = match user.employee_id {
        Some(employee_id) => {
            // the form is pointless while a request is already open
            !sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM leave_requests WHERE employee_id = ? AND status = 'pending')",
            )
            .bind(employee_id)
            .fetch_one(pool)
            .await
            .unwrap_or(true)
        }
        None => false,
    };

    let rows = requests
        .into_iter()
        .map(|r| LeaveRowView {
            id: r.id,
            employee: r.employee_name,
            leave_type: r.leave_type,
            start_date: r.start_date.to_string(),
            end_date: r.end_date.to_string(),
            reason: r.reason,
            status: r.status,
            decided_by: r.approved_by_name.unwrap_or_default(),
        })
        .collect();

    render(LeaveTemplate {
        error: error_message,
        can_request,
        can_decide: user.is_manager_or_admin(),
        rows,
    })
}

pub async fn leave(
    user: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let Some(user) = user else {
        return Ok(redirect("/login"));
    };

    render_leave_page(&user, pool.get_ref(), String::new()).await
}

pub async fn leave_submit(
    user: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
    hub: web::Data<NotificationHub>,
    form: web::Form<LeaveForm>,
) -> actix_web::Result<impl Responder> {
    let Some(user) = user else {
        return Ok(redirect("/login"));
    };

    let Some(employee_id) = user.employee_id else {
        return render_leave_page(
            &user,
            pool.get_ref(),
            "Your account has no employee profile".to_string(),
        )
        .await;
    };

    match submit_leave(
        pool.get_ref(),
        hub.get_ref(),
        employee_id,
        form.leave_type,
        form.start_date,
        form.end_date,
        &form.reason,
    )
    .await
    {
        Ok(()) => Ok(redirect("/leave")),
        Err(SubmitError::Policy(message)) => {
            render_leave_page(&user, pool.get_ref(), message).await
        }
        Err(SubmitError::PendingExists) => {
            render_leave_page(
                &user,
                pool.get_ref(),
                "You already have a pending leave request".to_string(),
            )
            .await
        }
        Err(SubmitError::EmployeeMissing) => {
            render_leave_page(
                &user,
                pool.get_ref(),
                "Employee record not found".to_string(),
            )
            .await
        }
        Err(SubmitError::Db) => Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        )),
    }
}

pub async fn attendance(
    user: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let Some(user) = user else {
        return Ok(redirect("/login"));
    };

    let mut sql = String::from(
        r#"
        SELECT att.date,
               CONCAT(e.first_name, ' ', e.last_name),
               att.check_in,
               att.check_out,
               att.hours_worked,
               att.status
        FROM attendance att
        JOIN employees e ON e.id = att.employee_id
        "#,
    );

    let own = if user.is_manager_or_admin() {
        None
    } else {
        // employees only ever see their own history
        Some(user.employee_id.unwrap_or(0))
    };

    if own.is_some() {
        sql.push_str(" WHERE att.employee_id = ?");
    }
    sql.push_str(" ORDER BY att.date DESC, att.id DESC LIMIT 30");

    let mut query = sqlx::query_as::<
        _,
        (
            NaiveDate,
            String,
            Option<chrono::NaiveTime>,
            Option<chrono::NaiveTime>,
            Option<f64>,
            String,
        ),
    >(&sql);
    if let Some(own) = own {
        query = query.bind(own);
    }

    let rows = query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch attendance page");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let rows = rows
        .into_iter()
        .map(
            |(date, employee, check_in, check_out, hours, status)| AttendanceRowView {
                date: date.to_string(),
                employee,
                check_in: check_in.map(|t| t.to_string()).unwrap_or_default(),
                check_out: check_out.map(|t| t.to_string()).unwrap_or_default(),
                hours: hours.map(|h| format!("{:.2}", h)).unwrap_or_default(),
                status,
            },
        )
        .collect();

    render(AttendanceTemplate {
        can_check: user.role != Role::Admin && user.employee_id.is_some(),
        rows,
    })
}
