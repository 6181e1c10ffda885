use crate::auth::auth::AuthUser;
use crate::notify::NotificationHub;
use actix_web::{HttpResponse, Responder, web};
use futures::StreamExt;
use futures::stream::select;
use serde::Serialize;
use sqlx::MySqlPool;
use tokio_stream::wrappers::BroadcastStream;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct NotificationCounts {
    /// Pending leave requests awaiting a decision. Zero for plain employees,
    /// who have no business seeing other people's requests.
    #[schema(example = 3)]
    pub pending_leave_requests: i64,
    /// Employees currently checked in and not yet out.
    #[schema(example = 17)]
    pub active_attendance: i64,
}

/// Badge counts for the navigation bar
#[utoipa::path(
    get,
    path = "/api/v1/notifications/counts",
    responses((status = 200, description = "Role-gated badge counts", body = NotificationCounts)),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn counts(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    if !auth.is_manager_or_admin() {
        return Ok(HttpResponse::Ok().json(NotificationCounts {
            pending_leave_requests: 0,
            active_attendance: 0,
        }));
    }

    let pending_leave_requests = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count pending leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let active_attendance = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = CURDATE() AND check_out IS NULL",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count active attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(NotificationCounts {
        pending_leave_requests,
        active_attendance,
    }))
}

/// Server-sent-events feed: everyone channel + role group + personal.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/stream",
    responses((status = 200, description = "text/event-stream of notification frames")),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn stream(auth: AuthUser, hub: web::Data<NotificationHub>) -> impl Responder {
    let sub = hub.subscribe(auth.role, auth.user_id);

    let merged = select(
        BroadcastStream::new(sub.all),
        select(
            BroadcastStream::new(sub.group),
            BroadcastStream::new(sub.personal),
        ),
    );

    // a lagged receiver skips the dropped events rather than closing the feed
    let body = merged.filter_map(|event| async move {
        event
            .ok()
            .map(|ev| Ok::<_, std::convert::Infallible>(web::Bytes::from(ev.sse_frame())))
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(body)
}
