use crate::api::attendance::{
    AttendanceFilter, AttendanceListResponse, AttendanceResponse, CheckInReq,
};
use crate::api::dashboard::{AttendanceTrend, DashboardStats, DepartmentStat};
use crate::api::department::{DepartmentReq, DepartmentResponse};
use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::job_role::{JobRoleReq, JobRoleResponse};
use crate::api::leave_request::{
    CreateLeave, DecideLeave, LeaveFilter, LeaveListResponse, LeaveResponse,
};
use crate::api::notification::NotificationCounts;
use crate::model::attendance::AttendanceStatus;
use crate::model::employee::{Employee, Gender};
use crate::model::leave_request::{LeaveStatus, LeaveType};
use crate::models::{LoginReqDto, RegisterReq, UserInfo};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management System API",
        version = "1.0.0",
        description = r#"
## Employee Management System (EMS)

JSON API for the EMS service: CRUD over employees, departments and job roles,
plus leave-request and attendance workflows.

### Key Features
- **Employee Management** - create, update, list and view employee profiles
- **Department & Job Role Management** - organisational structure CRUD
- **Leave Management** - apply, approve/reject with balance accounting,
  role-aware visibility of other people's requests
- **Attendance** - daily check-in / check-out with Late detection
- **Dashboard & Notifications** - headline counts and a live event feed

### Security
Endpoints are protected with **JWT Bearer authentication**; the same token
rides in an HttpOnly cookie for the server-rendered pages.

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::me,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::job_role::list_job_roles,
        crate::api::job_role::get_job_role,
        crate::api::job_role::create_job_role,
        crate::api::job_role::update_job_role,
        crate::api::job_role::delete_job_role,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::decide_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::delete_leave,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,

        crate::api::dashboard::stats,
        crate::api::dashboard::department_distribution,
        crate::api::dashboard::attendance_trend,

        crate::api::notification::counts,
        crate::api::notification::stream,
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            UserInfo,
            Employee,
            Gender,
            CreateEmployee,
            EmployeeListResponse,
            DepartmentReq,
            DepartmentResponse,
            JobRoleReq,
            JobRoleResponse,
            LeaveType,
            LeaveStatus,
            CreateLeave,
            DecideLeave,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            AttendanceStatus,
            CheckInReq,
            AttendanceFilter,
            AttendanceResponse,
            AttendanceListResponse,
            DashboardStats,
            DepartmentStat,
            AttendanceTrend,
            NotificationCounts,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, registration and token lifecycle"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "JobRole", description = "Job role management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Dashboard", description = "Aggregate counters"),
        (name = "Notification", description = "Badge counts and the live event feed"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
