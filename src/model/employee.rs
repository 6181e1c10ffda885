use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@ems.com",
        "phone": "+15551234567",
        "gender": "male",
        "hire_date": "2024-01-01",
        "termination_date": null,
        "department_id": 2,
        "job_role_id": 1,
        "salary": 72000.0,
        "address": "123 Main St",
        "is_active": true,
        "annual_leave_balance": 20,
        "sick_leave_balance": 10,
        "personal_leave_balance": 5
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@ems.com")]
    pub email: String,

    #[schema(example = "+15551234567", nullable = true)]
    pub phone: Option<String>,

    /// "male" or "female"; unset when the employee did not declare one
    #[schema(example = "male", nullable = true, value_type = String)]
    pub gender: Option<String>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "2026-12-31", value_type = String, format = "date", nullable = true)]
    pub termination_date: Option<NaiveDate>,

    #[schema(example = 2)]
    pub department_id: u64,

    #[schema(example = 1)]
    pub job_role_id: u64,

    #[schema(example = 72000.0, nullable = true)]
    pub salary: Option<f64>,

    #[schema(example = "123 Main St", nullable = true)]
    pub address: Option<String>,

    pub is_active: bool,

    #[schema(example = 20)]
    pub annual_leave_balance: i32,

    #[schema(example = 10)]
    pub sick_leave_balance: i32,

    #[schema(example = 5)]
    pub personal_leave_balance: i32,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub updated_at: Option<DateTime<Utc>>,
}
