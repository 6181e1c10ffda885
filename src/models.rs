use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "jane.doe@ems.com", format = "email")]
    pub email: String,
    #[schema(example = "S3cret!pass")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    /// 1 = Admin, 2 = Manager, 3 = Employee
    #[schema(example = 3)]
    pub role_id: u8,
    /// Link to an existing employee record, if any
    pub employee_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "admin@ems.com", format = "email")]
    pub email: String,
    #[schema(example = "Admin@123")]
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // matches BIGINT UNSIGNED
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role_id: u8,
    pub employee_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub id: u64,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub employee_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
