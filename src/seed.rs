//! Schema bootstrap and demo data, run once at startup.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sqlx::MySqlPool;

use crate::auth::password::hash_password;
use crate::model::role::Role;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL UNIQUE,
        description VARCHAR(500) NULL,
        manager_id BIGINT UNSIGNED NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_roles (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        description VARCHAR(500) NULL,
        department_id BIGINT UNSIGNED NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        first_name VARCHAR(50) NOT NULL,
        last_name VARCHAR(50) NOT NULL,
        email VARCHAR(100) NOT NULL UNIQUE,
        phone VARCHAR(20) NULL,
        gender VARCHAR(10) NULL,
        hire_date DATE NOT NULL,
        termination_date DATE NULL,
        department_id BIGINT UNSIGNED NOT NULL,
        job_role_id BIGINT UNSIGNED NOT NULL,
        salary DOUBLE NULL,
        address VARCHAR(200) NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        annual_leave_balance INT NOT NULL DEFAULT 20,
        sick_leave_balance INT NOT NULL DEFAULT 10,
        personal_leave_balance INT NOT NULL DEFAULT 5,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NULL ON UPDATE CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        email VARCHAR(100) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        full_name VARCHAR(100) NULL,
        role_id TINYINT UNSIGNED NOT NULL,
        employee_id BIGINT UNSIGNED NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        last_login_at TIMESTAMP NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS refresh_tokens (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT UNSIGNED NOT NULL,
        jti CHAR(36) NOT NULL UNIQUE,
        expires_at TIMESTAMP NOT NULL,
        revoked BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        employee_id BIGINT UNSIGNED NOT NULL,
        date DATE NOT NULL,
        check_in TIME NULL,
        check_out TIME NULL,
        hours_worked DOUBLE NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'present',
        notes VARCHAR(500) NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NULL ON UPDATE CURRENT_TIMESTAMP,
        UNIQUE KEY uq_attendance_employee_date (employee_id, date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        employee_id BIGINT UNSIGNED NOT NULL,
        leave_type VARCHAR(20) NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        reason VARCHAR(500) NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'pending',
        approved_by_id BIGINT UNSIGNED NULL,
        approver_comments VARCHAR(500) NULL,
        approved_at TIMESTAMP NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

const DEPARTMENTS: &[(&str, &str)] = &[
    ("Human Resources", "HR Department"),
    ("Engineering", "Software Development"),
    ("Sales", "Sales and Marketing"),
    ("Finance", "Finance and Accounting"),
    ("Operations", "Operations Management"),
];

const JOB_ROLES: &[(&str, &str)] = &[
    ("Software Engineer", "Engineering"),
    ("Senior Software Engineer", "Engineering"),
    ("Engineering Manager", "Engineering"),
    ("HR Manager", "Human Resources"),
    ("HR Specialist", "Human Resources"),
    ("Sales Representative", "Sales"),
    ("Sales Manager", "Sales"),
    ("Accountant", "Finance"),
    ("Finance Manager", "Finance"),
];

pub async fn run(pool: &MySqlPool, seed_demo_data: bool) -> Result<()> {
    for ddl in SCHEMA {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .context("schema bootstrap failed")?;
    }

    if seed_demo_data {
        seed_demo(pool).await?;
    }

    Ok(())
}

async fn department_id(pool: &MySqlPool, name: &str) -> Result<u64> {
    sqlx::query_scalar::<_, u64>("SELECT id FROM departments WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .with_context(|| format!("department {} missing after seed", name))
}

async fn job_role_id(pool: &MySqlPool, title: &str) -> Result<u64> {
    sqlx::query_scalar::<_, u64>("SELECT id FROM job_roles WHERE title = ?")
        .bind(title)
        .fetch_one(pool)
        .await
        .with_context(|| format!("job role {} missing after seed", title))
}

async fn seed_demo(pool: &MySqlPool) -> Result<()> {
    let have_departments =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM departments)")
            .fetch_one(pool)
            .await?;

    if !have_departments {
        for (name, description) in DEPARTMENTS {
            sqlx::query("INSERT INTO departments (name, description) VALUES (?, ?)")
                .bind(name)
                .bind(description)
                .execute(pool)
                .await?;
        }
    }

    let have_job_roles = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM job_roles)")
        .fetch_one(pool)
        .await?;

    if !have_job_roles {
        for (title, department) in JOB_ROLES {
            let dept = department_id(pool, department).await?;
            sqlx::query("INSERT INTO job_roles (title, department_id) VALUES (?, ?)")
                .bind(title)
                .bind(dept)
                .execute(pool)
                .await?;
        }
    }

    // Admin account has no employee profile on purpose: admins administer,
    // they do not clock in or take leave through the system.
    seed_account(
        pool,
        "admin@ems.com",
        "Admin@123",
        "System Administrator",
        Role::Admin,
        None,
    )
    .await?;

    let engineering = department_id(pool, "Engineering").await?;
    let eng_manager_role = job_role_id(pool, "Engineering Manager").await?;
    let engineer_role = job_role_id(pool, "Software Engineer").await?;

    let manager_employee = seed_employee(
        pool,
        "Department",
        "Manager",
        "manager@ems.com",
        engineering,
        eng_manager_role,
        95_000.0,
    )
    .await?;
    seed_account(
        pool,
        "manager@ems.com",
        "Manager@123",
        "Department Manager",
        Role::Manager,
        Some(manager_employee),
    )
    .await?;

    let regular_employee = seed_employee(
        pool,
        "Regular",
        "Employee",
        "employee@ems.com",
        engineering,
        engineer_role,
        65_000.0,
    )
    .await?;
    seed_account(
        pool,
        "employee@ems.com",
        "Employee@123",
        "Regular Employee",
        Role::Employee,
        Some(regular_employee),
    )
    .await?;

    log::info!("Demo data seeded");

    Ok(())
}

async fn seed_employee(
    pool: &MySqlPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    department_id: u64,
    job_role_id: u64,
    salary: f64,
) -> Result<u64> {
    if let Some(id) = sqlx::query_scalar::<_, u64>("SELECT id FROM employees WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?
    {
        return Ok(id);
    }

    let hire_date = (Utc::now() - Duration::days(3 * 365)).date_naive();

    let result = sqlx::query(
        r#"
        INSERT INTO employees
            (first_name, last_name, email, hire_date, department_id, job_role_id, salary)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(hire_date)
    .bind(department_id)
    .bind(job_role_id)
    .bind(salary)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

async fn seed_account(
    pool: &MySqlPool,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
    employee_id: Option<u64>,
) -> Result<()> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)",
    )
    .bind(email)
    .fetch_one(pool)
    .await?;

    if exists {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO users (email, password, full_name, role_id, employee_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(email)
    .bind(hash_password(password))
    .bind(full_name)
    .bind(role.id())
    .bind(employee_id)
    .execute(pool)
    .await?;

    Ok(())
}
