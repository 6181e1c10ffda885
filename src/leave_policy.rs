//! Leave-request eligibility rules and balance accounting.
//!
//! Pure functions so the rules stay testable away from the database; the
//! handlers in `api::leave_request` apply them and own the SQL.

use chrono::NaiveDate;
use derive_more::Display;

use crate::model::employee::Gender;
use crate::model::leave_request::{LeaveType, total_days};

pub const PERSONAL_MAX_DAYS: i64 = 3;
pub const UNPAID_MAX_DAYS: i64 = 30;
pub const MATERNITY_MAX_DAYS: i64 = 180;
pub const PATERNITY_MAX_DAYS: i64 = 15;

/// Remaining per-type day counts for one employee.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LeaveBalances {
    pub annual: i32,
    pub sick: i32,
    pub personal: i32,
}

#[derive(Debug, PartialEq, Eq, Display)]
pub enum PolicyViolation {
    #[display(fmt = "end_date cannot be before start_date")]
    InvalidDateRange,
    #[display(
        fmt = "Insufficient {} leave balance: requested {} days, {} remaining",
        leave_type,
        requested,
        remaining
    )]
    InsufficientBalance {
        leave_type: LeaveType,
        requested: i64,
        remaining: i32,
    },
    #[display(fmt = "{} leave cannot exceed {} days per request", leave_type, limit)]
    ExceedsTypeLimit { leave_type: LeaveType, limit: i64 },
    #[display(fmt = "{} leave is not applicable for this employee", leave_type)]
    GenderRestricted { leave_type: LeaveType },
}

/// Which employee balance column a leave type draws from, if any.
/// Unpaid, maternity and paternity leave are not balance-tracked.
pub fn balance_column(leave_type: LeaveType) -> Option<&'static str> {
    match leave_type {
        LeaveType::Annual => Some("annual_leave_balance"),
        LeaveType::Sick => Some("sick_leave_balance"),
        LeaveType::Personal => Some("personal_leave_balance"),
        LeaveType::Unpaid | LeaveType::Maternity | LeaveType::Paternity => None,
    }
}

/// Validate a new request against the per-type policy table.
/// Returns the inclusive day span on success.
pub fn validate_request(
    leave_type: LeaveType,
    start: NaiveDate,
    end: NaiveDate,
    gender: Option<Gender>,
    balances: &LeaveBalances,
) -> Result<i64, PolicyViolation> {
    if end < start {
        return Err(PolicyViolation::InvalidDateRange);
    }

    let requested = total_days(start, end);

    match leave_type {
        LeaveType::Annual => check_balance(leave_type, requested, balances.annual)?,
        LeaveType::Sick => check_balance(leave_type, requested, balances.sick)?,
        LeaveType::Personal => {
            check_limit(leave_type, requested, PERSONAL_MAX_DAYS)?;
            check_balance(leave_type, requested, balances.personal)?;
        }
        LeaveType::Unpaid => check_limit(leave_type, requested, UNPAID_MAX_DAYS)?,
        LeaveType::Maternity => {
            if gender != Some(Gender::Female) {
                return Err(PolicyViolation::GenderRestricted { leave_type });
            }
            check_limit(leave_type, requested, MATERNITY_MAX_DAYS)?;
        }
        LeaveType::Paternity => {
            if gender != Some(Gender::Male) {
                return Err(PolicyViolation::GenderRestricted { leave_type });
            }
            check_limit(leave_type, requested, PATERNITY_MAX_DAYS)?;
        }
    }

    Ok(requested)
}

/// Balance state after approving `days` of `leave_type`.
pub fn deduct(balances: &LeaveBalances, leave_type: LeaveType, days: i64) -> LeaveBalances {
    let days = days as i32;
    let mut next = *balances;
    match leave_type {
        LeaveType::Annual => next.annual -= days,
        LeaveType::Sick => next.sick -= days,
        LeaveType::Personal => next.personal -= days,
        LeaveType::Unpaid | LeaveType::Maternity | LeaveType::Paternity => {}
    }
    next
}

fn check_balance(
    leave_type: LeaveType,
    requested: i64,
    remaining: i32,
) -> Result<(), PolicyViolation> {
    if requested > remaining as i64 {
        return Err(PolicyViolation::InsufficientBalance {
            leave_type,
            requested,
            remaining,
        });
    }
    Ok(())
}

fn check_limit(leave_type: LeaveType, requested: i64, limit: i64) -> Result<(), PolicyViolation> {
    if requested > limit {
        return Err(PolicyViolation::ExceedsTypeLimit { leave_type, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn balances() -> LeaveBalances {
        LeaveBalances {
            annual: 20,
            sick: 10,
            personal: 5,
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let err = validate_request(
            LeaveType::Annual,
            d("2026-04-10"),
            d("2026-04-01"),
            None,
            &balances(),
        )
        .unwrap_err();
        assert_eq!(err, PolicyViolation::InvalidDateRange);
    }

    #[test]
    fn annual_within_balance_passes() {
        let days = validate_request(
            LeaveType::Annual,
            d("2026-04-01"),
            d("2026-04-20"),
            None,
            &balances(),
        )
        .unwrap();
        assert_eq!(days, 20);
    }

    #[test]
    fn annual_over_balance_fails() {
        let err = validate_request(
            LeaveType::Annual,
            d("2026-04-01"),
            d("2026-04-21"),
            None,
            &balances(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PolicyViolation::InsufficientBalance {
                leave_type: LeaveType::Annual,
                requested: 21,
                remaining: 20,
            }
        );
    }

    #[test]
    fn personal_capped_at_three_consecutive_days() {
        let err = validate_request(
            LeaveType::Personal,
            d("2026-04-01"),
            d("2026-04-04"),
            None,
            &balances(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PolicyViolation::ExceedsTypeLimit {
                leave_type: LeaveType::Personal,
                limit: PERSONAL_MAX_DAYS,
            }
        );
    }

    #[test]
    fn personal_also_checks_balance() {
        let low = LeaveBalances {
            personal: 1,
            ..balances()
        };
        let err = validate_request(
            LeaveType::Personal,
            d("2026-04-01"),
            d("2026-04-02"),
            None,
            &low,
        )
        .unwrap_err();
        assert!(matches!(err, PolicyViolation::InsufficientBalance { .. }));
    }

    #[test]
    fn unpaid_capped_at_thirty_days() {
        assert!(
            validate_request(
                LeaveType::Unpaid,
                d("2026-04-01"),
                d("2026-04-30"),
                None,
                &balances(),
            )
            .is_ok()
        );
        let err = validate_request(
            LeaveType::Unpaid,
            d("2026-04-01"),
            d("2026-05-01"),
            None,
            &balances(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PolicyViolation::ExceedsTypeLimit {
                leave_type: LeaveType::Unpaid,
                limit: UNPAID_MAX_DAYS,
            }
        );
    }

    #[test]
    fn maternity_requires_female() {
        let err = validate_request(
            LeaveType::Maternity,
            d("2026-04-01"),
            d("2026-04-10"),
            Some(Gender::Male),
            &balances(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PolicyViolation::GenderRestricted {
                leave_type: LeaveType::Maternity,
            }
        );
        // undeclared gender is also refused
        assert!(
            validate_request(
                LeaveType::Maternity,
                d("2026-04-01"),
                d("2026-04-10"),
                None,
                &balances(),
            )
            .is_err()
        );
    }

    #[test]
    fn paternity_requires_male_and_caps_at_fifteen() {
        assert!(
            validate_request(
                LeaveType::Paternity,
                d("2026-04-01"),
                d("2026-04-15"),
                Some(Gender::Male),
                &balances(),
            )
            .is_ok()
        );
        let err = validate_request(
            LeaveType::Paternity,
            d("2026-04-01"),
            d("2026-04-16"),
            Some(Gender::Male),
            &balances(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PolicyViolation::ExceedsTypeLimit {
                leave_type: LeaveType::Paternity,
                limit: PATERNITY_MAX_DAYS,
            }
        );
    }

    #[test]
    fn deduct_touches_only_the_matching_balance() {
        let b = balances();
        assert_eq!(deduct(&b, LeaveType::Sick, 4).sick, 6);
        assert_eq!(deduct(&b, LeaveType::Sick, 4).annual, 20);
        // non-tracked types leave balances alone
        assert_eq!(deduct(&b, LeaveType::Unpaid, 30), b);
        assert_eq!(deduct(&b, LeaveType::Maternity, 90), b);
    }

    #[test]
    fn balance_columns_cover_tracked_types_only() {
        assert_eq!(balance_column(LeaveType::Annual), Some("annual_leave_balance"));
        assert_eq!(balance_column(LeaveType::Personal), Some("personal_leave_balance"));
        assert_eq!(balance_column(LeaveType::Paternity), None);
    }
}
