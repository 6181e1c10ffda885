use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Unpaid,
    Maternity,
    Paternity,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Inclusive day span of a leave request.
pub fn total_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn total_days_is_inclusive() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert_eq!(total_days(d("2026-03-02"), d("2026-03-02")), 1);
        assert_eq!(total_days(d("2026-03-02"), d("2026-03-06")), 5);
    }

    #[test]
    fn leave_type_round_trips_through_lowercase() {
        assert_eq!(LeaveType::Maternity.to_string(), "maternity");
        assert_eq!("paternity".parse::<LeaveType>().unwrap(), LeaveType::Paternity);
        assert!("holiday".parse::<LeaveType>().is_err());
    }

    #[test]
    fn status_strings_match_storage() {
        assert_eq!(LeaveStatus::Pending.as_ref(), "pending");
        assert_eq!("cancelled".parse::<LeaveStatus>().unwrap(), LeaveStatus::Cancelled);
    }
}
