use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Workday start used for the Late/Present cut-off.
pub const WORKDAY_START: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    OnLeave,
    Holiday,
}

/// Late when the clock-in lands after the workday start, Present otherwise.
pub fn status_for_check_in(at: NaiveTime) -> AttendanceStatus {
    if at > WORKDAY_START {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Hours between check-in and check-out, floored at zero for clock skew.
pub fn hours_worked(check_in: NaiveTime, check_out: NaiveTime) -> f64 {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return 0.0;
    }
    seconds as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn on_time_is_present() {
        assert_eq!(status_for_check_in(t(8, 45)), AttendanceStatus::Present);
        assert_eq!(status_for_check_in(t(9, 0)), AttendanceStatus::Present);
    }

    #[test]
    fn after_nine_is_late() {
        assert_eq!(status_for_check_in(t(9, 1)), AttendanceStatus::Late);
        assert_eq!(status_for_check_in(t(13, 30)), AttendanceStatus::Late);
    }

    #[test]
    fn hours_worked_spans_the_day() {
        let h = hours_worked(t(9, 0), t(17, 30));
        assert!((h - 8.5).abs() < 1e-9);
    }

    #[test]
    fn hours_worked_never_negative() {
        assert_eq!(hours_worked(t(17, 0), t(9, 0)), 0.0);
    }

    #[test]
    fn status_strings_match_storage() {
        assert_eq!(AttendanceStatus::OnLeave.as_ref(), "on_leave");
        assert_eq!("late".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Late);
    }
}
