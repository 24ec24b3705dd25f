use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::forms::FormError;

/// Query string of `GET /reports/activity`.
///
/// Both bounds are calendar days; `to` is exclusive. Without bounds the last
/// 30 days up to and including today are reported.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ActivityReportQuery {
    /// Resolves the half-open `[from, to)` window.
    pub fn window(&self) -> Result<(NaiveDateTime, NaiveDateTime), FormError> {
        let today = Utc::now().date_naive();
        let to = self.to.unwrap_or(today + Duration::days(1));
        let from = self.from.unwrap_or(to - Duration::days(30));

        if from >= to {
            return Err(FormError::InvalidValue(
                "`from` must be earlier than `to`".to_string(),
            ));
        }
        Ok((from.and_time(NaiveTime::MIN), to.and_time(NaiveTime::MIN)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_window_is_kept() {
        let query = ActivityReportQuery {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 2, 1),
        };

        let (from, to) = query.window().unwrap();

        assert_eq!(from.to_string(), "2025-01-01 00:00:00");
        assert_eq!(to.to_string(), "2025-02-01 00:00:00");
    }

    #[test]
    fn default_window_spans_thirty_days() {
        let (from, to) = ActivityReportQuery::default().window().unwrap();
        assert_eq!((to - from).num_days(), 30);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let query = ActivityReportQuery {
            from: NaiveDate::from_ymd_opt(2025, 2, 1),
            to: NaiveDate::from_ymd_opt(2025, 1, 1),
        };
        assert!(query.window().is_err());
    }
}
