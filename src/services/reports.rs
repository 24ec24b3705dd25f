use crate::auth::AuthenticatedUser;
use crate::domain::report::{ActivityReportRow, PipelineReportRow};
use crate::dto::ReportWindow;
use crate::forms::reports::ActivityReportQuery;
use crate::repository::ReportReader;
use crate::services::{ServiceResult, access_hub};

/// Per-user activity counts for the requested window.
pub fn activity_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ActivityReportQuery,
) -> ServiceResult<ReportWindow<ActivityReportRow>>
where
    R: ReportReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    let (from, to) = params.window()?;

    let rows = repo.activity_report(hub_id, from, to).map_err(|err| {
        log::error!("Failed to build activity report: {err}");
        err
    })?;

    Ok(ReportWindow { from, to, rows })
}

pub fn pipeline_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<PipelineReportRow>>
where
    R: ReportReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    repo.pipeline_report(hub_id).map_err(|err| {
        log::error!("Failed to build pipeline report: {err}");
        err.into()
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{member, outsider, user};

    #[test]
    fn window_is_passed_through() {
        let mut repo = MockRepository::new();
        repo.expect_activity_report()
            .withf(|_, from, to| {
                from.to_string() == "2025-01-01 00:00:00" && to.to_string() == "2025-02-01 00:00:00"
            })
            .returning(|_, _, _| {
                Ok(vec![ActivityReportRow {
                    user: user(1),
                    calls: 2,
                    emails: 0,
                    appointments: 1,
                    deals: 0,
                }])
            });

        let params = ActivityReportQuery {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 2, 1),
        };
        let report = activity_report(&repo, &member(), params).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].calls, 2);
    }

    #[test]
    fn inverted_window_is_rejected_before_querying() {
        let mut repo = MockRepository::new();
        repo.expect_activity_report().never();

        let params = ActivityReportQuery {
            from: NaiveDate::from_ymd_opt(2025, 2, 1),
            to: NaiveDate::from_ymd_opt(2025, 1, 1),
        };

        assert!(matches!(
            activity_report(&repo, &member(), params),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn reports_require_access_role() {
        let repo = MockRepository::new();
        assert!(matches!(
            pipeline_report(&repo, &outsider()),
            Err(ServiceError::Forbidden)
        ));
    }
}
