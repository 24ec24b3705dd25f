//! Aggregate queries for the reporting endpoints.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::deal_category::DealStage;
use crate::domain::report::{ActivityReportRow, PipelineReportRow};
use crate::domain::types::HubId;
use crate::domain::user::User;
use crate::models::deal_category::DealStage as DbDealStage;
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ReportReader};

/// Counts rows per `user_id` of an activity table inside `[from, to)`.
macro_rules! count_by_user {
    ($conn:expr, $table:ident, $hub_id:expr, $from:expr, $to:expr) => {{
        use crate::schema::$table;

        $table::table
            .filter($table::hub_id.eq($hub_id))
            .filter($table::created_at.ge($from))
            .filter($table::created_at.lt($to))
            .group_by($table::user_id)
            .select(($table::user_id, count_star()))
            .load::<(i32, i64)>($conn)?
            .into_iter()
            .collect::<HashMap<i32, i64>>()
    }};
}

fn deals_by_user(
    conn: &mut SqliteConnection,
    hub_id: i32,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> QueryResult<HashMap<i32, i64>> {
    use crate::schema::{deal_users, deals};

    Ok(deal_users::table
        .inner_join(deals::table)
        .filter(deals::hub_id.eq(hub_id))
        .filter(deals::created_at.ge(from))
        .filter(deals::created_at.lt(to))
        .group_by(deal_users::user_id)
        .select((deal_users::user_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect())
}

impl ReportReader for DieselRepository {
    fn activity_report(
        &self,
        hub_id: HubId,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepositoryResult<Vec<ActivityReportRow>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let hub = hub_id.get();

        let calls = count_by_user!(&mut conn, calls, hub, from, to);
        let emails = count_by_user!(&mut conn, emails, hub, from, to);
        let appointments = count_by_user!(&mut conn, appointments, hub, from, to);
        let deals = deals_by_user(&mut conn, hub, from, to)?;

        let users = users::table
            .filter(users::hub_id.eq(hub))
            .order(users::name.asc())
            .load::<DbUser>(&mut conn)?;

        let mut rows = Vec::with_capacity(users.len());
        for user in users {
            let id = user.id;
            rows.push(ActivityReportRow {
                user: User::try_from(user)?,
                calls: calls.get(&id).copied().unwrap_or(0),
                emails: emails.get(&id).copied().unwrap_or(0),
                appointments: appointments.get(&id).copied().unwrap_or(0),
                deals: deals.get(&id).copied().unwrap_or(0),
            });
        }
        Ok(rows)
    }

    fn pipeline_report(&self, hub_id: HubId) -> RepositoryResult<Vec<PipelineReportRow>> {
        use crate::schema::{deal_stages, deals};

        let mut conn = self.conn()?;

        let stages = deal_stages::table
            .filter(deal_stages::hub_id.eq(hub_id.get()))
            .order((deal_stages::sort.asc(), deal_stages::id.asc()))
            .load::<DbDealStage>(&mut conn)?;

        let mut totals: HashMap<i32, (i64, i64)> = HashMap::new();
        let prices = deals::table
            .filter(deals::hub_id.eq(hub_id.get()))
            .select((deals::stage_id, deals::price))
            .load::<(i32, Option<i64>)>(&mut conn)?;
        // Totals cap at i64::MAX instead of wrapping.
        for (stage_id, price) in prices {
            let entry = totals.entry(stage_id).or_default();
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(price.unwrap_or(0));
        }

        stages
            .into_iter()
            .map(|stage| -> RepositoryResult<PipelineReportRow> {
                let (deals, total_price) = totals.get(&stage.id).copied().unwrap_or_default();
                Ok(PipelineReportRow {
                    stage: DealStage::try_from(stage)?,
                    deals,
                    total_price,
                })
            })
            .collect()
    }
}
