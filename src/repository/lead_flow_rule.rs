//! Repository implementation for lead flow rules.

use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::lead_flow_rule::{LeadFlowRule, NewLeadFlowRule, UpdateLeadFlowRule};
use crate::domain::ordering::reorder;
use crate::domain::types::{HubId, LeadFlowRuleId};
use crate::models::lead_flow_rule::{
    LeadFlowRule as DbLeadFlowRule, NewLeadFlowRule as DbNewLeadFlowRule,
    UpdateLeadFlowRule as DbUpdateLeadFlowRule,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, LeadFlowRuleReader, LeadFlowRuleWriter};

fn load_rules(conn: &mut SqliteConnection, hub_id: i32) -> QueryResult<Vec<DbLeadFlowRule>> {
    use crate::schema::lead_flow_rules;

    lead_flow_rules::table
        .filter(lead_flow_rules::hub_id.eq(hub_id))
        .order((
            lead_flow_rules::is_default.asc(),
            lead_flow_rules::sort.asc(),
            lead_flow_rules::id.asc(),
        ))
        .load::<DbLeadFlowRule>(conn)
}

/// Drops the default flag from every rule of the hub except `keep`.
fn clear_other_defaults(conn: &mut SqliteConnection, hub_id: i32, keep: i32) -> QueryResult<usize> {
    use crate::schema::lead_flow_rules;

    diesel::update(
        lead_flow_rules::table
            .filter(lead_flow_rules::hub_id.eq(hub_id))
            .filter(lead_flow_rules::id.ne(keep))
            .filter(lead_flow_rules::is_default.eq(true)),
    )
    .set(lead_flow_rules::is_default.eq(false))
    .execute(conn)
}

fn into_domain(rows: Vec<DbLeadFlowRule>) -> RepositoryResult<Vec<LeadFlowRule>> {
    rows.into_iter().map(LeadFlowRule::try_from).collect()
}

impl LeadFlowRuleReader for DieselRepository {
    fn list_lead_flow_rules(&self, hub_id: HubId) -> RepositoryResult<Vec<LeadFlowRule>> {
        let mut conn = self.conn()?;
        into_domain(load_rules(&mut conn, hub_id.get())?)
    }

    fn get_lead_flow_rule_by_id(
        &self,
        id: LeadFlowRuleId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<LeadFlowRule>> {
        use crate::schema::lead_flow_rules;

        let mut conn = self.conn()?;
        let rule = lead_flow_rules::table
            .filter(lead_flow_rules::id.eq(id.get()))
            .filter(lead_flow_rules::hub_id.eq(hub_id.get()))
            .first::<DbLeadFlowRule>(&mut conn)
            .optional()?;

        rule.map(LeadFlowRule::try_from).transpose()
    }
}

impl LeadFlowRuleWriter for DieselRepository {
    fn create_lead_flow_rule(&self, rule: &NewLeadFlowRule) -> RepositoryResult<LeadFlowRule> {
        use crate::schema::lead_flow_rules;

        let mut conn = self.conn()?;
        let hub_id = rule.hub_id.get();

        let created = conn.transaction::<DbLeadFlowRule, RepositoryError, _>(|conn| {
            let last_sort: Option<i32> = lead_flow_rules::table
                .filter(lead_flow_rules::hub_id.eq(hub_id))
                .select(max(lead_flow_rules::sort))
                .first(conn)?;

            let insertable = DbNewLeadFlowRule::from_domain(rule, last_sort.map_or(0, |s| s + 1))?;

            let created = diesel::insert_into(lead_flow_rules::table)
                .values(&insertable)
                .get_result::<DbLeadFlowRule>(conn)?;

            if created.is_default {
                clear_other_defaults(conn, hub_id, created.id)?;
            }
            Ok(created)
        })?;

        LeadFlowRule::try_from(created)
    }

    fn update_lead_flow_rule(
        &self,
        id: LeadFlowRuleId,
        hub_id: HubId,
        updates: &UpdateLeadFlowRule,
    ) -> RepositoryResult<LeadFlowRule> {
        use crate::schema::lead_flow_rules;

        let mut conn = self.conn()?;
        let changes = DbUpdateLeadFlowRule::try_from(updates)?;

        let updated = conn.transaction::<DbLeadFlowRule, RepositoryError, _>(|conn| {
            let updated = diesel::update(
                lead_flow_rules::table
                    .filter(lead_flow_rules::id.eq(id.get()))
                    .filter(lead_flow_rules::hub_id.eq(hub_id.get())),
            )
            .set(&changes)
            .get_result::<DbLeadFlowRule>(conn)?;

            if updated.is_default {
                clear_other_defaults(conn, hub_id.get(), updated.id)?;
            }
            Ok(updated)
        })?;

        LeadFlowRule::try_from(updated)
    }

    fn delete_lead_flow_rule(&self, id: LeadFlowRuleId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::lead_flow_rules;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            lead_flow_rules::table
                .filter(lead_flow_rules::id.eq(id.get()))
                .filter(lead_flow_rules::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn reorder_lead_flow_rule(
        &self,
        id: LeadFlowRuleId,
        hub_id: HubId,
        position: usize,
    ) -> RepositoryResult<Vec<LeadFlowRule>> {
        use crate::schema::lead_flow_rules;

        let mut conn = self.conn()?;

        let rows = conn.transaction::<Vec<DbLeadFlowRule>, RepositoryError, _>(|conn| {
            let ordered: Vec<i32> = load_rules(conn, hub_id.get())?
                .into_iter()
                .filter(|rule| !rule.is_default)
                .map(|rule| rule.id)
                .collect();

            let positions = reorder(&ordered, id.get(), position).ok_or(RepositoryError::NotFound)?;

            for (rule_id, sort) in positions {
                diesel::update(lead_flow_rules::table.find(rule_id))
                    .set(lead_flow_rules::sort.eq(sort))
                    .execute(conn)?;
            }

            Ok(load_rules(conn, hub_id.get())?)
        })?;

        into_domain(rows)
    }
}
