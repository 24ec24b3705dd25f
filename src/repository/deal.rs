//! Repository implementation for deals and their people/user pivots.

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::bulk::BulkSelection;
use crate::domain::deal::{Deal, DealWithRelations, NewDeal, UpdateDeal};
use crate::domain::person::Person;
use crate::domain::types::{DealId, DealStageId, DealTypeId, HubId, PersonId, UserId};
use crate::domain::user::User;
use crate::models::deal::{
    Deal as DbDeal, NewDeal as DbNewDeal, NewDealPerson, NewDealUser, UpdateDeal as DbUpdateDeal,
};
use crate::models::person::Person as DbPerson;
use crate::models::user::User as DbUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DealListQuery, DealReader, DealWriter, DieselRepository};

/// Rejects stage or type ids that belong to another hub.
fn check_categories(
    conn: &mut SqliteConnection,
    hub_id: i32,
    stage_id: DealStageId,
    type_id: Option<DealTypeId>,
) -> Result<(), RepositoryError> {
    use crate::schema::{deal_stages, deal_types};

    let stage_count: i64 = deal_stages::table
        .filter(deal_stages::id.eq(stage_id.get()))
        .filter(deal_stages::hub_id.eq(hub_id))
        .count()
        .get_result(conn)?;
    if stage_count == 0 {
        return Err(RepositoryError::ValidationError(format!(
            "Unknown deal stage {stage_id}"
        )));
    }

    if let Some(type_id) = type_id {
        let type_count: i64 = deal_types::table
            .filter(deal_types::id.eq(type_id.get()))
            .filter(deal_types::hub_id.eq(hub_id))
            .count()
            .get_result(conn)?;
        if type_count == 0 {
            return Err(RepositoryError::ValidationError(format!(
                "Unknown deal type {type_id}"
            )));
        }
    }
    Ok(())
}

/// Replaces the people and users linked to `deal_id`. Ids outside the hub
/// are dropped.
fn replace_relations(
    conn: &mut SqliteConnection,
    deal_id: i32,
    hub_id: i32,
    person_ids: &[PersonId],
    user_ids: &[UserId],
) -> QueryResult<()> {
    use crate::schema::{deal_people, deal_users, people, users};

    diesel::delete(deal_people::table.filter(deal_people::deal_id.eq(deal_id))).execute(conn)?;
    diesel::delete(deal_users::table.filter(deal_users::deal_id.eq(deal_id))).execute(conn)?;

    let requested: Vec<i32> = person_ids.iter().map(|id| id.get()).collect();
    let person_rows: Vec<NewDealPerson> = people::table
        .filter(people::hub_id.eq(hub_id))
        .filter(people::id.eq_any(&requested))
        .select(people::id)
        .load::<i32>(conn)?
        .into_iter()
        .map(|person_id| NewDealPerson { deal_id, person_id })
        .collect();

    let requested: Vec<i32> = user_ids.iter().map(|id| id.get()).collect();
    let user_rows: Vec<NewDealUser> = users::table
        .filter(users::hub_id.eq(hub_id))
        .filter(users::id.eq_any(&requested))
        .select(users::id)
        .load::<i32>(conn)?
        .into_iter()
        .map(|user_id| NewDealUser { deal_id, user_id })
        .collect();

    for row in &person_rows {
        diesel::insert_into(deal_people::table)
            .values(row)
            .execute(conn)?;
    }
    for row in &user_rows {
        diesel::insert_into(deal_users::table)
            .values(row)
            .execute(conn)?;
    }
    Ok(())
}

impl DealReader for DieselRepository {
    fn get_deal_by_id(
        &self,
        id: DealId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<DealWithRelations>> {
        use crate::schema::{deal_people, deal_users, deals, people, users};

        let mut conn = self.conn()?;

        let Some(deal) = deals::table
            .filter(deals::id.eq(id.get()))
            .filter(deals::hub_id.eq(hub_id.get()))
            .first::<DbDeal>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let people = deal_people::table
            .inner_join(people::table)
            .filter(deal_people::deal_id.eq(deal.id))
            .order(people::name.asc())
            .select(DbPerson::as_select())
            .load::<DbPerson>(&mut conn)?
            .into_iter()
            .map(Person::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let users = deal_users::table
            .inner_join(users::table)
            .filter(deal_users::deal_id.eq(deal.id))
            .order(users::name.asc())
            .select(DbUser::as_select())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(DealWithRelations {
            deal: Deal::try_from(deal)?,
            people,
            users,
        }))
    }

    fn list_deals(&self, query: DealListQuery) -> RepositoryResult<(usize, Vec<Deal>)> {
        use crate::schema::{deal_people, deal_users, deals};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = deals::table
                .filter(deals::hub_id.eq(query.hub_id.get()))
                .into_boxed::<Sqlite>();

            if let Some(term) = &query.search {
                items = items.filter(deals::name.like(format!("%{}%", term.trim())));
            }
            if let Some(stage_id) = query.stage_id {
                items = items.filter(deals::stage_id.eq(stage_id.get()));
            }
            if let Some(type_id) = query.type_id {
                items = items.filter(deals::type_id.eq(type_id.get()));
            }
            if let Some(min) = query.min_price {
                items = items.filter(deals::price.ge(min));
            }
            if let Some(max) = query.max_price {
                items = items.filter(deals::price.le(max));
            }
            if let Some(person_id) = query.person_id {
                items = items.filter(
                    deals::id.eq_any(
                        deal_people::table
                            .filter(deal_people::person_id.eq(person_id.get()))
                            .select(deal_people::deal_id),
                    ),
                );
            }
            if let Some(user_id) = query.user_id {
                items = items.filter(
                    deals::id.eq_any(
                        deal_users::table
                            .filter(deal_users::user_id.eq(user_id.get()))
                            .select(deal_users::deal_id),
                    ),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(deals::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let deals = items
            .load::<DbDeal>(&mut conn)?
            .into_iter()
            .map(Deal::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, deals))
    }
}

impl DealWriter for DieselRepository {
    fn create_deal(&self, new_deal: &NewDeal) -> RepositoryResult<Deal> {
        use crate::schema::deals;

        let mut conn = self.conn()?;
        let hub_id = new_deal.hub_id.get();

        let created = conn.transaction::<DbDeal, RepositoryError, _>(|conn| {
            check_categories(conn, hub_id, new_deal.stage_id, new_deal.type_id)?;

            let insertable: DbNewDeal = new_deal.into();
            let created = diesel::insert_into(deals::table)
                .values(&insertable)
                .get_result::<DbDeal>(conn)?;

            replace_relations(
                conn,
                created.id,
                hub_id,
                &new_deal.person_ids,
                &new_deal.user_ids,
            )?;
            Ok(created)
        })?;

        Ok(Deal::try_from(created)?)
    }

    fn update_deal(
        &self,
        id: DealId,
        hub_id: HubId,
        updates: &UpdateDeal,
    ) -> RepositoryResult<Deal> {
        use crate::schema::deals;

        let mut conn = self.conn()?;

        let updated = conn.transaction::<DbDeal, RepositoryError, _>(|conn| {
            check_categories(conn, hub_id.get(), updates.stage_id, updates.type_id)?;

            let changes: DbUpdateDeal = updates.into();
            let updated = diesel::update(
                deals::table
                    .filter(deals::id.eq(id.get()))
                    .filter(deals::hub_id.eq(hub_id.get())),
            )
            .set(&changes)
            .get_result::<DbDeal>(conn)?;

            replace_relations(
                conn,
                updated.id,
                hub_id.get(),
                &updates.person_ids,
                &updates.user_ids,
            )?;
            Ok(updated)
        })?;

        Ok(Deal::try_from(updated)?)
    }

    fn delete_deal(&self, id: DealId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::deals;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            deals::table
                .filter(deals::id.eq(id.get()))
                .filter(deals::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_deals(
        &self,
        hub_id: HubId,
        selection: &BulkSelection<DealId>,
    ) -> RepositoryResult<usize> {
        use crate::schema::deals;

        let mut conn = self.conn()?;
        let ids: Vec<i32> = selection.ids().iter().map(|id| id.get()).collect();
        let scoped = deals::table.filter(deals::hub_id.eq(hub_id.get()));

        let affected = match selection {
            BulkSelection::Ids(_) => {
                diesel::delete(scoped.filter(deals::id.eq_any(ids))).execute(&mut conn)?
            }
            BulkSelection::AllExcept(_) => {
                diesel::delete(scoped.filter(deals::id.ne_all(ids))).execute(&mut conn)?
            }
        };

        Ok(affected)
    }
}
