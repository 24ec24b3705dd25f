//! Repository implementation for people.

use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::bulk::BulkSelection;
use crate::domain::lead_flow_rule::pick_team_member;
use crate::domain::person::{NewPerson, Person, PersonAssignment, UpdatePerson};
use crate::domain::types::{HubId, PersonId, TeamId, UserId};
use crate::models::person::{
    AssignPerson as DbAssignPerson, NewPerson as DbNewPerson, Person as DbPerson,
    UpdatePerson as DbUpdatePerson,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PersonListQuery, PersonReader, PersonWriter};

fn insert_person(conn: &mut SqliteConnection, new_person: &NewPerson) -> QueryResult<DbPerson> {
    use crate::schema::people;

    let insertable: DbNewPerson = new_person.into();
    diesel::insert_into(people::table)
        .values(&insertable)
        .get_result::<DbPerson>(conn)
}

/// Loads how many people each of `user_ids` currently owns.
fn assigned_counts(
    conn: &mut SqliteConnection,
    user_ids: &[i32],
) -> QueryResult<Vec<(UserId, i64)>> {
    use crate::schema::people;

    let counts: HashMap<i32, i64> = people::table
        .filter(people::assigned_user_id.eq_any(user_ids))
        .group_by(people::assigned_user_id)
        .select((people::assigned_user_id, count_star()))
        .load::<(Option<i32>, i64)>(conn)?
        .into_iter()
        .filter_map(|(user_id, count)| user_id.map(|id| (id, count)))
        .collect();

    Ok(user_ids
        .iter()
        .filter_map(|id| UserId::new(*id).ok())
        .map(|id| (id, counts.get(&id.get()).copied().unwrap_or(0)))
        .collect())
}

impl PersonReader for DieselRepository {
    fn get_person_by_id(&self, id: PersonId, hub_id: HubId) -> RepositoryResult<Option<Person>> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let person = people::table
            .filter(people::id.eq(id.get()))
            .filter(people::hub_id.eq(hub_id.get()))
            .first::<DbPerson>(&mut conn)
            .optional()?;

        Ok(person.map(Person::try_from).transpose()?)
    }

    fn list_people(&self, query: PersonListQuery) -> RepositoryResult<(usize, Vec<Person>)> {
        use crate::schema::people;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = people::table
                .filter(people::hub_id.eq(query.hub_id.get()))
                .into_boxed::<Sqlite>();

            if let Some(term) = &query.search {
                let pattern = format!("%{}%", term.trim());
                items = items.filter(
                    people::name
                        .like(pattern.clone())
                        .or(people::email.like(pattern.clone()))
                        .or(people::phone.like(pattern.clone()))
                        .or(people::city.like(pattern)),
                );
            }
            if let Some(stage) = &query.stage {
                items = items.filter(people::stage.eq(stage.clone()));
            }
            if let Some(source) = &query.source {
                items = items.filter(people::source.eq(source.clone()));
            }
            if let Some(user_id) = query.assigned_user_id {
                items = items.filter(people::assigned_user_id.eq(user_id.get()));
            }
            if let Some(pond_id) = query.pond_id {
                items = items.filter(people::pond_id.eq(pond_id.get()));
            }
            if query.unassigned {
                items = items.filter(people::assigned_user_id.is_null());
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(people::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let people = items
            .load::<DbPerson>(&mut conn)?
            .into_iter()
            .map(Person::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, people))
    }
}

impl PersonWriter for DieselRepository {
    fn create_person(&self, new_person: &NewPerson) -> RepositoryResult<Person> {
        let mut conn = self.conn()?;
        let person = insert_person(&mut conn, new_person)?;
        Ok(Person::try_from(person)?)
    }

    fn create_people(&self, new_people: &[NewPerson]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            for new_person in new_people {
                insert_person(conn, new_person)?;
            }
            Ok(new_people.len())
        })
        .map_err(RepositoryError::from)
    }

    fn create_routed_person(
        &self,
        new_person: &NewPerson,
        team_id: Option<TeamId>,
    ) -> RepositoryResult<Person> {
        use crate::schema::{team_users, teams};

        let mut conn = self.conn()?;

        let person = conn.transaction::<DbPerson, diesel::result::Error, _>(|conn| {
            let mut routed = new_person.clone();

            if let (Some(team_id), None) = (team_id, routed.assignment.assigned_user_id) {
                let member_ids = team_users::table
                    .inner_join(teams::table)
                    .filter(teams::id.eq(team_id.get()))
                    .filter(teams::hub_id.eq(new_person.hub_id.get()))
                    .select(team_users::user_id)
                    .load::<i32>(conn)?;

                let loads = assigned_counts(conn, &member_ids)?;
                routed.assignment.assigned_user_id = pick_team_member(&loads);
            }

            insert_person(conn, &routed)
        })?;

        Ok(Person::try_from(person)?)
    }

    fn update_person(
        &self,
        id: PersonId,
        hub_id: HubId,
        updates: &UpdatePerson,
    ) -> RepositoryResult<Person> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let changes: DbUpdatePerson = updates.into();

        let updated = diesel::update(
            people::table
                .filter(people::id.eq(id.get()))
                .filter(people::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbPerson>(&mut conn)?;

        Ok(Person::try_from(updated)?)
    }

    fn assign_person(
        &self,
        id: PersonId,
        hub_id: HubId,
        assignment: &PersonAssignment,
    ) -> RepositoryResult<Person> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let changes: DbAssignPerson = assignment.into();

        let updated = diesel::update(
            people::table
                .filter(people::id.eq(id.get()))
                .filter(people::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbPerson>(&mut conn)?;

        Ok(Person::try_from(updated)?)
    }

    fn delete_person(&self, id: PersonId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            people::table
                .filter(people::id.eq(id.get()))
                .filter(people::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_people(
        &self,
        hub_id: HubId,
        selection: &BulkSelection<PersonId>,
    ) -> RepositoryResult<usize> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let ids: Vec<i32> = selection.ids().iter().map(|id| id.get()).collect();
        let scoped = people::table.filter(people::hub_id.eq(hub_id.get()));

        let affected = match selection {
            BulkSelection::Ids(_) => {
                diesel::delete(scoped.filter(people::id.eq_any(ids))).execute(&mut conn)?
            }
            BulkSelection::AllExcept(_) => {
                diesel::delete(scoped.filter(people::id.ne_all(ids))).execute(&mut conn)?
            }
        };

        Ok(affected)
    }
}
