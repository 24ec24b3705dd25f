//! Repository implementation for ponds and teams.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::group::{GroupInput, Pond, Team, WithMembers};
use crate::domain::types::{HubId, PondId, TeamId, UserId};
use crate::domain::user::User;
use crate::models::group::{
    NewPond, NewPondUser, NewTeam, NewTeamUser, Pond as DbPond, Team as DbTeam,
};
use crate::models::user::User as DbUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, GroupReader, GroupWriter};

/// Keeps only the user ids that belong to `hub_id`.
fn hub_user_ids(
    conn: &mut SqliteConnection,
    hub_id: i32,
    user_ids: &[UserId],
) -> QueryResult<Vec<i32>> {
    use crate::schema::users;

    let requested: Vec<i32> = user_ids.iter().map(|id| id.get()).collect();
    users::table
        .filter(users::hub_id.eq(hub_id))
        .filter(users::id.eq_any(requested))
        .select(users::id)
        .load::<i32>(conn)
}

/// Resolves the owner or leader of a group, which must be a user of the hub.
fn hub_lead_user(
    conn: &mut SqliteConnection,
    input: &GroupInput,
) -> RepositoryResult<Option<i32>> {
    let Some(lead_user_id) = input.lead_user_id else {
        return Ok(None);
    };
    match hub_user_ids(conn, input.hub_id.get(), &[lead_user_id])?.first() {
        Some(id) => Ok(Some(*id)),
        None => Err(RepositoryError::ValidationError("Unknown lead user".to_string())),
    }
}

fn pond_members(
    conn: &mut SqliteConnection,
    pond_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<User>>> {
    use crate::schema::{pond_users, users};

    let rows = pond_users::table
        .inner_join(users::table)
        .filter(pond_users::pond_id.eq_any(pond_ids))
        .order(users::name.asc())
        .select((pond_users::pond_id, DbUser::as_select()))
        .load::<(i32, DbUser)>(conn)?;

    let mut members: HashMap<i32, Vec<User>> = HashMap::new();
    for (pond_id, user) in rows {
        members
            .entry(pond_id)
            .or_default()
            .push(User::try_from(user)?);
    }
    Ok(members)
}

fn team_members(
    conn: &mut SqliteConnection,
    team_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<User>>> {
    use crate::schema::{team_users, users};

    let rows = team_users::table
        .inner_join(users::table)
        .filter(team_users::team_id.eq_any(team_ids))
        .order(users::name.asc())
        .select((team_users::team_id, DbUser::as_select()))
        .load::<(i32, DbUser)>(conn)?;

    let mut members: HashMap<i32, Vec<User>> = HashMap::new();
    for (team_id, user) in rows {
        members
            .entry(team_id)
            .or_default()
            .push(User::try_from(user)?);
    }
    Ok(members)
}

fn replace_pond_members(
    conn: &mut SqliteConnection,
    pond_id: i32,
    input: &GroupInput,
) -> QueryResult<()> {
    use crate::schema::pond_users;

    diesel::delete(pond_users::table.filter(pond_users::pond_id.eq(pond_id))).execute(conn)?;
    for user_id in hub_user_ids(conn, input.hub_id.get(), &input.member_ids)? {
        diesel::insert_into(pond_users::table)
            .values(&NewPondUser { pond_id, user_id })
            .execute(conn)?;
    }
    Ok(())
}

fn replace_team_members(
    conn: &mut SqliteConnection,
    team_id: i32,
    input: &GroupInput,
) -> QueryResult<()> {
    use crate::schema::team_users;

    diesel::delete(team_users::table.filter(team_users::team_id.eq(team_id))).execute(conn)?;
    for user_id in hub_user_ids(conn, input.hub_id.get(), &input.member_ids)? {
        diesel::insert_into(team_users::table)
            .values(&NewTeamUser { team_id, user_id })
            .execute(conn)?;
    }
    Ok(())
}

impl GroupReader for DieselRepository {
    fn list_ponds(&self, hub_id: HubId) -> RepositoryResult<Vec<WithMembers<Pond>>> {
        use crate::schema::ponds;

        let mut conn = self.conn()?;
        let rows = ponds::table
            .filter(ponds::hub_id.eq(hub_id.get()))
            .order(ponds::name.asc())
            .load::<DbPond>(&mut conn)?;

        let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
        let mut members = pond_members(&mut conn, &ids)?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<WithMembers<Pond>> {
                let members = members.remove(&row.id).unwrap_or_default();
                Ok(WithMembers {
                    group: Pond::try_from(row)?,
                    members,
                })
            })
            .collect()
    }

    fn get_pond(&self, id: PondId, hub_id: HubId) -> RepositoryResult<Option<WithMembers<Pond>>> {
        use crate::schema::ponds;

        let mut conn = self.conn()?;
        let Some(row) = ponds::table
            .filter(ponds::id.eq(id.get()))
            .filter(ponds::hub_id.eq(hub_id.get()))
            .first::<DbPond>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let members = pond_members(&mut conn, &[row.id])?
            .remove(&row.id)
            .unwrap_or_default();

        Ok(Some(WithMembers {
            group: Pond::try_from(row)?,
            members,
        }))
    }

    fn list_teams(&self, hub_id: HubId) -> RepositoryResult<Vec<WithMembers<Team>>> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let rows = teams::table
            .filter(teams::hub_id.eq(hub_id.get()))
            .order(teams::name.asc())
            .load::<DbTeam>(&mut conn)?;

        let ids: Vec<i32> = rows.iter().map(|t| t.id).collect();
        let mut members = team_members(&mut conn, &ids)?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<WithMembers<Team>> {
                let members = members.remove(&row.id).unwrap_or_default();
                Ok(WithMembers {
                    group: Team::try_from(row)?,
                    members,
                })
            })
            .collect()
    }

    fn get_team(&self, id: TeamId, hub_id: HubId) -> RepositoryResult<Option<WithMembers<Team>>> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let Some(row) = teams::table
            .filter(teams::id.eq(id.get()))
            .filter(teams::hub_id.eq(hub_id.get()))
            .first::<DbTeam>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let members = team_members(&mut conn, &[row.id])?
            .remove(&row.id)
            .unwrap_or_default();

        Ok(Some(WithMembers {
            group: Team::try_from(row)?,
            members,
        }))
    }
}

impl GroupWriter for DieselRepository {
    fn create_pond(&self, input: &GroupInput) -> RepositoryResult<Pond> {
        use crate::schema::ponds;

        let mut conn = self.conn()?;
        let created = conn.transaction::<DbPond, RepositoryError, _>(|conn| {
            let owner_user_id = hub_lead_user(conn, input)?;
            let created = diesel::insert_into(ponds::table)
                .values(&NewPond {
                    hub_id: input.hub_id.get(),
                    name: input.name.as_str(),
                    owner_user_id,
                })
                .get_result::<DbPond>(conn)?;
            replace_pond_members(conn, created.id, input)?;
            Ok(created)
        })?;

        Ok(Pond::try_from(created)?)
    }

    fn update_pond(&self, id: PondId, input: &GroupInput) -> RepositoryResult<Pond> {
        use crate::schema::ponds;

        let mut conn = self.conn()?;
        let updated = conn.transaction::<DbPond, RepositoryError, _>(|conn| {
            let owner_user_id = hub_lead_user(conn, input)?;
            let updated = diesel::update(
                ponds::table
                    .filter(ponds::id.eq(id.get()))
                    .filter(ponds::hub_id.eq(input.hub_id.get())),
            )
            .set((
                ponds::name.eq(input.name.as_str()),
                ponds::owner_user_id.eq(owner_user_id),
                ponds::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbPond>(conn)?;
            replace_pond_members(conn, updated.id, input)?;
            Ok(updated)
        })?;

        Ok(Pond::try_from(updated)?)
    }

    fn delete_pond(&self, id: PondId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::ponds;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            ponds::table
                .filter(ponds::id.eq(id.get()))
                .filter(ponds::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn create_team(&self, input: &GroupInput) -> RepositoryResult<Team> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let created = conn.transaction::<DbTeam, RepositoryError, _>(|conn| {
            let leader_user_id = hub_lead_user(conn, input)?;
            let created = diesel::insert_into(teams::table)
                .values(&NewTeam {
                    hub_id: input.hub_id.get(),
                    name: input.name.as_str(),
                    leader_user_id,
                })
                .get_result::<DbTeam>(conn)?;
            replace_team_members(conn, created.id, input)?;
            Ok(created)
        })?;

        Ok(Team::try_from(created)?)
    }

    fn update_team(&self, id: TeamId, input: &GroupInput) -> RepositoryResult<Team> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let updated = conn.transaction::<DbTeam, RepositoryError, _>(|conn| {
            let leader_user_id = hub_lead_user(conn, input)?;
            let updated = diesel::update(
                teams::table
                    .filter(teams::id.eq(id.get()))
                    .filter(teams::hub_id.eq(input.hub_id.get())),
            )
            .set((
                teams::name.eq(input.name.as_str()),
                teams::leader_user_id.eq(leader_user_id),
                teams::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbTeam>(conn)?;
            replace_team_members(conn, updated.id, input)?;
            Ok(updated)
        })?;

        Ok(Team::try_from(updated)?)
    }

    fn delete_team(&self, id: TeamId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            teams::table
                .filter(teams::id.eq(id.get()))
                .filter(teams::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
