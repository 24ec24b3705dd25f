//! Repository implementation for agents and lenders.

use diesel::{prelude::*, upsert::excluded};

use crate::{
    domain::{
        types::{HubId, UserEmail, UserId},
        user::{NewUser, User},
    },
    models::user::{NewUser as DbNewUser, User as DbUser},
    repository::{DieselRepository, UserReader, UserWriter, errors::RepositoryResult},
};

impl UserWriter for DieselRepository {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let db_new_user: DbNewUser = new_user.into();

        let db_user = diesel::insert_into(users::table)
            .values(&db_new_user)
            .on_conflict((users::email, users::hub_id))
            .do_update()
            .set((
                users::name.eq(excluded(users::name)),
                users::is_lender.eq(users::is_lender.or(excluded(users::is_lender))),
                users::is_user.eq(users::is_user.or(excluded(users::is_user))),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(db_user)?)
    }
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::id.eq(id.get()))
            .filter(users::hub_id.eq(hub_id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(db_user.map(User::try_from).transpose()?)
    }

    fn get_user_by_email(
        &self,
        email: &UserEmail,
        hub_id: HubId,
    ) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::email.eq(email.as_str()))
            .filter(users::hub_id.eq(hub_id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(db_user.map(User::try_from).transpose()?)
    }

    fn list_users(&self, hub_id: HubId) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_users = users::table
            .filter(users::hub_id.eq(hub_id.get()))
            .order(users::name.asc())
            .load::<DbUser>(&mut conn)?;

        Ok(db_users
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
