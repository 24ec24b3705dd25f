//! Repository implementation for deal stages and deal types.
//!
//! Both tables share the same shape, so the queries are generated once per
//! table by `category_queries!`.

use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::deal_category::{DealStage, DealType};
use crate::domain::ordering::{renumber, reorder};
use crate::domain::types::{CategoryName, DealStageId, DealTypeId, HubId};
use crate::models::deal_category::{
    DealStage as DbDealStage, DealType as DbDealType, NewDealStage, NewDealType,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DealCategoryReader, DealCategoryWriter, DieselRepository};

macro_rules! category_queries {
    ($module:ident, $table:ident, $row:ty, $new_row:ident) => {
        mod $module {
            use super::*;
            use crate::schema::$table;

            pub(super) fn load(conn: &mut SqliteConnection, hub_id: i32) -> QueryResult<Vec<$row>> {
                $table::table
                    .filter($table::hub_id.eq(hub_id))
                    .order(($table::sort.asc(), $table::id.asc()))
                    .load::<$row>(conn)
            }

            pub(super) fn find(
                conn: &mut SqliteConnection,
                id: i32,
                hub_id: i32,
            ) -> QueryResult<Option<$row>> {
                $table::table
                    .filter($table::id.eq(id))
                    .filter($table::hub_id.eq(hub_id))
                    .first::<$row>(conn)
                    .optional()
            }

            pub(super) fn create(
                conn: &mut SqliteConnection,
                hub_id: i32,
                name: &str,
            ) -> Result<$row, RepositoryError> {
                conn.transaction::<$row, RepositoryError, _>(|conn| {
                    let last_sort: Option<i32> = $table::table
                        .filter($table::hub_id.eq(hub_id))
                        .select(max($table::sort))
                        .first(conn)?;

                    let row = diesel::insert_into($table::table)
                        .values(&$new_row {
                            hub_id,
                            name,
                            sort: last_sort.map_or(0, |s| s + 1),
                        })
                        .get_result::<$row>(conn)?;
                    Ok(row)
                })
            }

            pub(super) fn rename(
                conn: &mut SqliteConnection,
                id: i32,
                hub_id: i32,
                name: &str,
            ) -> QueryResult<$row> {
                diesel::update(
                    $table::table
                        .filter($table::id.eq(id))
                        .filter($table::hub_id.eq(hub_id)),
                )
                .set($table::name.eq(name))
                .get_result::<$row>(conn)
            }

            fn write_positions(
                conn: &mut SqliteConnection,
                positions: Vec<(i32, i32)>,
            ) -> QueryResult<()> {
                for (id, sort) in positions {
                    diesel::update($table::table.find(id))
                        .set($table::sort.eq(sort))
                        .execute(conn)?;
                }
                Ok(())
            }

            /// Deletes the row and closes the gap it leaves in the order.
            pub(super) fn delete(
                conn: &mut SqliteConnection,
                id: i32,
                hub_id: i32,
            ) -> Result<(), RepositoryError> {
                conn.transaction::<(), RepositoryError, _>(|conn| {
                    let affected = diesel::delete(
                        $table::table
                            .filter($table::id.eq(id))
                            .filter($table::hub_id.eq(hub_id)),
                    )
                    .execute(conn)?;
                    if affected == 0 {
                        return Err(RepositoryError::NotFound);
                    }

                    let remaining: Vec<i32> = load(conn, hub_id)?.iter().map(|r| r.id).collect();
                    write_positions(conn, renumber(&remaining))?;
                    Ok(())
                })
            }

            pub(super) fn move_to(
                conn: &mut SqliteConnection,
                id: i32,
                hub_id: i32,
                position: usize,
            ) -> Result<Vec<$row>, RepositoryError> {
                conn.transaction::<Vec<$row>, RepositoryError, _>(|conn| {
                    let ordered: Vec<i32> = load(conn, hub_id)?.iter().map(|r| r.id).collect();
                    let positions =
                        reorder(&ordered, id, position).ok_or(RepositoryError::NotFound)?;
                    write_positions(conn, positions)?;
                    Ok(load(conn, hub_id)?)
                })
            }
        }
    };
}

category_queries!(stage_queries, deal_stages, DbDealStage, NewDealStage);
category_queries!(type_queries, deal_types, DbDealType, NewDealType);

fn stages(rows: Vec<DbDealStage>) -> RepositoryResult<Vec<DealStage>> {
    Ok(rows
        .into_iter()
        .map(DealStage::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

fn types(rows: Vec<DbDealType>) -> RepositoryResult<Vec<DealType>> {
    Ok(rows
        .into_iter()
        .map(DealType::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

impl DealCategoryReader for DieselRepository {
    fn list_deal_stages(&self, hub_id: HubId) -> RepositoryResult<Vec<DealStage>> {
        let mut conn = self.conn()?;
        stages(stage_queries::load(&mut conn, hub_id.get())?)
    }

    fn get_deal_stage(
        &self,
        id: DealStageId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<DealStage>> {
        let mut conn = self.conn()?;
        let row = stage_queries::find(&mut conn, id.get(), hub_id.get())?;
        Ok(row.map(DealStage::try_from).transpose()?)
    }

    fn list_deal_types(&self, hub_id: HubId) -> RepositoryResult<Vec<DealType>> {
        let mut conn = self.conn()?;
        types(type_queries::load(&mut conn, hub_id.get())?)
    }

    fn get_deal_type(&self, id: DealTypeId, hub_id: HubId) -> RepositoryResult<Option<DealType>> {
        let mut conn = self.conn()?;
        let row = type_queries::find(&mut conn, id.get(), hub_id.get())?;
        Ok(row.map(DealType::try_from).transpose()?)
    }
}

impl DealCategoryWriter for DieselRepository {
    fn create_deal_stage(
        &self,
        hub_id: HubId,
        name: &CategoryName,
    ) -> RepositoryResult<DealStage> {
        let mut conn = self.conn()?;
        let row = stage_queries::create(&mut conn, hub_id.get(), name.as_str())?;
        Ok(DealStage::try_from(row)?)
    }

    fn rename_deal_stage(
        &self,
        id: DealStageId,
        hub_id: HubId,
        name: &CategoryName,
    ) -> RepositoryResult<DealStage> {
        let mut conn = self.conn()?;
        let row = stage_queries::rename(&mut conn, id.get(), hub_id.get(), name.as_str())?;
        Ok(DealStage::try_from(row)?)
    }

    fn delete_deal_stage(&self, id: DealStageId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        stage_queries::delete(&mut conn, id.get(), hub_id.get())
    }

    fn reorder_deal_stage(
        &self,
        id: DealStageId,
        hub_id: HubId,
        position: usize,
    ) -> RepositoryResult<Vec<DealStage>> {
        let mut conn = self.conn()?;
        stages(stage_queries::move_to(
            &mut conn,
            id.get(),
            hub_id.get(),
            position,
        )?)
    }

    fn create_deal_type(&self, hub_id: HubId, name: &CategoryName) -> RepositoryResult<DealType> {
        let mut conn = self.conn()?;
        let row = type_queries::create(&mut conn, hub_id.get(), name.as_str())?;
        Ok(DealType::try_from(row)?)
    }

    fn rename_deal_type(
        &self,
        id: DealTypeId,
        hub_id: HubId,
        name: &CategoryName,
    ) -> RepositoryResult<DealType> {
        let mut conn = self.conn()?;
        let row = type_queries::rename(&mut conn, id.get(), hub_id.get(), name.as_str())?;
        Ok(DealType::try_from(row)?)
    }

    fn delete_deal_type(&self, id: DealTypeId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        type_queries::delete(&mut conn, id.get(), hub_id.get())
    }

    fn reorder_deal_type(
        &self,
        id: DealTypeId,
        hub_id: HubId,
        position: usize,
    ) -> RepositoryResult<Vec<DealType>> {
        let mut conn = self.conn()?;
        types(type_queries::move_to(
            &mut conn,
            id.get(),
            hub_id.get(),
            position,
        )?)
    }
}
