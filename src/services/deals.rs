//! Services for deals.

use crate::auth::AuthenticatedUser;
use crate::domain::deal::{Deal, DealWithRelations};
use crate::domain::types::{DealId, DealStageId, DealTypeId, PersonId, UserId};
use crate::forms::bulk::BulkForm;
use crate::forms::deals::{DealForm, DealPayload, DealsQuery};
use crate::pagination::{Paginated, clamp_per_page};
use crate::repository::{DealListQuery, DealReader, DealWriter};
use crate::services::{ServiceError, ServiceResult, access_hub, admin_hub};

fn deal_id(id: i32) -> ServiceResult<DealId> {
    DealId::new(id).map_err(|_| ServiceError::NotFound)
}

pub fn list_deals<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: DealsQuery,
) -> ServiceResult<Paginated<Deal>>
where
    R: DealReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    let page = params.page.unwrap_or(1).max(1);
    let per_page = clamp_per_page(params.per_page);

    let mut query = DealListQuery::new(hub_id)
        .price_range(params.min_price, params.max_price)
        .paginate(page, per_page);
    if let Some(search) = params.search.filter(|s| !s.trim().is_empty()) {
        query = query.search(search);
    }
    if let Some(stage_id) = params.stage_id {
        query = query.stage(DealStageId::new(stage_id)?);
    }
    if let Some(type_id) = params.type_id {
        query = query.deal_type(DealTypeId::new(type_id)?);
    }
    if let Some(user_id) = params.user_id {
        query = query.user(UserId::new(user_id)?);
    }
    if let Some(person_id) = params.person_id {
        query = query.person(PersonId::new(person_id)?);
    }

    let (total, deals) = repo.list_deals(query).map_err(|err| {
        log::error!("Failed to list deals: {err}");
        err
    })?;

    Ok(Paginated::new(deals, page, per_page, total))
}

pub fn get_deal<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<DealWithRelations>
where
    R: DealReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    repo.get_deal_by_id(deal_id(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a deal and links its people and users.
pub fn create_deal<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: DealForm,
) -> ServiceResult<DealWithRelations>
where
    R: DealReader + DealWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let new_deal = DealPayload::try_from(form)?.into_new(hub_id);

    let deal = repo.create_deal(&new_deal)?;
    repo.get_deal_by_id(deal.id, hub_id)?
        .ok_or(ServiceError::NotFound)
}

/// Replaces the deal's fields and its people/user links.
pub fn update_deal<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: DealForm,
) -> ServiceResult<DealWithRelations>
where
    R: DealReader + DealWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let id = deal_id(id)?;
    let updates = DealPayload::try_from(form)?.into_update();

    repo.update_deal(id, hub_id, &updates)?;
    repo.get_deal_by_id(id, hub_id)?.ok_or(ServiceError::NotFound)
}

pub fn delete_deal<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: DealWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    repo.delete_deal(deal_id(id)?, hub_id)?;
    Ok(())
}

pub fn delete_deals<R>(repo: &R, user: &AuthenticatedUser, form: BulkForm) -> ServiceResult<usize>
where
    R: DealWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let selection = form.into_selection("deal", DealId::new)?;

    let affected = repo.delete_deals(hub_id, &selection)?;
    log::info!("Bulk deleted {affected} deals from hub {hub_id}");
    Ok(affected)
}
