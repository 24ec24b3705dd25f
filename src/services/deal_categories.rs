//! Administration of deal stages and deal types.
//!
//! Both are ordered lists per hub; listing is open to every CRM user while
//! changes need the admin role.

use crate::auth::AuthenticatedUser;
use crate::domain::deal_category::{DealStage, DealType};
use crate::domain::types::{CategoryName, DealStageId, DealTypeId};
use crate::forms::deal_categories::CategoryForm;
use crate::forms::lead_flow_rules::ReorderForm;
use crate::repository::{DealCategoryReader, DealCategoryWriter};
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult, access_hub, admin_hub};

fn stage_id(id: i32) -> ServiceResult<DealStageId> {
    DealStageId::new(id).map_err(|_| ServiceError::NotFound)
}

fn type_id(id: i32) -> ServiceResult<DealTypeId> {
    DealTypeId::new(id).map_err(|_| ServiceError::NotFound)
}

pub fn list_stages<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<DealStage>>
where
    R: DealCategoryReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    Ok(repo.list_deal_stages(hub_id)?)
}

pub fn create_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CategoryForm,
) -> ServiceResult<DealStage>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let name = CategoryName::try_from(form)?;
    Ok(repo.create_deal_stage(hub_id, &name)?)
}

pub fn rename_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: CategoryForm,
) -> ServiceResult<DealStage>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let name = CategoryName::try_from(form)?;
    Ok(repo.rename_deal_stage(stage_id(id)?, hub_id, &name)?)
}

/// Deletes a stage unless deals still sit in it.
pub fn delete_stage<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    repo.delete_deal_stage(stage_id(id)?, hub_id)
        .map_err(|err| match err {
            RepositoryError::ConstraintViolation(_) => {
                ServiceError::Conflict("Deal stage is still used by deals".to_string())
            }
            other => ServiceError::from(other),
        })
}

pub fn reorder_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: ReorderForm,
) -> ServiceResult<Vec<DealStage>>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    Ok(repo.reorder_deal_stage(stage_id(id)?, hub_id, form.position)?)
}

pub fn list_types<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<DealType>>
where
    R: DealCategoryReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    Ok(repo.list_deal_types(hub_id)?)
}

pub fn create_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CategoryForm,
) -> ServiceResult<DealType>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let name = CategoryName::try_from(form)?;
    Ok(repo.create_deal_type(hub_id, &name)?)
}

pub fn rename_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: CategoryForm,
) -> ServiceResult<DealType>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let name = CategoryName::try_from(form)?;
    Ok(repo.rename_deal_type(type_id(id)?, hub_id, &name)?)
}

/// Deletes a type; deals that used it keep no type.
pub fn delete_type<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    Ok(repo.delete_deal_type(type_id(id)?, hub_id)?)
}

pub fn reorder_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: ReorderForm,
) -> ServiceResult<Vec<DealType>>
where
    R: DealCategoryWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    Ok(repo.reorder_deal_type(type_id(id)?, hub_id, form.position)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::HubId;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin, member};

    fn stage(id: i32, sort: i32) -> DealStage {
        DealStage {
            id: DealStageId::new(id).unwrap(),
            hub_id: HubId::new(HUB).unwrap(),
            name: CategoryName::new(format!("Stage {id}")).unwrap(),
            sort,
        }
    }

    #[test]
    fn members_list_but_cannot_create() {
        let mut repo = MockRepository::new();
        repo.expect_list_deal_stages()
            .returning(|_| Ok(vec![stage(1, 0), stage(2, 1)]));

        assert_eq!(list_stages(&repo, &member()).unwrap().len(), 2);

        let form = CategoryForm {
            name: "Closed".to_string(),
        };
        assert!(matches!(
            create_stage(&repo, &member(), form),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn deleting_used_stage_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_delete_deal_stage().returning(|_, _| {
            Err(RepositoryError::ConstraintViolation(
                "Foreign key constraint violation".to_string(),
            ))
        });

        assert!(matches!(
            delete_stage(&repo, &admin(), 1),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn reorder_passes_position() {
        let mut repo = MockRepository::new();
        repo.expect_reorder_deal_stage()
            .withf(|id, _, position| id.get() == 2 && *position == 0)
            .returning(|_, _, _| Ok(vec![stage(2, 0), stage(1, 1)]));

        let stages = reorder_stage(&repo, &admin(), 2, ReorderForm { position: 0 }).unwrap();

        assert_eq!(stages[0].id.get(), 2);
    }

    #[test]
    fn blank_type_name_is_rejected() {
        let repo = MockRepository::new();
        let form = CategoryForm {
            name: " ".to_string(),
        };
        assert!(matches!(
            create_type(&repo, &admin(), form),
            Err(ServiceError::Form(_))
        ));
    }
}
