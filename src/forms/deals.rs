use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::deal::{NewDeal, UpdateDeal};
use crate::domain::types::{
    Amount, DealName, DealStageId, DealTypeId, HubId, PersonId, UserId,
};
use crate::forms::{FormError, id_list, optional_id};

#[derive(Debug, Deserialize, Validate)]
pub struct DealForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(range(min = 0))]
    pub commission: Option<i64>,
    pub stage_id: i32,
    pub type_id: Option<i32>,
    pub projected_close_date: Option<NaiveDate>,
    #[serde(default)]
    pub person_ids: Vec<i32>,
    #[serde(default)]
    pub user_ids: Vec<i32>,
}

pub struct DealPayload {
    pub name: DealName,
    pub price: Option<Amount>,
    pub commission: Option<Amount>,
    pub stage_id: DealStageId,
    pub type_id: Option<DealTypeId>,
    pub projected_close_date: Option<NaiveDate>,
    pub person_ids: Vec<PersonId>,
    pub user_ids: Vec<UserId>,
}

impl TryFrom<DealForm> for DealPayload {
    type Error = FormError;

    fn try_from(form: DealForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let mut person_ids = id_list(&form.person_ids, "person", PersonId::new)?;
        person_ids.sort_by_key(|id| id.get());
        person_ids.dedup();
        let mut user_ids = id_list(&form.user_ids, "user", UserId::new)?;
        user_ids.sort_by_key(|id| id.get());
        user_ids.dedup();

        Ok(Self {
            name: DealName::new(form.name).map_err(|_| FormError::InvalidName)?,
            price: form.price.map(Amount::new).transpose()?,
            commission: form.commission.map(Amount::new).transpose()?,
            stage_id: DealStageId::new(form.stage_id).map_err(|_| FormError::InvalidId("stage"))?,
            type_id: optional_id(form.type_id, "type", DealTypeId::new)?,
            projected_close_date: form.projected_close_date,
            person_ids,
            user_ids,
        })
    }
}

impl DealPayload {
    pub fn into_new(self, hub_id: HubId) -> NewDeal {
        NewDeal {
            hub_id,
            name: self.name,
            price: self.price,
            commission: self.commission,
            stage_id: self.stage_id,
            type_id: self.type_id,
            projected_close_date: self.projected_close_date,
            person_ids: self.person_ids,
            user_ids: self.user_ids,
        }
    }

    pub fn into_update(self) -> UpdateDeal {
        UpdateDeal {
            name: self.name,
            price: self.price,
            commission: self.commission,
            stage_id: self.stage_id,
            type_id: self.type_id,
            projected_close_date: self.projected_close_date,
            person_ids: self.person_ids,
            user_ids: self.user_ids,
        }
    }
}

/// Query string of `GET /deals`.
#[derive(Debug, Default, Deserialize)]
pub struct DealsQuery {
    pub search: Option<String>,
    pub stage_id: Option<i32>,
    pub type_id: Option<i32>,
    pub user_id: Option<i32>,
    pub person_id: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_ids_are_deduplicated() {
        let form: DealForm = serde_json::from_str(
            r#"{"name": "12 Oak St", "stage_id": 1, "person_ids": [3, 2, 3], "user_ids": [5, 5]}"#,
        )
        .unwrap();

        let payload = DealPayload::try_from(form).unwrap();

        let people: Vec<i32> = payload.person_ids.iter().map(|id| id.get()).collect();
        assert_eq!(people, vec![2, 3]);
        assert_eq!(payload.user_ids.len(), 1);
    }

    #[test]
    fn negative_price_is_rejected() {
        let form: DealForm =
            serde_json::from_str(r#"{"name": "x", "stage_id": 1, "price": -5}"#).unwrap();
        assert!(DealPayload::try_from(form).is_err());
    }

    #[test]
    fn stage_is_required_to_be_positive() {
        let form: DealForm = serde_json::from_str(r#"{"name": "x", "stage_id": 0}"#).unwrap();
        assert!(matches!(
            DealPayload::try_from(form),
            Err(FormError::InvalidId("stage"))
        ));
    }
}
