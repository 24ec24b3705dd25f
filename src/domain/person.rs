use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    Amount, HubId, LeadFlowRuleId, PersonEmail, PersonId, PersonName, PhoneNumber, PondId,
    PublicId, UserId,
};

/// Lead or contact tracked by the CRM.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub public_id: PublicId,
    pub hub_id: HubId,
    pub name: PersonName,
    pub email: Option<PersonEmail>,
    pub phone: Option<PhoneNumber>,
    pub source: Option<String>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub price: Option<Amount>,
    pub assigned_user_id: Option<UserId>,
    pub assigned_lender_id: Option<UserId>,
    pub pond_id: Option<PondId>,
    /// Rule that routed this person when it arrived as a lead.
    pub lead_flow_rule_id: Option<LeadFlowRuleId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Trims free-text attributes and drops them when nothing is left.
pub(crate) fn normalize_attribute(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewPerson {
    pub public_id: PublicId,
    pub hub_id: HubId,
    pub name: PersonName,
    pub email: Option<PersonEmail>,
    pub phone: Option<PhoneNumber>,
    pub source: Option<String>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub price: Option<Amount>,
    pub assignment: PersonAssignment,
}

impl NewPerson {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hub_id: HubId,
        name: PersonName,
        email: Option<PersonEmail>,
        phone: Option<PhoneNumber>,
        source: Option<String>,
        stage: Option<String>,
        city: Option<String>,
        price: Option<Amount>,
    ) -> Self {
        Self {
            public_id: PublicId::new(),
            hub_id,
            name,
            email,
            phone,
            source: normalize_attribute(source),
            stage: normalize_attribute(stage),
            city: normalize_attribute(city),
            price,
            assignment: PersonAssignment::default(),
        }
    }

    #[must_use]
    pub fn with_assignment(mut self, assignment: PersonAssignment) -> Self {
        self.assignment = assignment;
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdatePerson {
    pub name: PersonName,
    pub email: Option<PersonEmail>,
    pub phone: Option<PhoneNumber>,
    pub source: Option<String>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub price: Option<Amount>,
}

impl UpdatePerson {
    #[must_use]
    pub fn new(
        name: PersonName,
        email: Option<PersonEmail>,
        phone: Option<PhoneNumber>,
        source: Option<String>,
        stage: Option<String>,
        city: Option<String>,
        price: Option<Amount>,
    ) -> Self {
        Self {
            name,
            email,
            phone,
            source: normalize_attribute(source),
            stage: normalize_attribute(stage),
            city: normalize_attribute(city),
            price,
        }
    }
}

/// Ownership fields of a person, written together.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonAssignment {
    pub assigned_user_id: Option<UserId>,
    pub assigned_lender_id: Option<UserId>,
    pub pond_id: Option<PondId>,
    pub lead_flow_rule_id: Option<LeadFlowRuleId>,
}

impl PersonAssignment {
    pub fn is_empty(&self) -> bool {
        self.assigned_user_id.is_none()
            && self.assigned_lender_id.is_none()
            && self.pond_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_person_drops_blank_attributes() {
        let person = NewPerson::new(
            HubId::new(1).unwrap(),
            PersonName::new("Jane Roe").unwrap(),
            None,
            None,
            Some("  Zillow ".to_string()),
            Some("   ".to_string()),
            None,
            None,
        );

        assert_eq!(person.source.as_deref(), Some("Zillow"));
        assert_eq!(person.stage, None);
        assert!(person.assignment.is_empty());
    }
}
