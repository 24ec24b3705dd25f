//! Diesel models for people (leads and contacts).

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::person::{
    NewPerson as DomainNewPerson, Person as DomainPerson, PersonAssignment,
    UpdatePerson as DomainUpdatePerson,
};
use crate::domain::types::{
    Amount, HubId, LeadFlowRuleId, PersonEmail, PersonId, PersonName, PhoneNumber, PondId,
    PublicId, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::people)]
/// Diesel model for [`crate::domain::person::Person`].
pub struct Person {
    pub id: i32,
    pub public_id: Vec<u8>,
    pub hub_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub price: Option<i64>,
    pub assigned_user_id: Option<i32>,
    pub assigned_lender_id: Option<i32>,
    pub pond_id: Option<i32>,
    pub lead_flow_rule_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::people)]
/// Insertable form of [`Person`].
pub struct NewPerson<'a> {
    pub public_id: &'a [u8],
    pub hub_id: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub source: Option<&'a str>,
    pub stage: Option<&'a str>,
    pub city: Option<&'a str>,
    pub price: Option<i64>,
    pub assigned_user_id: Option<i32>,
    pub assigned_lender_id: Option<i32>,
    pub pond_id: Option<i32>,
    pub lead_flow_rule_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::people)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Person`] record.
pub struct UpdatePerson<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub source: Option<&'a str>,
    pub stage: Option<&'a str>,
    pub city: Option<&'a str>,
    pub price: Option<i64>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::people)]
#[diesel(treat_none_as_null = true)]
/// Ownership columns written by assignment and lead routing.
pub struct AssignPerson {
    pub assigned_user_id: Option<i32>,
    pub assigned_lender_id: Option<i32>,
    pub pond_id: Option<i32>,
    pub lead_flow_rule_id: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Person> for DomainPerson {
    type Error = TypeConstraintError;

    fn try_from(person: Person) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PersonId::try_from(person.id)?,
            public_id: PublicId::from_bytes(&person.public_id)?,
            hub_id: HubId::try_from(person.hub_id)?,
            name: PersonName::new(person.name)?,
            email: person.email.map(PersonEmail::new).transpose()?,
            phone: person.phone.map(PhoneNumber::new).transpose()?,
            source: person.source,
            stage: person.stage,
            city: person.city,
            price: person.price.map(Amount::new).transpose()?,
            assigned_user_id: person.assigned_user_id.map(UserId::new).transpose()?,
            assigned_lender_id: person.assigned_lender_id.map(UserId::new).transpose()?,
            pond_id: person.pond_id.map(PondId::new).transpose()?,
            lead_flow_rule_id: person.lead_flow_rule_id.map(LeadFlowRuleId::new).transpose()?,
            created_at: person.created_at,
            updated_at: person.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPerson> for NewPerson<'a> {
    fn from(person: &'a DomainNewPerson) -> Self {
        Self {
            public_id: person.public_id.as_bytes(),
            hub_id: person.hub_id.get(),
            name: person.name.as_str(),
            email: person.email.as_ref().map(|e| e.as_str()),
            phone: person.phone.as_ref().map(|p| p.as_str()),
            source: person.source.as_deref(),
            stage: person.stage.as_deref(),
            city: person.city.as_deref(),
            price: person.price.map(Amount::get),
            assigned_user_id: person.assignment.assigned_user_id.map(UserId::get),
            assigned_lender_id: person.assignment.assigned_lender_id.map(UserId::get),
            pond_id: person.assignment.pond_id.map(PondId::get),
            lead_flow_rule_id: person.assignment.lead_flow_rule_id.map(LeadFlowRuleId::get),
        }
    }
}

impl<'a> From<&'a DomainUpdatePerson> for UpdatePerson<'a> {
    fn from(person: &'a DomainUpdatePerson) -> Self {
        Self {
            name: person.name.as_str(),
            email: person.email.as_ref().map(|e| e.as_str()),
            phone: person.phone.as_ref().map(|p| p.as_str()),
            source: person.source.as_deref(),
            stage: person.stage.as_deref(),
            city: person.city.as_deref(),
            price: person.price.map(Amount::get),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<&PersonAssignment> for AssignPerson {
    fn from(assignment: &PersonAssignment) -> Self {
        Self {
            assigned_user_id: assignment.assigned_user_id.map(UserId::get),
            assigned_lender_id: assignment.assigned_lender_id.map(UserId::get),
            pond_id: assignment.pond_id.map(PondId::get),
            lead_flow_rule_id: assignment.lead_flow_rule_id.map(LeadFlowRuleId::get),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn from_domain_new_person() {
        let domain = DomainNewPerson::new(
            HubId::new(3).unwrap(),
            PersonName::new("Jane").unwrap(),
            Some(PersonEmail::new("JANE@example.com").unwrap()),
            None,
            Some("Zillow".to_string()),
            None,
            Some("Austin".to_string()),
            Some(Amount::new(250_000).unwrap()),
        );
        let new: NewPerson = (&domain).into();
        assert_eq!(new.hub_id, 3);
        assert_eq!(new.email, Some("jane@example.com"));
        assert_eq!(new.source, Some("Zillow"));
        assert_eq!(new.price, Some(250_000));
        assert_eq!(new.public_id.len(), 16);
        assert_eq!(new.assigned_user_id, None);
    }

    #[test]
    fn person_into_domain() {
        let now = Utc::now().naive_utc();
        let public_id = PublicId::new();
        let db = Person {
            id: 1,
            public_id: public_id.as_bytes().to_vec(),
            hub_id: 2,
            name: "n".to_string(),
            email: Some("e@x.io".to_string()),
            phone: None,
            source: None,
            stage: Some("Lead".to_string()),
            city: None,
            price: None,
            assigned_user_id: Some(5),
            assigned_lender_id: None,
            pond_id: None,
            lead_flow_rule_id: None,
            created_at: now,
            updated_at: now,
        };
        let domain = DomainPerson::try_from(db).unwrap();
        assert_eq!(domain.id.get(), 1);
        assert_eq!(domain.public_id, public_id);
        assert_eq!(domain.assigned_user_id, Some(UserId::new(5).unwrap()));
        assert_eq!(domain.stage.as_deref(), Some("Lead"));
    }
}
