use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::person::{NewPerson, PersonAssignment, UpdatePerson};
use crate::domain::types::{
    Amount, HubId, PersonEmail, PersonName, PhoneNumber, PondId, UserId,
};
use crate::forms::{FormError, optional, optional_id};

/// Body used to create or update a person, and to submit a lead.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PersonForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub price: Option<i64>,
}

/// Validated contents of a [`PersonForm`].
#[derive(Debug)]
pub struct PersonPayload {
    pub name: PersonName,
    pub email: Option<PersonEmail>,
    pub phone: Option<PhoneNumber>,
    pub source: Option<String>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub price: Option<Amount>,
}

impl TryFrom<PersonForm> for PersonPayload {
    type Error = FormError;

    fn try_from(form: PersonForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: optional(form.email, PersonEmail::new)?,
            phone: optional(form.phone, PhoneNumber::new)?,
            source: form.source,
            stage: form.stage,
            city: form.city,
            price: form.price.map(Amount::new).transpose()?,
        })
    }
}

impl PersonPayload {
    pub fn into_new_person(self, hub_id: HubId) -> NewPerson {
        NewPerson::new(
            hub_id,
            self.name,
            self.email,
            self.phone,
            self.source,
            self.stage,
            self.city,
            self.price,
        )
    }

    pub fn into_update(self) -> UpdatePerson {
        UpdatePerson::new(
            self.name,
            self.email,
            self.phone,
            self.source,
            self.stage,
            self.city,
            self.price,
        )
    }
}

/// Query string of `GET /people`.
#[derive(Debug, Default, Deserialize)]
pub struct PeopleQuery {
    pub search: Option<String>,
    pub stage: Option<String>,
    pub source: Option<String>,
    pub assigned_user_id: Option<i32>,
    pub pond_id: Option<i32>,
    #[serde(default)]
    pub unassigned: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Body of `POST /people/{id}/assign`. Missing fields clear the assignment.
#[derive(Debug, Default, Deserialize)]
pub struct AssignPersonForm {
    pub assigned_user_id: Option<i32>,
    pub assigned_lender_id: Option<i32>,
    pub pond_id: Option<i32>,
}

impl TryFrom<AssignPersonForm> for PersonAssignment {
    type Error = FormError;

    fn try_from(form: AssignPersonForm) -> Result<Self, Self::Error> {
        Ok(Self {
            assigned_user_id: optional_id(form.assigned_user_id, "user", UserId::new)?,
            assigned_lender_id: optional_id(form.assigned_lender_id, "lender", UserId::new)?,
            pond_id: optional_id(form.pond_id, "pond", PondId::new)?,
            lead_flow_rule_id: None,
        })
    }
}

#[derive(MultipartForm)]
pub struct UploadPeopleForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadPeopleForm {
    /// Reads the uploaded file and parses it with [`parse_people_csv`].
    pub fn parse(&mut self, hub_id: HubId) -> Result<Vec<NewPerson>, FormError> {
        let mut content = String::new();
        self.csv
            .file
            .read_to_string(&mut content)
            .map_err(|err| FormError::Csv(err.to_string()))?;
        parse_people_csv(&content, hub_id)
    }
}

/// Parses rows with the headers `name,email,phone,source,stage,city,price`.
///
/// Only `name` is required. Unknown columns are ignored. The first invalid
/// row aborts the import with its line number.
pub fn parse_people_csv(content: &str, hub_id: HubId) -> Result<Vec<NewPerson>, FormError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| FormError::Csv(err.to_string()))?
        .clone();

    if !headers.iter().any(|h| h.eq_ignore_ascii_case("name")) {
        return Err(FormError::Csv("missing `name` column".to_string()));
    }

    let mut people = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| FormError::Csv(err.to_string()))?;
        let mut form = PersonForm::default();

        for (header, value) in headers.iter().zip(record.iter()) {
            let value = value.to_string();
            match header.to_lowercase().as_str() {
                "name" => form.name = value,
                "email" => form.email = Some(value),
                "phone" => form.phone = Some(value),
                "source" => form.source = Some(value),
                "stage" => form.stage = Some(value),
                "city" => form.city = Some(value),
                "price" if !value.is_empty() => {
                    form.price = Some(value.parse().map_err(|_| {
                        FormError::Csv(format!("line {}: invalid price", index + 2))
                    })?);
                }
                _ => {}
            }
        }

        let payload = PersonPayload::try_from(form)
            .map_err(|err| FormError::Csv(format!("line {}: {err}", index + 2)))?;
        people.push(payload.into_new_person(hub_id));
    }

    Ok(people)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> HubId {
        HubId::new(1).unwrap()
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let form = PersonForm {
            name: "Jane Doe".to_string(),
            email: Some("  ".to_string()),
            phone: Some(String::new()),
            ..Default::default()
        };

        let payload = PersonPayload::try_from(form).unwrap();

        assert!(payload.email.is_none());
        assert!(payload.phone.is_none());
    }

    #[test]
    fn invalid_email_is_reported() {
        let form = PersonForm {
            name: "Jane".to_string(),
            email: Some("nope".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            PersonPayload::try_from(form),
            Err(FormError::InvalidEmail)
        ));
    }

    #[test]
    fn empty_name_fails_validation() {
        let form = PersonForm::default();
        assert!(matches!(
            PersonPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn csv_rows_become_people() {
        let csv = "name,email,phone,source,stage,city,price\n\
                   Jane Doe,JANE@example.com,,Zillow,Lead,Austin,350000\n\
                   John Roe,,,,,,\n";

        let people = parse_people_csv(csv, hub()).unwrap();

        assert_eq!(people.len(), 2);
        assert_eq!(people[0].email.as_ref().unwrap().as_str(), "jane@example.com");
        assert_eq!(people[0].source.as_deref(), Some("Zillow"));
        assert_eq!(people[0].price.unwrap().get(), 350_000);
        assert!(people[1].city.is_none());
    }

    #[test]
    fn csv_without_name_column_is_rejected() {
        let csv = "email\njane@example.com\n";
        assert!(matches!(
            parse_people_csv(csv, hub()),
            Err(FormError::Csv(_))
        ));
    }

    #[test]
    fn csv_reports_bad_line() {
        let csv = "name,price\nJane,abc\n";
        let err = parse_people_csv(csv, hub()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn assignment_rejects_bad_ids() {
        let form = AssignPersonForm {
            assigned_user_id: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            PersonAssignment::try_from(form),
            Err(FormError::InvalidId("user"))
        ));
    }
}
