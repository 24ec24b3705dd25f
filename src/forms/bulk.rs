//! Body of the bulk-delete endpoints.

use serde::Deserialize;

use crate::domain::bulk::BulkSelection;
use crate::domain::types::TypeConstraintError;
use crate::forms::{FormError, id_list};

/// `{ "ids": [..] }` or `{ "all": true, "except": [..] }`.
#[derive(Debug, Default, Deserialize)]
pub struct BulkForm {
    #[serde(default)]
    pub ids: Vec<i32>,
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub except: Vec<i32>,
}

impl BulkForm {
    pub fn into_selection<T, F>(
        self,
        what: &'static str,
        build: F,
    ) -> Result<BulkSelection<T>, FormError>
    where
        F: Fn(i32) -> Result<T, TypeConstraintError>,
    {
        if self.all {
            return Ok(BulkSelection::AllExcept(id_list(&self.except, what, build)?));
        }
        if self.ids.is_empty() {
            return Err(FormError::EmptySelection);
        }
        Ok(BulkSelection::Ids(id_list(&self.ids, what, build)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PersonId;

    #[test]
    fn explicit_ids_are_kept() {
        let form: BulkForm = serde_json::from_str(r#"{"ids":[3,4]}"#).unwrap();
        let selection = form.into_selection("person", PersonId::new).unwrap();
        assert_eq!(
            selection,
            BulkSelection::Ids(vec![PersonId::new(3).unwrap(), PersonId::new(4).unwrap()])
        );
    }

    #[test]
    fn all_with_exceptions() {
        let form: BulkForm = serde_json::from_str(r#"{"all":true,"except":[9]}"#).unwrap();
        let selection = form.into_selection("person", PersonId::new).unwrap();
        assert_eq!(
            selection,
            BulkSelection::AllExcept(vec![PersonId::new(9).unwrap()])
        );
    }

    #[test]
    fn all_without_exceptions_selects_everything() {
        let form: BulkForm = serde_json::from_str(r#"{"all":true}"#).unwrap();
        let selection = form.into_selection("person", PersonId::new).unwrap();
        assert_eq!(selection, BulkSelection::AllExcept(vec![]));
    }

    #[test]
    fn empty_ids_are_rejected() {
        let form: BulkForm = serde_json::from_str(r#"{"ids":[]}"#).unwrap();
        assert!(matches!(
            form.into_selection("person", PersonId::new),
            Err(FormError::EmptySelection)
        ));
    }

    #[test]
    fn non_positive_id_is_rejected() {
        let form: BulkForm = serde_json::from_str(r#"{"ids":[1,0]}"#).unwrap();
        assert!(matches!(
            form.into_selection("person", PersonId::new),
            Err(FormError::InvalidId("person"))
        ));
    }
}
