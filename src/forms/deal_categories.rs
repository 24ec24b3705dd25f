use serde::Deserialize;
use validator::Validate;

use crate::domain::types::CategoryName;
use crate::forms::FormError;

/// Body used to create or rename a deal stage or deal type.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl TryFrom<CategoryForm> for CategoryName {
    type Error = FormError;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;
        CategoryName::new(form.name).map_err(|_| FormError::InvalidName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        let form = CategoryForm {
            name: "  Under contract ".to_string(),
        };
        assert_eq!(
            CategoryName::try_from(form).unwrap().as_str(),
            "Under contract"
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = CategoryForm {
            name: "   ".to_string(),
        };
        assert!(matches!(
            CategoryName::try_from(form),
            Err(FormError::InvalidName)
        ));
    }
}
