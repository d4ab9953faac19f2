use bacoge_core::{CategoryId, CategoryStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::{Category, CategoryDraft};

/// Body of `POST /admin/api/categories` and `PUT /admin/api/categories/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    /// Trimmed while parsing, so the length rules see the stored value. A
    /// blank name parses as missing.
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Le nom de la catégorie est obligatoire"),
        length(
            min = 2,
            max = 100,
            message = "Le nom doit contenir entre 2 et 100 caractères"
        )
    )]
    pub name: Option<String>,

    #[validate(length(
        max = 500,
        message = "La description ne peut pas dépasser 500 caractères"
    ))]
    pub description: Option<String>,

    pub image_url: Option<String>,

    /// Any letter case is accepted.
    #[validate(required(message = "Le statut est obligatoire"))]
    pub status: Option<CategoryStatus>,
}

fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty()))
}

impl CreateCategoryRequest {
    /// The validated request as repository input. Call after `validate()`.
    #[must_use]
    pub fn into_draft(self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.unwrap_or_default(),
            description: self.description,
            image_url: self.image_url,
            status: self.status.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub icon: String,
    pub status: CategoryStatus,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryDto {
    #[must_use]
    pub fn new(category: Category, product_count: i64) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            image_url: category.image_url,
            icon: category.icon,
            status: category.status,
            product_count,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn parse(json: &str) -> CreateCategoryRequest {
        serde_json::from_str(json).unwrap()
    }

    fn field_errors(request: &CreateCategoryRequest) -> Vec<String> {
        let mut fields: Vec<String> = request
            .validate()
            .unwrap_err()
            .field_errors()
            .keys()
            .map(ToString::to_string)
            .collect();
        fields.sort();
        fields
    }

    #[test]
    fn test_valid_request() {
        let request = parse(
            r#"{"name": "Ciment", "description": "Liants et mortiers", "status": "active"}"#,
        );
        assert!(request.validate().is_ok());
        let draft = request.into_draft();
        assert_eq!(draft.status, CategoryStatus::Active);
        assert_eq!(draft.name, "Ciment");
    }

    #[test]
    fn test_status_is_case_insensitive() {
        let upper = parse(r#"{"name": "Bois", "status": "INACTIVE"}"#);
        let lower = parse(r#"{"name": "Bois", "status": "inactive"}"#);
        assert_eq!(upper.status, lower.status);
    }

    #[test]
    fn test_missing_name_and_status() {
        let request = parse(r#"{"description": "sans nom"}"#);
        assert_eq!(field_errors(&request), vec!["name", "status"]);
    }

    #[test]
    fn test_blank_and_short_names() {
        let blank = parse(r#"{"name": "   ", "status": "ACTIVE"}"#);
        assert!(blank.name.is_none());
        assert_eq!(field_errors(&blank), vec!["name"]);

        let short = parse(r#"{"name": "A", "status": "ACTIVE"}"#);
        assert_eq!(field_errors(&short), vec!["name"]);

        let long = CreateCategoryRequest {
            name: Some("x".repeat(101)),
            description: None,
            image_url: None,
            status: Some(CategoryStatus::Active),
        };
        assert_eq!(field_errors(&long), vec!["name"]);
    }

    #[test]
    fn test_name_is_trimmed_before_validation() {
        let padded = parse(r#"{"name": "  A  ", "status": "ACTIVE"}"#);
        assert_eq!(padded.name.as_deref(), Some("A"));
        assert_eq!(field_errors(&padded), vec!["name"]);

        let ok = parse(r#"{"name": "  Plâtre  ", "status": "ACTIVE"}"#);
        assert!(ok.validate().is_ok());
        assert_eq!(ok.into_draft().name, "Plâtre");
    }

    #[test]
    fn test_description_limit() {
        let request = CreateCategoryRequest {
            name: Some("Carrelage".to_string()),
            description: Some("d".repeat(501)),
            image_url: None,
            status: Some(CategoryStatus::Active),
        };
        assert_eq!(field_errors(&request), vec!["description"]);
    }

    #[test]
    fn test_errors_become_validation_envelope() {
        let request = parse(r#"{"name": "A", "status": "ACTIVE"}"#);
        let err: AppError = request.validate().unwrap_err().into();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields.get("name").map(String::as_str),
            Some("Le nom doit contenir entre 2 et 100 caractères")
        );
    }
}
