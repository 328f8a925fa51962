//! The pet registration form and its validation.
//!
//! The same form backs both `/register` and `/update/{id}`. Fields arrive as raw
//! strings from a URL-encoded body; `validate` turns them into a `PetRecord` or
//! reports every field that failed.

use crate::domain::model::{Category, Pet, PetRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub const BREED_MAX_LEN: usize = 32;
pub const OWNER_MAX_LEN: usize = 64;

/// Raw form submission. `category`, `price` and `owner` are required; `breed` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegistrationForm {
    /// Required: `dog` or `cat`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    /// Required: a decimal number.
    #[serde(default)]
    pub price: Option<String>,
    /// Required: name of an existing owner.
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl RegistrationForm {
    /// Pre-populates the form from a stored pet (used by `GET /update/{id}`).
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            category: Some(pet.category.as_str().to_string()),
            breed: pet.breed.clone(),
            price: Some(pet.price.to_string()),
            owner: Some(pet.owner.clone()),
        }
    }

    /// Checks required fields and formats, collecting all errors.
    pub fn validate(&self) -> Result<PetRecord, Vec<FieldError>> {
        let mut errors = Vec::new();

        let category = match present(&self.category) {
            None => {
                errors.push(FieldError::new("category", "This field is required."));
                None
            }
            Some(raw) => match raw.parse::<Category>() {
                Ok(c) => Some(c),
                Err(_) => {
                    errors.push(FieldError::new("category", "Not a valid choice."));
                    None
                }
            },
        };

        let breed = present(&self.breed).map(str::to_string);
        if let Some(b) = &breed {
            if b.chars().count() > BREED_MAX_LEN {
                errors.push(FieldError::new(
                    "breed",
                    format!("Must be at most {} characters.", BREED_MAX_LEN),
                ));
            }
        }

        let price = match present(&self.price) {
            None => {
                errors.push(FieldError::new("price", "This field is required."));
                None
            }
            Some(raw) => match raw.parse::<f64>() {
                Ok(p) if p.is_finite() => Some(p),
                _ => {
                    errors.push(FieldError::new("price", "Not a valid number."));
                    None
                }
            },
        };

        let owner = match present(&self.owner) {
            None => {
                errors.push(FieldError::new("owner", "This field is required."));
                None
            }
            Some(o) if o.chars().count() > OWNER_MAX_LEN => {
                errors.push(FieldError::new(
                    "owner",
                    format!("Must be at most {} characters.", OWNER_MAX_LEN),
                ));
                None
            }
            Some(o) => Some(o.to_string()),
        };

        match (category, price, owner) {
            (Some(category), Some(price), Some(owner)) if errors.is_empty() => Ok(PetRecord {
                category,
                breed,
                price,
                owner,
            }),
            _ => Err(errors),
        }
    }
}
