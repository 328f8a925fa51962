use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The fixed set of pet categories the registry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dog,
    Cat,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Dog, Category::Cat];

    /// Value stored in `pets.category` and submitted by the form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dog => "dog",
            Category::Cat => "cat",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pet category '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    // Case-insensitive: older rows were stored capitalised ("Dog").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(Category::Dog),
            "cat" => Ok(Category::Cat),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// The writable fields of a pet. Inserts and updates always carry all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PetRecord {
    pub category: Category,
    pub breed: Option<String>,
    pub price: f64,
    /// Owner display name; resolved to `owners.id` at write time.
    pub owner: String,
}

/// A persisted pet, as read back through the pets/owners join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Pet {
    pub id: i32,
    pub category: Category,
    pub breed: Option<String>,
    pub price: f64,
    pub owner: String,
}

impl Pet {
    pub fn from_record(id: i32, record: PetRecord) -> Self {
        Self {
            id,
            category: record.category,
            breed: record.breed,
            price: record.price,
            owner: record.owner,
        }
    }

    pub fn record(&self) -> PetRecord {
        PetRecord {
            category: self.category,
            breed: self.breed.clone(),
            price: self.price,
            owner: self.owner.clone(),
        }
    }
}
