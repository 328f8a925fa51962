//! Domain model definitions for pets and their owners.

pub mod pet;

pub use pet::{Category, ParseCategoryError, Pet, PetRecord};
