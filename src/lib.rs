pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use domain::form::{FieldError, RegistrationForm};
pub use domain::model::{Category, Pet, PetRecord};
pub use storage::{PetRepository, PgPetStore, StoreError};
