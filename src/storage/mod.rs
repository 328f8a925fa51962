pub mod error;
pub mod postgres;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use postgres::PgPetStore;
pub use repository::PetRepository;
