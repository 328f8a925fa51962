//! Table definitions for the registry.

pub const CREATE_OWNERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS owners (
    id SERIAL PRIMARY KEY,
    name VARCHAR(64)
)";

pub const CREATE_PETS_TABLE: &str = "CREATE TABLE IF NOT EXISTS pets (
    id SERIAL PRIMARY KEY,
    category VARCHAR(4),
    breed VARCHAR(32),
    price FLOAT,
    owner INT REFERENCES owners (id) ON DELETE CASCADE
)";

/// Statements in dependency order (`pets` references `owners`).
pub const CREATE_ALL: [&str; 2] = [CREATE_OWNERS_TABLE, CREATE_PETS_TABLE];
