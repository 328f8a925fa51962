//! PostgreSQL-backed pet store.
//!
//! `PgPetStore` is the single session the application talks to. It holds a pool
//! capped at one connection and at most one open transaction. Autocommit is off:
//! the first statement after a commit or rollback opens a transaction, and every
//! later statement runs inside it until the caller ends it.

use crate::domain::model::{Category, Pet, PetRecord};
use crate::storage::repository::PetRepository;
use crate::storage::schema;
use crate::storage::StoreError;
use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

const SELECT_PETS: &str = "SELECT pets.id, pets.category, pets.breed, pets.price, owners.name AS owner
     FROM pets
     INNER JOIN owners ON pets.owner = owners.id";

/// Row shape of the pets/owners join. Columns are nullable in the schema.
#[derive(FromRow, Debug)]
struct PetRow {
    id: i32,
    category: Option<String>,
    breed: Option<String>,
    price: Option<f64>,
    owner: Option<String>,
}

impl TryFrom<PetRow> for Pet {
    type Error = StoreError;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .as_deref()
            .ok_or_else(|| StoreError::CorruptRow(format!("pet {} has no category", row.id)))?
            .parse::<Category>()
            .map_err(|e| StoreError::CorruptRow(format!("pet {}: {}", row.id, e)))?;
        let price = row
            .price
            .ok_or_else(|| StoreError::CorruptRow(format!("pet {} has no price", row.id)))?;
        Ok(Pet {
            id: row.id,
            category,
            breed: row.breed,
            price,
            owner: row.owner.unwrap_or_default(),
        })
    }
}

pub struct PgPetStore {
    pool: Option<PgPool>,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgPetStore {
    /// Opens a session against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        tracing::info!("Connected to database");
        Ok(Self {
            pool: Some(pool),
            tx: None,
        })
    }

    /// A session with no live connection. Every operation fails with `ConnectionNotOpen`.
    pub fn disconnected() -> Self {
        Self {
            pool: None,
            tx: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    /// Returns the open transaction, beginning one if needed.
    async fn transaction(&mut self) -> Result<&mut Transaction<'static, Postgres>, StoreError> {
        let pool = self.pool.as_ref().ok_or(StoreError::ConnectionNotOpen)?;
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => pool.begin().await?,
        };
        Ok(self.tx.insert(tx))
    }
}

async fn owner_id(conn: &mut PgConnection, name: &str) -> Result<i32, StoreError> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM owners WHERE name = $1 ORDER BY id LIMIT 1")
        .bind(name)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| StoreError::OwnerNotFound(name.to_string()))
}

#[async_trait]
impl PetRepository for PgPetStore {
    async fn create_schema(&mut self) -> Result<(), StoreError> {
        let tx = self.transaction().await?;
        for stmt in schema::CREATE_ALL {
            sqlx::query(stmt).execute(tx.as_mut()).await?;
        }
        Ok(())
    }

    async fn insert(&mut self, record: &PetRecord) -> Result<i32, StoreError> {
        let tx = self.transaction().await?;
        let owner = owner_id(tx.as_mut(), &record.owner).await?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO pets (category, breed, price, owner)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(record.category.as_str())
        .bind(record.breed.as_deref())
        .bind(record.price)
        .bind(owner)
        .fetch_one(tx.as_mut())
        .await?;

        tracing::debug!(pet_id = id, owner_id = owner, "Inserted pet");
        Ok(id)
    }

    async fn update(&mut self, id: i32, record: &PetRecord) -> Result<(), StoreError> {
        let tx = self.transaction().await?;
        let owner = owner_id(tx.as_mut(), &record.owner).await?;

        let result = sqlx::query(
            "UPDATE pets
                SET category = $1,
                    breed = $2,
                    price = $3,
                    owner = $4
              WHERE id = $5",
        )
        .bind(record.category.as_str())
        .bind(record.breed.as_deref())
        .bind(record.price)
        .bind(owner)
        .bind(id)
        .execute(tx.as_mut())
        .await?;

        tracing::debug!(pet_id = id, rows = result.rows_affected(), "Updated pet");
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), StoreError> {
        let tx = self.transaction().await?;
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        tracing::debug!(pet_id = id, rows = result.rows_affected(), "Deleted pet");
        Ok(())
    }

    async fn list_pets(&mut self) -> Result<Vec<Pet>, StoreError> {
        let tx = self.transaction().await?;
        let rows: Vec<PetRow> = sqlx::query_as(&format!("{} ORDER BY pets.id", SELECT_PETS))
            .fetch_all(tx.as_mut())
            .await?;
        // Unreadable rows are logged and skipped.
        let pets = rows
            .into_iter()
            .filter_map(|row| match Pet::try_from(row) {
                Ok(pet) => Some(pet),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable pet row");
                    None
                }
            })
            .collect();
        Ok(pets)
    }

    async fn get_pet(&mut self, id: i32) -> Result<Option<Pet>, StoreError> {
        let tx = self.transaction().await?;
        let row: Option<PetRow> = sqlx::query_as(&format!("{} WHERE pets.id = $1", SELECT_PETS))
            .bind(id)
            .fetch_optional(tx.as_mut())
            .await?;
        row.map(Pet::try_from).transpose()
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        if self.pool.is_none() {
            return Err(StoreError::ConnectionNotOpen);
        }
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        if self.pool.is_none() {
            return Err(StoreError::ConnectionNotOpen);
        }
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    async fn disconnect(&mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            tracing::info!("Disconnected from database");
        }
        Ok(())
    }

    async fn ping(&mut self) -> Result<(), StoreError> {
        let query = sqlx::query("SELECT 1");
        if let Some(tx) = self.tx.as_mut() {
            query.execute(tx.as_mut()).await?;
            return Ok(());
        }
        let pool = self.pool.as_ref().ok_or(StoreError::ConnectionNotOpen)?;
        query.execute(pool).await?;
        Ok(())
    }
}
