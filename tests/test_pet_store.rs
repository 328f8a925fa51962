//! Data-access tests against a real Postgres.
//!
//! Requires `DATABASE_URL` (or a `.env` providing it); each test returns early
//! with a note when it is unset. Owners are created with unique names so runs
//! don't interfere with each other or with existing data.

use pet_registry::{Category, Pet, PetRecord, PetRepository, PgPetStore, StoreError};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;

static SCHEMA: OnceCell<()> = OnceCell::const_new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

fn database_url() -> Option<String> {
    dotenv::dotenv().ok();
    std::env::var("DATABASE_URL").ok()
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!(
        "{}-{}-{}-{}",
        prefix,
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

/// Opens a session with the schema in place, plus a plain pool for seeding and inspection.
async fn setup(url: &str) -> (PgPetStore, PgPool) {
    SCHEMA
        .get_or_init(|| async {
            let mut store = PgPetStore::connect(url).await.unwrap();
            store.create_schema().await.unwrap();
            store.commit().await.unwrap();
            store.disconnect().await.unwrap();
        })
        .await;

    let store = PgPetStore::connect(url).await.unwrap();
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(url)
        .await
        .unwrap();
    (store, pool)
}

async fn seed_owner(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO owners (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn stored_owner_id(pool: &PgPool, pet_id: i32) -> Option<i32> {
    sqlx::query_scalar("SELECT owner FROM pets WHERE id = $1")
        .bind(pet_id)
        .fetch_optional(pool)
        .await
        .unwrap()
}

fn record(category: Category, breed: Option<&str>, price: f64, owner: &str) -> PetRecord {
    PetRecord {
        category,
        breed: breed.map(str::to_string),
        price,
        owner: owner.to_string(),
    }
}

#[tokio::test]
async fn disconnected_session_rejects_every_operation() {
    let mut store = PgPetStore::disconnected();
    assert!(!store.is_connected());
    assert!(!store.in_transaction());

    let r = record(Category::Dog, None, 1.0, "nobody");
    assert!(matches!(store.create_schema().await, Err(StoreError::ConnectionNotOpen)));
    assert!(matches!(store.insert(&r).await, Err(StoreError::ConnectionNotOpen)));
    assert!(matches!(store.update(1, &r).await, Err(StoreError::ConnectionNotOpen)));
    assert!(matches!(store.delete(1).await, Err(StoreError::ConnectionNotOpen)));
    assert!(matches!(store.list_pets().await, Err(StoreError::ConnectionNotOpen)));
    assert!(matches!(store.get_pet(1).await, Err(StoreError::ConnectionNotOpen)));
    assert!(matches!(store.commit().await, Err(StoreError::ConnectionNotOpen)));
    assert!(matches!(store.rollback().await, Err(StoreError::ConnectionNotOpen)));
}

#[tokio::test]
async fn insert_with_unknown_owner_writes_nothing() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, pool) = setup(&url).await;

    let breed = unique("ghost");
    let owner = unique("missing-owner");
    let result = store
        .insert(&record(Category::Cat, Some(&breed), 5.0, &owner))
        .await;
    assert!(matches!(result, Err(StoreError::OwnerNotFound(ref o)) if *o == owner));
    store.commit().await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM pets WHERE breed = $1")
        .bind(&breed)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn committed_insert_is_listed_with_owner_name() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, pool) = setup(&url).await;

    let alice = unique("Alice");
    let alice_id = seed_owner(&pool, &alice).await;

    let lab = record(Category::Dog, Some("Lab"), 250.0, &alice);
    let id = store.insert(&lab).await.unwrap();
    store.commit().await.unwrap();

    // The row stores the owner's id, the join projects the name back.
    assert_eq!(stored_owner_id(&pool, id).await, Some(alice_id));
    let pets = store.list_pets().await.unwrap();
    assert!(pets.contains(&Pet::from_record(id, lab)));
    assert!(pets.windows(2).all(|w| w[0].id < w[1].id));
    store.rollback().await.unwrap();
}

#[tokio::test]
async fn update_overwrites_all_fields() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, pool) = setup(&url).await;

    let alice = unique("Alice");
    let bob = unique("Bob");
    seed_owner(&pool, &alice).await;
    let bob_id = seed_owner(&pool, &bob).await;

    let id = store
        .insert(&record(Category::Dog, Some("Lab"), 250.0, &alice))
        .await
        .unwrap();
    store.commit().await.unwrap();

    let new_data = record(Category::Cat, None, 99.5, &bob);
    store.update(id, &new_data).await.unwrap();
    store.commit().await.unwrap();

    assert_eq!(
        store.get_pet(id).await.unwrap(),
        Some(Pet::from_record(id, new_data))
    );
    assert_eq!(stored_owner_id(&pool, id).await, Some(bob_id));
    store.rollback().await.unwrap();
}

#[tokio::test]
async fn update_with_unknown_owner_keeps_old_row() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, pool) = setup(&url).await;

    let alice = unique("Alice");
    seed_owner(&pool, &alice).await;
    let original = record(Category::Dog, Some("Pug"), 80.0, &alice);
    let id = store.insert(&original).await.unwrap();
    store.commit().await.unwrap();

    let result = store
        .update(id, &record(Category::Cat, None, 1.0, &unique("nobody")))
        .await;
    assert!(matches!(result, Err(StoreError::OwnerNotFound(_))));
    store.rollback().await.unwrap();

    assert_eq!(
        store.get_pet(id).await.unwrap(),
        Some(Pet::from_record(id, original))
    );
    store.rollback().await.unwrap();
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, pool) = setup(&url).await;

    let alice = unique("Alice");
    seed_owner(&pool, &alice).await;
    let id = store
        .insert(&record(Category::Cat, Some("Siamese"), 120.0, &alice))
        .await
        .unwrap();
    store.commit().await.unwrap();

    store.delete(id).await.unwrap();
    store.commit().await.unwrap();
    assert_eq!(store.get_pet(id).await.unwrap(), None);
    store.rollback().await.unwrap();
}

#[tokio::test]
async fn rollback_discards_uncommitted_insert() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, pool) = setup(&url).await;

    let alice = unique("Alice");
    seed_owner(&pool, &alice).await;
    let id = store
        .insert(&record(Category::Dog, None, 10.0, &alice))
        .await
        .unwrap();

    assert!(store.in_transaction());
    // Visible inside the session's own transaction, invisible outside it.
    assert!(store.get_pet(id).await.unwrap().is_some());
    assert_eq!(stored_owner_id(&pool, id).await, None);

    store.rollback().await.unwrap();
    assert_eq!(store.get_pet(id).await.unwrap(), None);
    store.rollback().await.unwrap();
}

#[tokio::test]
async fn create_schema_is_idempotent_and_disconnect_closes_session() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, _pool) = setup(&url).await;

    store.create_schema().await.unwrap();
    store.commit().await.unwrap();
    store.ping().await.unwrap();

    store.disconnect().await.unwrap();
    assert!(!store.is_connected());
    assert!(matches!(store.list_pets().await, Err(StoreError::ConnectionNotOpen)));
}

#[tokio::test]
async fn list_skips_unreadable_rows() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let (mut store, pool) = setup(&url).await;

    let alice = unique("Alice");
    let alice_id = seed_owner(&pool, &alice).await;
    let good = record(Category::Cat, Some("Manx"), 40.0, &alice);
    let good_id = store.insert(&good).await.unwrap();
    store.commit().await.unwrap();

    let bad_id: i32 = sqlx::query_scalar(
        "INSERT INTO pets (category, breed, price, owner) VALUES ('bird', NULL, 1.0, $1) RETURNING id",
    )
    .bind(alice_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let pets = store.list_pets().await.unwrap();
    assert!(pets.contains(&Pet::from_record(good_id, good)));
    assert!(pets.iter().all(|p| p.id != bad_id));
    assert!(matches!(store.get_pet(bad_id).await, Err(StoreError::CorruptRow(_))));
    store.rollback().await.unwrap();

    sqlx::query("DELETE FROM pets WHERE id = $1")
        .bind(bad_id)
        .execute(&pool)
        .await
        .unwrap();
}
