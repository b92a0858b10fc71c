use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;
use tokio::sync::watch;

use super::connection::DbConnection;
use super::movement::MovementDb;
use crate::error::{Error, Result};
use crate::models::category::{Category, MovementType};
use crate::models::month::YearMonth;
use crate::models::movement::Movement;

/// Asynchronous persistence gateway for movements.
#[async_trait]
pub trait MovementStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Movement>>;
    async fn by_id(&self, id: i64) -> Result<Option<Movement>>;
    async fn by_type(&self, movement_type: MovementType) -> Result<Vec<Movement>>;
    async fn by_category(&self, category: Category) -> Result<Vec<Movement>>;
    async fn by_date(&self, date: NaiveDate) -> Result<Vec<Movement>>;
    async fn by_month(&self, month: YearMonth) -> Result<Vec<Movement>>;
    async fn upsert(&self, movement: Movement) -> Result<Movement>;
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Revision counter bumped after every successful write.
    fn subscribe(&self) -> watch::Receiver<u64>;

    async fn require(&self, id: i64) -> Result<Movement> {
        self.by_id(id).await?.ok_or(Error::NotFound { id })
    }
}

/// `MovementStore` over a single SQLite connection.
///
/// Every call runs on tokio's blocking pool and holds the connection only
/// for its own statement.
#[derive(Clone)]
pub struct SqliteMovementStore {
    conn: Arc<Mutex<Connection>>,
    revision: Arc<watch::Sender<u64>>,
}

impl SqliteMovementStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_connection(DbConnection::new(path)?))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(DbConnection::in_memory()?))
    }

    pub fn from_connection(db: DbConnection) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            conn: Arc::new(Mutex::new(db.into_inner())),
            revision: Arc::new(revision),
        }
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut MovementDb<'_>) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            let mut db = MovementDb::new(&mut guard);
            f(&mut db)
        })
        .await?
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[async_trait]
impl MovementStore for SqliteMovementStore {
    async fn all(&self) -> Result<Vec<Movement>> {
        self.run(|db| db.get_all_movements()).await
    }

    async fn by_id(&self, id: i64) -> Result<Option<Movement>> {
        self.run(move |db| db.get_movement_by_id(id)).await
    }

    async fn by_type(&self, movement_type: MovementType) -> Result<Vec<Movement>> {
        self.run(move |db| db.get_movements_by_type(movement_type))
            .await
    }

    async fn by_category(&self, category: Category) -> Result<Vec<Movement>> {
        self.run(move |db| db.get_movements_by_category(category))
            .await
    }

    async fn by_date(&self, date: NaiveDate) -> Result<Vec<Movement>> {
        self.run(move |db| db.get_movements_by_date(date)).await
    }

    async fn by_month(&self, month: YearMonth) -> Result<Vec<Movement>> {
        self.run(move |db| db.get_movements_by_month(month)).await
    }

    async fn upsert(&self, movement: Movement) -> Result<Movement> {
        let saved = self.run(move |db| db.upsert_movement(&movement)).await?;
        self.bump_revision();
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let removed = self.run(move |db| db.delete_movement(id)).await?;
        if removed {
            self.bump_revision();
        }
        Ok(removed)
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

/// Live view of one month: the current snapshot plus a way to wait for changes.
pub struct MonthWatch<S: MovementStore + ?Sized> {
    store: Arc<S>,
    month: YearMonth,
    revisions: watch::Receiver<u64>,
}

impl<S: MovementStore + ?Sized> MonthWatch<S> {
    pub fn new(store: Arc<S>, month: YearMonth) -> Self {
        let revisions = store.subscribe();
        Self {
            store,
            month,
            revisions,
        }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Switches the watched month; the next `snapshot` reflects it.
    pub fn set_month(&mut self, month: YearMonth) {
        self.month = month;
    }

    pub async fn snapshot(&mut self) -> Result<Vec<Movement>> {
        self.revisions.borrow_and_update();
        self.store.by_month(self.month).await
    }

    /// Waits for the next write to the store, then returns the refreshed month.
    ///
    /// Returns `None` if the store stopped publishing revisions.
    pub async fn changed(&mut self) -> Option<Result<Vec<Movement>>> {
        self.revisions.changed().await.ok()?;
        Some(self.snapshot().await)
    }
}
