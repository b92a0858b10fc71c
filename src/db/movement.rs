use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::category::{Category, MovementType};
use crate::models::month::YearMonth;
use crate::models::movement::Movement;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const SELECT_MOVEMENTS: &str =
    "SELECT id, amount, description, date, type, category, created_at, updated_at FROM movements";
const ORDER_BY: &str = " ORDER BY date DESC, id DESC";

/// Columns as stored, before decoding into the model.
struct StoredMovement {
    id: i64,
    amount: String,
    description: String,
    date: String,
    movement_type: String,
    category: String,
    created_at: String,
    updated_at: String,
}

impl StoredMovement {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(StoredMovement {
            id: row.get(0)?,
            amount: row.get(1)?,
            description: row.get(2)?,
            date: row.get(3)?,
            movement_type: row.get(4)?,
            category: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_movement(self) -> Result<Movement> {
        let amount = self.amount.parse::<Decimal>().map_err(|e| {
            Error::InvalidData(format!("movement {}: bad amount '{}': {e}", self.id, self.amount))
        })?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            Error::InvalidData(format!("movement {}: bad date '{}': {e}", self.id, self.date))
        })?;
        Ok(Movement {
            id: self.id,
            amount,
            description: self.description,
            date,
            movement_type: self.movement_type.parse::<MovementType>()?,
            category: self.category.parse::<Category>()?,
            created_at: parse_timestamp(self.id, &self.created_at)?,
            updated_at: parse_timestamp(self.id, &self.updated_at)?,
        })
    }
}

fn parse_timestamp(id: i64, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| Error::InvalidData(format!("movement {id}: bad timestamp '{value}': {e}")))
}

fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub struct MovementDb<'a> {
    conn: &'a mut Connection,
}

impl<'a> MovementDb<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }

    fn query(&self, filter: &str, params: &[&dyn ToSql]) -> Result<Vec<Movement>> {
        let sql = format!("{SELECT_MOVEMENTS}{filter}{ORDER_BY}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, StoredMovement::from_row)?;

        let mut movements = Vec::new();
        for row in rows {
            movements.push(row?.into_movement()?);
        }
        tracing::debug!(filter, count = movements.len(), "queried movements");
        Ok(movements)
    }

    pub fn get_all_movements(&self) -> Result<Vec<Movement>> {
        self.query("", &[])
    }

    pub fn get_movement_by_id(&self, id: i64) -> Result<Option<Movement>> {
        let sql = format!("{SELECT_MOVEMENTS} WHERE id = ?1");
        let stored = self
            .conn
            .query_row(&sql, params![id], StoredMovement::from_row)
            .optional()?;
        stored.map(StoredMovement::into_movement).transpose()
    }

    pub fn get_movements_by_type(&self, movement_type: MovementType) -> Result<Vec<Movement>> {
        self.query(" WHERE type = ?1", &[&movement_type.key()])
    }

    pub fn get_movements_by_category(&self, category: Category) -> Result<Vec<Movement>> {
        self.query(" WHERE category = ?1", &[&category.key()])
    }

    pub fn get_movements_by_date(&self, date: NaiveDate) -> Result<Vec<Movement>> {
        let date = date.format(DATE_FORMAT).to_string();
        self.query(" WHERE date = ?1", &[&date])
    }

    pub fn get_movements_by_month(&self, month: YearMonth) -> Result<Vec<Movement>> {
        let pattern = format!("{}%", month.date_prefix());
        self.query(" WHERE date LIKE ?1", &[&pattern])
    }

    /// Inserts a new movement (id 0) or replaces the stored one with the same id.
    ///
    /// Replacing keeps the original creation timestamp and refreshes the
    /// modification timestamp. Returns the movement as stored.
    pub fn upsert_movement(&mut self, movement: &Movement) -> Result<Movement> {
        let tx = self.conn.transaction()?;

        let id = if movement.is_new() {
            tx.execute(
                "INSERT INTO movements (amount, description, date, type, category, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    movement.amount.to_string(),
                    movement.description,
                    movement.date.format(DATE_FORMAT).to_string(),
                    movement.movement_type.key(),
                    movement.category.key(),
                    format_timestamp(&movement.created_at),
                    format_timestamp(&movement.updated_at),
                ],
            )?;
            let id = tx.last_insert_rowid();
            tracing::info!(id, "inserted movement");
            id
        } else {
            let existing_created: Option<String> = tx
                .query_row(
                    "SELECT created_at FROM movements WHERE id = ?1",
                    params![movement.id],
                    |row| row.get(0),
                )
                .optional()?;
            let created_at =
                existing_created.unwrap_or_else(|| format_timestamp(&movement.created_at));
            let updated_at = format_timestamp(&chrono::Local::now().naive_local());

            tx.execute(
                "INSERT OR REPLACE INTO movements (id, amount, description, date, type, category, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    movement.id,
                    movement.amount.to_string(),
                    movement.description,
                    movement.date.format(DATE_FORMAT).to_string(),
                    movement.movement_type.key(),
                    movement.category.key(),
                    created_at,
                    updated_at,
                ],
            )?;
            tracing::info!(id = movement.id, "saved movement");
            movement.id
        };

        tx.commit()?;
        self.get_movement_by_id(id)?.ok_or(Error::NotFound { id })
    }

    /// Returns whether a row was removed.
    pub fn delete_movement(&mut self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM movements WHERE id = ?1", params![id])?;
        tracing::info!(id, removed, "deleted movement");
        Ok(removed > 0)
    }
}
