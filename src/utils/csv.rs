use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::category::{Category, MovementType};
use crate::models::movement::Movement;

#[derive(Debug, Serialize, Deserialize)]
struct CsvMovement {
    #[serde(default)]
    id: Option<i64>,
    date: NaiveDate,
    amount: Decimal,
    description: String,
    #[serde(rename = "type")]
    movement_type: MovementType,
    category: Category,
    #[serde(default)]
    created_at: Option<NaiveDateTime>,
    #[serde(default)]
    updated_at: Option<NaiveDateTime>,
}

impl From<&Movement> for CsvMovement {
    fn from(movement: &Movement) -> Self {
        CsvMovement {
            id: Some(movement.id),
            date: movement.date,
            amount: movement.amount,
            description: movement.description.clone(),
            movement_type: movement.movement_type,
            category: movement.category,
            created_at: Some(movement.created_at),
            updated_at: Some(movement.updated_at),
        }
    }
}

pub fn write_movements<W: Write>(writer: W, movements: &[Movement]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for movement in movements {
        wtr.serialize(CsvMovement::from(movement))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_movements_to_csv<P: AsRef<Path>>(path: P, movements: &[Movement]) -> Result<()> {
    let file = File::create(path)?;
    write_movements(file, movements)
}

/// Reads movements as new records (id 0); stored ids and timestamps in the
/// file are ignored. Rows that fail to parse are skipped with a warning.
pub fn read_movements<R: Read>(reader: R) -> Result<Vec<Movement>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut movements = Vec::new();
    for (index, result) in rdr.deserialize::<CsvMovement>().enumerate() {
        match result {
            Ok(row) => {
                movements.push(Movement::new(
                    row.amount,
                    row.description,
                    row.date,
                    row.movement_type,
                    row.category,
                ));
            }
            Err(e) => {
                tracing::warn!(line = index + 2, error = %e, "skipping malformed csv row");
                continue;
            }
        }
    }

    Ok(movements)
}

pub fn read_movements_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Movement>> {
    let file = File::open(path)?;
    read_movements(file)
}
