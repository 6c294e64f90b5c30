//! CSV import and export of transactions.
//!
//! The wire format is `Date (YYYY-MM-DD), Amount, Type (income|expense),
//! Category, Description`. Import validates every row independently and
//! collects per-row error messages instead of aborting the batch; rows
//! that pass are created through the same post-write hook sequence as
//! direct entry. Categories named in the file are created on demand; an
//! empty Category field imports the row without one.

use crate::{
    core::{alerts::TransactionHooks, category},
    entities::{transaction, user, TransactionKind},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Column headers shared by export and import.
pub const CSV_HEADERS: [&str; 5] = ["Date", "Amount", "Type", "Category", "Description"];

/// Outcome of one import batch: how many rows were created and which rows
/// were rejected, with a message per rejected row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Number of transactions created
    pub created: usize,
    /// One message per rejected row, tagged with the 1-based data row number
    pub errors: Vec<String>,
}

/// Serializes all of the user's transactions, newest first.
pub async fn export_transactions(db: &DatabaseConnection, user_id: i64) -> Result<String> {
    let transactions = crate::core::transaction::list_transactions(db, user_id).await?;

    let category_names: HashMap<i64, String> = category::list_categories(db, user_id)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADERS)?;
    for tx in &transactions {
        let category = tx
            .category_id
            .and_then(|id| category_names.get(&id))
            .map_or("", String::as_str);
        let date = tx.date.format("%Y-%m-%d").to_string();
        let amount = tx.amount.to_string();
        writer.write_record([
            date.as_str(),
            amount.as_str(),
            tx.kind.as_str(),
            category,
            tx.description.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Config {
        message: format!("CSV writer error: {e}"),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Imports a CSV batch for `owner`. One bad row never fails the batch; the
/// report carries the created count and every row-level error.
pub async fn import_transactions(
    db: &DatabaseConnection,
    hooks: &TransactionHooks,
    owner: &user::Model,
    data: &[u8],
) -> Result<ImportReport> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut report = ImportReport::default();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                report.errors.push(format!("row {row}: {e}"));
                continue;
            }
        };

        match import_row(db, hooks, owner, &record).await {
            Ok(()) => report.created += 1,
            Err(Error::Database(e)) => return Err(Error::Database(e)),
            Err(e) => report.errors.push(format!("row {row}: {e}")),
        }
    }

    info!(
        user = %owner.username,
        created = report.created,
        rejected = report.errors.len(),
        "CSV import finished"
    );
    Ok(report)
}

async fn import_row(
    db: &DatabaseConnection,
    hooks: &TransactionHooks,
    owner: &user::Model,
    record: &csv::StringRecord,
) -> Result<()> {
    if record.len() < 3 {
        return Err(Error::validation("expected Date, Amount, Type columns"));
    }

    let date = NaiveDate::parse_from_str(&record[0], "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("invalid date '{}'", &record[0])))?;

    let amount: Decimal = record[1]
        .parse()
        .map_err(|_| Error::validation(format!("invalid amount '{}'", &record[1])))?;
    if amount <= Decimal::ZERO || amount.round_dp(2) != amount {
        return Err(Error::validation(format!(
            "amount must be positive with at most two decimal places, got '{}'",
            &record[1]
        )));
    }

    let kind = TransactionKind::parse(&record[2])
        .ok_or_else(|| Error::validation(format!("unknown type '{}'", &record[2])))?;

    let category_id = match record.get(3).map(str::trim).filter(|c| !c.is_empty()) {
        Some(name) => Some(category::get_or_create_category(db, owner.id, name).await?.id),
        None => None,
    };

    let description = record.get(4).unwrap_or("").to_string();

    let model = transaction::ActiveModel {
        user_id: Set(owner.id),
        amount: Set(amount),
        date: Set(date),
        kind: Set(kind),
        category_id: Set(category_id),
        description: Set(description),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;

    hooks.after_write(db, owner, &created, true).await
}
