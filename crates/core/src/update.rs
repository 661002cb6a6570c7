//! Validation of the free-form update payload accepted by `POST /fix`.
//!
//! The payload is `{ "table": ..., "name": ..., <column>: <value>, ... }`.
//! Every key other than `table` and `name` is a column change. Parsing is
//! done up front so that a rejected payload never reaches the database.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::hero::HeroTable;

/// Body key naming the table to update.
pub const TABLE_KEY: &str = "table";

/// Body key carrying the alias of the hero to update.
pub const NAME_KEY: &str = "name";

/// A typed value for one column change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A nullable text column.
    Text(Option<String>),
    /// An integer rating.
    Int(i32),
}

/// One column change. `column` always comes from the table's allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub column: &'static str,
    pub value: FieldValue,
}

/// A validated update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroUpdate {
    pub table: HeroTable,
    /// Alias of the hero to update, matched case-insensitively.
    pub alias: String,
    /// Column changes, ordered by column name.
    pub changes: Vec<FieldChange>,
}

impl HeroUpdate {
    /// Parse and validate an update body.
    ///
    /// Fails with [`CoreError::Validation`] when `table` or `name` is missing
    /// or blank, when there is no column change, when the table is unknown,
    /// when a column is not updatable on that table, or when a value has the
    /// wrong type for its column.
    pub fn from_json(body: &Value) -> Result<Self, CoreError> {
        let object = body
            .as_object()
            .ok_or_else(|| CoreError::Validation("update body must be a JSON object".into()))?;

        let table = required_string(object, TABLE_KEY)?;
        let alias = required_string(object, NAME_KEY)?;

        let requested: Vec<(&String, &Value)> = object
            .iter()
            .filter(|(key, _)| key.as_str() != TABLE_KEY && key.as_str() != NAME_KEY)
            .collect();
        if requested.is_empty() {
            return Err(CoreError::Validation(
                "at least one column to update is required".into(),
            ));
        }

        let table = HeroTable::from_str(table)?;

        let mut changes = requested
            .into_iter()
            .map(|(key, value)| parse_change(table, key, value))
            .collect::<Result<Vec<_>, _>>()?;
        changes.sort_by_key(|change| change.column);

        Ok(Self {
            table,
            alias: alias.to_string(),
            changes,
        })
    }
}

fn required_string<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a str, CoreError> {
    match object.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(CoreError::Validation(format!("{key} is required"))),
    }
}

fn parse_change(table: HeroTable, key: &str, value: &Value) -> Result<FieldChange, CoreError> {
    let column = table
        .updatable_columns()
        .iter()
        .copied()
        .find(|column| *column == key)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Column '{key}' cannot be updated on table '{table}'. Must be one of: {}",
                table.updatable_columns().join(", ")
            ))
        })?;

    let value = match table {
        HeroTable::Hero => match value {
            Value::String(s) => FieldValue::Text(Some(s.clone())),
            Value::Null => FieldValue::Text(None),
            _ => return Err(type_error(key, "a string or null")),
        },
        HeroTable::Stats => {
            let n = value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| type_error(key, "a 32-bit integer"))?;
            FieldValue::Int(n)
        }
        HeroTable::Affiliation => match value {
            Value::String(s) => FieldValue::Text(Some(s.clone())),
            _ => return Err(type_error(key, "a string")),
        },
    };

    Ok(FieldChange { column, value })
}

fn type_error(key: &str, expected: &str) -> CoreError {
    CoreError::Validation(format!("Value for '{key}' must be {expected}"))
}
