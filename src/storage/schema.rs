use std::fmt;

use super::error::StorageError;
use super::record::{Record, Value};
use super::Result;

/// Declared type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

impl ColumnType {
    /// Parses a declared type name, case-insensitively.
    pub fn parse(s: &str) -> Option<ColumnType> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INT" => Some(ColumnType::Int),
            "FLOAT" => Some(ColumnType::Float),
            "STRING" => Some(ColumnType::Text),
            _ => None,
        }
    }

    /// Whether a runtime value carries this declared type.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ColumnType::Int, Value::Int(_)) => true,
            (ColumnType::Float, Value::Float(_)) => true,
            (ColumnType::Text, Value::Text(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "INT",
            ColumnType::Float => "FLOAT",
            ColumnType::Text => "STRING",
        };
        f.write_str(name)
    }
}

/// A named, typed column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: &str, ty: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// Renders a column list as the meta file's `name:TYPE` pairs.
pub fn columns_to_line(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| format!("{}:{}", c.name, c.ty))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the meta file's column list.
///
/// Names and types are trimmed; tokens without a colon or with an
/// unrecognized type name are skipped.
pub fn columns_from_line(line: &str) -> Vec<Column> {
    let mut columns = Vec::new();

    for token in line.split(',') {
        let (name, ty) = match token.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };

        if let Some(ty) = ColumnType::parse(ty) {
            columns.push(Column {
                name: name.trim().to_string(),
                ty,
            });
        }
    }

    columns
}

/// Checks a record against a declared column list.
///
/// An empty column list accepts any record. Otherwise the record must
/// carry exactly one field per column, lead with an integer key, and
/// match every declared type.
pub fn validate_record(columns: &[Column], record: &Record) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }

    if record.values.len() != columns.len() {
        return Err(StorageError::SchemaMismatch(format!(
            "expected {} fields, got {}",
            columns.len(),
            record.values.len()
        )));
    }

    if record.primary_key().is_none() {
        return Err(StorageError::NonIntegerKey);
    }

    for (column, value) in columns.iter().zip(&record.values) {
        if !column.ty.matches(value) {
            return Err(StorageError::SchemaMismatch(format!(
                "column {} expects {}",
                column.name, column.ty
            )));
        }
    }

    Ok(())
}
