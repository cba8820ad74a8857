//! Tabular output for list-like commands.

use std::io::Write;

use serde_json::{Map, Value};

use crate::Result;

#[derive(Clone, Debug, Default)]
pub enum Format {
    CSV,
    JSON,
    #[default]
    PIPE,
}

impl From<&Format> for u8 {
    fn from(f: &Format) -> Self {
        match f {
            Format::CSV => b',',
            Format::PIPE => b'|',
            Format::JSON => 0,
        }
    }
}

/// One output row.
pub struct DisplayBody {
    pub columns: Vec<Column>,
}

impl DisplayBody {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }
}

pub struct Column {
    pub name: String,
    pub value: String,
}

impl Column {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Headers are taken from the first row. JSON output is one object per line.
pub fn print<W: Write, D: Into<DisplayBody>>(
    w: &mut W,
    data: Vec<D>,
    no_headers: bool,
    format: &Format,
) -> Result<()> {
    let rows: Vec<DisplayBody> = data.into_iter().map(Into::into).collect();
    if rows.is_empty() {
        return Ok(());
    }
    match format {
        Format::JSON => {
            for row in rows {
                let object: Map<String, Value> = row
                    .columns
                    .into_iter()
                    .map(|column| (column.name, Value::String(column.value)))
                    .collect();
                writeln!(w, "{}", serde_json::to_string(&object)?)?;
            }
        }
        _ => {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(format.into())
                .from_writer(w);
            if !no_headers {
                wtr.write_record(rows[0].columns.iter().map(|c| c.name.as_str()))?;
            }
            for row in rows {
                wtr.write_record(row.columns.iter().map(|c| c.value.as_str()))?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

/// String rendering of a JSON field for a table cell. Missing and null fields
/// are empty, strings are printed without quotes.
pub fn field(value: &Value, name: &str) -> String {
    match value.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
