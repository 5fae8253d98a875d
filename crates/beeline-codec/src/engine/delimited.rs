use beeline_types::{Cell, Table};

use super::{Engine, CSV_ENGINE};
use crate::error::{CodecError, CodecResult};

/// Comma-separated text with a header row.
///
/// Records end in `\n`. On decode every column gets the narrowest type that
/// parses all of its non-empty fields: integer, then float, then boolean,
/// else text. Empty fields decode as nulls.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvEngine;

impl Engine<Table> for CsvEngine {
    fn name(&self) -> &'static str {
        CSV_ENGINE
    }

    fn encode(&self, table: &Table) -> CodecResult<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(Cell::to_string))?;
        }
        writer
            .into_inner()
            .map_err(|e| CodecError::Csv(csv::Error::from(e.into_error())))
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(CodecError::EmptyData);
        }

        let mut fields: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (column, field) in fields.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(fields)
            .map(|(name, values)| (name, infer_column(values)))
            .collect();
        Ok(Table::from_columns(columns)?)
    }
}

fn infer_column(values: Vec<String>) -> Vec<Cell> {
    let present = || values.iter().filter(|v| !v.is_empty());

    if present().all(|v| v.parse::<i64>().is_ok()) {
        return convert(values, |v| v.parse().ok().map(Cell::Int));
    }
    if present().all(|v| v.parse::<f64>().is_ok()) {
        return convert(values, |v| v.parse().ok().map(Cell::Float));
    }
    if present().all(|v| parse_bool(v).is_some()) {
        return convert(values, |v| parse_bool(v).map(Cell::Bool));
    }
    convert(values, |v| Some(Cell::Text(v.to_string())))
}

fn convert(values: Vec<String>, parse: impl Fn(&str) -> Option<Cell>) -> Vec<Cell> {
    values
        .iter()
        .map(|v| {
            if v.is_empty() {
                Cell::Null
            } else {
                parse(v).unwrap_or(Cell::Null)
            }
        })
        .collect()
}

fn parse_bool(v: &str) -> Option<bool> {
    match v {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
