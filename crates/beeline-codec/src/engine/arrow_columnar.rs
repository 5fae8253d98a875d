use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{
    DataType, Field, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::{RecordBatch, RecordBatchOptions, RecordBatchReader};
use arrow::util::display::array_value_to_string;
use beeline_types::{Cell, ColumnType, Table};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use super::{Engine, ARROW_ENGINE};
use crate::error::CodecResult;

/// Parquet through Arrow record batches.
///
/// The whole table is written as one record batch. Reading accepts any flat
/// parquet file; column types outside the cell model decode as their Arrow
/// display text.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrowEngine;

impl Engine<Table> for ArrowEngine {
    fn name(&self) -> &'static str {
        ARROW_ENGINE
    }

    fn encode(&self, table: &Table) -> CodecResult<Vec<u8>> {
        let schema = table.schema();
        let fields: Vec<Field> = schema
            .iter()
            .map(|(name, ty)| Field::new(*name, data_type(*ty), true))
            .collect();
        let arrays: Vec<ArrayRef> = schema
            .iter()
            .enumerate()
            .map(|(index, (_, ty))| column_array(table, index, *ty))
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(table.height()));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;

        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Table> {
        let reader =
            ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(bytes))?.build()?;
        let columns: Vec<String> = reader
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        let mut rows = Vec::new();
        for batch in reader {
            let batch = batch?;
            for row in 0..batch.num_rows() {
                let cells = batch
                    .columns()
                    .iter()
                    .map(|array| cell_at(array, row))
                    .collect::<CodecResult<Vec<_>>>()?;
                rows.push(cells);
            }
        }
        Ok(Table::new(columns, rows)?)
    }
}

fn data_type(ty: ColumnType) -> DataType {
    match ty {
        ColumnType::Bool => DataType::Boolean,
        ColumnType::Int => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Text => DataType::Utf8,
    }
}

fn column_array(table: &Table, index: usize, ty: ColumnType) -> ArrayRef {
    let cells = table.column(index);
    match ty {
        ColumnType::Bool => Arc::new(
            cells
                .map(|c| match c {
                    Cell::Bool(v) => Some(*v),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        ColumnType::Int => Arc::new(
            cells
                .map(|c| match c {
                    Cell::Int(v) => Some(*v),
                    _ => None,
                })
                .collect::<Int64Array>(),
        ),
        ColumnType::Float => Arc::new(cells.map(Cell::as_f64).collect::<Float64Array>()),
        ColumnType::Text => Arc::new(
            cells
                .map(|c| (!c.is_null()).then(|| c.to_string()))
                .collect::<StringArray>(),
        ),
    }
}

fn cell_at(array: &ArrayRef, row: usize) -> CodecResult<Cell> {
    if array.is_null(row) {
        return Ok(Cell::Null);
    }
    let cell = match array.data_type() {
        DataType::Boolean => Cell::Bool(array.as_boolean().value(row)),
        DataType::Int8 => Cell::Int(array.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => Cell::Int(array.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => Cell::Int(array.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => Cell::Int(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Cell::Int(array.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => Cell::Int(array.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => Cell::Int(array.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = array.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(Cell::Float(v as f64), Cell::Int)
        }
        DataType::Float32 => Cell::Float(array.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => Cell::Float(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => Cell::Text(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(array.as_string::<i64>().value(row).to_string()),
        _ => Cell::Text(array_value_to_string(array.as_ref(), row)?),
    };
    Ok(cell)
}
