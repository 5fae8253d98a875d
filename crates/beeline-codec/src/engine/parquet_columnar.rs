use std::sync::Arc;

use beeline_types::{Cell, ColumnType, Table};
use bytes::Bytes;
use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{BoolType, ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::record::Field;
use parquet::schema::types::Type;

use super::{Engine, PARQUET_ENGINE};
use crate::error::CodecResult;

/// Parquet through the crate's record and column-writer APIs, without
/// Arrow.
///
/// Every column is written `OPTIONAL` in a single row group. Nested or
/// logical types the cell model does not cover decode as display text.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParquetEngine;

impl Engine<Table> for ParquetEngine {
    fn name(&self) -> &'static str {
        PARQUET_ENGINE
    }

    fn encode(&self, table: &Table) -> CodecResult<Vec<u8>> {
        let types: Vec<ColumnType> = (0..table.width()).map(|i| table.column_type(i)).collect();
        let fields = table
            .columns()
            .iter()
            .zip(&types)
            .map(|(name, ty)| primitive_type(name, *ty).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        let schema = Arc::new(Type::group_type_builder("schema").with_fields(fields).build()?);
        let props = Arc::new(WriterProperties::builder().build());

        let mut buf = Vec::new();
        let mut writer = SerializedFileWriter::new(&mut buf, schema, props)?;
        let mut row_group = writer.next_row_group()?;
        let mut index = 0;
        while let Some(mut column) = row_group.next_column()? {
            let cells = || table.column(index);
            let defs: Vec<i16> = cells().map(|c| i16::from(!c.is_null())).collect();
            match types[index] {
                ColumnType::Bool => {
                    let values: Vec<bool> = cells()
                        .filter_map(|c| match c {
                            Cell::Bool(v) => Some(*v),
                            _ => None,
                        })
                        .collect();
                    column.typed::<BoolType>().write_batch(&values, Some(defs.as_slice()), None)?;
                }
                ColumnType::Int => {
                    let values: Vec<i64> = cells()
                        .filter_map(|c| match c {
                            Cell::Int(v) => Some(*v),
                            _ => None,
                        })
                        .collect();
                    column.typed::<Int64Type>().write_batch(&values, Some(defs.as_slice()), None)?;
                }
                ColumnType::Float => {
                    let values: Vec<f64> = cells().filter_map(Cell::as_f64).collect();
                    column.typed::<DoubleType>().write_batch(&values, Some(defs.as_slice()), None)?;
                }
                ColumnType::Text => {
                    let values: Vec<ByteArray> = cells()
                        .filter(|c| !c.is_null())
                        .map(|c| ByteArray::from(c.to_string().into_bytes()))
                        .collect();
                    column.typed::<ByteArrayType>().write_batch(&values, Some(defs.as_slice()), None)?;
                }
            }
            column.close()?;
            index += 1;
        }
        row_group.close()?;
        writer.close()?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Table> {
        let reader = SerializedFileReader::new(Bytes::copy_from_slice(bytes))?;
        let columns: Vec<String> = reader
            .metadata()
            .file_metadata()
            .schema()
            .get_fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();

        let mut rows = Vec::new();
        for row in reader.get_row_iter(None)? {
            let row = row?;
            rows.push(row.get_column_iter().map(|(_, field)| field_cell(field)).collect());
        }
        Ok(Table::new(columns, rows)?)
    }
}

fn primitive_type(name: &str, ty: ColumnType) -> parquet::errors::Result<Type> {
    let builder = match ty {
        ColumnType::Bool => Type::primitive_type_builder(name, PhysicalType::BOOLEAN),
        ColumnType::Int => Type::primitive_type_builder(name, PhysicalType::INT64),
        ColumnType::Float => Type::primitive_type_builder(name, PhysicalType::DOUBLE),
        ColumnType::Text => Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
            .with_converted_type(ConvertedType::UTF8),
    };
    builder.with_repetition(Repetition::OPTIONAL).build()
}

fn field_cell(field: &Field) -> Cell {
    match field {
        Field::Null => Cell::Null,
        Field::Bool(v) => Cell::Bool(*v),
        Field::Byte(v) => Cell::Int((*v).into()),
        Field::Short(v) => Cell::Int((*v).into()),
        Field::Int(v) => Cell::Int((*v).into()),
        Field::Long(v) => Cell::Int(*v),
        Field::UByte(v) => Cell::Int((*v).into()),
        Field::UShort(v) => Cell::Int((*v).into()),
        Field::UInt(v) => Cell::Int((*v).into()),
        Field::ULong(v) => i64::try_from(*v).map_or(Cell::Float(*v as f64), Cell::Int),
        Field::Float(v) => Cell::Float((*v).into()),
        Field::Double(v) => Cell::Float(*v),
        Field::Str(v) => Cell::Text(v.clone()),
        other => Cell::Text(other.to_string()),
    }
}
