use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// A single table cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn cell_type(&self) -> Option<ColumnType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ColumnType::Bool),
            Self::Int(_) => Some(ColumnType::Int),
            Self::Float(_) => Some(ColumnType::Float),
            Self::Text(_) => Some(ColumnType::Text),
        }
    }
}

/// Floats always keep a fractional part (`2.0`), nulls render empty.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Storage type of a column, derived from its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Bool,
    Int,
    Float,
    Text,
}

impl ColumnType {
    fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Int, Self::Float) | (Self::Float, Self::Int) => Self::Float,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A rectangular dataset with named columns and ordered rows.
///
/// Rows always have exactly one cell per column and column names are unique;
/// [`Table::new`] enforces both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table, checking shape and column names.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> TypeResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TypeError::DuplicateColumn(name.clone()));
            }
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TypeError::RaggedRow {
                    row: index,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Convenience constructor from anything cell-like.
    pub fn from_rows<C, R, V>(columns: impl IntoIterator<Item = C>, rows: R) -> TypeResult<Self>
    where
        C: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::new(columns, rows)
    }

    /// Build a table column by column.
    pub fn from_columns(columns: Vec<(String, Vec<Cell>)>) -> TypeResult<Self> {
        let height = columns.first().map_or(0, |(_, values)| values.len());
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != height) {
            return Err(TypeError::UnevenColumn {
                column: name.clone(),
                expected: height,
                actual: values.len(),
            });
        }
        let mut rows = vec![Vec::with_capacity(columns.len()); height];
        let mut names = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            names.push(name);
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
        }
        Self::new(names, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate one column's cells top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// The narrowest type covering every non-null cell of a column.
    ///
    /// Integers and floats widen to `Float`; any other mix, or a column with
    /// no values at all, is `Text`.
    pub fn column_type(&self, index: usize) -> ColumnType {
        self.column(index)
            .filter_map(Cell::cell_type)
            .reduce(ColumnType::widen)
            .unwrap_or(ColumnType::Text)
    }

    /// Column types for the whole table.
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        (0..self.width())
            .map(|i| (self.columns[i].as_str(), self.column_type(i)))
            .collect()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Table {
        Table::from_rows(["a", "b", "c"], [[1, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap()
    }

    #[test]
    fn shape_accessors() {
        let t = grid();
        assert_eq!(t.width(), 3);
        assert_eq!(t.height(), 3);
        assert_eq!(t.columns(), ["a", "b", "c"]);
        assert_eq!(t.column_index("c"), Some(2));
        assert_eq!(t.column(1).cloned().collect::<Vec<_>>(), vec![Cell::Int(2), Cell::Int(5), Cell::Int(8)]);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Int(1), Cell::Int(2)], vec![Cell::Int(3)]],
        )
        .unwrap_err();
        assert_eq!(err, TypeError::RaggedRow { row: 1, expected: 2, actual: 1 });
    }

    #[test]
    fn duplicate_columns_rejected() {
        let err = Table::new(vec!["a".into(), "a".into()], vec![]).unwrap_err();
        assert_eq!(err, TypeError::DuplicateColumn("a".into()));
    }

    #[test]
    fn column_type_widening() {
        let t = Table::new(
            vec!["i".into(), "f".into(), "mixed".into(), "empty".into(), "flag".into()],
            vec![
                vec![Cell::Int(1), Cell::Int(1), Cell::Int(1), Cell::Null, Cell::Bool(true)],
                vec![Cell::Null, Cell::Float(0.5), Cell::Text("x".into()), Cell::Null, Cell::Null],
            ],
        )
        .unwrap();
        assert_eq!(t.column_type(0), ColumnType::Int);
        assert_eq!(t.column_type(1), ColumnType::Float);
        assert_eq!(t.column_type(2), ColumnType::Text);
        assert_eq!(t.column_type(3), ColumnType::Text);
        assert_eq!(t.column_type(4), ColumnType::Bool);
    }

    #[test]
    fn from_columns_transposes() {
        let t = Table::from_columns(vec![
            ("x".into(), vec![Cell::Int(1), Cell::Int(2)]),
            ("y".into(), vec![Cell::from("p"), Cell::from("q")]),
        ])
        .unwrap();
        assert_eq!(t.rows()[1], vec![Cell::Int(2), Cell::Text("q".into())]);
    }

    #[test]
    fn from_columns_uneven() {
        let err = Table::from_columns(vec![
            ("x".into(), vec![Cell::Int(1), Cell::Int(2)]),
            ("y".into(), vec![Cell::Int(1)]),
        ])
        .unwrap_err();
        assert!(matches!(err, TypeError::UnevenColumn { .. }));
    }

    #[test]
    fn cell_display() {
        assert_eq!(Cell::Float(2.0).to_string(), "2.0");
        assert_eq!(Cell::Float(0.25).to_string(), "0.25");
        assert_eq!(Cell::Int(-3).to_string(), "-3");
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::from(Some(true)).to_string(), "true");
        assert_eq!(Cell::from(None::<i64>), Cell::Null);
    }
}
