use std::fmt;
use std::sync::Arc;

use beeline_types::{LogicalKind, StructuredValue, Table};
use serde_json::Value;

use crate::engine::delimited::CsvEngine;
use crate::engine::json::JsonEngine;
use crate::engine::parquet_columnar::ParquetEngine;
use crate::engine::{Engine, COLUMNAR_ENGINES, CSV_ENGINE, JSON_ENGINE};
use crate::error::{CodecError, CodecResult, Purpose};

type JsonHandle = Arc<dyn Engine<Value>>;
type TableHandle = Arc<dyn Engine<Table>>;

/// Encode/decode dispatch for every logical kind.
///
/// The set of engines is fixed when the registry is built. `Raw` needs no
/// engine; `Json` and `Csv` use at most one each; `Columnar` walks an ordered
/// list and uses the first registered engine for both directions.
#[derive(Clone)]
pub struct CodecRegistry {
    json: Option<JsonHandle>,
    csv: Option<TableHandle>,
    columnar: Vec<TableHandle>,
}

impl CodecRegistry {
    /// Registry with every engine compiled into this build.
    pub fn linked() -> Self {
        Self::builder().with_linked_engines().build()
    }

    /// Start from an empty registry.
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    /// Serialize `value` as `kind`.
    pub fn encode(&self, kind: LogicalKind, value: &StructuredValue) -> CodecResult<Vec<u8>> {
        match (kind, value) {
            (LogicalKind::Raw, StructuredValue::Bytes(bytes)) => Ok(bytes.clone()),
            (LogicalKind::Json, StructuredValue::Json(doc)) => {
                self.json_engine(Purpose::JsonEncoding)?.encode(doc)
            }
            (LogicalKind::Csv, StructuredValue::Table(table)) => {
                self.csv_engine(Purpose::TableEncoding)?.encode(table)
            }
            (LogicalKind::Columnar, StructuredValue::Table(table)) => {
                self.columnar_engine(Purpose::ColumnarEncoding)?.encode(table)
            }
            (kind, value) => Err(CodecError::UnsupportedValue {
                kind,
                value: value.type_name(),
            }),
        }
    }

    /// Parse `bytes` as `kind`.
    ///
    /// Malformed input fails with the engine's own parse error.
    pub fn decode(&self, kind: LogicalKind, bytes: &[u8]) -> CodecResult<StructuredValue> {
        match kind {
            LogicalKind::Raw => Ok(StructuredValue::Bytes(bytes.to_vec())),
            LogicalKind::Json => self
                .json_engine(Purpose::JsonDecoding)?
                .decode(bytes)
                .map(StructuredValue::Json),
            LogicalKind::Csv => self
                .csv_engine(Purpose::TableDecoding)?
                .decode(bytes)
                .map(StructuredValue::Table),
            LogicalKind::Columnar => self
                .columnar_engine(Purpose::ColumnarDecoding)?
                .decode(bytes)
                .map(StructuredValue::Table),
        }
    }

    /// The JSON engine, if one is registered.
    pub fn json_engine(&self, purpose: Purpose) -> CodecResult<&dyn Engine<Value>> {
        self.json
            .as_deref()
            .ok_or_else(|| CodecError::CapabilityUnavailable {
                capabilities: vec![JSON_ENGINE],
                purpose,
            })
    }

    /// The CSV engine, if one is registered.
    pub fn csv_engine(&self, purpose: Purpose) -> CodecResult<&dyn Engine<Table>> {
        self.csv
            .as_deref()
            .ok_or_else(|| CodecError::CapabilityUnavailable {
                capabilities: vec![CSV_ENGINE],
                purpose,
            })
    }

    /// The highest-priority columnar engine.
    pub fn columnar_engine(&self, purpose: Purpose) -> CodecResult<&dyn Engine<Table>> {
        match self.columnar.first() {
            Some(engine) => {
                tracing::debug!(engine = engine.name(), %purpose, "selected columnar engine");
                Ok(engine.as_ref())
            }
            None => Err(CodecError::CapabilityUnavailable {
                capabilities: COLUMNAR_ENGINES.to_vec(),
                purpose,
            }),
        }
    }

    /// Names of the registered engines per kind, in priority order.
    pub fn engines(&self) -> Vec<(LogicalKind, &'static str)> {
        let mut out = Vec::new();
        if let Some(json) = &self.json {
            out.push((LogicalKind::Json, json.name()));
        }
        if let Some(csv) = &self.csv {
            out.push((LogicalKind::Csv, csv.name()));
        }
        out.extend(self.columnar.iter().map(|e| (LogicalKind::Columnar, e.name())));
        out
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::linked()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columnar: Vec<&str> = self.columnar.iter().map(|e| e.name()).collect();
        f.debug_struct("CodecRegistry")
            .field("json", &self.json.as_ref().map(|e| e.name()))
            .field("csv", &self.csv.as_ref().map(|e| e.name()))
            .field("columnar", &columnar)
            .finish()
    }
}

/// Assembles a [`CodecRegistry`] from individual engines.
#[derive(Default)]
pub struct CodecRegistryBuilder {
    json: Option<JsonHandle>,
    csv: Option<TableHandle>,
    columnar: Vec<TableHandle>,
}

impl CodecRegistryBuilder {
    /// Register every engine compiled into this build, arrow before parquet.
    pub fn with_linked_engines(self) -> Self {
        let builder = self.json(JsonEngine).csv(CsvEngine);
        #[cfg(feature = "arrow")]
        let builder = builder.columnar(crate::engine::arrow_columnar::ArrowEngine);
        builder.columnar(ParquetEngine)
    }

    pub fn json(mut self, engine: impl Engine<Value> + 'static) -> Self {
        self.json = Some(Arc::new(engine));
        self
    }

    pub fn csv(mut self, engine: impl Engine<Table> + 'static) -> Self {
        self.csv = Some(Arc::new(engine));
        self
    }

    /// Append a columnar engine; earlier registrations take priority.
    pub fn columnar(mut self, engine: impl Engine<Table> + 'static) -> Self {
        self.columnar.push(Arc::new(engine));
        self
    }

    pub fn without_json(mut self) -> Self {
        self.json = None;
        self
    }

    pub fn without_csv(mut self) -> Self {
        self.csv = None;
        self
    }

    /// Drop a columnar engine by name.
    pub fn without_columnar(mut self, name: &str) -> Self {
        self.columnar.retain(|e| e.name() != name);
        self
    }

    pub fn build(self) -> CodecRegistry {
        let registry = CodecRegistry {
            json: self.json,
            csv: self.csv,
            columnar: self.columnar,
        };
        tracing::debug!(?registry, "codec registry built");
        registry
    }
}
