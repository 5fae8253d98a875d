use std::io::Write;
use std::path::Path;

use anyhow::Context;
use beeline_sdk::{
    CodecRegistry, Connection, ContentMetadata, GatewayConfig, LogicalKind, ReadOptions,
    StructuredValue, Table, WriteRequest,
};
use colored::Colorize;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let connection = || connect(cli.gateway.as_deref(), cli.config.as_deref());
    match cli.command {
        Command::Get(args) => cmd_get(&connection()?, args).await,
        Command::Put(args) => cmd_put(&connection()?, args).await,
        Command::Stamp(args) => cmd_stamp(&connection()?, args).await,
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn connect(gateway: Option<&str>, config: Option<&Path>) -> anyhow::Result<Connection> {
    let config = match (gateway, config) {
        (Some(url), _) => GatewayConfig::with_url(url),
        (None, Some(path)) => GatewayConfig::load(path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => GatewayConfig::default(),
    };
    tracing::debug!(gateway = %config.gateway_url, "connecting");
    Ok(Connection::from_config(&config)?)
}

async fn cmd_get(connection: &Connection, args: GetArgs) -> anyhow::Result<()> {
    let value = if args.resolve {
        connection.read_resolved(&args.hash).await?
    } else {
        let options = ReadOptions {
            kind: args.kind,
            verify: args.verify,
        };
        connection.read_file(&args.hash, options).await?
    };

    match args.out {
        Some(path) => {
            let bytes = output_bytes(connection.codecs(), &value)?;
            std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            eprintln!(
                "{} Wrote {} ({} bytes) to {}",
                "✓".green().bold(),
                value.type_name().cyan(),
                bytes.len(),
                path.display().to_string().bold()
            );
        }
        None => match &value {
            StructuredValue::Bytes(bytes) => std::io::stdout().write_all(bytes)?,
            StructuredValue::Json(doc) => println!("{}", serde_json::to_string_pretty(doc)?),
            StructuredValue::Table(table) => print!("{}", render_table(table)),
        },
    }
    Ok(())
}

async fn cmd_put(connection: &Connection, args: PutArgs) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(&args.path).with_context(|| format!("reading {}", args.path.display()))?;
    let (request, kind) = prepare_upload(connection.codecs(), &args, bytes)?;

    let hash = connection.write_file(request).await?;
    println!("{} Uploaded as {}", "✓".green().bold(), kind.name().cyan());
    println!("  Hash: {}", hash.yellow());
    Ok(())
}

async fn cmd_stamp(connection: &Connection, args: StampArgs) -> anyhow::Result<()> {
    let batch_id = connection.create_postage_batch(args.amount, args.depth).await?;
    println!("{} Postage batch created", "✓".green().bold());
    println!("  Batch: {}", batch_id.yellow());
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let metadata = ContentMetadata::new(args.content_type, args.file_name);
    let kind = metadata.resolve();
    println!("{} {}", "Kind:".bold(), kind.name().cyan());
    println!("  MIME type: {}", kind.mime_type());
    println!("  Default file name: {}", kind.default_file_name());
    Ok(())
}

/// Build the upload for a local file and the kind it is labelled as.
///
/// The file's own bytes go up unchanged when `--as` is absent, names the
/// kind its suffix implies, or asks for raw bytes. Only a conversion to a
/// different kind decodes the file and re-encodes it.
fn prepare_upload(
    codecs: &CodecRegistry,
    args: &PutArgs,
    bytes: Vec<u8>,
) -> anyhow::Result<(WriteRequest, LogicalKind)> {
    let suffix_kind = args
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(LogicalKind::from_file_name)
        .unwrap_or(LogicalKind::Raw);
    let kind = args.kind.unwrap_or(suffix_kind);

    let mut request = if kind == suffix_kind || kind == LogicalKind::Raw {
        WriteRequest::new(bytes)
            .as_kind(LogicalKind::Raw)
            .with_mime_type(kind.mime_type())
            .with_file_name(kind.default_file_name())
    } else {
        let source = if suffix_kind == LogicalKind::Raw { kind } else { suffix_kind };
        let value = codecs
            .decode(source, &bytes)
            .with_context(|| format!("parsing {} as {}", args.path.display(), source.name()))?;
        WriteRequest::new(value).as_kind(kind)
    };

    if let Some(name) = &args.name {
        request.file_name = Some(name.clone());
    }
    if let Some(mime) = &args.mime {
        request.mime_type = Some(mime.clone());
    }
    request.batch_id = args.batch_id.clone();
    Ok((request, kind))
}

/// Bytes written by `get --out`: tables as CSV, JSON pretty-printed.
fn output_bytes(codecs: &CodecRegistry, value: &StructuredValue) -> anyhow::Result<Vec<u8>> {
    Ok(match value {
        StructuredValue::Bytes(bytes) => bytes.clone(),
        StructuredValue::Json(doc) => serde_json::to_vec_pretty(doc)?,
        StructuredValue::Table(_) => codecs.encode(LogicalKind::Csv, value)?,
    })
}

fn render_table(table: &Table) -> String {
    let mut out = table
        .columns()
        .iter()
        .map(|c| c.bold().to_string())
        .collect::<Vec<_>>()
        .join("\t");
    out.push('\n');
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use beeline_sdk::Payload;
    use serde_json::json;

    fn grid() -> Table {
        Table::from_rows(["a", "b"], [[1, 2], [3, 4]]).unwrap()
    }

    fn put_args(path: &str, kind: Option<LogicalKind>) -> PutArgs {
        PutArgs {
            path: path.into(),
            kind,
            name: None,
            batch_id: None,
            mime: None,
        }
    }

    #[test]
    fn upload_keeps_file_bytes() {
        let codecs = CodecRegistry::linked();
        let body = b"sku,price\n007,1.50\n".to_vec();

        let (request, kind) =
            prepare_upload(&codecs, &put_args("prices.csv", None), body.clone()).unwrap();
        assert_eq!(kind, LogicalKind::Csv);
        assert_eq!(request.payload, Payload::Bytes(body.clone()));
        assert_eq!(request.effective_mime_type(), "text/csv");
        assert_eq!(request.effective_file_name(), "file.csv");

        let (request, kind) =
            prepare_upload(&codecs, &put_args("prices.csv", Some(LogicalKind::Raw)), body.clone())
                .unwrap();
        assert_eq!(kind, LogicalKind::Raw);
        assert_eq!(request.payload, Payload::Bytes(body));
        assert_eq!(request.effective_mime_type(), "application/octet-stream");
    }

    #[test]
    fn conversion_decodes_by_suffix() {
        let codecs = CodecRegistry::linked();
        let (request, kind) = prepare_upload(
            &codecs,
            &put_args("data.csv", Some(LogicalKind::Columnar)),
            b"a,b\n1,2\n3,4\n".to_vec(),
        )
        .unwrap();
        assert_eq!(kind, LogicalKind::Columnar);
        assert_eq!(request.payload, Payload::Table(grid()));
        assert_eq!(request.effective_mime_type(), "application/vnd.apache.parquet");

        let (request, _) = prepare_upload(
            &codecs,
            &put_args("notes.txt", Some(LogicalKind::Json)),
            br#"{"k":1}"#.to_vec(),
        )
        .unwrap();
        assert_eq!(request.payload, Payload::Json(json!({"k": 1})));
    }

    #[test]
    fn conversion_failure_names_file() {
        let codecs = CodecRegistry::linked();
        let args = put_args("bad.json", Some(LogicalKind::Csv));
        let err = prepare_upload(&codecs, &args, b"{".to_vec()).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn overrides_apply_to_verbatim_upload() {
        let codecs = CodecRegistry::linked();
        let mut args = put_args("doc.json", None);
        args.name = Some("report.json".into());
        args.mime = Some("application/ld+json".into());
        args.batch_id = Some("ab".repeat(32));
        let (request, _) = prepare_upload(&codecs, &args, b"{}".to_vec()).unwrap();
        assert_eq!(request.effective_file_name(), "report.json");
        assert_eq!(request.effective_mime_type(), "application/ld+json");
        assert_eq!(request.effective_batch_id(), "ab".repeat(32));
    }

    #[tokio::test]
    async fn put_uploads_file_unchanged() {
        let gateway = std::sync::Arc::new(beeline_sdk::MemoryGateway::new());
        let connection = Connection::new(gateway.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, "sku,price\n007,1.50\n").unwrap();

        cmd_put(&connection, PutArgs { path, ..put_args("", None) })
            .await
            .unwrap();
        let upload = gateway.last_upload().unwrap();
        assert_eq!(upload.body, b"sku,price\n007,1.50\n");
        assert_eq!(upload.mime_type, "text/csv");
    }

    #[test]
    fn table_output_is_csv() {
        let codecs = CodecRegistry::linked();
        let bytes = output_bytes(&codecs, &StructuredValue::Table(grid())).unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n3,4\n");
    }

    #[test]
    fn render_table_rows() {
        colored::control::set_override(false);
        assert_eq!(render_table(&grid()), "a\tb\n1\t2\n3\t4\n");
    }

    #[test]
    fn explicit_gateway_wins() {
        let connection = connect(Some("http://127.0.0.1:1633"), None).unwrap();
        assert!(format!("{connection:?}").contains("Connection"));
    }

    #[test]
    fn config_file_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beeline.toml");
        std::fs::write(&path, "gateway_url = \"http://10.1.1.1:1633\"\n").unwrap();
        assert!(connect(None, Some(&path)).is_ok());
        assert!(connect(None, Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[tokio::test]
    async fn put_then_get_through_memory_gateway() {
        let gateway = std::sync::Arc::new(beeline_sdk::MemoryGateway::new());
        let connection = Connection::new(gateway.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        std::fs::write(&path, "a,b\n1,2\n3,4\n").unwrap();

        cmd_put(
            &connection,
            PutArgs {
                path,
                kind: Some(LogicalKind::Columnar),
                name: None,
                batch_id: None,
                mime: None,
            },
        )
        .await
        .unwrap();
        let upload = gateway.last_upload().unwrap();
        assert_eq!(upload.file_name, "file.parquet");

        let hash = beeline_sdk::MemoryGateway::address_of(&upload.body);
        let out = dir.path().join("out.csv");
        cmd_get(
            &connection,
            GetArgs {
                hash,
                kind: None,
                verify: false,
                resolve: true,
                out: Some(out.clone()),
            },
        )
        .await
        .unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"a,b\n1,2\n3,4\n");
    }
}
