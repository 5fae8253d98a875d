use std::path::PathBuf;

use beeline_sdk::LogicalKind;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "beeline",
    about = "Beeline: typed reads and writes against a Swarm gateway",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Gateway URL; overrides --config and BEE_GATEWAY_URL
    #[arg(long, global = true)]
    pub gateway: Option<String>,

    /// TOML file with a `gateway_url` entry
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download an object, optionally decoding it
    Get(GetArgs),
    /// Upload a local file
    Put(PutArgs),
    /// Buy a postage batch
    Stamp(StampArgs),
    /// Show which kind a content type and file name resolve to
    Resolve(ResolveArgs),
}

#[derive(Args)]
pub struct GetArgs {
    pub hash: String,
    /// Decode as this kind (bytes, json, csv, parquet)
    #[arg(long = "as")]
    pub kind: Option<LogicalKind>,
    /// Refuse content whose metadata resolves to a different kind
    #[arg(long, requires = "kind")]
    pub verify: bool,
    /// Decode as whatever kind the metadata resolves to
    #[arg(long, conflicts_with = "kind")]
    pub resolve: bool,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct PutArgs {
    pub path: PathBuf,
    /// Upload as this kind instead of the one the file's contents imply
    #[arg(long = "as")]
    pub kind: Option<LogicalKind>,
    /// File name reported to the gateway
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub batch_id: Option<String>,
    /// MIME type reported to the gateway
    #[arg(long)]
    pub mime: Option<String>,
}

#[derive(Args)]
pub struct StampArgs {
    pub amount: u64,
    pub depth: u8,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[arg(long)]
    pub content_type: Option<String>,
    #[arg(long)]
    pub file_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get() {
        let cli = Cli::try_parse_from(["beeline", "get", "abc"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.hash, "abc");
            assert!(args.kind.is_none());
            assert!(!args.verify);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_get_verified_json() {
        let cli = Cli::try_parse_from(["beeline", "get", "abc", "--as", "json", "--verify"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.kind, Some(LogicalKind::Json));
            assert!(args.verify);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn verify_needs_kind() {
        assert!(Cli::try_parse_from(["beeline", "get", "abc", "--verify"]).is_err());
    }

    #[test]
    fn resolve_conflicts_with_kind() {
        assert!(Cli::try_parse_from(["beeline", "get", "abc", "--as", "csv", "--resolve"]).is_err());
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["beeline", "get", "abc", "--as", "xml"]).is_err());
    }

    #[test]
    fn parse_put() {
        let cli = Cli::try_parse_from([
            "beeline", "put", "data.csv", "--as", "parquet", "--name", "d.parquet", "--batch-id", "ff",
        ])
        .unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("data.csv"));
            assert_eq!(args.kind, Some(LogicalKind::Columnar));
            assert_eq!(args.name.as_deref(), Some("d.parquet"));
            assert_eq!(args.batch_id.as_deref(), Some("ff"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_stamp() {
        let cli = Cli::try_parse_from(["beeline", "stamp", "10000000", "20"]).unwrap();
        if let Command::Stamp(args) = cli.command {
            assert_eq!(args.amount, 10_000_000);
            assert_eq!(args.depth, 20);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_resolve() {
        let cli = Cli::try_parse_from(["beeline", "resolve", "--file-name", "x.csv"]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert_eq!(args.file_name.as_deref(), Some("x.csv"));
            assert!(args.content_type.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["beeline", "--verbose", "--gateway", "http://bee:1633", "stamp", "1", "17"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.gateway.as_deref(), Some("http://bee:1633"));
    }
}
