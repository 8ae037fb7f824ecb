//! hm CLI tool
//!
//! Command-line interface for reading and writing hypermedia links with hm-core.
//!
//! ## Commands
//!
//! - `unpack <link>`: Print the identifier fields of a compact or web link as JSON
//! - `pack <type> <uid>`: Build a compact `hm://` link
//! - `web <link>`: Print the web URL of a link
//! - `normalize <link>`: Canonicalize a link against the configured gateway
//! - `with-version <link> <version>`: Pin a link to a version and block
//! - `groups <comments.json>`: Group a comment dump into reply chains
//! - `replies <comments.json> <target>`: Print the thread leading to a comment
//!
//! The gateway is taken from `--gateway`, then `HM_GATEWAY_URL`, then the `--config` TOML
//! file, then the public gateway.

use clap::{Parser, Subcommand};
use hm_core::{
    commands::{Op, OpResult},
    comments::HmComment,
    config::{normalize_gateway_url, GatewayConfigProvider, TomlConfigProvider, GATEWAY_URL_ENV},
    fragment::parse_fragment,
    hmid::{unpack_hm_id, EntityType, HmIdOptions, UnpackedHmId, HYPERMEDIA_PUBLIC_WEB_GATEWAY},
    HmError,
};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "hm")]
#[command(author, version, about = "A tool for reading and writing hypermedia links", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gateway origin, e.g. https://hyper.media
    #[arg(short, long, global = true)]
    gateway: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Persist --gateway into the --config file
    #[arg(long, global = true, requires_all = ["gateway", "config"])]
    save_gateway: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a compact or web link and print its fields
    Unpack { link: String },

    /// Build a compact link from its parts
    Pack {
        /// Entity type: d, comment or draft
        entity_type: String,
        uid: String,

        /// Path below the entity, e.g. guides/intro
        #[arg(short, long)]
        path: Option<String>,

        #[arg(long)]
        version: Option<String>,

        /// Follow the latest version
        #[arg(short, long)]
        latest: bool,

        /// Block fragment, e.g. BLOCKID1, BLOCKID1+ or BLOCKID1[2:5]
        #[arg(short, long)]
        block: Option<String>,
    },

    /// Print the web URL of a link
    Web {
        link: String,

        /// Use this origin instead of the configured gateway
        #[arg(long, conflicts_with = "relative")]
        host: Option<String>,

        /// Print a path-only URL
        #[arg(long)]
        relative: bool,
    },

    /// Canonicalize a compact or gateway link
    Normalize { link: String },

    /// Pin a link to a version, optionally pointing at a block
    WithVersion {
        link: String,
        version: String,

        /// Block fragment, e.g. BLOCKID1, BLOCKID1+ or BLOCKID1[2:5]
        #[arg(short, long)]
        block: Option<String>,
    },

    /// Group a JSON comment dump into reply chains
    Groups {
        comments: PathBuf,

        /// Group the replies to this comment instead of top-level comments
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Print the thread leading up to a comment
    Replies { comments: PathBuf, target: String },
}

fn resolve_gateway(cli: &Cli) -> Result<String, HmError> {
    if let Some(gateway) = &cli.gateway {
        return normalize_gateway_url(gateway);
    }
    if let Ok(gateway) = std::env::var(GATEWAY_URL_ENV) {
        tracing::debug!("[hm] gateway from {GATEWAY_URL_ENV}");
        return normalize_gateway_url(&gateway);
    }
    match &cli.config {
        Some(path) => TomlConfigProvider::new(path.clone()).get_gateway_url(),
        None => Ok(HYPERMEDIA_PUBLIC_WEB_GATEWAY.to_string()),
    }
}

fn read_comments(path: &Path) -> Result<Vec<HmComment>, HmError> {
    let content = read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn parse_link(link: &str) -> Result<UnpackedHmId, HmError> {
    unpack_hm_id(link).ok_or_else(|| HmError::InvalidId(format!("'{link}' is not a hypermedia link")))
}

fn build_op(command: Commands, gateway_url: &str) -> Result<Op, HmError> {
    let op = match command {
        Commands::Unpack { link } => Op::Unpack(link),
        Commands::Pack {
            entity_type,
            uid,
            path,
            version,
            latest,
            block,
        } => {
            let fragment = block.as_deref().and_then(parse_fragment);
            let hm_id = UnpackedHmId::try_new(
                entity_type.parse::<EntityType>()?,
                uid,
                HmIdOptions {
                    path: path.map(|p| p.split('/').map(str::to_string).collect()),
                    version,
                    latest,
                    block_ref: fragment.as_ref().map(|f| f.block_id.clone()),
                    block_range: fragment.and_then(|f| f.range),
                    hostname: None,
                },
            )?;
            Op::Pack(hm_id)
        }
        Commands::Web {
            link,
            host,
            relative,
        } => {
            let host = if relative {
                Some(String::new())
            } else {
                Some(host.unwrap_or_else(|| gateway_url.to_string()))
            };
            Op::WebUrl(parse_link(&link)?, host)
        }
        Commands::Normalize { link } => Op::Normalize(link),
        Commands::WithVersion {
            link,
            version,
            block,
        } => {
            let fragment = block.as_deref().and_then(parse_fragment);
            Op::WithVersion {
                id: link,
                version: Some(version),
                block_ref: fragment.as_ref().map(|f| f.block_id.clone()),
                block_range: fragment.and_then(|f| f.range),
            }
        }
        Commands::Groups { comments, target } => Op::Groups {
            comments: read_comments(&comments)?,
            target,
        },
        Commands::Replies { comments, target } => Op::Replies {
            comments: read_comments(&comments)?,
            target,
        },
    };
    Ok(op)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gateway_url = resolve_gateway(&cli)?;

    if cli.save_gateway {
        if let Some(path) = &cli.config {
            TomlConfigProvider::new(path.clone()).set_gateway_url(&gateway_url)?;
            tracing::info!("[hm] saved gateway {gateway_url} to {}", path.display());
        }
    }

    let op = build_op(cli.command, &gateway_url)?;
    match op.run(&gateway_url)? {
        OpResult::Link(link) => println!("{link}"),
        OpResult::Id(hm_id) => println!("{}", serde_json::to_string_pretty(&hm_id)?),
        OpResult::Groups(groups) => println!("{}", serde_json::to_string_pretty(&groups)?),
        OpResult::Replies(thread) => println!("{}", serde_json::to_string_pretty(&thread)?),
    }

    Ok(())
}
