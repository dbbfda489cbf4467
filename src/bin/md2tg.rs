//! CLI binary for md2telegraph.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PublishConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use md2telegraph::{
    edit_existing, page_path_from_url, publish_file, PageApi, PublishConfig, PublishReport,
    TelegraphClient,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Publish a Markdown file as a new article
  md2tg publish notes.md --title "Release Notes"

  # Long documents are split into linked parts automatically
  md2tg publish book.md --title "Field Guide" --author "Docs Bot"

  # Replace the content of an existing page
  md2tg edit https://telegra.ph/Release-Notes-08-23 notes.md

  # List pages created with the stored token
  md2tg list --limit 20

  # Store a token so later commands don't need --token
  md2tg auth --token d3b0c44298fc1c14...

  # Machine-readable output
  md2tg publish notes.md --title "Release Notes" --json

ENVIRONMENT VARIABLES:
  TELEGRAPH_TOKEN   Access token (overridden by --token, overrides the
                    stored token from 'md2tg auth')

TOKEN RESOLUTION:
  --token flag > TELEGRAPH_TOKEN > ~/.config/md2tg/config.json
"#;

/// Publish Markdown files as Telegraph pages.
#[derive(Parser, Debug)]
#[command(
    name = "md2tg",
    version,
    about = "Publish Markdown files as Telegraph pages",
    long_about = "Convert Markdown to Telegraph's page format and publish it. Documents over \
the 64 KiB page limit are split into multiple pages stitched together with \
prev/start/next navigation links.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Telegraph access token.
    #[arg(long, global = true, env = "TELEGRAPH_TOKEN")]
    token: Option<String>,

    /// Output results as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish a Markdown file as a new article.
    Publish {
        /// Markdown file to publish.
        file: PathBuf,

        /// Article title. Defaults to the file stem.
        #[arg(long)]
        title: Option<String>,

        /// Author name shown under the title.
        #[arg(long)]
        author: Option<String>,

        /// Author profile URL shown under the title.
        #[arg(long)]
        author_url: Option<String>,
    },

    /// Replace the content of an existing page.
    Edit {
        /// Page URL (https://telegra.ph/...) or bare page path.
        page: String,

        /// Markdown file with the new content.
        file: PathBuf,

        /// New title. The current title is kept when omitted.
        #[arg(long)]
        title: Option<String>,

        /// Author name shown under the title.
        #[arg(long)]
        author: Option<String>,
    },

    /// List pages created by the account.
    List {
        /// Maximum number of pages to return (server cap: 200).
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Number of pages to skip.
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Store an access token for later commands.
    Auth {
        /// The token to store in ~/.config/md2tg/config.json.
        #[arg(long)]
        token: String,
    },
}

/// On-disk token store, written by `md2tg auth`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredAuth {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_url: Option<String>,
}

fn auth_file_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set")?;
    Ok(Path::new(&home).join(".config").join("md2tg").join("config.json"))
}

fn load_stored_auth() -> Option<StoredAuth> {
    let path = auth_file_path().ok()?;
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn store_auth(auth: &StoredAuth) -> Result<PathBuf> {
    let path = auth_file_path()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(auth).context("Failed to serialise token store")?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[derive(Serialize)]
struct JsonError<'a> {
    success: bool,
    error: String,
    kind: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // `auth` only touches the local store; handle it before building a client.
    if let Command::Auth { token } = &cli.command {
        let path = store_auth(&StoredAuth {
            access_token: token.clone(),
            ..StoredAuth::default()
        })?;
        if cli.json {
            println!(r#"{{"success":true}}"#);
        } else if !cli.quiet {
            eprintln!("{} token stored in {}", green("✔"), bold(&path.display().to_string()));
        }
        return Ok(());
    }

    let stored = load_stored_auth();
    let token = cli
        .token
        .clone()
        .or_else(|| stored.as_ref().map(|s| s.access_token.clone()));

    let mut builder = PublishConfig::builder();
    if let Some(token) = token {
        builder = builder.access_token(token);
    }
    match &cli.command {
        Command::Publish { author, author_url, .. } => {
            if let Some(a) = author.clone().or_else(|| stored.as_ref().and_then(|s| s.author_name.clone())) {
                builder = builder.author_name(a);
            }
            if let Some(u) = author_url.clone().or_else(|| stored.as_ref().and_then(|s| s.author_url.clone())) {
                builder = builder.author_url(u);
            }
        }
        Command::Edit { author, .. } => {
            if let Some(a) = author.clone() {
                builder = builder.author_name(a);
            }
        }
        _ => {}
    }
    let config = builder.build().context("Invalid configuration")?;
    let client = TelegraphClient::new(&config).context("Failed to build HTTP client")?;

    let outcome = run_command(&cli, &client, &config).await;
    match outcome {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                let json = serde_json::to_string(&JsonError {
                    success: false,
                    error: e.to_string(),
                    kind: e.kind(),
                })
                .unwrap_or_else(|_| r#"{"success":false}"#.into());
                println!("{json}");
            } else {
                eprintln!("{} {}", red("✘"), e);
            }
            std::process::exit(1);
        }
    }
}

async fn run_command(
    cli: &Cli,
    client: &TelegraphClient,
    config: &PublishConfig,
) -> Result<(), md2telegraph::PublishError> {
    match &cli.command {
        Command::Publish { file, title, .. } => {
            config.require_token()?;
            let title = title.clone().unwrap_or_else(|| title_from_file(file));
            let report = publish_file(client, &title, file, config).await?;
            print_report(cli, &report);
            Ok(())
        }

        Command::Edit { page, file, title, .. } => {
            config.require_token()?;
            let path = page_path_from_url(page);
            let markdown = std::fs::read_to_string(file).map_err(|source| {
                md2telegraph::PublishError::SourceRead {
                    path: file.clone(),
                    source,
                }
            })?;
            let page = edit_existing(client, path, title.as_deref(), &markdown, config).await?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "success": true, "page": page })
                );
            } else if !cli.quiet {
                println!("{} updated {}", green("✔"), bold(&page.url));
            }
            Ok(())
        }

        Command::List { limit, offset } => {
            config.require_token()?;
            let list = client.list_pages(*offset, *limit).await?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "success": true, "total_count": list.total_count, "pages": list.pages })
                );
            } else {
                println!(
                    "{} of {} pages:",
                    list.pages.len(),
                    bold(&list.total_count.to_string())
                );
                for page in &list.pages {
                    println!(
                        "  {}  {}",
                        page.url,
                        dim(&format!("{} views", page.views))
                    );
                }
            }
            Ok(())
        }

        // Handled in main before the client exists.
        Command::Auth { .. } => Ok(()),
    }
}

fn print_report(cli: &Cli, report: &PublishReport) {
    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "success": true, "report": report })
        );
        return;
    }
    if cli.quiet {
        return;
    }

    println!("{} published {}", green("✔"), bold(&report.main_url));
    if report.parts.len() > 1 {
        for part in &report.parts {
            let status = match &part.relink_error {
                None => green("✓"),
                Some(e) => red(&format!("✗ relink failed: {e}")),
            };
            println!(
                "  part {}/{}  {}  {}  {}",
                part.index + 1,
                part.total,
                part.url,
                dim(&format!("{} bytes", part.content_bytes)),
                status
            );
        }
        if !report.fully_relinked() {
            eprintln!(
                "{} some parts are missing navigation links; re-run 'md2tg edit' on them",
                red("✘")
            );
        }
    }
}

fn title_from_file(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().replace(['-', '_'], " "))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}
