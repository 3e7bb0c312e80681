//! FixHero CLI - capture UI bugs from live pages
//!
//! Usage:
//!   fixhero init                       Initialize FixHero in current directory
//!   fixhero capture <url> -s <sel>     Capture one element by selector
//!   fixhero inspect <url>              Interactive hover/click capture
//!   fixhero issues list                Review stored issues
//!   fixhero issues set <id> ...        Update severity/status/tags
//!   fixhero export --format markdown   Export stored issues

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fixhero_browser::{BrowserConfig, BrowserSession, InspectionRunner, PageInstrumentation};
use fixhero_core::config::InspectorConfig;
use fixhero_core::{Issue, IssueStatus, Severity};
use fixhero_diagnostics::{attach, DiagnosticsCollector};
use fixhero_inspector::{InspectorCommand, InspectorEvent};
use fixhero_store::{IssueStore, StoreSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "fixhero")]
#[command(author, version, about = "Capture UI bugs from live pages")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize FixHero in the current directory
    Init {
        /// Project path (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Capture one element by CSS selector
    Capture {
        /// Page URL
        url: String,

        /// CSS selector of the element to capture
        #[arg(short, long)]
        selector: String,

        /// Issue title (defaults to the page title)
        #[arg(long)]
        title: Option<String>,

        /// Severity (critical, high, medium, low)
        #[arg(long)]
        severity: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Skip the screenshot
        #[arg(long)]
        no_screenshot: bool,

        /// Connect to a running browser on this CDP port instead of launching
        #[arg(long)]
        connect: Option<u16>,

        /// How long to let the page run before capturing, in milliseconds
        #[arg(long, default_value = "1000")]
        settle_ms: u64,
    },

    /// Interactive capture: hover highlights, click captures
    Inspect {
        /// Page URL
        url: String,

        /// Give up after this many seconds without a click
        #[arg(short, long, default_value = "120")]
        timeout: u64,

        /// Connect to a running browser on this CDP port instead of launching
        #[arg(long)]
        connect: Option<u16>,
    },

    /// Review stored issues
    Issues {
        #[command(subcommand)]
        action: IssueCommands,
    },

    /// Export stored issues
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum IssueCommands {
    /// List all issues, newest first
    List,

    /// Show one issue in full
    Show {
        /// Issue id
        id: String,
    },

    /// Update issue fields
    Set {
        /// Issue id
        id: String,

        /// Status (open, in_progress, resolved, archived)
        #[arg(long)]
        status: Option<String>,

        /// Severity (critical, high, medium, low)
        #[arg(long)]
        severity: Option<String>,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Tag to add (repeatable)
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,

        /// Tag to remove (repeatable)
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
    },

    /// Delete one issue
    Delete {
        /// Issue id
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Markdown,
    Json,
}

fn fixhero_dir() -> PathBuf {
    PathBuf::from(".fixhero")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => cmd_init(path).await,
        Commands::Capture {
            url,
            selector,
            title,
            severity,
            tags,
            no_screenshot,
            connect,
            settle_ms,
        } => {
            cmd_capture(
                url,
                selector,
                title,
                severity,
                tags,
                no_screenshot,
                connect,
                settle_ms,
            )
            .await
        }
        Commands::Inspect {
            url,
            timeout,
            connect,
        } => cmd_inspect(url, timeout, connect).await,
        Commands::Issues { action } => cmd_issues(action).await,
        Commands::Export { format, output } => cmd_export(format, output).await,
    }
}

async fn cmd_init(path: PathBuf) -> Result<()> {
    info!("Initializing FixHero in {:?}", path);

    InspectorConfig::write_default(&path).context("Failed to write default config")?;
    tokio::fs::create_dir_all(path.join(".fixhero/issues")).await?;
    tokio::fs::create_dir_all(path.join(".fixhero/artifacts")).await?;

    println!("Initialized FixHero in {:?}", path);
    println!("Created:");
    println!("  .fixhero/config.toml");
    println!("  .fixhero/issues/");
    println!("  .fixhero/artifacts/");
    println!("\nNext steps:");
    println!("  1. fixhero capture <url> --selector '#some-element'");
    println!("  2. fixhero inspect <url>   (hover and click in the browser)");
    println!("  3. fixhero issues list");
    Ok(())
}

/// Launch (or connect to) a browser, navigate, and wire up diagnostics
async fn open_page(
    config: &InspectorConfig,
    connect: Option<u16>,
    url: &str,
) -> Result<(Arc<BrowserSession>, DiagnosticsCollector, PageInstrumentation)> {
    let session = match connect {
        Some(port) => BrowserSession::connect(port).await?,
        None => BrowserSession::launch_with_config(BrowserConfig::from(&config.browser)).await?,
    };
    let session = Arc::new(session);
    session.navigate(url).await?;

    let collector = DiagnosticsCollector::new(&config.diagnostics);
    let mut instrumentation = PageInstrumentation::new();
    attach(&mut instrumentation, &collector);
    instrumentation.install(&session).await?;

    Ok((session, collector, instrumentation))
}

#[allow(clippy::too_many_arguments)]
async fn cmd_capture(
    url: String,
    selector: String,
    title: Option<String>,
    severity: Option<String>,
    tags: Vec<String>,
    no_screenshot: bool,
    connect: Option<u16>,
    settle_ms: u64,
) -> Result<()> {
    // Fail fast on bad arguments before any browser work.
    let severity: Option<Severity> = severity
        .map(|s| s.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let config = InspectorConfig::load_or_default(Path::new("."))?;
    let (session, collector, instrumentation) = open_page(&config, connect, &url).await?;

    // Let the page run so console/network errors have a chance to land.
    tokio::time::sleep(Duration::from_millis(settle_ms)).await;
    let (console_count, network_count) = instrumentation.pump(&session).await?;
    info!(
        "Buffered {} console / {} network errors",
        console_count, network_count
    );

    let mut capture_config = config.capture.clone();
    if no_screenshot {
        capture_config.screenshot = false;
    }

    let sink = Arc::new(StoreSink::new(fixhero_dir()));
    let mut runner = InspectionRunner::new(session.clone(), collector, sink, &capture_config);
    let event = runner
        .dispatch(InspectorCommand::CaptureElement {
            selector: selector.clone(),
        })
        .await
        .with_context(|| format!("Failed to capture {}", selector))?;

    let issue = match event {
        Some(InspectorEvent::AddIssue { issue }) => issue,
        None => anyhow::bail!("capture produced no issue"),
    };

    // Apply review overrides to the stored document.
    let issue = if title.is_some() || severity.is_some() || !tags.is_empty() {
        IssueStore::new(fixhero_dir())
            .update(&issue.id, |issue| {
                if let Some(title) = title {
                    issue.title = title;
                }
                if let Some(severity) = severity {
                    issue.severity = severity;
                }
                issue.tags = tags;
            })
            .await?
    } else {
        issue
    };

    print_capture(&issue);
    drop(runner);
    session_close(session).await
}

async fn cmd_inspect(url: String, timeout: u64, connect: Option<u16>) -> Result<()> {
    let config = InspectorConfig::load_or_default(Path::new("."))?;
    let (session, collector, instrumentation) = open_page(&config, connect, &url).await?;

    let sink = Arc::new(StoreSink::new(fixhero_dir()));
    let mut runner = InspectionRunner::new(session.clone(), collector, sink, &config.capture);

    println!("Inspection mode: hover highlights, click captures (timeout {}s)", timeout);
    let captured = runner
        .run_until_capture(&instrumentation, Duration::from_secs(timeout))
        .await?;

    match captured {
        Some(issue) => print_capture(&issue),
        None => println!("No element captured"),
    }
    drop(runner);
    session_close(session).await
}

async fn cmd_issues(action: IssueCommands) -> Result<()> {
    let store = IssueStore::new(fixhero_dir());

    match action {
        IssueCommands::List => {
            let issues = store.list().await?;
            if issues.is_empty() {
                println!("No issues stored. Capture one with 'fixhero capture' or 'fixhero inspect'.");
                return Ok(());
            }
            println!("{} issue(s)", issues.len());
            for issue in issues {
                println!(
                    "  {}  [{}] [{}] {} ({})",
                    issue.id, issue.severity, issue.status, issue.title, issue.url
                );
                if !issue.tags.is_empty() {
                    println!("      tags: {}", issue.tags.join(", "));
                }
            }
        }

        IssueCommands::Show { id } => {
            let issue = store.get(&id).await?;
            print_issue_details(&issue);
        }

        IssueCommands::Set {
            id,
            status,
            severity,
            title,
            add_tags,
            remove_tags,
        } => {
            let status: Option<IssueStatus> = status
                .map(|s| s.parse().map_err(|e: String| anyhow::anyhow!(e)))
                .transpose()?;
            let severity: Option<Severity> = severity
                .map(|s| s.parse().map_err(|e: String| anyhow::anyhow!(e)))
                .transpose()?;

            let updated = store
                .update(&id, |issue| {
                    if let Some(status) = status {
                        issue.status = status;
                    }
                    if let Some(severity) = severity {
                        issue.severity = severity;
                    }
                    if let Some(title) = title {
                        issue.title = title;
                    }
                    for tag in add_tags {
                        if !issue.tags.contains(&tag) {
                            issue.tags.push(tag);
                        }
                    }
                    issue.tags.retain(|tag| !remove_tags.contains(tag));
                })
                .await?;

            println!(
                "Updated {}: [{}] [{}] {}",
                updated.id, updated.severity, updated.status, updated.title
            );
        }

        IssueCommands::Delete { id } => {
            store.delete(&id).await?;
            println!("Deleted issue {}", id);
        }
    }
    Ok(())
}

async fn cmd_export(format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let store = IssueStore::new(fixhero_dir());
    let issues = store.list().await?;

    let content = match format {
        ExportFormat::Markdown => fixhero_export::to_markdown(&issues),
        ExportFormat::Json => fixhero_export::to_json(&issues)?,
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, content).await?;
            println!("Exported {} issue(s) to {}", issues.len(), path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_capture(issue: &Issue) {
    println!("Captured issue {}", issue.id);
    if let Some(element) = &issue.element {
        println!("  Selector: {}", element.selector);
        println!("  XPath:    {}", element.xpath);
    }
    println!("  Screenshot: {}", if issue.screenshot.is_some() { "yes" } else { "no" });
    println!(
        "  Errors: {} console, {} network",
        issue.console_errors.len(),
        issue.network_errors.len()
    );
    println!("  Stored: .fixhero/issues/{}.json", issue.id);
}

fn print_issue_details(issue: &Issue) {
    println!("Issue {}", issue.id);
    println!("  Title:    {}", issue.title);
    println!("  URL:      {}", issue.url);
    println!("  Captured: {}", issue.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Severity: {}", issue.severity);
    println!("  Status:   {}", issue.status);
    if !issue.tags.is_empty() {
        println!("  Tags:     {}", issue.tags.join(", "));
    }
    if let Some(element) = &issue.element {
        println!("  Element:");
        println!("    Selector: {}", element.selector);
        println!("    XPath:    {}", element.xpath);
        let rect = element.bounding_rect;
        println!(
            "    Rect:     {}x{} at ({}, {})",
            rect.width, rect.height, rect.left, rect.top
        );
        println!("    HTML:     {}", element.outer_html);
    }
    if issue.screenshot.is_some() {
        println!("  Screenshot: .fixhero/artifacts/{}/", issue.id);
    }
    for error in &issue.console_errors {
        println!("  console: line {}: {}", error.line_number, error.message);
    }
    for error in &issue.network_errors {
        println!(
            "  network: {} {} -> {} {}",
            error.method, error.url, error.status, error.status_text
        );
    }
}

async fn session_close(session: Arc<BrowserSession>) -> Result<()> {
    if let Ok(session) = Arc::try_unwrap(session) {
        session.close().await?;
    }
    Ok(())
}
