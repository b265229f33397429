//! mailsift command-line interface.
//!
//! Subcommands:
//! - `check` - check emails from arguments, a file, or stdin
//! - `serve` - run the HTTP API server with the periodic list updater
//! - `update` - run one refresh pass over the domain lists

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use mailsift::app::{shutdown_gracefully, ListRefresher};
use mailsift::checker::Services;
use mailsift::config::{
    DB_PATH, DEFAULT_SERVER_PORT, LIST_REFRESH_INTERVAL, MAX_BATCH_CONCURRENCY, REFRESH_DEADLINE,
};
use mailsift::dns::{CachingResolver, DohClient};
use mailsift::initialization::{init_client, init_logger_with, init_semaphore};
use mailsift::lists::{
    DisposableChecker, EducationalChecker, GithubDisposableFetcher, TrancoFetcher,
    UniversityListFetcher, WellKnownChecker,
};
use mailsift::pattern::PatternChecker;
use mailsift::server::{start_server, AppState};
use mailsift::storage::{init_db_pool_with_path, run_migrations, ListStore, SqliteStore};
use mailsift::{CheckParams, EmailChecker, EmailCheckResult, LogFormat, LogLevel};

#[derive(Parser)]
#[command(name = "mailsift", version, about = "Email risk screening tool")]
struct Cli {
    /// SQLite database path
    #[arg(long, env = "MAILSIFT_DB_PATH", default_value = DB_PATH)]
    db_path: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check email(s) from arguments, a file, or stdin
    Check {
        /// Read emails from a file (one per line)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Read emails from stdin (one per line)
        #[arg(short, long)]
        stdin: bool,

        /// Emails passed directly as arguments
        emails: Vec<String>,
    },
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,

        /// Disable the periodic list updater
        #[arg(long)]
        no_refresh: bool,
    },
    /// Refresh the domain lists now
    Update,
}

/// Fully wired application: the checker plus the refresher that keeps its
/// lists current.
struct App {
    checker: Arc<EmailChecker>,
    refresher: Arc<ListRefresher>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger_with(cli.log_level.into(), cli.log_format)
        .context("Failed to initialize logger")?;

    match cli.command {
        Command::Check {
            file,
            stdin,
            emails,
        } => check_emails(&cli.db_path, file, stdin, emails).await,
        Command::Serve { port, no_refresh } => serve(&cli.db_path, port, no_refresh).await,
        Command::Update => update(&cli.db_path).await,
    }
}

/// Wires store, fetchers, list services, resolver and analyzer into a
/// checker. Each list service runs its construction-time refresh here.
async fn build_app(db_path: &Path) -> Result<App> {
    let pool = init_db_pool_with_path(db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let store: Arc<dyn ListStore> = Arc::new(SqliteStore::new(Arc::clone(&pool)));
    let client = init_client().context("Failed to initialize HTTP client")?;

    let doh = Arc::new(DohClient::new(Arc::clone(&client)));
    let resolver = Arc::new(CachingResolver::new(doh, Arc::clone(&store)));

    let disposable = Arc::new(
        DisposableChecker::new(
            Arc::clone(&store),
            Arc::new(GithubDisposableFetcher::new(Arc::clone(&client))),
        )
        .await
        .context("Failed to initialize disposable list")?,
    );
    let well_known = Arc::new(
        WellKnownChecker::new(
            Arc::clone(&store),
            Arc::new(TrancoFetcher::new(Arc::clone(&client))),
        )
        .await
        .context("Failed to initialize well-known list")?,
    );
    let educational = Arc::new(
        EducationalChecker::new(
            Arc::clone(&store),
            Arc::new(UniversityListFetcher::new(Arc::clone(&client))),
        )
        .await
        .context("Failed to initialize educational list")?,
    );

    let refresher = Arc::new(ListRefresher::new(
        disposable.clone(),
        well_known.clone(),
        educational.clone(),
    ));

    let checker = Arc::new(EmailChecker::new(Services {
        disposable,
        dns: resolver,
        well_known,
        educational,
        pattern: Arc::new(PatternChecker::new()),
    }));

    Ok(App { checker, refresher })
}

async fn check_emails(
    db_path: &Path,
    file: Option<PathBuf>,
    stdin: bool,
    emails: Vec<String>,
) -> Result<()> {
    let app = build_app(db_path).await?;

    let from_file = file.is_some();
    let emails = if let Some(path) = file {
        read_emails_from_file(&path).await?
    } else if stdin {
        read_emails_from_stdin().await?
    } else if !emails.is_empty() {
        emails
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect()
    } else {
        anyhow::bail!("please provide an email via argument, --file, or --stdin");
    };

    // File input can be large, so it gets bounded concurrency; arg and
    // stdin input runs sequentially.
    let results = if from_file {
        check_concurrently(&app.checker, emails).await?
    } else {
        check_sequentially(&app.checker, emails).await?
    };

    let output =
        serde_json::to_string_pretty(&results).context("failed to serialize results")?;
    println!("{output}");
    Ok(())
}

async fn serve(db_path: &Path, port: u16, no_refresh: bool) -> Result<()> {
    let app = build_app(db_path).await?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_cancel.cancel();
        }
    });

    let updater = if no_refresh {
        None
    } else {
        Some(
            Arc::clone(&app.refresher).spawn_periodic(LIST_REFRESH_INTERVAL, cancel.clone()),
        )
    };

    let state = AppState {
        checker: Arc::clone(&app.checker),
    };
    start_server(port, state, cancel.clone()).await?;

    shutdown_gracefully(cancel, updater).await;
    Ok(())
}

async fn update(db_path: &Path) -> Result<()> {
    let app = build_app(db_path).await?;

    info!("Starting database update");
    tokio::time::timeout(REFRESH_DEADLINE, app.refresher.refresh_all())
        .await
        .context("database update timed out")??;

    info!("Database update complete");
    Ok(())
}

async fn check_sequentially(
    checker: &Arc<EmailChecker>,
    emails: Vec<String>,
) -> Result<Vec<EmailCheckResult>> {
    let mut results = Vec::with_capacity(emails.len());
    for email in emails {
        let result = checker
            .check(CheckParams::new(email.as_str()))
            .await
            .with_context(|| format!("failed to check email {email}"))?;
        results.push(result);
    }
    Ok(results)
}

/// Checks a batch with up to [`MAX_BATCH_CONCURRENCY`] full checks in
/// flight, preserving input order in the output.
async fn check_concurrently(
    checker: &Arc<EmailChecker>,
    emails: Vec<String>,
) -> Result<Vec<EmailCheckResult>> {
    let semaphore = init_semaphore(MAX_BATCH_CONCURRENCY);

    let handles: Vec<_> = emails
        .iter()
        .map(|email| {
            let checker = Arc::clone(checker);
            let semaphore = Arc::clone(&semaphore);
            let email = email.clone();
            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .context("batch semaphore closed")?;
                checker
                    .check(CheckParams::new(email.as_str()))
                    .await
                    .with_context(|| format!("failed to check email {email}"))
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.context("check task panicked")??);
    }
    Ok(results)
}

async fn read_emails_from_file(path: &Path) -> Result<Vec<String>> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_emails(BufReader::new(file)).await
}

async fn read_emails_from_stdin() -> Result<Vec<String>> {
    read_emails(BufReader::new(tokio::io::stdin())).await
}

async fn read_emails<R>(reader: BufReader<R>) -> Result<Vec<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut emails = Vec::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let email = line.trim();
        if !email.is_empty() {
            emails.push(email.to_string());
        }
    }
    Ok(emails)
}
