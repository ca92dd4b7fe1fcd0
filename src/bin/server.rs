use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use finance_tracker::{
    AppState, build_router, graceful_shutdown, logging_middleware,
    storage::{
        KeyValueTransactionLog, MemoryKeyValueStore, SqliteKeyValueStore, SqliteTransactionLog,
        TransactionLog,
    },
};

/// How transactions are persisted.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Storage {
    /// The whole sequence as one JSON value in a key-value table.
    KeyValue,
    /// One row per transaction.
    Table,
}

/// The web server for the finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Transactions are kept
    /// in memory only if this is not given.
    #[arg(long)]
    db_path: Option<String>,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The symbol shown before every amount.
    #[arg(long, default_value = "₹")]
    currency_symbol: String,

    /// The local timezone as a canonical timezone name, used for the default
    /// date of new transactions.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// How transactions are stored in the database.
    #[arg(long, value_enum, default_value_t = Storage::KeyValue)]
    storage: Storage,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    if time_tz::timezones::get_by_name(&args.timezone).is_none() {
        tracing::error!("Invalid timezone {}", args.timezone);
        return ExitCode::FAILURE;
    }

    let log = match open_transaction_log(args.db_path.as_deref(), args.storage) {
        Ok(log) => log,
        Err(error) => {
            tracing::error!("Could not open the database: {error}");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(log, &args.currency_symbol, &args.timezone) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not load transactions: {error}");
            return ExitCode::FAILURE;
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn open_transaction_log(
    db_path: Option<&str>,
    storage: Storage,
) -> Result<Box<dyn TransactionLog>, finance_tracker::Error> {
    let Some(db_path) = db_path else {
        tracing::warn!("No database path given, transactions will be lost on exit");
        return Ok(Box::new(KeyValueTransactionLog::new(
            MemoryKeyValueStore::new(),
        )));
    };

    let connection = Connection::open(db_path)?;

    let log: Box<dyn TransactionLog> = match storage {
        Storage::KeyValue => Box::new(KeyValueTransactionLog::new(SqliteKeyValueStore::new(
            connection,
        )?)),
        Storage::Table => Box::new(SqliteTransactionLog::new(connection)?),
    };

    tracing::info!("Storing transactions in {db_path} ({storage:?})");

    Ok(log)
}

fn setup_logging(log_path: &str) -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new().create(true).append(true).open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().ok())
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but errors are
        // already logged where they occur.
        .on_failure(());

    router.layer(tracing_layer)
}
