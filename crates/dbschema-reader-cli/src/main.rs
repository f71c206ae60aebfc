//! dbschema-reader CLI - read database catalogs into canonical metadata.

use clap::{Parser, Subcommand};
use dbschema_reader::core::CanonicalSchema;
use dbschema_reader::drivers::{canonical_engine, MssqlCatalogConnection, MysqlCatalogConnection};
use dbschema_reader::{
    BackendCatalog, CatalogConnection, Config, DriverError, MetadataCategory, ReaderError, Route,
    ScopeFilter, SchemaReader,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "dbschema-reader")]
#[command(about = "Read structural metadata from database catalogs")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Engine identifier; overrides the configuration file, or replaces it
    /// when the file does not exist
    #[arg(short, long)]
    engine: Option<String>,

    /// Output JSON instead of text
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported engines and their aliases
    Engines,

    /// List categories, their canonical columns, and how the engine reads them
    Categories,

    /// Show the bound catalog query for one category without running it
    Plan {
        /// Category to plan (e.g. primary_keys)
        category: MetadataCategory,

        /// Restrict to one table name
        #[arg(long)]
        table: Option<String>,

        /// Restrict to one schema/owner
        #[arg(long)]
        schema: Option<String>,
    },

    /// Connect and print canonical rows as JSON
    Dump {
        /// Categories to read [default: from configuration]
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<MetadataCategory>,

        /// Restrict to one table name
        #[arg(long)]
        table: Option<String>,

        /// Restrict to one schema/owner
        #[arg(long)]
        schema: Option<String>,

        /// Fold key, sequence, identity and index rows into descriptors
        #[arg(long)]
        assemble: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ReaderError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    if let Commands::Engines = cli.command {
        print_engines(cli.output_json)?;
        return Ok(());
    }

    let config = load_config(&cli)?;
    let reader = SchemaReader::from_config(&config)?;
    info!("Using engine {}", reader.engine());

    match cli.command {
        Commands::Engines => unreachable!(), // Handled above
        Commands::Categories => print_categories(&reader, cli.output_json)?,
        Commands::Plan {
            category,
            table,
            schema,
        } => {
            let scope = scope_from(&config, table, schema);
            match reader.plan(category, &scope)? {
                Some(plan) => {
                    if cli.output_json {
                        let output = PlanOutput {
                            engine: reader.engine(),
                            category,
                            route: plan.route,
                            sql: &plan.query.sql,
                            params: &plan.query.params,
                        };
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    } else {
                        println!("-- {} ({}) on {}", category, plan.route, reader.engine());
                        println!("{}", plan.query.sql);
                        for (i, param) in plan.query.params.iter().enumerate() {
                            println!("-- param {}: {}", i + 1, param.as_deref().unwrap_or("NULL"));
                        }
                    }
                }
                None => println!("{} is not supported on {}", category, reader.engine()),
            }
        }
        Commands::Dump {
            categories,
            table,
            schema,
            assemble,
        } => {
            let scope = scope_from(&config, table, schema);
            let categories = if categories.is_empty() {
                config.categories.clone()
            } else {
                categories
            };

            let cancel_token = setup_signal_handler();
            let conn = connect(&config).await?;

            let mut results = Vec::with_capacity(categories.len());
            for category in categories {
                let content = tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => return Err(ReaderError::Cancelled),
                    content = dump_category(&reader, conn.as_ref(), category, &scope, assemble) => content?,
                };
                results.push(CategoryDump {
                    category,
                    route: reader.route(category),
                    content,
                });
            }

            let output = DumpOutput {
                engine: reader.engine(),
                scope: &scope,
                categories: results,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Load the configuration file, or build one from `--engine` when the file
/// is absent.
fn load_config(cli: &Cli) -> Result<Config, ReaderError> {
    let config = match &cli.engine {
        Some(engine) if !cli.config.exists() => Config::for_engine(engine.clone()),
        Some(engine) => {
            let mut config = Config::load(&cli.config)?;
            config.engine = engine.clone();
            config
        }
        None => Config::load(&cli.config)?,
    };
    config.validate()?;
    Ok(config)
}

/// Command-line filters replace the configured ones dimension by dimension.
fn scope_from(config: &Config, table: Option<String>, schema: Option<String>) -> ScopeFilter {
    ScopeFilter {
        table: table.or_else(|| config.scope.table.clone()),
        schema: schema.or_else(|| config.scope.schema.clone()),
    }
}

async fn dump_category(
    reader: &SchemaReader,
    conn: &dyn CatalogConnection,
    category: MetadataCategory,
    scope: &ScopeFilter,
    assemble: bool,
) -> Result<serde_json::Value, ReaderError> {
    let value = match (assemble, category) {
        (true, MetadataCategory::PrimaryKeys) => {
            serde_json::to_value(reader.primary_keys(conn, scope).await?)?
        }
        (true, MetadataCategory::UniqueKeys) => {
            serde_json::to_value(reader.unique_keys(conn, scope).await?)?
        }
        (true, MetadataCategory::ForeignKeys) => {
            serde_json::to_value(reader.foreign_keys(conn, scope).await?)?
        }
        (true, MetadataCategory::Sequences) => {
            serde_json::to_value(reader.sequences(conn, scope).await?)?
        }
        (true, MetadataCategory::IdentityColumns) => {
            serde_json::to_value(reader.identity_columns(conn, scope).await?)?
        }
        (true, MetadataCategory::Indexes) => {
            serde_json::to_value(reader.indexes(conn, scope).await?)?
        }
        _ => serde_json::to_value(reader.read(conn, category, scope).await?.rows)?,
    };
    Ok(value)
}

/// Open a connection for the configured engine.
async fn connect(config: &Config) -> Result<Box<dyn CatalogConnection>, ReaderError> {
    let settings = config
        .connection
        .as_ref()
        .ok_or_else(|| ReaderError::Config("connection settings are required for dump".into()))?;
    let engine = canonical_engine(&config.engine).unwrap_or_default();
    let failed = |source: DriverError| ReaderError::Connect {
        engine: engine.to_string(),
        source,
    };

    let conn: Box<dyn CatalogConnection> = match engine {
        "postgres" => {
            let (client, connection) = tokio_postgres::connect(
                &settings.postgres_connection_string(),
                tokio_postgres::NoTls,
            )
            .await
            .map_err(|e| failed(e.into()))?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    error!("PostgreSQL connection error: {}", e);
                }
            });
            Box::new(client)
        }
        "mssql" => {
            let tds = tiberius::Config::from_ado_string(&settings.mssql_connection_string())
                .map_err(|e| failed(e.into()))?;
            Box::new(MssqlCatalogConnection::connect(tds).await.map_err(failed)?)
        }
        "mysql" => Box::new(
            MysqlCatalogConnection::connect(&settings.mysql_url())
                .await
                .map_err(failed)?,
        ),
        _ => connect_odbc(engine, settings.dsn.as_deref().unwrap_or_default())?,
    };
    info!("Connected to {}", engine);
    Ok(conn)
}

#[cfg(feature = "odbc")]
fn connect_odbc(engine: &str, dsn: &str) -> Result<Box<dyn CatalogConnection>, ReaderError> {
    let conn = dbschema_reader::drivers::OdbcCatalogConnection::connect(dsn).map_err(|source| {
        ReaderError::Connect {
            engine: engine.to_string(),
            source,
        }
    })?;
    Ok(Box::new(conn))
}

#[cfg(not(feature = "odbc"))]
fn connect_odbc(engine: &str, _dsn: &str) -> Result<Box<dyn CatalogConnection>, ReaderError> {
    Err(ReaderError::Config(format!(
        "engine '{}' connects over ODBC; rebuild with --features odbc",
        engine
    )))
}

#[derive(Serialize)]
struct EngineInfo<'a> {
    engine: &'a str,
    aliases: Vec<&'a str>,
}

fn print_engines(json: bool) -> Result<(), ReaderError> {
    let catalog = BackendCatalog::with_builtins();
    let engines: Vec<EngineInfo> = catalog
        .engine_names()
        .into_iter()
        .map(|engine| EngineInfo {
            engine,
            aliases: catalog.aliases_of(engine),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&engines)?);
    } else {
        for info in &engines {
            println!("{:<14} {}", info.engine, info.aliases.join(", "));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryInfo {
    category: MetadataCategory,
    route: Route,
    schema: &'static CanonicalSchema,
}

fn print_categories(reader: &SchemaReader, json: bool) -> Result<(), ReaderError> {
    let categories: Vec<CategoryInfo> = MetadataCategory::ALL
        .iter()
        .map(|category| CategoryInfo {
            category: *category,
            route: reader.route(*category),
            schema: category.canonical_schema(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        println!("Categories for {}:", reader.engine());
        for info in &categories {
            println!(
                "  {:<20} {:<12} {}",
                info.category.as_str(),
                info.route,
                info.schema.column_names().join(", ")
            );
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    engine: &'a str,
    category: MetadataCategory,
    route: Route,
    sql: &'a str,
    params: &'a [Option<String>],
}

#[derive(Serialize)]
struct CategoryDump {
    category: MetadataCategory,
    route: Route,
    content: serde_json::Value,
}

#[derive(Serialize)]
struct DumpOutput<'a> {
    engine: &'a str,
    scope: &'a ScopeFilter,
    categories: Vec<CategoryDump>,
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON output.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Cancel in-flight catalog reads on SIGINT or SIGTERM.
#[cfg(unix)]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!("Cannot install SIGTERM handler: {}", e);
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => eprintln!("\nReceived SIGINT. Cancelling catalog reads..."),
            _ = sigterm.recv() => eprintln!("\nReceived SIGTERM. Cancelling catalog reads..."),
        }
        token.cancel();
    });

    cancel_token
}

/// Cancel in-flight catalog reads on Ctrl-C.
#[cfg(not(unix))]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl-C. Cancelling catalog reads...");
            token.cancel();
        }
    });

    cancel_token
}
