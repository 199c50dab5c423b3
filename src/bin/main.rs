//! sqlom CLI - Render statement models to SQL
//!
//! Usage:
//!   sqlom render <statement.json> [--dialect <dialect>] [--count]
//!   sqlom pivot <pivot.json> [--dialect <dialect>] [--drill-row <value> | --drill-null-row] [--drill-value <name>]
//!   sqlom mapped <record_type> [--dialect <dialect>]
//!   sqlom validate <statement.json>
//!   sqlom dialects
//!
//! Examples:
//!   sqlom render demos/customers.json --dialect mysql
//!   sqlom render demos/customers.json --count
//!   sqlom pivot demos/sales_pivot.json --drill-row North --drill-value y2024
//!
//! Defaults come from `sqlom.toml` (or the file named by `SQLOM_CONFIG`).
//! Set `SQLOM_LOG=debug` to see rendering traces on stderr.

use clap::{Parser, Subcommand, ValueEnum};
use sqlom::config::Settings;
use sqlom::mapping::AliasSession;
use sqlom::pivot::PivotTable;
use sqlom::sql::render;
use sqlom::sql::value::{Constant, DataKind};
use sqlom::{Dialect, Statement, Validate};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlom")]
#[command(about = "sqlom - A SQL query object model that renders to multi-dialect SQL")]
#[command(version)]
struct Cli {
    /// Path to a sqlom.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON statement to SQL
    Render {
        /// Path to the statement JSON file
        file: PathBuf,

        /// SQL dialect to generate (defaults to the configured dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Render the row count of a SELECT instead of the rows
        #[arg(long)]
        count: bool,
    },

    /// Render a JSON pivot definition, or one of its drill-downs
    Pivot {
        /// Path to the pivot JSON file
        file: PathBuf,

        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Row field value of the cell to drill into
        #[arg(long, requires = "drill_value")]
        drill_row: Option<String>,

        /// Drill into the row group whose row field is NULL
        #[arg(long, requires = "drill_value", conflicts_with = "drill_row")]
        drill_null_row: bool,

        /// Pivot value name of the cell to drill into
        #[arg(long)]
        drill_value: Option<String>,

        /// Kind used to parse --drill-row
        #[arg(long, default_value = "string")]
        row_kind: KindArg,
    },

    /// Render SELECT of every mapped property of a configured record type
    Mapped {
        record_type: String,

        #[arg(short, long)]
        dialect: Option<DialectArg>,
    },

    /// Validate a JSON statement without rendering it
    Validate {
        /// Path to the statement JSON file
        file: PathBuf,
    },

    /// List supported dialects
    Dialects,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Sqlserver,
    Oracle,
    Mysql,
    Postgres,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Sqlserver => Dialect::SqlServer,
            DialectArg::Oracle => Dialect::Oracle,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Postgres => Dialect::Postgres,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Boolean,
    String,
    Number,
    Date,
    Binary,
    Guid,
}

impl From<KindArg> for DataKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Boolean => DataKind::Boolean,
            KindArg::String => DataKind::String,
            KindArg::Number => DataKind::Number,
            KindArg::Date => DataKind::Date,
            KindArg::Binary => DataKind::Binary,
            KindArg::Guid => DataKind::Guid,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SQLOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Render {
            file,
            dialect,
            count,
        } => cmd_render(&settings, &file, pick(&settings, dialect), count),
        Commands::Pivot {
            file,
            dialect,
            drill_row,
            drill_null_row,
            drill_value,
            row_kind,
        } => {
            let drill = match drill_value {
                Some(value) if drill_row.is_some() || drill_null_row => Some((drill_row, value)),
                Some(_) => {
                    eprintln!("Error: --drill-value needs --drill-row or --drill-null-row");
                    return ExitCode::FAILURE;
                }
                None => None,
            };
            cmd_pivot(&file, pick(&settings, dialect), drill, row_kind.into())
        }
        Commands::Mapped {
            record_type,
            dialect,
        } => cmd_mapped(&settings, &record_type, pick(&settings, dialect)),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Dialects => {
            for dialect in Dialect::ALL {
                println!("{}", dialect);
            }
            ExitCode::SUCCESS
        }
    }
}

fn pick(settings: &Settings, arg: Option<DialectArg>) -> Dialect {
    arg.map(Dialect::from).unwrap_or(settings.render.dialect)
}

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Option<T> {
    let source = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&source) {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("Error parsing '{}': {}", file.display(), e);
            None
        }
    }
}

fn emit(result: sqlom::Result<String>) -> ExitCode {
    match result {
        Ok(sql) => {
            println!("{}", sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Render error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_render(settings: &Settings, file: &Path, dialect: Dialect, count: bool) -> ExitCode {
    let Some(mut statement) = read_json::<Statement>(file) else {
        return ExitCode::FAILURE;
    };

    let table_space = match settings.render.resolved_table_space() {
        Ok(ts) => ts,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let (Statement::Select(query), Some(ts)) = (&mut statement, table_space) {
        if query.table_space.is_none() {
            query.table_space = Some(ts);
        }
    }

    tracing::info!(kind = statement.kind(), dialect = %dialect, "rendering");

    if count {
        let Statement::Select(query) = &statement else {
            eprintln!("--count needs a select statement, got {}", statement.kind());
            return ExitCode::FAILURE;
        };
        return emit(render::render_row_count(query, dialect));
    }
    emit(statement.to_sql(dialect))
}

fn cmd_pivot(
    file: &Path,
    dialect: Dialect,
    drill: Option<(Option<String>, String)>,
    row_kind: DataKind,
) -> ExitCode {
    let Some(pivot) = read_json::<PivotTable>(file) else {
        return ExitCode::FAILURE;
    };

    let query = match drill {
        Some((row, value_name)) => row
            .map(|row| Constant::parse(row_kind, &row))
            .transpose()
            .and_then(|row| pivot.build_drill_down(row, &value_name)),
        None => pivot.build(),
    };
    emit(query.and_then(|q| q.to_sql(dialect)))
}

fn cmd_mapped(settings: &Settings, record_type: &str, dialect: Dialect) -> ExitCode {
    let registry = settings.mapping_registry();
    let mut session = AliasSession::new();
    emit(
        registry
            .select_all(record_type, &mut session)
            .and_then(|q| q.to_sql(dialect)),
    )
}

fn cmd_validate(file: &Path) -> ExitCode {
    let Some(statement) = read_json::<Statement>(file) else {
        return ExitCode::FAILURE;
    };

    match statement.validate() {
        Ok(()) => {
            println!("OK: {} is a valid {} statement", file.display(), statement.kind());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            ExitCode::FAILURE
        }
    }
}
