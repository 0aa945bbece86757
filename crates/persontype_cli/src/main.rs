//! Command-line front end for `persontype_core`.
//!
//! # Responsibility
//! - Map subcommands onto find/delete operations.
//! - Print results as one JSON document per line on stdout.

use clap::{ArgGroup, Args, Parser, Subcommand};
use log::{debug, info};
use persontype_core::{
    CompareOp, CoreConfig, DatabaseConfig, OperationEvent, PersonType, PersonTypeField,
    PersonTypeService, SortDirection, DO_DELETE_EVENT, DO_FIND_EVENT,
};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// persontype - inspect and maintain the person type catalogue
#[derive(Parser)]
#[command(name = "persontype")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite database file, overrides the configured database
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check core linkage
    Ping,
    /// List person types
    List(ListArgs),
    /// Show one person type
    Get(GetArgs),
    /// Delete person types matching a filter
    Delete(DeleteArgs),
    /// Insert person types by name
    Seed {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Args)]
#[command(allow_negative_numbers = true)]
struct ListArgs {
    /// Exact name
    #[arg(long)]
    name: Option<String>,
    /// SQL LIKE pattern on name
    #[arg(long)]
    name_like: Option<String>,
    /// Comma separated ids
    #[arg(long, value_delimiter = ',')]
    ids: Vec<i64>,
    /// Sort field: id or name
    #[arg(long)]
    sort: Option<PersonTypeField>,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "desc")]
    direction: SortDirection,
    /// Ignored when not positive
    #[arg(long)]
    limit: Option<i64>,
    /// Ignored when negative
    #[arg(long)]
    offset: Option<i64>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("key").required(true).args(["id", "name"])))]
struct GetArgs {
    #[arg(long)]
    id: Option<i64>,
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("filter").required(true).multiple(true).args(["id", "name"])))]
struct DeleteArgs {
    /// Id to delete, repeatable
    #[arg(long)]
    id: Vec<i64>,
    #[arg(long)]
    name: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("Error: {err}");
            if let Some(source) = err.source() {
                eprintln!("Caused by: {source}");
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Commands::Ping = cli.command {
        println!("persontype_core ping={}", persontype_core::ping());
        println!("persontype_core version={}", persontype_core::core_version());
        return Ok(());
    }

    let config = load_config(&cli)?;
    config.start_logging()?;

    let conn = config.open_database()?;
    let mut service = PersonTypeService::try_new(&conn)?;
    if let Some(cache) = config.build_cache() {
        service = service.with_cache(cache);
    }

    match cli.command {
        Commands::Ping => Ok(()),
        Commands::List(args) => list(&service, args),
        Commands::Get(args) => get(&service, args),
        Commands::Delete(args) => delete(&service, args),
        Commands::Seed { names } => seed(&conn, &names),
    }
}

fn load_config(cli: &Cli) -> CliResult<CoreConfig> {
    let mut config = match &cli.config {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::default(),
    };
    if let Some(path) = &cli.db {
        config.database = DatabaseConfig::File { path: path.clone() };
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn list(service: &PersonTypeService<'_>, args: ListArgs) -> CliResult<()> {
    let mut op = service.multi_find();
    if let Some(name) = args.name {
        op.by_name(name);
    }
    if let Some(pattern) = args.name_like {
        op.by_name_with(pattern, CompareOp::Like);
    }
    if !args.ids.is_empty() {
        op.by_ids(args.ids)?;
    }
    match args.sort {
        Some(PersonTypeField::Id) => {
            op.sort_by_id(args.direction);
        }
        Some(PersonTypeField::Name) => {
            op.sort_by_name(args.direction);
        }
        None => {}
    }
    if let Some(limit) = args.limit {
        op.limit(limit);
    }
    if let Some(offset) = args.offset {
        op.offset(offset);
    }
    op.on(
        DO_FIND_EVENT,
        |ctx| {
            if let OperationEvent::Find(event) = ctx.event {
                debug!(
                    "event=cli_list module=cli status=ok rows={}",
                    event.dto_list.len()
                );
            }
        },
        None,
        true,
    );

    print_lines(&op.do_operation()?)
}

fn get(service: &PersonTypeService<'_>, args: GetArgs) -> CliResult<()> {
    let mut op = service.single_find();
    if let Some(id) = args.id {
        op.by_id(id);
    }
    if let Some(name) = args.name {
        op.by_name(name);
    }
    match op.do_operation()? {
        Some(person_type) => print_lines(&[person_type]),
        None => Err("person type not found".into()),
    }
}

fn delete(service: &PersonTypeService<'_>, args: DeleteArgs) -> CliResult<()> {
    let mut op = service.multi_delete();
    if !args.id.is_empty() {
        op.by_ids(args.id)?;
    }
    if let Some(name) = args.name {
        op.by_name(name);
    }
    op.on(
        DO_DELETE_EVENT,
        |ctx| {
            if let OperationEvent::Delete(event) = ctx.event {
                info!(
                    "event=cli_delete module=cli status=ok affected={}",
                    event.result.affected_rows
                );
            }
        },
        None,
        true,
    );

    let result = op.do_operation()?;
    print_lines(&[result])
}

fn seed(conn: &Connection, names: &[String]) -> CliResult<()> {
    let mut created = Vec::with_capacity(names.len());
    for name in names {
        let candidate = PersonType::new(1, name.trim());
        candidate.validate()?;
        conn.execute(
            "INSERT INTO person_types (name) VALUES (?1)",
            params![candidate.name],
        )?;
        created.push(PersonType::new(conn.last_insert_rowid(), candidate.name));
    }
    print_lines(&created)
}

fn print_lines<T: Serialize>(items: &[T]) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
