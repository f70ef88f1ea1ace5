//! CLI smoke entry point.
//!
//! # Responsibility
//! - Write a small demo batch through `relmap_core` and read it back.
//! - Keep output deterministic apart from generated identities.
//!
//! Usage: `relmap_cli [DB_PATH]` (in-memory when omitted). Set
//! `RELMAP_LOG_DIR` to an absolute path to enable file logging.

use log::error;
use relmap_core::db::{open_db, open_db_in_memory};
use relmap_core::{row_count, AggregateTable, Child, Parent, ParentKey, SqliteAggregateService};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("relmap_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("RELMAP_LOG_DIR") {
        relmap_core::init_logging(relmap_core::default_log_level(), &log_dir)?;
    }

    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = SqliteAggregateService::from_connection(&conn);

    let first = Parent::new(vec![Child::new(), Child::new()]);
    let second = Parent::new(vec![Child::new()]);
    let third = Parent::new(vec![Child::new(), first.children[0]]);

    let inserted = service.create_many(&[first.clone(), second.clone(), third.clone()])?;
    println!("relmap_core version={}", relmap_core::core_version());
    println!("inserted parents={inserted}");
    for table in AggregateTable::WRITE_ORDER {
        println!("rows {table}={}", row_count(&conn, table)?);
    }

    let fetched = service.query(ParentKey::Many(vec![first.id, second.id, third.id]))?;
    for parent in fetched.into_many() {
        let children: Vec<String> = parent.child_ids().iter().map(|id| id.to_string()).collect();
        println!("parent {} children=[{}]", parent.id, children.join(", "));
    }

    Ok(())
}
