// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use ledgerlens::{cli, commands, compile, config, db};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let cfg = config::Config::load()?;

    let path = match matches.get_one::<PathBuf>("db") {
        Some(p) => p.clone(),
        None => db::snapshot_path(&cfg)?,
    };
    let mut conn = db::open_snapshot(&path)?;

    // One-time compilation gate: a no-op when the snapshot is already
    // compiled at the current version.
    compile::run(&mut conn)?;

    match matches.subcommand() {
        Some(("compile", sub)) => commands::compile::handle(&mut conn, sub)?,
        Some(("accounts", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("categories", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("currencies", sub)) => commands::rates::currencies(&conn, sub)?,
        Some(("rates", sub)) => commands::rates::handle(&conn, &cfg, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
