// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::compile;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    if m.get_flag("force") {
        compile::invalidate(conn)?;
    }
    if compile::run(conn)? {
        println!("Ledger compiled (version {})", compile::COMPILE_VERSION);
    } else {
        println!(
            "Already compiled at version {}; use --force to recompile",
            compile::COMPILE_VERSION
        );
    }
    Ok(())
}
