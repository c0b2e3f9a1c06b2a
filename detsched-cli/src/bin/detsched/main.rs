/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

mod global_opts;
mod replay;
mod tracing;

use clap::Parser;
use colored::*;
use detsched_cli::Error;

use self::global_opts::GlobalOpts;
use self::replay::ReplayOpts;

#[derive(Debug, Parser)]
#[clap(name = "detsched", version)]
struct Args {
    #[clap(flatten)]
    global: GlobalOpts,

    #[clap(subcommand)]
    command: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Replay a recorded process-event script through the scheduler.
    #[clap(name = "replay")]
    Replay(ReplayOpts),
}

impl Subcommand {
    fn main(&self, global: &GlobalOpts) -> Result<i32, Error> {
        match self {
            Subcommand::Replay(x) => x.main(global),
        }
    }
}

fn main() {
    let Args { global, command } = Args::parse();

    let code = command.main(&global).unwrap_or_else(|err| {
        display_error(err);
        1
    });
    std::process::exit(code);
}

fn display_error(error: Error) {
    let mut chain = error.chain();

    if let Some(error) = chain.next() {
        eprintln!("{}: {}", "Error".red().bold(), error);
    }

    for cause in chain {
        eprintln!("     {} {}", ">".dimmed().bold(), cause);
    }
}
