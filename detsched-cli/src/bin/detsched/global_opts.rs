/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use detsched_cli::Context;
use detsched_cli::Error;
use tracing::metadata::LevelFilter;

use super::tracing::init_file_tracing;
use super::tracing::init_stderr_tracing;

/// detsched serializes the syscalls of a traced process tree: at any instant only one
/// process progresses through a kernel-dispatched syscall, while the others wait in FIFO
/// order or run freely in user space.
///
/// Below are options common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct GlobalOpts {
    /// The verbosity level of log output.
    #[clap(short, long, value_name = "LEVEL", env = "DETSCHED_LOG")]
    pub log: Option<LevelFilter>,

    /// Log to a file instead of the terminal.
    #[clap(long, value_name = "FILE", env = "DETSCHED_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Initializes tracing. The returned guard flushes the log file when dropped.
    #[must_use = "This function returns a guard that should not be immediately dropped"]
    pub fn init_tracing(&self) -> Result<Option<impl Drop + use<>>, Error> {
        if let Some(path) = &self.log_file {
            let file_writer = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Ok(Some(init_file_tracing(self.log, file_writer)))
        } else {
            init_stderr_tracing(self.log);
            Ok(None)
        }
    }
}
