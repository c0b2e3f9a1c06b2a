/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Scheduler configuration.

use clap::Parser;
use serde::Deserialize;
use serde::Serialize;

/// Configuration options for the syscall-arbitration scheduler.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, Parser)]
#[serde(default)]
pub struct SchedConfig {
    /// Treat a second exit of an already finished process as a fatal error, rather than
    /// silently ignoring it.
    #[clap(long)]
    pub strict_exit: bool,

    /// Seed the starting process directly into the runnable queue, instead of letting it run
    /// freely until its first trapped syscall.
    #[clap(long)]
    pub root_starts_runnable: bool,

    /// Verify that the scheduler's collections are disjoint after every mutation, even in
    /// release builds. Debug builds always check.
    #[clap(long)]
    pub check_invariants: bool,

    /// Log the full contents of the scheduler at TRACE level after each transition.
    #[clap(long)]
    pub dump_transitions: bool,
}

impl SchedConfig {
    /// Whether the expensive disjointness check should run after each mutation.
    pub fn should_check_invariants(&self) -> bool {
        self.check_invariants || cfg!(debug_assertions)
    }
}
