/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use detsched::Dispatch;
use detsched::Driver;
use detsched::SchedConfig;
use detsched::TracedPid;
use detsched_cli::Context;
use detsched_cli::Error;
use detsched_cli::RecordingTracer;
use detsched_cli::read_script;
use serde::Serialize;
use tracing::info;

use crate::global_opts::GlobalOpts;

/// Feed a recorded sequence of process events through the scheduler and report every
/// resume decision.
#[derive(Debug, Parser)]
pub struct ReplayOpts {
    /// JSON-lines file of process events, e.g. `{"syscall_trapped": 100}`.
    #[clap(value_name = "SCRIPT")]
    script: PathBuf,

    /// The starting process, already running when the script begins.
    #[clap(long, value_name = "PID")]
    root: TracedPid,

    /// Print the resume decisions and the final scheduler state as JSON.
    #[clap(long)]
    json: bool,

    #[clap(flatten)]
    sched: SchedConfig,
}

#[derive(Serialize)]
struct Report<'a> {
    dispatches: &'a [detsched_cli::DispatchRecord],
    finished: bool,
    state: detsched::SchedSnapshot,
}

impl ReplayOpts {
    pub fn main(&self, global: &GlobalOpts) -> Result<i32, Error> {
        let _guard = global.init_tracing()?;

        let events = read_script(&self.script)?;
        let root = self.root;
        info!("replaying {} events with root [{}]", events.len(), root);

        let mut driver = Driver::new(root, &self.sched, RecordingTracer::new());
        let mut last = driver.start()?;
        for (i, event) in events.iter().enumerate() {
            driver.tracer_mut().set_event(i);
            last = driver
                .handle(*event)
                .with_context(|| format!("event #{} {} desynchronized the scheduler", i, event))?;
        }

        let finished = last == Dispatch::Finished;
        if self.json {
            let report = Report {
                dispatches: driver.tracer().records(),
                finished,
                state: driver.scheduler().snapshot(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for rec in driver.tracer().records() {
                let event = match rec.event {
                    Some(i) => format!("#{} {}", i, events[i]),
                    None => "start".to_owned(),
                };
                println!("{:<32} resume [{}] {}", event, rec.pid, rec.mode.to_string().bold());
            }
            print!("{}", driver.scheduler());
            if finished {
                println!("{}", "all processes finished".green());
            } else {
                println!("{}", "processes still active".yellow());
            }
        }
        Ok(0)
    }
}
