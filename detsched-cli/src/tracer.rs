/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::convert::Infallible;

use detsched::ResumeMode;
use detsched::TracedPid;
use detsched::Tracer;
use serde::Serialize;

/// One resume request issued by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    /// Index of the event that caused this resume; `None` before the first event.
    pub event: Option<usize>,
    pub pid: TracedPid,
    pub mode: ResumeMode,
}

/// A tracer with no processes behind it. It only remembers what it was asked to do, which is
/// enough to replay a recorded event sequence and inspect the schedule.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    current_event: Option<usize>,
    records: Vec<DispatchRecord>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute subsequent resumes to event number `index`.
    pub fn set_event(&mut self, index: usize) {
        self.current_event = Some(index);
    }

    pub fn records(&self) -> &[DispatchRecord] {
        &self.records
    }
}

impl Tracer for RecordingTracer {
    type Error = Infallible;

    fn resume(&mut self, pid: TracedPid, mode: ResumeMode) -> Result<(), Infallible> {
        self.records.push(DispatchRecord {
            event: self.current_event,
            pid,
            mode,
        });
        Ok(())
    }
}
