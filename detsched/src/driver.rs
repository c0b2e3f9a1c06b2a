/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The event loop glue between the tracing layer and the [`Scheduler`].
//!
//! Each observed [`ProcessEvent`] becomes exactly one scheduler transition. Afterwards the
//! driver decides which stopped process to let go next. At most one arbitrated process is
//! ever in flight: it was resumed to perform (or retry) its syscall and has not reported
//! back yet.

use std::fmt;

use detsched_model::ProcessEvent;
use detsched_model::SchedConfig;
use detsched_model::TracedPid;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::error::SchedError;
use crate::schedlog;
use crate::scheduler::Scheduler;

/// How a stopped process should be resumed by the tracing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeMode {
    /// Run freely in user space, outside of arbitration.
    Free,
    /// Perform the trapped syscall. Only the runnable head gets this.
    Syscall,
    /// Re-attempt a syscall that could not complete before. Only the blocked head gets this.
    Retry,
}

impl fmt::Display for ResumeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResumeMode::Free => "free",
            ResumeMode::Syscall => "syscall",
            ResumeMode::Retry => "retry",
        };
        f.write_str(s)
    }
}

/// The part of the tracing layer the driver needs: a way to let a stopped process continue.
pub trait Tracer {
    type Error: std::error::Error + 'static;

    fn resume(&mut self, pid: TracedPid, mode: ResumeMode) -> Result<(), Self::Error>;
}

/// What the driver decided after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// An arbitrated process was resumed and is now in flight.
    Resumed { pid: TracedPid, mode: ResumeMode },
    /// Nothing new to resume; wait for the next event.
    Waiting,
    /// Every process has finished.
    Finished,
}

#[derive(Debug, Error)]
pub enum DriverError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Sched(#[from] SchedError),

    #[error("failed to resume process [{pid}] ({mode})")]
    Tracer {
        pid: TracedPid,
        mode: ResumeMode,
        #[source]
        source: E,
    },
}

/// Owns the scheduler for one traced process tree and the tracer used to resume it.
pub struct Driver<T> {
    sched: Scheduler,
    tracer: T,
    in_flight: Option<TracedPid>,
}

impl<T: Tracer> Driver<T> {
    pub fn new(starting_pid: TracedPid, cfg: &SchedConfig, tracer: T) -> Self {
        Driver {
            sched: Scheduler::with_config(starting_pid, cfg),
            tracer,
            in_flight: None,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.sched
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut T {
        &mut self.tracer
    }

    /// The arbitrated process that was resumed and has not reported back yet.
    pub fn in_flight(&self) -> Option<TracedPid> {
        self.in_flight
    }

    pub fn into_parts(self) -> (Scheduler, T) {
        (self.sched, self.tracer)
    }

    /// Apply the transition for `event`, then resume whatever should run next.
    pub fn handle(&mut self, event: ProcessEvent) -> Result<Dispatch, DriverError<T::Error>> {
        let pid = event.pid();
        debug!("[driver] handling {}", event);

        match event {
            ProcessEvent::Spawned(_) | ProcessEvent::Exited(_) => {}
            _ => {
                if !self.sched.is_alive(pid) {
                    return Err(SchedError::UnknownIdentifier { pid }.into());
                }
            }
        }

        match event {
            ProcessEvent::Spawned(pid) => {
                if self.sched.add_to_independent(pid)? {
                    self.resume(pid, ResumeMode::Free)?;
                } else {
                    debug!("[driver] process [{}] already running freely", pid);
                }
            }
            ProcessEvent::SyscallTrapped(pid) => self.sched.move_to_runnable(pid)?,
            ProcessEvent::SyscallEntered(pid) => self.sched.preempt_syscall(pid)?,
            ProcessEvent::SyscallRetryable(pid) => self.sched.resume_retry(pid)?,
            ProcessEvent::ResumedToUser(pid) => {
                self.sched.resume_parallel(pid)?;
                self.resume(pid, ResumeMode::Free)?;
            }
            ProcessEvent::Exited(pid) => {
                self.sched.remove_completely(pid)?;
            }
        }

        // The in-flight process only counts as reported back once its transition succeeded.
        if self.in_flight == Some(pid) {
            self.in_flight = None;
        }
        self.dispatch()
    }

    /// Resume the starting process if it begins under arbitration. Calling this more than
    /// once is harmless.
    pub fn start(&mut self) -> Result<Dispatch, DriverError<T::Error>> {
        self.dispatch()
    }

    /// Handle every event in order, stopping at the first error.
    pub fn run<I>(&mut self, events: I) -> Result<Dispatch, DriverError<T::Error>>
    where
        I: IntoIterator<Item = ProcessEvent>,
    {
        let mut last = self.start()?;
        for event in events {
            last = self.handle(event)?;
        }
        Ok(last)
    }

    fn dispatch(&mut self) -> Result<Dispatch, DriverError<T::Error>> {
        if self.in_flight.is_some() {
            return Ok(Dispatch::Waiting);
        }
        let next = if let Some(pid) = self.sched.peek_next_runnable() {
            Some((pid, ResumeMode::Syscall))
        } else {
            self.sched
                .peek_next_blocked()
                .map(|pid| (pid, ResumeMode::Retry))
        };
        match next {
            Some((pid, mode)) => {
                self.resume(pid, mode)?;
                self.in_flight = Some(pid);
                Ok(Dispatch::Resumed { pid, mode })
            }
            None if self.sched.is_empty() => Ok(Dispatch::Finished),
            None => Ok(Dispatch::Waiting),
        }
    }

    fn resume(&mut self, pid: TracedPid, mode: ResumeMode) -> Result<(), DriverError<T::Error>> {
        schedlog!("resume [{}] ({})", pid, mode);
        self.tracer
            .resume(pid, mode)
            .map_err(|source| DriverError::Tracer { pid, mode, source })
    }
}
