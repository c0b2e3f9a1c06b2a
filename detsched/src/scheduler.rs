/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Serializing scheduler for traced processes.
//!
//! Every known process lives in exactly one of four collections:
//!
//! - *independent*: running freely in user space, not subject to arbitration.
//! - *runnable*: a FIFO of processes stopped at a trapped syscall. The head is the one
//!   process allowed to make kernel-syscall progress.
//! - *blocked*: a FIFO of processes that entered a syscall which has not completed yet. The
//!   head is retried round-robin.
//! - *finished*: exited processes. Terminal.
//!
//! Transitions that pop a queue head take the process the caller believes is at the front.
//! A mismatch means the driver loop has desynchronized from the scheduler, and is reported
//! as [`SchedError::ProtocolViolation`] without modifying anything.

pub mod pid_queue;

use std::collections::BTreeSet;
use std::fmt;

use detsched_model::Placement;
use detsched_model::SchedConfig;
use detsched_model::SchedSnapshot;
use detsched_model::TracedPid;
use tracing::Level;
use tracing::enabled;
use tracing::trace;
use tracing::warn;

use crate::error::Front;
use crate::error::SchedError;
use crate::error::Transition;
use crate::schedlog;
use crate::schedlog_debug;
use crate::scheduler::pid_queue::PidQueue;

/// The syscall-arbitration state for one traced process tree.
#[derive(Debug, Clone)]
pub struct Scheduler {
    starting_pid: TracedPid,
    independent: BTreeSet<TracedPid>,
    runnable: PidQueue,
    blocked: PidQueue,
    finished: BTreeSet<TracedPid>,
    cfg: SchedConfig,
}

/// A multi-line print of every collection.
impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scheduler, starting pid={}:", self.starting_pid)?;
        write!(f, "    independent: [")?;
        for (i, pid) in self.independent.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pid)?;
        }
        writeln!(f, "]")?;
        writeln!(f, "    runnable:    {}", self.runnable)?;
        writeln!(f, "    blocked:     {}", self.blocked)?;
        write!(f, "    finished:    [")?;
        for (i, pid) in self.finished.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pid)?;
        }
        writeln!(f, "]")
    }
}

impl Scheduler {
    /// Create a scheduler whose only process is `starting_pid`, running independently.
    pub fn new(starting_pid: TracedPid) -> Self {
        Self::with_config(starting_pid, &SchedConfig::default())
    }

    /// Create a scheduler with explicit configuration. The starting process is placed in the
    /// runnable queue instead when `root_starts_runnable` is set.
    pub fn with_config(starting_pid: TracedPid, cfg: &SchedConfig) -> Self {
        let mut sched = Scheduler {
            starting_pid,
            independent: BTreeSet::new(),
            runnable: PidQueue::new(),
            blocked: PidQueue::new(),
            finished: BTreeSet::new(),
            cfg: cfg.clone(),
        };
        if cfg.root_starts_runnable {
            sched.runnable.push_back(starting_pid);
        } else {
            sched.independent.insert(starting_pid);
        }
        schedlog!("starting pid [{}]", starting_pid);
        sched
    }

    /// The root process recorded at construction.
    pub fn starting_pid(&self) -> TracedPid {
        self.starting_pid
    }

    pub fn config(&self) -> &SchedConfig {
        &self.cfg
    }

    pub fn is_independent(&self, pid: TracedPid) -> bool {
        self.independent.contains(&pid)
    }

    pub fn is_finished(&self, pid: TracedPid) -> bool {
        self.finished.contains(&pid)
    }

    /// Is the process independent, runnable or blocked? Read-only.
    pub fn is_alive(&self, pid: TracedPid) -> bool {
        let placement = self.placement(pid);
        match placement {
            Some(p) if p.is_active() => {
                schedlog_debug!("process [{}] is in the {} collection", pid, p);
                true
            }
            _ => false,
        }
    }

    /// Which collection currently holds `pid`, if any.
    pub fn placement(&self, pid: TracedPid) -> Option<Placement> {
        if self.independent.contains(&pid) {
            Some(Placement::Independent)
        } else if self.runnable.contains(pid) {
            Some(Placement::Runnable)
        } else if self.blocked.contains(pid) {
            Some(Placement::Blocked)
        } else if self.finished.contains(&pid) {
            Some(Placement::Finished)
        } else {
            None
        }
    }

    /// No work is left: nothing independent, runnable or blocked. Finished processes do not
    /// count.
    pub fn is_empty(&self) -> bool {
        self.independent.is_empty() && self.runnable.is_empty() && self.blocked.is_empty()
    }

    pub fn count_blocked(&self) -> usize {
        self.blocked.len()
    }

    pub fn count_runnable(&self) -> usize {
        self.runnable.len()
    }

    pub fn count_independent(&self) -> usize {
        self.independent.len()
    }

    pub fn count_finished(&self) -> usize {
        self.finished.len()
    }

    /// The process currently permitted to progress a trapped syscall.
    pub fn peek_next_runnable(&self) -> Option<TracedPid> {
        self.runnable.front()
    }

    /// The blocked process whose syscall should be retried next.
    pub fn peek_next_blocked(&self) -> Option<TracedPid> {
        self.blocked.front()
    }

    /// The syscall of the blocked head `expected` is not ready to complete: send it to the
    /// back of the blocked queue so the others get a turn.
    pub fn resume_retry(&mut self, expected: TracedPid) -> Result<(), SchedError> {
        self.blocked
            .rotate_front(expected)
            .map_err(|front| SchedError::ProtocolViolation {
                transition: Transition::ResumeRetry,
                expected,
                actual_front: Front::Blocked(front),
            })?;
        schedlog!("retry [{}], blocked={}", expected, self.blocked);
        self.after_transition();
        Ok(())
    }

    /// The runnable head `expected` entered its syscall: move it to the tail of the blocked
    /// queue.
    pub fn preempt_syscall(&mut self, expected: TracedPid) -> Result<(), SchedError> {
        self.runnable
            .pop_front_if(expected)
            .map_err(|front| SchedError::ProtocolViolation {
                transition: Transition::PreemptSyscall,
                expected,
                actual_front: Front::Runnable(front),
            })?;
        self.blocked.push_back(expected);
        schedlog!("preempt [{}] into blocked={}", expected, self.blocked);
        self.after_transition();
        Ok(())
    }

    /// Release `pid` from arbitration back to free execution. It must head the blocked queue
    /// or, failing that, the runnable queue.
    pub fn resume_parallel(&mut self, pid: TracedPid) -> Result<(), SchedError> {
        let from = if self.blocked.pop_front_if(pid).is_ok() {
            Placement::Blocked
        } else if self.runnable.pop_front_if(pid).is_ok() {
            Placement::Runnable
        } else {
            return Err(SchedError::ProtocolViolation {
                transition: Transition::ResumeParallel,
                expected: pid,
                actual_front: Front::Either {
                    runnable: self.runnable.front(),
                    blocked: self.blocked.front(),
                },
            });
        };
        self.independent.insert(pid);
        schedlog!("resume [{}] in parallel, from {}", pid, from);
        self.after_transition();
        Ok(())
    }

    /// Record a newly observed process as running freely. Returns false, and does nothing,
    /// if the process is already independent.
    pub fn add_to_independent(&mut self, pid: TracedPid) -> Result<bool, SchedError> {
        match self.placement(pid) {
            None => {}
            Some(Placement::Independent) => return Ok(false),
            Some(Placement::Finished) => return Err(SchedError::AlreadyFinished { pid }),
            Some(placement) => return Err(SchedError::AlreadyQueued { pid, placement }),
        }
        self.independent.insert(pid);
        schedlog!("new independent [{}]", pid);
        self.after_transition();
        Ok(true)
    }

    /// A process enters arbitration: take it out of the independent set (if it was there)
    /// and append it to the runnable queue.
    pub fn move_to_runnable(&mut self, pid: TracedPid) -> Result<(), SchedError> {
        match self.placement(pid) {
            None | Some(Placement::Independent) => {}
            Some(Placement::Finished) => return Err(SchedError::AlreadyFinished { pid }),
            Some(placement) => return Err(SchedError::AlreadyQueued { pid, placement }),
        }
        self.independent.remove(&pid);
        self.runnable.push_back(pid);
        schedlog!("runnable [{}], runnable={}", pid, self.runnable);
        self.after_transition();
        Ok(())
    }

    /// The process exited. Remove it from whichever active collection holds it and mark it
    /// finished, returning where it was. A process that was never observed goes straight to
    /// finished. Finishing twice is a no-op unless `strict_exit` is configured.
    pub fn remove_completely(&mut self, pid: TracedPid) -> Result<Option<Placement>, SchedError> {
        let placement = self.placement(pid);
        match placement {
            Some(Placement::Independent) => {
                self.independent.remove(&pid);
            }
            Some(Placement::Runnable) => {
                self.runnable.remove(pid);
            }
            Some(Placement::Blocked) => {
                self.blocked.remove(pid);
            }
            Some(Placement::Finished) => {
                if self.cfg.strict_exit {
                    return Err(SchedError::AlreadyFinished { pid });
                }
                warn!("[sched] process [{}] finished twice, ignoring", pid);
                return Ok(placement);
            }
            None => {
                trace!("[sched] process [{}] exited before it was observed", pid);
            }
        }
        self.finished.insert(pid);
        match placement {
            Some(p) => schedlog!("finished [{}], removed from {}", pid, p),
            None => schedlog!("finished [{}]", pid),
        }
        self.after_transition();
        Ok(placement)
    }

    /// Copy out the contents of every collection.
    pub fn snapshot(&self) -> SchedSnapshot {
        SchedSnapshot {
            starting_pid: self.starting_pid,
            independent: self.independent.clone(),
            runnable: self.runnable.iter().collect(),
            blocked: self.blocked.iter().collect(),
            finished: self.finished.clone(),
        }
    }

    fn after_transition(&self) {
        if self.cfg.should_check_invariants() {
            self.check_invariants();
        }
        if self.cfg.dump_transitions && enabled!(Level::TRACE) {
            trace!("[sched] {}", self);
        }
    }

    /// Expensive. Panics if any process is in more than one collection.
    fn check_invariants(&self) {
        let mut seen = BTreeSet::new();
        let all = self
            .independent
            .iter()
            .copied()
            .chain(self.runnable.iter())
            .chain(self.blocked.iter())
            .chain(self.finished.iter().copied());
        for pid in all {
            if !seen.insert(pid) {
                panic!(
                    "Invariant violation! Process {} is in more than one collection:\n{}",
                    pid, self
                );
            }
        }
    }
}
