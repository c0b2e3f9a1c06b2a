/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::pid::TracedPid;

// Process status events
//--------------------------------------------------------------------------------

/// A status change of a traced process, as observed by the tracing layer. The driver loop
/// translates each of these into exactly one scheduler transition.
#[derive(PartialEq, Debug, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessEvent {
    /// A new process (e.g. a freshly traced child) was observed for the first time.
    Spawned(TracedPid),

    /// A freely running process stopped at a syscall and must wait for its turn.
    SyscallTrapped(TracedPid),

    /// The running process entered its syscall and now waits in line for completion.
    SyscallEntered(TracedPid),

    /// The syscall of the process at the head of the blocked queue could not complete yet.
    SyscallRetryable(TracedPid),

    /// The syscall completed (or was exempted) and the process returns to user space.
    ResumedToUser(TracedPid),

    /// The process exited.
    Exited(TracedPid),
}

impl ProcessEvent {
    /// The process this event is about.
    pub fn pid(&self) -> TracedPid {
        match *self {
            ProcessEvent::Spawned(pid)
            | ProcessEvent::SyscallTrapped(pid)
            | ProcessEvent::SyscallEntered(pid)
            | ProcessEvent::SyscallRetryable(pid)
            | ProcessEvent::ResumedToUser(pid)
            | ProcessEvent::Exited(pid) => pid,
        }
    }
}

impl fmt::Display for ProcessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessEvent::Spawned(_) => "spawned",
            ProcessEvent::SyscallTrapped(_) => "syscall-trapped",
            ProcessEvent::SyscallEntered(_) => "syscall-entered",
            ProcessEvent::SyscallRetryable(_) => "syscall-retryable",
            ProcessEvent::ResumedToUser(_) => "resumed-to-user",
            ProcessEvent::Exited(_) => "exited",
        };
        write!(f, "{}({})", name, self.pid())
    }
}

/// Which of the scheduler's collections currently holds a process.
#[derive(PartialEq, Debug, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Running freely in user space.
    Independent,
    /// Waiting for its turn to execute a trapped syscall.
    Runnable,
    /// Parked after syscall entry.
    Blocked,
    /// Exited. Terminal.
    Finished,
}

impl Placement {
    /// Independent, runnable and blocked processes are alive; finished ones are not.
    pub fn is_active(self) -> bool {
        self != Placement::Finished
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Placement::Independent => "independent",
            Placement::Runnable => "runnable",
            Placement::Blocked => "blocked",
            Placement::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// A point-in-time copy of every scheduler collection. Sets are in ascending order, queues
/// in FIFO order (head first).
#[derive(PartialEq, Debug, Eq, Clone, Serialize, Deserialize)]
pub struct SchedSnapshot {
    /// The root process the scheduler was constructed with.
    pub starting_pid: TracedPid,
    pub independent: BTreeSet<TracedPid>,
    pub runnable: Vec<TracedPid>,
    pub blocked: Vec<TracedPid>,
    pub finished: BTreeSet<TracedPid>,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn event_json_form() {
        let ev = ProcessEvent::SyscallEntered(TracedPid::from_raw(7));
        let s = serde_json::to_string(&ev).unwrap();
        assert_eq!(s, r#"{"syscall_entered":7}"#);
        let back: ProcessEvent = serde_json::from_str(&s).unwrap();
        assert_eq!(back, ev);
        assert_eq!(back.pid(), TracedPid::from_raw(7));
    }

    #[test]
    fn event_display() {
        let ev = ProcessEvent::ResumedToUser(TracedPid::from_raw(12));
        assert_eq!(ev.to_string(), "resumed-to-user(12)");
    }

    #[test]
    fn finished_is_not_active() {
        assert!(Placement::Blocked.is_active());
        assert!(!Placement::Finished.is_active());
    }
}
