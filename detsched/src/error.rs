/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use detsched_model::Placement;
use detsched_model::TracedPid;
use thiserror::Error;

/// The scheduler transitions that require a specific process at the front of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ResumeRetry,
    PreemptSyscall,
    ResumeParallel,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transition::ResumeRetry => "resume_retry",
            Transition::PreemptSyscall => "preempt_syscall",
            Transition::ResumeParallel => "resume_parallel",
        };
        f.write_str(s)
    }
}

/// What actually occupied the queue front(s) a transition looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Front {
    Runnable(Option<TracedPid>),
    Blocked(Option<TracedPid>),
    /// `resume_parallel` accepts the head of either queue.
    Either {
        runnable: Option<TracedPid>,
        blocked: Option<TracedPid>,
    },
}

struct Head(Option<TracedPid>);

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(pid) => write!(f, "[{}]", pid),
            None => f.write_str("nothing (empty)"),
        }
    }
}

impl fmt::Display for Front {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Front::Runnable(h) => write!(f, "runnable queue front is {}", Head(h)),
            Front::Blocked(h) => write!(f, "blocked queue front is {}", Head(h)),
            Front::Either { runnable, blocked } => write!(
                f,
                "runnable queue front is {}, blocked queue front is {}",
                Head(runnable),
                Head(blocked)
            ),
        }
    }
}

/// Errors surfaced by scheduler transitions. None of these are recoverable inside the
/// scheduler; a failed transition leaves every collection untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedError {
    /// The caller believed `expected` occupied a queue front, but it did not. This means the
    /// driver and the scheduler have desynchronized.
    #[error("{transition}: expected [{expected}] at the front, but {actual_front}")]
    ProtocolViolation {
        transition: Transition,
        expected: TracedPid,
        actual_front: Front,
    },

    /// The process is not known to any active collection, but had to be.
    #[error("process [{pid}] is not tracked by the scheduler")]
    UnknownIdentifier { pid: TracedPid },

    /// The process already exited and may not re-enter the scheduler.
    #[error("process [{pid}] has already finished")]
    AlreadyFinished { pid: TracedPid },

    /// The process is waiting in a queue and cannot be placed anywhere else without a
    /// front-of-queue transition.
    #[error("process [{pid}] is already in the {placement} queue")]
    AlreadyQueued {
        pid: TracedPid,
        placement: Placement,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn protocol_violation_message() {
        let err = SchedError::ProtocolViolation {
            transition: Transition::PreemptSyscall,
            expected: TracedPid::from_raw(5),
            actual_front: Front::Runnable(Some(TracedPid::from_raw(6))),
        };
        assert_eq!(
            err.to_string(),
            "preempt_syscall: expected [5] at the front, but runnable queue front is [6]"
        );
    }

    #[test]
    fn either_front_message() {
        let err = SchedError::ProtocolViolation {
            transition: Transition::ResumeParallel,
            expected: TracedPid::from_raw(1),
            actual_front: Front::Either {
                runnable: None,
                blocked: Some(TracedPid::from_raw(2)),
            },
        };
        assert_eq!(
            err.to_string(),
            "resume_parallel: expected [1] at the front, but runnable queue front is nothing (empty), blocked queue front is [2]"
        );
    }
}
