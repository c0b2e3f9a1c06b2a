/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::BTreeSet;

use detsched::Front;
use detsched::SchedError;
use detsched::SchedSnapshot;
use detsched::Scheduler;
use detsched::TracedPid;
use detsched::Transition;
use pretty_assertions::assert_eq;

fn p(raw: i32) -> TracedPid {
    TracedPid::from_raw(raw)
}

fn set(raw: &[i32]) -> BTreeSet<TracedPid> {
    raw.iter().copied().map(p).collect()
}

fn queue(raw: &[i32]) -> Vec<TracedPid> {
    raw.iter().copied().map(p).collect()
}

fn snapshot(
    independent: &[i32],
    runnable: &[i32],
    blocked: &[i32],
    finished: &[i32],
) -> SchedSnapshot {
    SchedSnapshot {
        starting_pid: p(100),
        independent: set(independent),
        runnable: queue(runnable),
        blocked: queue(blocked),
        finished: set(finished),
    }
}

/// Blocked queue [a, b, c] in that order, starting from root 100.
fn blocked_abc() -> Scheduler {
    let mut sched = Scheduler::new(p(100));
    for pid in [1, 2, 3] {
        sched.move_to_runnable(p(pid)).unwrap();
        sched.preempt_syscall(p(pid)).unwrap();
    }
    sched
}

#[test]
fn single_process_lifecycle() {
    let mut sched = Scheduler::new(p(100));
    assert!(sched.is_independent(p(100)));
    assert!(!sched.is_empty());

    sched.move_to_runnable(p(100)).unwrap();
    assert_eq!(sched.snapshot(), snapshot(&[], &[100], &[], &[]));

    sched.preempt_syscall(p(100)).unwrap();
    assert_eq!(sched.snapshot(), snapshot(&[], &[], &[100], &[]));

    sched.resume_parallel(p(100)).unwrap();
    assert_eq!(sched.snapshot(), snapshot(&[100], &[], &[], &[]));

    sched.remove_completely(p(100)).unwrap();
    assert_eq!(sched.snapshot(), snapshot(&[], &[], &[], &[100]));
    assert!(sched.is_empty());
    assert!(sched.is_finished(p(100)));
}

#[test]
fn retry_rotates_blocked_head() {
    let mut sched = blocked_abc();
    sched.resume_retry(p(1)).unwrap();
    assert_eq!(sched.snapshot(), snapshot(&[100], &[], &[2, 3, 1], &[]));
}

#[test]
fn retry_with_wrong_head_is_rejected() {
    let mut sched = blocked_abc();
    let before = sched.snapshot();
    assert_eq!(
        sched.resume_retry(p(2)),
        Err(SchedError::ProtocolViolation {
            transition: Transition::ResumeRetry,
            expected: p(2),
            actual_front: Front::Blocked(Some(p(1))),
        })
    );
    assert_eq!(sched.snapshot(), before);
}

#[test]
fn preempt_moves_runnable_head_to_blocked() {
    let mut sched = Scheduler::new(p(100));
    sched.move_to_runnable(p(1)).unwrap();
    sched.move_to_runnable(p(2)).unwrap();
    sched.preempt_syscall(p(1)).unwrap();
    assert_eq!(sched.snapshot(), snapshot(&[100], &[2], &[1], &[]));
}

#[test]
fn resume_parallel_requires_a_queue_head() {
    let mut sched = blocked_abc();
    sched.resume_parallel(p(1)).unwrap();
    assert_eq!(sched.snapshot(), snapshot(&[1, 100], &[], &[2, 3], &[]));

    let before = sched.snapshot();
    assert!(matches!(
        sched.resume_parallel(p(3)),
        Err(SchedError::ProtocolViolation {
            transition: Transition::ResumeParallel,
            ..
        })
    ));
    assert_eq!(sched.snapshot(), before);
}

#[test]
fn round_robin_visits_each_once_per_cycle() {
    let mut sched = blocked_abc();
    let mut visits = Vec::new();
    for _ in 0..6 {
        let head = sched.peek_next_blocked().unwrap();
        visits.push(head);
        sched.resume_retry(head).unwrap();
    }
    assert_eq!(visits, queue(&[1, 2, 3, 1, 2, 3]));
}

#[test]
fn is_alive_does_not_disturb_queues() {
    let mut sched = blocked_abc();
    sched.move_to_runnable(p(4)).unwrap();
    sched.move_to_runnable(p(5)).unwrap();
    let before = sched.snapshot();

    for pid in [1, 2, 3, 4, 5, 100] {
        assert!(sched.is_alive(p(pid)));
    }
    assert!(!sched.is_alive(p(6)));
    assert_eq!(sched.snapshot(), before);
}

#[test]
fn empty_ignores_finished() {
    let mut sched = blocked_abc();
    assert!(!sched.is_empty());
    for pid in [2, 1, 100, 3] {
        sched.remove_completely(p(pid)).unwrap();
    }
    assert!(sched.is_empty());
    assert_eq!(sched.count_finished(), 4);
    assert_eq!(sched.peek_next_blocked(), None);
    assert_eq!(sched.peek_next_runnable(), None);
}

#[test]
fn counts_track_queues() {
    let mut sched = blocked_abc();
    sched.move_to_runnable(p(4)).unwrap();
    assert_eq!(sched.count_blocked(), 3);
    assert_eq!(sched.count_runnable(), 1);
    sched.remove_completely(p(2)).unwrap();
    assert_eq!(sched.count_blocked(), 2);
    assert_eq!(sched.snapshot().blocked, queue(&[1, 3]));
}
