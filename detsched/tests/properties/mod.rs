/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Random walks over the transition graph. Every step, valid or not, must leave the
//! collections pairwise disjoint, and a failed step must leave them untouched.

use std::collections::BTreeSet;

use detsched::SchedConfig;
use detsched::SchedSnapshot;
use detsched::Scheduler;
use detsched::TracedPid;
use pretty_assertions::assert_eq;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const NUM_PIDS: i32 = 12;
const STEPS: usize = 2000;

fn assert_disjoint(snap: &SchedSnapshot) {
    let mut seen = BTreeSet::new();
    let all = snap
        .independent
        .iter()
        .chain(snap.runnable.iter())
        .chain(snap.blocked.iter())
        .chain(snap.finished.iter());
    for pid in all {
        assert!(seen.insert(*pid), "{} appears twice in {:?}", pid, snap);
    }
}

fn random_walk(seed: u64, cfg: &SchedConfig) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut sched = Scheduler::with_config(TracedPid::from_raw(0), cfg);
    let mut ever_finished = BTreeSet::new();

    for _ in 0..STEPS {
        let before = sched.snapshot();
        let pid = TracedPid::from_raw(rng.gen_range(0..NUM_PIDS));
        // Aim at the real queue heads most of the time, so that valid transitions happen.
        let runnable_head = sched.peek_next_runnable().unwrap_or(pid);
        let blocked_head = sched.peek_next_blocked().unwrap_or(pid);
        let result = match rng.gen_range(0..7) {
            0 => sched.add_to_independent(pid).map(|_| ()),
            1 => sched.move_to_runnable(pid),
            2 => sched.preempt_syscall(runnable_head),
            3 => sched.resume_retry(blocked_head),
            4 => sched.resume_parallel(if rng.gen_bool(0.5) {
                runnable_head
            } else {
                blocked_head
            }),
            5 => sched.resume_parallel(pid),
            _ => {
                if rng.gen_bool(0.2) {
                    sched.remove_completely(pid).map(|_| ())
                } else {
                    Ok(())
                }
            }
        };

        let after = sched.snapshot();
        assert_disjoint(&after);
        if result.is_err() {
            assert_eq!(after, before);
        }
        for pid in &ever_finished {
            assert!(sched.is_finished(*pid));
            assert!(!sched.is_alive(*pid));
        }
        ever_finished.extend(after.finished.iter().copied());
        assert_eq!(
            sched.is_empty(),
            after.independent.is_empty() && after.runnable.is_empty() && after.blocked.is_empty()
        );
        assert_eq!(sched.count_runnable(), after.runnable.len());
        assert_eq!(sched.count_blocked(), after.blocked.len());
    }
}

#[test]
fn random_walks_preserve_invariants() {
    for seed in 0..20 {
        random_walk(seed, &SchedConfig::default());
    }
}

#[test]
fn random_walks_with_strict_exit() {
    let cfg = SchedConfig {
        strict_exit: true,
        check_invariants: true,
        root_starts_runnable: true,
        ..Default::default()
    };
    for seed in 100..110 {
        random_walk(seed, &cfg);
    }
}
