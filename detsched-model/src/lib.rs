/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Widely-shared type definitions for the syscall-arbitration scheduler.

pub mod config;
pub mod event;
pub mod pid;

pub use config::SchedConfig;
pub use event::Placement;
pub use event::ProcessEvent;
pub use event::SchedSnapshot;
pub use pid::TracedPid;
