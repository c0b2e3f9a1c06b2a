/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

//! Serializes the system calls of a traced process tree so that only one process at a time
//! makes progress through a kernel-dispatched syscall.

pub mod driver;
pub mod error;
pub mod schedlog;
pub mod scheduler;

pub use detsched_model::Placement;
pub use detsched_model::ProcessEvent;
pub use detsched_model::SchedConfig;
pub use detsched_model::SchedSnapshot;
pub use detsched_model::TracedPid;
pub use driver::Dispatch;
pub use driver::Driver;
pub use driver::DriverError;
pub use driver::ResumeMode;
pub use driver::Tracer;
pub use error::Front;
pub use error::SchedError;
pub use error::Transition;
pub use scheduler::Scheduler;
