/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

//! Support code for the `detsched` binary: reading recorded event scripts and a tracer that
//! only records what it was asked to resume.

mod script;
mod tracer;

pub use anyhow::Context;
pub use script::parse_script;
pub use script::read_script;
pub use tracer::DispatchRecord;
pub use tracer::RecordingTracer;

pub type Error = anyhow::Error;
