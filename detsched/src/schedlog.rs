/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Macros for SCHEDLOG entries: the scheduling decisions that must be identical across two
//! runs of the same program. Diffing the SCHEDLOG lines of two runs is how a desynchronized
//! schedule is found.
//! ['schedlog'] writes a scheduling log entry at INFO level
//! ['schedlog_debug'] writes one at DEBUG level

/// Record a scheduler transition. This is at the INFO log level.
#[macro_export]
macro_rules! schedlog {
    ($($arg:tt)+) => {{
        tracing::info!("SCHEDLOG {}", format_args!($($arg)+));
    }};
}

/// Record a scheduler lookup or other low-importance decision. Requires that logging
/// verbosity is set to DEBUG.
#[macro_export]
macro_rules! schedlog_debug {
    ($($arg:tt)+) => {{
        tracing::debug!("SCHEDLOG {}", format_args!($($arg)+));
    }};
}
