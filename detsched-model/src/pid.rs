/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// An OS process (or thread) identifier under trace. The scheduler never
/// interprets it beyond equality and ordering.
#[derive(
    PartialEq, // Silly protection from rustfmt disagreements.
    Debug,
    Eq,
    Clone,
    Copy,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize
)]
#[serde(transparent)]
pub struct TracedPid(i32);

impl fmt::Display for TracedPid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TracedPid {
    /// Create a TracedPid from a raw pid.
    pub const fn from_raw(pid: i32) -> TracedPid {
        TracedPid(pid)
    }

    /// Convert to a raw integer.
    pub fn as_raw(&self) -> i32 {
        self.0
    }
}

impl FromStr for TracedPid {
    type Err = <i32 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_raw(s.parse::<i32>()?))
    }
}
