/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs;
use std::path::Path;

use anyhow::Context;
use detsched::ProcessEvent;

use crate::Error;

/// Parse a process-event script: one JSON-encoded [`ProcessEvent`] per line. Blank lines and
/// lines starting with `#` are skipped.
pub fn parse_script(text: &str) -> Result<Vec<ProcessEvent>, Error> {
    let mut events = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid process event {:?}", lineno + 1, line))?;
        events.push(event);
    }
    Ok(events)
}

/// Read and parse the script at `path`.
pub fn read_script<P: AsRef<Path>>(path: P) -> Result<Vec<ProcessEvent>, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read event script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("in event script {}", path.display()))
}
