/* src/platform/mod.rs
 *
 * Copyright 2023 Romeo Calota
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 *
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

use std::path::PathBuf;

pub use counters_ext::CounterSource;
pub use platform_impl::{install_shutdown_handler, is_running, pin_to_cpu, LinuxCounters};

mod counters_ext;

#[cfg(target_os = "linux")]
#[path = "linux/mod.rs"]
mod platform_impl;

/// Failures that leave the sampler without usable counters. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("Failed to open {path}: {source}", path = .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}", path = .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to list processes in {path}: {source}", path = .path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unexpected end of CPU counters: expected {expected} cores, found {found}")]
    MissingCores { expected: usize, found: usize },
    #[error("Malformed counters for core {core}: '{line}'")]
    MalformedCore { core: usize, line: String },
}
