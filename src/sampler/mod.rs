/* src/sampler/mod.rs
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

pub use pid_index::PidIndex;
pub use snapshot::Generation;
use top_k::top5;

use crate::platform::{CounterError, CounterSource};

mod pid_index;
mod snapshot;
#[cfg(test)]
pub mod test_source;
mod top_k;
mod usage;

/// Process names are truncated to this many bytes, matching the kernel's `comm` field with room
/// to spare.
pub type ProcessName = arrayvec::ArrayString<63>;

/// Initial process capacity of each generation, grown by doubling when exceeded.
const PROCESS_CAPACITY: usize = 1024;

/// Cumulative time counters for one CPU core, in clock ticks.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CoreSample {
    pub idle_ticks: u64,
    pub total_ticks: u64,
}

/// Cumulative user + system clock ticks consumed by one process since it started.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ProcessSample {
    pub pid: i32,
    pub name: ProcessName,
    pub cpu_ticks: u64,
}

/// CPU usage of one process over the last tick, as a percentage of all cores combined.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct UsageEntry {
    pub pid: i32,
    pub name: ProcessName,
    pub pct: f64,
}

/// Results of one sampling tick, borrowed from the sampler's buffers.
#[derive(Debug, Copy, Clone)]
pub struct Tick<'a> {
    /// Utilization of each core, core 0 first.
    pub core_usage: &'a [f64],
    /// Busiest processes, highest usage first, at most `top_k::TOP_K` of them.
    pub top: &'a [UsageEntry],
}

/// Double-buffered sampling engine.
///
/// Holds the previous and current generation of counters and every scratch buffer a tick needs,
/// so that steady-state sampling does not allocate.
pub struct Sampler<S: CounterSource> {
    source: S,
    previous: Generation,
    current: Generation,
    core_usage: Vec<f64>,
    usage: Vec<UsageEntry>,
}

impl<S: CounterSource> Sampler<S> {
    /// Allocates both generations and captures the first one, which becomes the baseline for
    /// the first call to `sample`.
    pub fn new(source: S) -> Result<Self, CounterError> {
        let core_count = source.core_count();

        let mut this = Self {
            source,
            previous: Generation::new(core_count, PROCESS_CAPACITY),
            current: Generation::new(core_count, PROCESS_CAPACITY),
            core_usage: vec![0.; core_count],
            usage: Vec::with_capacity(PROCESS_CAPACITY),
        };
        this.previous.capture(&mut this.source)?;

        Ok(this)
    }

    pub fn core_count(&self) -> usize {
        self.core_usage.len()
    }

    /// Captures the current generation, ranks processes against the previous one and swaps the
    /// two.
    ///
    /// On error nothing is swapped, the previous generation stays the baseline.
    pub fn sample(&mut self) -> Result<Tick<'_>, CounterError> {
        self.current.capture(&mut self.source)?;

        let dt_ticks = snapshot::core_usage_into(
            &self.previous.cores,
            &self.current.cores,
            &mut self.core_usage,
        );

        usage::compute_usage(
            &self.current.processes,
            &self.previous.processes,
            &self.previous.index,
            dt_ticks,
            &mut self.usage,
        );
        let top_len = top5(&mut self.usage).len();

        std::mem::swap(&mut self.previous, &mut self.current);

        Ok(Tick {
            core_usage: &self.core_usage,
            top: &self.usage[..top_len],
        })
    }
}
