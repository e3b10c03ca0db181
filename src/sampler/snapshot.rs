/* src/sampler/snapshot.rs
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

use super::{CoreSample, PidIndex, ProcessSample};
use crate::platform::{CounterError, CounterSource};

/// Everything captured at one tick: core counters, process counters and the pid index over the
/// latter.
#[derive(Debug)]
pub struct Generation {
    pub cores: Vec<CoreSample>,
    pub processes: Vec<ProcessSample>,
    pub index: PidIndex,
}

impl Generation {
    pub fn new(core_count: usize, process_capacity: usize) -> Self {
        Self {
            cores: vec![CoreSample::default(); core_count],
            processes: Vec::with_capacity(process_capacity),
            index: PidIndex::new(),
        }
    }

    /// Overwrites this generation in place with fresh counters from `source`.
    pub fn capture<S: CounterSource>(&mut self, source: &mut S) -> Result<(), CounterError> {
        capture_core_samples(source, &mut self.cores)?;
        capture_process_samples(source, &mut self.processes)?;
        self.index.rebuild(&self.processes);

        Ok(())
    }
}

pub fn capture_core_samples<S: CounterSource>(
    source: &mut S,
    into: &mut [CoreSample],
) -> Result<(), CounterError> {
    source.read_core_counters(into)
}

/// Processes that cannot be read are left out by the source; `into` keeps its capacity.
pub fn capture_process_samples<S: CounterSource>(
    source: &mut S,
    into: &mut Vec<ProcessSample>,
) -> Result<(), CounterError> {
    into.clear();
    source.enumerate_processes(into)
}

pub fn core_usage(previous: &CoreSample, current: &CoreSample) -> f64 {
    let delta_total = current.total_ticks.saturating_sub(previous.total_ticks);
    let delta_idle = current.idle_ticks.saturating_sub(previous.idle_ticks);

    if delta_total == 0 {
        return 0.;
    }

    100. * delta_total.saturating_sub(delta_idle) as f64 / delta_total as f64
}

/// Fills `usage` with per-core utilization and returns the ticks elapsed across all cores.
pub fn core_usage_into(previous: &[CoreSample], current: &[CoreSample], usage: &mut [f64]) -> u64 {
    let mut dt_ticks = 0_u64;

    for ((prev, cur), usage) in previous.iter().zip(current).zip(usage.iter_mut()) {
        *usage = core_usage(prev, cur);
        dt_ticks = dt_ticks.saturating_add(cur.total_ticks.saturating_sub(prev.total_ticks));
    }

    dt_ticks
}
