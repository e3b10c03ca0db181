/* src/sampler/usage.rs
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

use super::{PidIndex, ProcessSample, UsageEntry};

/// Computes the usage of every process in `current` that also appears in `previous`.
///
/// Processes without a previous sample are left out: usage is a rate and needs two points.
/// `dt_ticks` is the number of clock ticks that elapsed on all cores combined.
pub fn compute_usage(
    current: &[ProcessSample],
    previous: &[ProcessSample],
    previous_index: &PidIndex,
    dt_ticks: u64,
    out: &mut Vec<UsageEntry>,
) {
    out.clear();

    for process in current {
        let prev = match previous_index
            .lookup(process.pid)
            .and_then(|position| previous.get(position))
        {
            Some(prev) if prev.pid == process.pid => prev,
            _ => continue,
        };

        // A recycled pid belongs to a younger process with fewer ticks
        let delta = process.cpu_ticks.saturating_sub(prev.cpu_ticks);
        let pct = if dt_ticks > 0 {
            100. * delta as f64 / dt_ticks as f64
        } else {
            0.
        };

        out.push(UsageEntry {
            pid: process.pid,
            name: process.name,
            pct,
        });
    }
}
