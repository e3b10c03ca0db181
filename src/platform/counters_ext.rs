/* src/platform/counters_ext.rs
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

use super::CounterError;
use crate::sampler::{CoreSample, ProcessSample};

/// Trait that provides an interface for reading raw CPU time counters from the OS.
///
/// Implementors are expected to keep whatever handles and buffers they need between calls, the
/// sampler calls into them 100 times a second.
pub trait CounterSource {
    /// Number of cores reported by `read_core_counters`. Fixed for the lifetime of the source.
    fn core_count(&self) -> usize;

    /// Fills `out` with the cumulative counters of every core, core 0 first.
    ///
    /// `out.len()` equals `core_count()`. Returns an error if fewer cores than that are
    /// available, or if a core's counters cannot be parsed.
    fn read_core_counters(&mut self, out: &mut [CoreSample]) -> Result<(), CounterError>;

    /// Appends one sample per live process to `out`.
    ///
    /// Processes that exit while being read, or whose counters do not parse, are skipped. Only a
    /// failure to enumerate processes at all is an error.
    fn enumerate_processes(&mut self, out: &mut Vec<ProcessSample>) -> Result<(), CounterError>;
}
