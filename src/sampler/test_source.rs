/* src/sampler/test_source.rs
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

use std::collections::VecDeque;

use super::{CoreSample, ProcessSample};
use crate::platform::{CounterError, CounterSource};
use crate::utils::arraystring::ToArrayStringLossy;

pub fn proc(pid: i32, name: &str, cpu_ticks: u64) -> ProcessSample {
    ProcessSample {
        pid,
        name: name.to_array_string_lossy(),
        cpu_ticks,
    }
}

/// Counter source that replays a fixed list of generations, one per capture.
pub struct ScriptedSource {
    core_count: usize,
    frames: VecDeque<Option<(Vec<CoreSample>, Vec<ProcessSample>)>>,
    pending_processes: Option<Vec<ProcessSample>>,
}

impl ScriptedSource {
    pub fn new(core_count: usize) -> Self {
        Self {
            core_count,
            frames: VecDeque::new(),
            pending_processes: None,
        }
    }

    pub fn push(&mut self, cores: Vec<CoreSample>, processes: Vec<ProcessSample>) {
        assert_eq!(cores.len(), self.core_count);
        self.frames.push_back(Some((cores, processes)));
    }

    /// The next capture fails as if `/proc/stat` were truncated.
    pub fn push_failure(&mut self) {
        self.frames.push_back(None);
    }
}

impl CounterSource for ScriptedSource {
    fn core_count(&self) -> usize {
        self.core_count
    }

    fn read_core_counters(&mut self, out: &mut [CoreSample]) -> Result<(), CounterError> {
        match self.frames.pop_front().flatten() {
            Some((cores, processes)) => {
                out.copy_from_slice(&cores);
                self.pending_processes = Some(processes);
                Ok(())
            }
            None => Err(CounterError::MissingCores {
                expected: self.core_count,
                found: 0,
            }),
        }
    }

    fn enumerate_processes(&mut self, out: &mut Vec<ProcessSample>) -> Result<(), CounterError> {
        out.extend(self.pending_processes.take().unwrap_or_default());
        Ok(())
    }
}
