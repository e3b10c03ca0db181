/* src/sampler/pid_index.rs
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

use super::ProcessSample;

/// Number of buckets; a power of two sized for a typical process table.
pub const BUCKET_COUNT: usize = 1024;

/// Maps a pid to its position in one generation's process list.
///
/// Fixed bucket array with chaining. Every bucket is a `Vec` that is cleared, not freed, on
/// rebuild, so once the table has seen a typical tick's worth of processes it stops allocating.
#[derive(Debug)]
pub struct PidIndex {
    buckets: Vec<Vec<(i32, usize)>>,
}

impl Default for PidIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PidIndex {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
        }
    }

    #[inline]
    fn bucket_of(pid: i32) -> usize {
        (pid as u32 as usize) % BUCKET_COUNT
    }

    /// Drops the previous contents and indexes every entry of `processes` by pid.
    pub fn rebuild(&mut self, processes: &[ProcessSample]) {
        self.clear();
        for (position, process) in processes.iter().enumerate() {
            self.insert(process.pid, position);
        }
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, pid: i32, position: usize) {
        self.buckets[Self::bucket_of(pid)].push((pid, position));
    }

    /// Position of `pid`; when a pid was inserted more than once the latest insertion wins.
    pub fn lookup(&self, pid: i32) -> Option<usize> {
        self.buckets[Self::bucket_of(pid)]
            .iter()
            .rev()
            .find(|(p, _)| *p == pid)
            .map(|(_, position)| *position)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
