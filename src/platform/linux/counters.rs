/* src/platform/linux/counters.rs
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

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{pid_stat, proc_stat};
use crate::logging::{debug, message, warning};
use crate::platform::{CounterError, CounterSource};
use crate::sampler::{CoreSample, ProcessSample};
use crate::utils::arraystring::ToArrayStringLossy;

/// Reads counters from procfs.
///
/// `/proc/stat` stays open for the lifetime of the reader and is re-read from offset 0 every
/// tick; all read buffers are reused.
pub struct LinuxCounters {
    proc_root: PathBuf,
    stat_path: PathBuf,
    stat_file: File,
    stat_buf: String,
    pid_stat_path: PathBuf,
    pid_stat_buf: Vec<u8>,
    core_count: usize,
}

impl LinuxCounters {
    pub fn new() -> Result<Self, CounterError> {
        Self::with_proc_root("/proc")
    }

    /// Reads from a procfs mounted (or mocked) at `proc_root`. The number of cores is taken from
    /// the `cpuN` lines present right now.
    pub fn with_proc_root(proc_root: impl AsRef<Path>) -> Result<Self, CounterError> {
        let proc_root = proc_root.as_ref().to_path_buf();
        let stat_path = proc_root.join("stat");

        let stat_file = File::open(&stat_path).map_err(|source| CounterError::Open {
            path: stat_path.clone(),
            source,
        })?;

        let mut this = Self {
            proc_root,
            stat_path,
            stat_file,
            stat_buf: String::with_capacity(8192),
            pid_stat_path: PathBuf::new(),
            pid_stat_buf: Vec::with_capacity(1024),
            core_count: 0,
        };

        this.refresh_stat()?;
        this.core_count = proc_stat::count_cores(&this.stat_buf);
        if this.core_count == 0 {
            return Err(CounterError::MissingCores {
                expected: 1,
                found: 0,
            });
        }

        message!(
            "Cpu100::Platform",
            "Reading counters from {}, {} cores",
            this.proc_root.display(),
            this.core_count
        );

        Ok(this)
    }

    fn refresh_stat(&mut self) -> Result<(), CounterError> {
        self.stat_buf.clear();

        let result = self
            .stat_file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.stat_file.read_to_string(&mut self.stat_buf));

        match result {
            Ok(0) => Err(CounterError::MissingCores {
                expected: self.core_count,
                found: 0,
            }),
            Ok(_) => Ok(()),
            Err(source) => Err(CounterError::Read {
                path: self.stat_path.clone(),
                source,
            }),
        }
    }
}

/// A pid directory disappears as soon as the process is reaped; an open fd on its `stat` then
/// fails with `ESRCH`.
fn process_exited(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::NotFound || e.raw_os_error() == Some(libc::ESRCH)
}

impl CounterSource for LinuxCounters {
    fn core_count(&self) -> usize {
        self.core_count
    }

    fn read_core_counters(&mut self, out: &mut [CoreSample]) -> Result<(), CounterError> {
        self.refresh_stat()?;
        proc_stat::parse_cores(&self.stat_buf, out)
    }

    fn enumerate_processes(&mut self, out: &mut Vec<ProcessSample>) -> Result<(), CounterError> {
        let proc = std::fs::read_dir(&self.proc_root).map_err(|source| CounterError::List {
            path: self.proc_root.clone(),
            source,
        })?;

        for entry in proc.filter_map(|e| e.ok()) {
            let file_name = entry.file_name();
            let file_name = match file_name.to_str() {
                Some(name) if name.as_bytes().first().map_or(false, u8::is_ascii_digit) => name,
                _ => continue,
            };
            let pid = match file_name.parse::<i32>() {
                Ok(pid) => pid,
                Err(_) => continue,
            };

            self.pid_stat_path.as_mut_os_string().clear();
            self.pid_stat_path.push(&self.proc_root);
            self.pid_stat_path.push(file_name);
            self.pid_stat_path.push("stat");

            self.pid_stat_buf.clear();
            let read = File::open(&self.pid_stat_path)
                .and_then(|mut f| f.read_to_end(&mut self.pid_stat_buf));
            match read {
                Ok(0) => continue,
                Ok(_) => {}
                Err(e) if process_exited(&e) => {
                    debug!("Cpu100::Platform", "Process {} exited: {}", pid, e);
                    continue;
                }
                Err(e) => {
                    warning!(
                        "Cpu100::Platform",
                        "Skipping process {}, failed to read {}: {}",
                        pid,
                        self.pid_stat_path.display(),
                        e
                    );
                    continue;
                }
            }

            let (comm, cpu_ticks) = match pid_stat::parse_pid_stat(&self.pid_stat_buf) {
                Some(parsed) => parsed,
                None => {
                    debug!("Cpu100::Platform", "Skipping process {}: malformed stat", pid);
                    continue;
                }
            };

            out.push(ProcessSample {
                pid,
                name: comm.to_array_string_lossy(),
                cpu_ticks,
            });
        }

        Ok(())
    }
}
