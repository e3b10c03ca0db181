/* src/report.rs
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

use std::io::Write;

use crate::sampler::Tick;
use crate::utils::time::LocalTime;

/// Writes the tab-separated sample stream.
///
/// One line per tick with the utilization of every core, followed by one indented line per
/// busiest process. Every tick is flushed so the stream can be followed live.
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_header(&mut self, core_count: usize) -> std::io::Result<()> {
        write!(self.out, "HH:MM:SS:UU")?;
        for i in 0..core_count {
            write!(self.out, "\tcpu_{}", i)?;
        }
        writeln!(self.out)?;

        self.out.flush()
    }

    pub fn write_tick(&mut self, time: LocalTime, tick: &Tick) -> std::io::Result<()> {
        write!(self.out, "{}", time)?;
        for usage in tick.core_usage {
            write!(self.out, "\t{:2.0}%", usage)?;
        }
        writeln!(self.out)?;

        for entry in tick.top {
            writeln!(
                self.out,
                "    pid={} {:<20} {:.1}%",
                entry.pid,
                entry.name.as_str(),
                entry.pct
            )?;
        }

        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
