/* src/platform/linux/proc_stat.rs
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

use crate::platform::CounterError;
use crate::sampler::CoreSample;

const PROC_STAT_IDLE: usize = 3;
const PROC_STAT_IOWAIT: usize = 4;

// user nice system idle iowait irq softirq steal guest guest_nice
const PROC_STAT_FIELD_COUNT: usize = 10;
const PROC_STAT_MIN_FIELD_COUNT: usize = PROC_STAT_IDLE + 1;

/// `cpu0 ...`, `cpu1 ...`; the aggregate line is `cpu  ...`.
fn is_core_line(line: &str) -> bool {
    line.strip_prefix("cpu")
        .and_then(|rest| rest.bytes().next())
        .map_or(false, |b| b.is_ascii_digit())
}

pub fn count_cores(proc_stat: &str) -> usize {
    proc_stat.lines().filter(|l| is_core_line(l)).count()
}

/// Parses one per-core line into idle (idle + iowait) and total (every field) ticks.
fn parse_core_line(line: &str) -> Option<CoreSample> {
    if !is_core_line(line) {
        return None;
    }

    let mut fields = [0_u64; PROC_STAT_FIELD_COUNT];
    let mut field_count = 0;
    for value in line.split_whitespace().skip(1).take(PROC_STAT_FIELD_COUNT) {
        fields[field_count] = value.parse::<u64>().ok()?;
        field_count += 1;
    }

    if field_count < PROC_STAT_MIN_FIELD_COUNT {
        return None;
    }

    Some(CoreSample {
        idle_ticks: fields[PROC_STAT_IDLE].saturating_add(fields[PROC_STAT_IOWAIT]),
        total_ticks: fields[..field_count]
            .iter()
            .fold(0_u64, |acc, v| acc.saturating_add(*v)),
    })
}

/// Fills `out` from the per-core lines of `/proc/stat`, which directly follow the aggregate
/// `cpu` line.
pub fn parse_cores(proc_stat: &str, out: &mut [CoreSample]) -> Result<(), CounterError> {
    let expected = out.len();
    let mut lines = proc_stat.lines().skip(1);

    for (core, sample) in out.iter_mut().enumerate() {
        let line = match lines.next() {
            Some(line) if line.starts_with("cpu") => line,
            _ => return Err(CounterError::MissingCores { expected, found: core }),
        };

        *sample = parse_core_line(line).ok_or_else(|| CounterError::MalformedCore {
            core,
            line: line.to_owned(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const PROC_STAT: &str = "\
cpu  2255 34 2290 22625563 6290 127 456 0 0 0
cpu0 1132 34 1441 11311718 3675 127 438 0 0 0
cpu1 1123 0 849 11313845 2614 0 18 0 0 0
intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]
ctxt 1990473
btime 1062191376
processes 2915
procs_running 1
procs_blocked 0
";

    #[test]
    fn test_count_cores() {
        assert_eq!(count_cores(PROC_STAT), 2);
        assert_eq!(count_cores("cpu  1 2 3 4\n"), 0);
    }

    #[test]
    fn test_parse_cores() {
        let mut out = [CoreSample::default(); 2];
        parse_cores(PROC_STAT, &mut out).unwrap();

        assert_eq!(
            out[0],
            CoreSample {
                idle_ticks: 11311718 + 3675,
                total_ticks: 1132 + 34 + 1441 + 11311718 + 3675 + 127 + 438,
            }
        );
        assert_eq!(out[1].idle_ticks, 11313845 + 2614);
    }

    #[test]
    fn test_fewer_cores_than_expected() {
        let mut out = [CoreSample::default(); 3];
        let err = parse_cores(PROC_STAT, &mut out).unwrap_err();

        assert!(matches!(err, CounterError::MissingCores { found: 2, .. }));
    }

    #[test]
    fn test_truncated_file() {
        let mut out = [CoreSample::default(); 2];
        let err = parse_cores("cpu  1 2 3 4\ncpu0 1 2 3 4\n", &mut out).unwrap_err();

        assert!(matches!(err, CounterError::MissingCores { found: 1, .. }));
    }

    #[test]
    fn test_malformed_core() {
        let mut out = [CoreSample::default(); 1];
        let err = parse_cores("cpu  1 2 3 4\ncpu0 1 2 3\n", &mut out).unwrap_err();
        assert!(matches!(err, CounterError::MalformedCore { core: 0, .. }));

        let err = parse_cores("cpu  1 2 3 4\ncpu0 1 x 3 4\n", &mut out).unwrap_err();
        assert!(matches!(err, CounterError::MalformedCore { core: 0, .. }));
    }

    #[test]
    fn test_old_kernel_four_fields() {
        let mut out = [CoreSample::default(); 1];
        parse_cores("cpu  1 2 3 4\ncpu0 10 20 30 40\n", &mut out).unwrap();

        assert_eq!(
            out[0],
            CoreSample {
                idle_ticks: 40,
                total_ticks: 100,
            }
        );
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut out = [CoreSample::default(); 1];
        parse_cores("cpu  0\ncpu0 1 1 1 1 1 1 1 1 1 1 99 99\n", &mut out).unwrap();

        assert_eq!(out[0].total_ticks, 10);
        assert_eq!(out[0].idle_ticks, 2);
    }
}
