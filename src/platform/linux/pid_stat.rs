/* src/platform/linux/pid_stat.rs
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

use std::borrow::Cow;

// Field indices as documented in proc(5), counting from `pid` at 0
const PROC_PID_STAT_STATE: usize = 2;
const PROC_PID_STAT_UTIME: usize = 13;
const PROC_PID_STAT_STIME: usize = 14;

/// Extracts the command name and user + system ticks from the contents of `/proc/<pid>/stat`.
///
/// The name sits between the first `(` and the last `)`, since it may itself contain spaces and
/// parentheses. The kernel does not require it to be UTF-8, invalid sequences are replaced.
/// Returns `None` for anything that does not look like a stat record.
pub fn parse_pid_stat(data: &[u8]) -> Option<(Cow<'_, str>, u64)> {
    let comm_start = data.iter().position(|&b| b == b'(')?;
    let comm_end = data.iter().rposition(|&b| b == b')')?;
    if comm_end <= comm_start {
        return None;
    }

    let comm = String::from_utf8_lossy(&data[comm_start + 1..comm_end]);

    let mut fields = data[comm_end + 1..]
        .split(|b| b.is_ascii_whitespace())
        .filter(|f| !f.is_empty());
    let utime = parse_ticks(fields.nth(PROC_PID_STAT_UTIME - PROC_PID_STAT_STATE)?)?;
    let stime = parse_ticks(fields.nth(PROC_PID_STAT_STIME - PROC_PID_STAT_UTIME - 1)?)?;

    Some((comm, utime.saturating_add(stime)))
}

fn parse_ticks(field: &[u8]) -> Option<u64> {
    std::str::from_utf8(field).ok()?.parse::<u64>().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let data = "1234 (bash) S 1000 1234 1234 34816 1300 4194304 3156 29386 0 3 17 5 40 12 20 0 1 0 1880 \
                    11726848 1360 18446744073709551615 1 1 0 0 0 0 65536 3686404 1266761467 0 0 0 17 3 0 0 0 0 0";

        assert_eq!(parse_pid_stat(data.as_bytes()), Some(("bash".into(), 22)));
    }

    #[test]
    fn test_name_with_spaces_and_parens() {
        let data = "77 (Web Content (x)) R 1 77 77 0 -1 4194560 0 0 0 0 300 200 0 0 20 0 30 0 1 0 0";

        assert_eq!(parse_pid_stat(data.as_bytes()), Some(("Web Content (x)".into(), 500)));
    }

    #[test]
    fn test_empty_name() {
        let data = "5 () S 1 1 1 0 -1 0 0 0 0 0 1 2 0 0";
        assert_eq!(parse_pid_stat(data.as_bytes()), Some(("".into(), 3)));
    }

    #[test]
    fn test_truncated_record() {
        assert_eq!(parse_pid_stat(b"1234 (bash) S 1000 1234"), None);
        assert_eq!(parse_pid_stat(b"1234 (bash) S 1 2 3 4 5 6 7 8 9 10"), None);
        assert_eq!(parse_pid_stat(b""), None);
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_pid_stat(b"1234 bash) S ("), None);
        assert_eq!(
            parse_pid_stat(b"9 (x) S 1 1 1 0 -1 0 0 0 0 0 abc 2 0 0"),
            None
        );
    }

    #[test]
    fn test_name_not_utf8() {
        let data = b"7 (caf\xE9) R 1 7 7 0 -1 0 0 0 0 0 500 500 0 0";

        let (comm, ticks) = parse_pid_stat(data).unwrap();
        assert_eq!(comm, "caf\u{FFFD}");
        assert_eq!(ticks, 1000);
    }
}
