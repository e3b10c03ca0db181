/* src/utils.rs
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

pub mod arraystring {
    pub trait ToArrayStringLossy {
        fn to_array_string_lossy<const CAPACITY: usize>(&self) -> arrayvec::ArrayString<CAPACITY>;
    }

    impl ToArrayStringLossy for str {
        /// Copies `self` into a fixed-capacity string, cutting at the last character
        /// boundary that still fits.
        fn to_array_string_lossy<const CAPACITY: usize>(&self) -> arrayvec::ArrayString<CAPACITY> {
            let mut result = arrayvec::ArrayString::new();
            if self.len() > CAPACITY {
                for i in (0..=CAPACITY).rev() {
                    if self.is_char_boundary(i) {
                        result.push_str(&self[0..i]);
                        break;
                    }
                }
            } else {
                result.push_str(self);
            }

            result
        }
    }

    impl ToArrayStringLossy for std::borrow::Cow<'_, str> {
        fn to_array_string_lossy<const CAPACITY: usize>(&self) -> arrayvec::ArrayString<CAPACITY> {
            self.as_ref().to_array_string_lossy()
        }
    }
}

pub mod time {
    /// Wall-clock time of day with centisecond resolution.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
    pub struct LocalTime {
        pub hour: u8,
        pub minute: u8,
        pub second: u8,
        pub centisecond: u8,
    }

    impl LocalTime {
        pub fn now() -> Self {
            unsafe {
                let mut ts: libc::timespec = std::mem::zeroed();
                if libc::clock_gettime(libc::CLOCK_REALTIME, &mut ts) != 0 {
                    return Self::default();
                }

                let mut tm: libc::tm = std::mem::zeroed();
                if libc::localtime_r(&ts.tv_sec, &mut tm).is_null() {
                    return Self::default();
                }

                Self {
                    hour: tm.tm_hour as u8,
                    minute: tm.tm_min as u8,
                    second: tm.tm_sec as u8,
                    centisecond: ((ts.tv_nsec / 10_000_000) as u8).min(99),
                }
            }
        }
    }

    /// `HH:MM:SS:CC`, the column format of the sample stream.
    impl std::fmt::Display for LocalTime {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{:02}:{:02}:{:02}:{:02}",
                self.hour, self.minute, self.second, self.centisecond
            )
        }
    }
}

#[cfg(test)]
mod test {
    use super::arraystring::ToArrayStringLossy;
    use super::time::LocalTime;

    #[test]
    fn test_lossy_fits() {
        let s: arrayvec::ArrayString<8> = "kworker".to_array_string_lossy();
        assert_eq!(s.as_str(), "kworker");
    }

    #[test]
    fn test_lossy_truncates_at_capacity() {
        let s: arrayvec::ArrayString<4> = "abcdefgh".to_array_string_lossy();
        assert_eq!(s.as_str(), "abcd");
    }

    #[test]
    fn test_lossy_respects_char_boundaries() {
        // 'é' is two bytes, so the cut has to fall before it
        let s: arrayvec::ArrayString<4> = "abcé".to_array_string_lossy();
        assert_eq!(s.as_str(), "abc");
    }

    #[test]
    fn test_lossy_cow() {
        let name = String::from_utf8_lossy(b"caf\xE9-worker");
        let s: arrayvec::ArrayString<5> = name.to_array_string_lossy();
        assert_eq!(s.as_str(), "caf");
    }

    #[test]
    fn test_local_time_format() {
        let t = LocalTime {
            hour: 7,
            minute: 5,
            second: 9,
            centisecond: 3,
        };
        assert_eq!(t.to_string(), "07:05:09:03");
    }

    #[test]
    fn test_local_time_now_in_range() {
        let t = LocalTime::now();
        assert!(t.hour < 24);
        assert!(t.minute < 60);
        assert!(t.second < 61);
        assert!(t.centisecond < 100);
    }
}
