/* src/exit_code.rs
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

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExitCode {
    InvalidConfiguration = 1,
    AffinityFailed,
    OutputUnavailable,
    CounterSourceUnavailable,
    CounterSourceMalformed,
    OutputWriteFailed,
    Unknown = 255,
}

impl From<u8> for ExitCode {
    fn from(value: u8) -> Self {
        match value {
            1 => ExitCode::InvalidConfiguration,
            2 => ExitCode::AffinityFailed,
            3 => ExitCode::OutputUnavailable,
            4 => ExitCode::CounterSourceUnavailable,
            5 => ExitCode::CounterSourceMalformed,
            6 => ExitCode::OutputWriteFailed,
            _ => ExitCode::Unknown,
        }
    }
}

impl From<ExitCode> for u8 {
    fn from(value: ExitCode) -> Self {
        value as u8
    }
}

impl From<&CounterError> for ExitCode {
    fn from(value: &CounterError) -> Self {
        match value {
            CounterError::Open { .. } | CounterError::Read { .. } | CounterError::List { .. } => {
                ExitCode::CounterSourceUnavailable
            }
            CounterError::MissingCores { .. } | CounterError::MalformedCore { .. } => {
                ExitCode::CounterSourceMalformed
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip_known_codes() {
        for code in [
            ExitCode::InvalidConfiguration,
            ExitCode::AffinityFailed,
            ExitCode::OutputUnavailable,
            ExitCode::CounterSourceUnavailable,
            ExitCode::CounterSourceMalformed,
            ExitCode::OutputWriteFailed,
        ] {
            assert_eq!(ExitCode::from(u8::from(code)), code);
        }
        assert_eq!(ExitCode::from(42), ExitCode::Unknown);
    }

    #[test]
    fn test_counter_error_classes() {
        let missing = CounterError::MissingCores {
            expected: 4,
            found: 2,
        };
        assert_eq!(ExitCode::from(&missing), ExitCode::CounterSourceMalformed);

        let open = CounterError::Open {
            path: "/proc/stat".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(ExitCode::from(&open), ExitCode::CounterSourceUnavailable);
    }
}
