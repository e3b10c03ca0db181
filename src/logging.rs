/* src/logging.rs
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

use lazy_static::lazy_static;

use crate::utils::time::LocalTime;

#[allow(unused)]
macro_rules! error {
    ($domain:literal, $($arg:tt)*) => {{
        $crate::logging::Logger::log($crate::logging::LogLevel::Error, $domain, format_args!($($arg)*));
    }}
}
pub(crate) use error;

#[allow(unused)]
macro_rules! critical {
    ($domain:literal, $($arg:tt)*) => {{
        $crate::logging::Logger::log($crate::logging::LogLevel::Critical, $domain, format_args!($($arg)*));
    }}
}
pub(crate) use critical;

#[allow(unused)]
macro_rules! warning {
    ($domain:literal, $($arg:tt)*) => {{
        $crate::logging::Logger::log($crate::logging::LogLevel::Warning, $domain, format_args!($($arg)*));
    }}
}
pub(crate) use warning;

#[allow(unused)]
macro_rules! message {
    ($domain:literal, $($arg:tt)*) => {{
        $crate::logging::Logger::log($crate::logging::LogLevel::Message, $domain, format_args!($($arg)*));
    }}
}
pub(crate) use message;

#[allow(unused)]
macro_rules! info {
    ($domain:literal, $($arg:tt)*) => {{
        $crate::logging::Logger::log($crate::logging::LogLevel::Info, $domain, format_args!($($arg)*));
    }}
}
pub(crate) use info;

#[allow(unused)]
macro_rules! debug {
    ($domain:literal, $($arg:tt)*) => {{
        $crate::logging::Logger::log($crate::logging::LogLevel::Debug, $domain, format_args!($($arg)*));
    }}
}
pub(crate) use debug;

lazy_static! {
    static ref PID: u32 = unsafe { libc::getpid() } as _;
    static ref G_MESSAGES_DEBUG: Vec<std::sync::Arc<str>> = std::env::var("G_MESSAGES_DEBUG")
        .unwrap_or_default()
        .split(';')
        .filter(|s| !s.is_empty())
        .map(std::sync::Arc::<str>::from)
        .collect();
}

const F_COL_LIGHT_BLUE: &str = "\x1b[2;34m";
const F_RESET: &str = "\x1b[0m";

#[allow(dead_code)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Critical,
    Warning,
    Message,
    Info,
    Debug,
}

pub struct Logger;

impl Logger {
    /// Writes one log line to stderr; stdout is reserved for the sample stream.
    pub fn log(level: LogLevel, domain: &str, args: std::fmt::Arguments<'_>) {
        if !Self::enabled(level, domain, &G_MESSAGES_DEBUG) {
            return;
        }

        let now = LocalTime::now();
        eprintln!(
            "(cpu100:{}): {}-{}{}{} **: {}{:02}:{:02}:{:02}.{:02}{}: {}",
            *PID,
            domain,
            Self::log_level_to_color(level),
            Self::log_level_to_str(level),
            F_RESET,
            F_COL_LIGHT_BLUE,
            now.hour,
            now.minute,
            now.second,
            now.centisecond,
            F_RESET,
            args
        );
    }

    fn enabled(level: LogLevel, domain: &str, debug_domains: &[std::sync::Arc<str>]) -> bool {
        match level {
            LogLevel::Info | LogLevel::Debug => debug_domains
                .iter()
                .any(|d| d.as_ref() == domain || d.as_ref() == "all"),
            _ => true,
        }
    }

    const fn log_level_to_str(level: LogLevel) -> &'static str {
        match level {
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Warning => "WARNING",
            LogLevel::Message => "MESSAGE",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    const fn log_level_to_color(level: LogLevel) -> &'static str {
        match level {
            LogLevel::Error => "\x1b[1;31m",    /* red */
            LogLevel::Critical => "\x1b[1;35m", /* magenta */
            LogLevel::Warning => "\x1b[1;33m",  /* yellow */
            LogLevel::Message => "\x1b[1;32m",  /* green */
            LogLevel::Info => "\x1b[1;32m",     /* green */
            LogLevel::Debug => "\x1b[1;32m",    /* green */
        }
    }
}
