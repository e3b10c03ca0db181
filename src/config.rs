/* src/config.rs
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

use std::path::PathBuf;

use clap::Parser;
use ini::Ini;

const SECTION_SAMPLER: &str = "sampler";
const SECTION_OUTPUT: &str = "output";

#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// INI file with [sampler] and [output] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Pin the sampler to this core (default: the last one)
    #[arg(long, conflicts_with = "no_pin")]
    pub pin_cpu: Option<usize>,
    /// Do not pin the sampler to any core
    #[arg(long)]
    pub no_pin: bool,
    /// Write samples to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Stop after this many ticks; 0 runs until interrupted
    #[arg(short = 'n', long)]
    pub ticks: Option<u64>,
    /// Do not print the column header
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {source}", path = .path.display())]
    Load { path: PathBuf, source: ini::Error },
    #[error("Invalid value '{value}' for {section}.{key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("Cannot pin to core {cpu}, only {core_count} cores are available")]
    PinOutOfRange { cpu: usize, core_count: usize },
}

/// Which core the sampler itself runs on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinCpu {
    Last,
    Core(usize),
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub pin_cpu: PinCpu,
    /// `None` samples until interrupted.
    pub max_ticks: Option<u64>,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pin_cpu: PinCpu::Last,
            max_ticks: None,
            output: None,
            header: true,
        }
    }
}

impl Config {
    /// Defaults, overridden by the INI file named in `args` if any, overridden by `args`.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = &args.config {
            let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Load {
                path: path.clone(),
                source,
            })?;
            config.apply_ini(&ini)?;
        }

        config.apply_args(args);
        Ok(config)
    }

    pub fn apply_ini(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        if let Some(sampler) = ini.section(Some(SECTION_SAMPLER)) {
            if let Some(value) = sampler.get("pin_cpu") {
                self.pin_cpu = match value.trim() {
                    "last" => PinCpu::Last,
                    "none" => PinCpu::Disabled,
                    v => PinCpu::Core(v.parse::<usize>().map_err(|_| {
                        ConfigError::InvalidValue {
                            section: SECTION_SAMPLER,
                            key: "pin_cpu",
                            value: value.to_owned(),
                            reason: "expected 'last', 'none' or a core index",
                        }
                    })?),
                };
            }

            if let Some(value) = sampler.get("ticks") {
                let ticks = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        section: SECTION_SAMPLER,
                        key: "ticks",
                        value: value.to_owned(),
                        reason: "expected a non-negative integer",
                    })?;
                self.max_ticks = (ticks > 0).then_some(ticks);
            }
        }

        if let Some(output) = ini.section(Some(SECTION_OUTPUT)) {
            if let Some(value) = output.get("path") {
                let value = value.trim();
                self.output = (!value.is_empty()).then(|| PathBuf::from(value));
            }

            if let Some(value) = output.get("header") {
                self.header = parse_bool(value).ok_or_else(|| ConfigError::InvalidValue {
                    section: SECTION_OUTPUT,
                    key: "header",
                    value: value.to_owned(),
                    reason: "expected a boolean",
                })?;
            }
        }

        Ok(())
    }

    pub fn apply_args(&mut self, args: &Args) {
        if args.no_pin {
            self.pin_cpu = PinCpu::Disabled;
        } else if let Some(cpu) = args.pin_cpu {
            self.pin_cpu = PinCpu::Core(cpu);
        }

        if let Some(ticks) = args.ticks {
            self.max_ticks = (ticks > 0).then_some(ticks);
        }

        if let Some(output) = &args.output {
            self.output = Some(output.clone());
        }

        if args.no_header {
            self.header = false;
        }
    }

    /// Core to pin to, resolved against the number of cores the counter source reports.
    pub fn pin_target(&self, core_count: usize) -> Result<Option<usize>, ConfigError> {
        match self.pin_cpu {
            PinCpu::Disabled => Ok(None),
            PinCpu::Last => Ok(core_count.checked_sub(1)),
            PinCpu::Core(cpu) if cpu < core_count => Ok(Some(cpu)),
            PinCpu::Core(cpu) => Err(ConfigError::PinOutOfRange { cpu, core_count }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
