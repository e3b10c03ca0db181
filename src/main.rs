/* src/main.rs
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
use std::time::Duration;

use clap::Parser;

use config::{Args, Config};
use exit_code::ExitCode;
use logging::{critical, error, info, message};
use platform::{CounterSource, LinuxCounters};
use report::Report;
use sampler::Sampler;
use utils::time::LocalTime;

mod config;
mod exit_code;
mod logging;
mod platform;
mod report;
mod sampler;
mod utils;

const TICK_INTERVAL: Duration = Duration::from_millis(10);

fn exit(code: ExitCode) -> ! {
    std::process::exit(code as i32)
}

fn open_output(config: &Config) -> std::io::Result<Box<dyn Write>> {
    match &config.output {
        Some(path) => Ok(Box::new(std::io::BufWriter::new(std::fs::File::create(
            path,
        )?))),
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

fn main() {
    let args = Args::parse();

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            critical!("Cpu100::Main", "{}", e);
            exit(ExitCode::InvalidConfiguration);
        }
    };

    info!("Cpu100::Main", "Using configuration {:?}", config);

    if let Err(e) = platform::install_shutdown_handler() {
        error!(
            "Cpu100::Main",
            "Failed to install signal handlers, Ctrl+C will not flush: {}",
            e
        );
    }

    let counters = match LinuxCounters::new() {
        Ok(counters) => counters,
        Err(e) => {
            critical!("Cpu100::Main", "Failed to open counter source: {}", e);
            exit(ExitCode::from(&e));
        }
    };
    let core_count = counters.core_count();

    match config.pin_target(core_count) {
        Ok(Some(cpu)) => {
            if let Err(e) = platform::pin_to_cpu(cpu) {
                critical!("Cpu100::Main", "Failed to pin to core {}: {}", cpu, e);
                exit(ExitCode::AffinityFailed);
            }
            message!("Cpu100::Main", "Pinned to core {}", cpu);
        }
        Ok(None) => {}
        Err(e) => {
            critical!("Cpu100::Main", "{}", e);
            exit(ExitCode::InvalidConfiguration);
        }
    }

    let mut report = match open_output(&config) {
        Ok(out) => Report::new(out),
        Err(e) => {
            critical!(
                "Cpu100::Main",
                "Failed to open output {}: {}",
                config
                    .output
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                e
            );
            exit(ExitCode::OutputUnavailable);
        }
    };

    let mut sampler = match Sampler::new(counters) {
        Ok(sampler) => sampler,
        Err(e) => {
            critical!("Cpu100::Main", "Failed to capture initial sample: {}", e);
            exit(ExitCode::from(&e));
        }
    };

    if config.header {
        if let Err(e) = report.write_header(sampler.core_count()) {
            critical!("Cpu100::Main", "Failed to write header: {}", e);
            exit(ExitCode::OutputWriteFailed);
        }
    }

    let mut ticks = 0_u64;
    while platform::is_running() && config.max_ticks.map_or(true, |max| ticks < max) {
        std::thread::sleep(TICK_INTERVAL);

        let tick = match sampler.sample() {
            Ok(tick) => tick,
            Err(e) => {
                critical!("Cpu100::Main", "Failed to sample counters: {}", e);
                exit(ExitCode::from(&e));
            }
        };

        if let Err(e) = report.write_tick(LocalTime::now(), &tick) {
            critical!("Cpu100::Main", "Failed to write sample: {}", e);
            exit(ExitCode::OutputWriteFailed);
        }

        ticks += 1;
    }

    message!("Cpu100::Main", "Sampled {} ticks, exiting", ticks);
}
