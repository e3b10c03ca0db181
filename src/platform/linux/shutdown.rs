/* src/platform/linux/shutdown.rs
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

use std::sync::atomic::{AtomicBool, Ordering};

static RUNNING: AtomicBool = AtomicBool::new(true);

extern "C" fn on_shutdown_signal(_: libc::c_int) {
    // Only async-signal-safe work in here
    RUNNING.store(false, Ordering::Relaxed);
}

/// Makes SIGINT and SIGTERM clear the running flag instead of killing the process, so the
/// sampling loop can finish its tick and flush.
pub fn install_shutdown_handler() -> std::io::Result<()> {
    let handler = on_shutdown_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;

    for signal in [libc::SIGINT, libc::SIGTERM] {
        if unsafe { libc::signal(signal, handler) } == libc::SIG_ERR {
            return Err(std::io::Error::last_os_error());
        }
    }

    Ok(())
}

/// Checked by the sampling loop once per tick.
pub fn is_running() -> bool {
    RUNNING.load(Ordering::Relaxed)
}
