/* This file is part of pre-restart.
 *
 * pre-restart is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * pre-restart is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with pre-restart.  If not, see <http://www.gnu.org/licenses/>.
 */

// Pre-restart hook for game server containers.  Rewrites the <game_name>
// of the container's server config according to container_map.ini, then
// prints the WEBHOOK_* lines consumed by the restart bot.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]    // Added in Rust 1.66

use std::path::PathBuf;

use clap::{Arg, Command};
use clap::builder::PathBufValueParser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use pre_restart::config;
use pre_restart::hook::{self, HookOutcome, HookReport};
use pre_restart::rewriter::RewriteOutcome;

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: &str = "debug";

#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: &str = "warn";

fn main() {
    // Logs go to stderr; stdout is reserved for the status and WEBHOOK_*
    // lines that the caller captures.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)))
        .with_writer(std::io::stderr)
        .init();

    let args = match Command::new("pre-restart")
        .about("Rewrites a game server's <game_name> before its container restarts")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(Arg::new("container").value_name("CONTAINER").required(true)
            .help("Name of the container about to be restarted"))
        .arg(Arg::new("map").long("map").value_name("PATH")
            .value_parser(PathBufValueParser::new())
            .help("Container map to use instead of ../configs/container_map.ini"))
        .try_get_matches()
    {
        Ok(args) => args,
        Err(err) => {
            // Usage errors exit with 1 rather than clap's default of 2
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let container = args.get_one::<String>("container")
            .expect("container is a required argument");
    let map_path = match args.get_one::<PathBuf>("map") {
        Some(path) => path.clone(),
        None => match config::default_map_path() {
            Ok(path) => path,
            Err(err) => {
                error!("{:#}", err);
                println!("❌ {err:#}");
                std::process::exit(1);
            }
        }
    };

    println!("🔍 Looking up container '{container}' in {}", map_path.display());
    match hook::run(container, &map_path) {
        Ok(HookOutcome::Skipped) => {
            println!("ℹ️ No mapping for container '{container}', skipping rename");
        }
        Ok(HookOutcome::Rewritten(report)) => print_report(&report),
        Err(err) => {
            error!("{}", err);
            println!("❌ {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn print_report(report: &HookReport) {
    println!("🎮 Game: {}", report.game_name);
    println!("📄 XML: {}", report.xml_path.display());
    println!("✏️ Writing {} non-breaking spaces with suffix '{}'",
             report.nbsp_count, report.suffix);
    match report.outcome {
        RewriteOutcome::Rewritten { changed: true } => {
            println!("✅ Updated <game_name> in {}", report.xml_path.display());
        }
        RewriteOutcome::Rewritten { changed: false } => {
            println!("✅ <game_name> in {} was already up to date", report.xml_path.display());
        }
        RewriteOutcome::NoMatch => {
            println!("⚠️ No <game_name> line found in {}, file left unchanged",
                     report.xml_path.display());
        }
    }

    let webhook = report.webhook();
    if let Some(line) = &report.verification.game_line {
        println!("🔎 Result: {line}");
    }
    for line in webhook.lines() {
        println!("{line}");
    }
}
