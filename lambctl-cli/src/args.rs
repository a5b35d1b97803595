// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use anyhow::Result;
use clap::{Arg, ArgMatches};
use std::io::Write;

/// The global arguments of every command.
pub fn get_args() -> Vec<Arg<'static>> {
    let connection = [
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Sets a custom config file")
            .global(true)
            .takes_value(true),
        Arg::new("region")
            .long("region")
            .value_name("REGION")
            .help("The AWS region, e.g. us-east-1")
            .global(true)
            .takes_value(true),
        Arg::new("endpoint-url")
            .long("endpoint-url")
            .value_name("URL")
            .help("Sends requests to this endpoint instead of the regional one")
            .global(true)
            .takes_value(true),
        Arg::new("profile")
            .long("profile")
            .value_name("PROFILE")
            .help("The named AWS profile providing credentials")
            .global(true)
            .takes_value(true),
    ];
    get_logging_args().into_iter().chain(connection).collect()
}

fn get_logging_args() -> Vec<Arg<'static>> {
    [
        Arg::new("log-level")
            .short('L')
            .long("log-level")
            .possible_values(["error", "warn", "info", "debug", "trace", "off"])
            .help("Log level [default: warn]")
            .global(true)
            .takes_value(true),
        Arg::new("trace")
            .long("trace")
            .help("Log ultra-verbose (trace level) information")
            .global(true)
            .takes_value(false),
        Arg::new("silent")
            .long("silent")
            .help("Suppress all log output")
            .global(true)
            .takes_value(false),
    ]
    .to_vec()
}

/// Configures the logger from the logging flags. Flags given after the
/// subcommand win over the ones given before it.
pub fn get_logging(
    global_matches: &ArgMatches,
    matches: &ArgMatches,
) -> Result<env_logger::Builder> {
    let mut builder = env_logger::Builder::new();

    let level = if matches.is_present("trace") || global_matches.is_present("trace") {
        log::LevelFilter::Trace
    } else if matches.is_present("silent") || global_matches.is_present("silent") {
        log::LevelFilter::Off
    } else {
        match matches
            .value_of("log-level")
            .or_else(|| global_matches.value_of("log-level"))
        {
            Some("error") => log::LevelFilter::Error,
            Some("info") => log::LevelFilter::Info,
            Some("debug") => log::LevelFilter::Debug,
            Some("trace") => log::LevelFilter::Trace,
            Some("off") => log::LevelFilter::Off,
            _ => log::LevelFilter::Warn,
        }
    };
    builder.filter(None, level);
    for noisy in ["hyper", "reqwest", "rustls", "aws_config", "aws_smithy_runtime"] {
        builder.filter_module(noisy, log::LevelFilter::Warn.min(level));
    }

    if level == log::LevelFilter::Trace {
        builder.format_timestamp_secs();
    } else {
        builder.format(|f, record| {
            writeln!(
                f,
                "[{}] {}",
                record.level().to_string().to_lowercase(),
                record.args()
            )
        });
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn app() -> Command<'static> {
        Command::new("lambctl")
            .args(get_args())
            .subcommand(Command::new("list-functions"))
    }

    #[test]
    fn global_flags_reach_the_subcommand() {
        let matches = app()
            .try_get_matches_from(vec![
                "lambctl",
                "list-functions",
                "--region",
                "eu-west-1",
                "--log-level",
                "debug",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.value_of("region"), Some("eu-west-1"));
        assert_eq!(sub.value_of("log-level"), Some("debug"));
        assert!(get_logging(&matches, sub).is_ok());
    }

    #[test]
    fn rejects_unknown_log_levels() {
        let result = app().try_get_matches_from(vec!["lambctl", "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
