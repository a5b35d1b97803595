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

//! One subcommand per Lambda API operation, generated from the operation
//! tables.

use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use lambctl::prelude::*;
use lambctl::schema::ParamSpec;

/// Builds the subcommand of an operation.
pub fn command_args(operation: &'static OperationSpec) -> Command<'static> {
    let mut command = Command::new(operation.command).about(operation.about);
    for param in operation.params {
        command = command.arg(param_arg(param));
    }
    command.args(generic_args(operation))
}

fn param_arg(param: &'static ParamSpec) -> Arg<'static> {
    let arg = Arg::new(param.name).long(param.flag).help(param.help);
    let value_name = match param.kind {
        ParamKind::Boolean => return required_heading(param, arg.takes_value(false)),
        ParamKind::Integer => "INTEGER",
        ParamKind::Double => "NUMBER",
        ParamKind::Blob => "TEXT|fileb://PATH",
        ParamKind::Json => "JSON|file://PATH",
        ParamKind::StringMap => "KEY=VALUE",
        ParamKind::DoubleMap => "KEY=NUMBER",
        ParamKind::String | ParamKind::StringList => "VALUE",
    };
    // Negative numbers and stack frames may start with a dash.
    let arg = arg
        .takes_value(true)
        .value_name(value_name)
        .allow_hyphen_values(true);
    let arg = if param.kind.is_multi_valued() {
        arg.multiple_occurrences(true)
    } else {
        arg
    };
    required_heading(param, arg)
}

fn required_heading(param: &ParamSpec, arg: Arg<'static>) -> Arg<'static> {
    if param.required {
        arg.help_heading("REQUIRED")
    } else {
        arg
    }
}

/// The flags every command carries, and the paging flags of paginated ones.
fn generic_args(operation: &OperationSpec) -> Vec<Arg<'static>> {
    let mut args = vec![
        Arg::new("select")
            .long("select")
            .value_name("SELECTOR")
            .help("Prints '*' (the whole response), a response field, or ^Param (an input)")
            .takes_value(true),
        Arg::new("force")
            .long("force")
            .help("Runs without asking for confirmation")
            .takes_value(false),
    ];
    if operation.paging.is_some() {
        args.extend([
            Arg::new("marker")
                .long("marker")
                .value_name("MARKER")
                .help("Fetches the single page starting at this continuation marker")
                .takes_value(true),
            Arg::new("max-item")
                .long("max-item")
                .value_name("COUNT")
                .help("The item limit; 0 uses the service default")
                .takes_value(true),
            Arg::new("no-auto-iteration")
                .long("no-auto-iteration")
                .help("Fetches the first page only")
                .takes_value(false),
            Arg::new("strict-paging")
                .long("strict-paging")
                .help("Fails when any page fails, even after items were collected")
                .takes_value(false),
        ]);
    }
    args
}

/// Collects the raw values of the operation's parameters. Switches that
/// are present bind `true`.
pub fn raw_params(operation: &OperationSpec, matches: &ArgMatches) -> Vec<(String, Vec<String>)> {
    operation
        .params
        .iter()
        .filter_map(|param| {
            let values: Vec<String> = match param.kind {
                ParamKind::Boolean if matches.is_present(param.name) => vec!["true".to_string()],
                ParamKind::Boolean => return None,
                _ => matches
                    .values_of(param.name)?
                    .map(str::to_string)
                    .collect(),
            };
            Some((param.name.to_string(), values))
        })
        .collect()
}

/// Reads the generic flags of a command.
pub fn invocation_options(
    operation: &OperationSpec,
    matches: &ArgMatches,
    settings: &Settings,
) -> Result<InvocationOptions> {
    let mut paging = PagingOptions {
        policy: settings.paging_policy(),
        ..Default::default()
    };
    if operation.paging.is_some() {
        paging.marker = matches.value_of("marker").map(str::to_string);
        paging.no_auto_iteration = matches.is_present("no-auto-iteration");
        paging.max_items = matches
            .value_of("max-item")
            .map(|n| {
                n.trim()
                    .parse::<u32>()
                    .map_err(|e| anyhow!("invalid value '{}' for --max-item: {}", n, e))
            })
            .transpose()?;
        if matches.is_present("strict-paging") {
            paging.policy = PartialFailurePolicy::Surface;
        }
    }
    Ok(InvocationOptions {
        select: matches.value_of("select").map(str::to_string),
        paging,
        force: matches.is_present("force"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(operation: &'static OperationSpec, args: &[&str]) -> ArgMatches {
        let mut argv = vec![operation.command];
        argv.extend_from_slice(args);
        command_args(operation).try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn every_operation_builds_a_valid_command() {
        for operation in operations() {
            command_args(operation).debug_assert();
        }
    }

    #[test]
    fn collects_typed_raw_values() {
        let op = find_operation("UpdateFunctionConfiguration").unwrap();
        let m = matches(
            op,
            &[
                "--function-name",
                "f",
                "--environment-variable",
                "A=1",
                "--environment-variable",
                "B=2",
                "--memory-size",
                "256",
            ],
        );
        let raw = raw_params(op, &m);
        assert!(raw.contains(&("FunctionName".to_string(), vec!["f".to_string()])));
        assert!(raw.contains(&(
            "Environment_Variable".to_string(),
            vec!["A=1".to_string(), "B=2".to_string()]
        )));
        assert!(raw.contains(&("MemorySize".to_string(), vec!["256".to_string()])));
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn switches_bind_true_when_present() {
        let op = find_operation("UpdateFunctionCode").unwrap();
        let m = matches(op, &["--function-name", "f", "--publish"]);
        let raw = raw_params(op, &m);
        assert!(raw.contains(&("Publish".to_string(), vec!["true".to_string()])));
        assert!(!raw.iter().any(|(name, _)| name == "DryRun"));
    }

    #[test]
    fn reads_paging_flags() {
        let op = find_operation("ListFunctions").unwrap();
        let m = matches(op, &["--max-item", "5", "--marker", "m1", "--strict-paging"]);
        let options = invocation_options(op, &m, &Settings::default()).unwrap();
        assert_eq!(options.paging.max_items, Some(5));
        assert_eq!(options.paging.marker.as_deref(), Some("m1"));
        assert_eq!(options.paging.policy, PartialFailurePolicy::Surface);
        assert!(!options.force);

        let m = matches(op, &["--max-item", "many"]);
        assert!(invocation_options(op, &m, &Settings::default()).is_err());
    }

    #[test]
    fn paging_flags_only_exist_on_paginated_operations() {
        let op = find_operation("GetFunction").unwrap();
        let result = command_args(op).try_get_matches_from(vec![
            "get-function",
            "--function-name",
            "f",
            "--marker",
            "m1",
        ]);
        assert!(result.is_err());

        let m = matches(op, &["--function-name", "f", "--select", "^FunctionName", "--force"]);
        let options = invocation_options(op, &m, &Settings::default()).unwrap();
        assert_eq!(options.select.as_deref(), Some("^FunctionName"));
        assert!(options.force);
    }
}
