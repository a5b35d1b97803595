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

mod args;
mod commands;
mod confirm;

use anyhow::{anyhow, Result};
use clap::{crate_version, Command};
use lambctl::prelude::*;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

fn cli() -> Command<'static> {
    Command::new("lambctl")
        .version(crate_version!())
        .about("Command Line Controller for the AWS Lambda API")
        .author("UMD Database Group")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(args::get_args())
        .subcommands(operations().into_iter().map(commands::command_args))
}

pub fn main() -> Result<()> {
    let matches = cli().get_matches();
    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("no command given"))?;
    args::get_logging(&matches, sub_matches)?.init();

    let operation = find_operation(name).ok_or_else(|| anyhow!("unknown command '{}'", name))?;
    let settings = Settings::load(sub_matches.value_of("config").map(Path::new))?.with_overrides(
        sub_matches.value_of("region"),
        sub_matches.value_of("endpoint-url"),
        sub_matches.value_of("profile"),
    );

    let options = commands::invocation_options(operation, sub_matches, &settings)?;
    let invocation = Invocation::new(
        operation,
        commands::raw_params(operation, sub_matches),
        options,
    )?;

    if invocation.needs_confirmation(settings.confirm_impact) && !confirm::confirm(&invocation)? {
        info!("{} was not confirmed; nothing was sent.", operation.name);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let interrupted = cancel.clone();
    ctrlc::set_handler(move || interrupted.cancel())?;

    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(async {
        let client: SharedLambdaService =
            Arc::new(SignedLambdaClient::from_settings(&settings).await?);
        Ok::<_, LambctlError>(invocation.execute(client.as_ref(), &cancel).await)
    })?;

    if let Some(e) = output.error {
        return Err(e.into());
    }
    if let Some(hint) = invocation.next_page_hint(&output) {
        eprintln!("{}", hint);
    }
    if output.truncated {
        warn!("The results are incomplete; rerun with --strict-paging to fail instead.");
    }
    if let Some(value) = output.value {
        print_value(&value)?;
    }
    Ok(())
}

/// Prints strings as they are and everything else as indented JSON.
fn print_value(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::String(text) => println!("{}", text),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn every_operation_is_a_subcommand() {
        let app = cli();
        for operation in operations() {
            assert!(
                app.find_subcommand(operation.command).is_some(),
                "{}",
                operation.command
            );
        }
    }

    #[test]
    fn parses_a_full_command_line() {
        let matches = cli()
            .try_get_matches_from(vec![
                "lambctl",
                "--region",
                "us-west-2",
                "create-alias",
                "--function-name",
                "f",
                "--name",
                "live",
                "--function-version",
                "3",
                "--routing-config-additional-version-weight",
                "4=0.1",
                "--select",
                "AliasArn",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        let operation = find_operation(name).unwrap();
        let options = commands::invocation_options(operation, sub, &Settings::default()).unwrap();
        let invocation =
            Invocation::new(operation, commands::raw_params(operation, sub), options).unwrap();

        assert_eq!(sub.value_of("region"), Some("us-west-2"));
        assert_eq!(
            invocation.request.body,
            Body::Json(serde_json::json!({
                "Name": "live",
                "FunctionVersion": "3",
                "RoutingConfig": { "AdditionalVersionWeights": { "4": 0.1 } }
            }))
        );
        assert_eq!(
            invocation.selection,
            OutputSelection::Field("AliasArn".to_string())
        );
    }
}
