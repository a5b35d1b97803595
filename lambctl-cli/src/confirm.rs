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

//! Interactive confirmation of mutating commands.

use anyhow::Result;
use lambctl::prelude::*;

/// Asks the user whether the command may run.
#[cfg(feature = "cli")]
pub fn confirm(invocation: &Invocation) -> Result<bool> {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;

    let mut rl = Editor::<()>::new();
    match rl.readline(&prompt(invocation)) {
        Ok(ref line) => Ok(is_yes(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Without a terminal front-end there is nobody to ask.
#[cfg(not(feature = "cli"))]
pub fn confirm(invocation: &Invocation) -> Result<bool> {
    anyhow::bail!(
        "{} needs confirmation; pass --force to run it without a prompt",
        prompt(invocation).trim_end()
    )
}

fn prompt(invocation: &Invocation) -> String {
    match invocation.target() {
        Some(target) => format!(
            "Perform {} on \"{}\"? [y/N] ",
            invocation.operation.name, target
        ),
        None => format!("Perform {}? [y/N] ", invocation.operation.name),
    }
}

#[cfg_attr(not(feature = "cli"), allow(dead_code))]
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_operation_and_target() {
        let op = find_operation("DeleteFunction").unwrap();
        let invocation = Invocation::new(
            op,
            vec![("FunctionName", vec!["old-function".to_string()])],
            InvocationOptions::default(),
        )
        .unwrap();
        assert_eq!(
            prompt(&invocation),
            "Perform DeleteFunction on \"old-function\"? [y/N] "
        );
    }

    #[test]
    fn only_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
