// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line commands understood by the console harness.

use thiserror::Error;

pub const HELP: &str = "\
commands:
  fg | bg                    foreground / background the shell
  tag <hex>                  deliver a tag discovery (e.g. tag 04:A1:22)
  back                       back navigation intent
  refresh                    pull-to-refresh
  open <url>                 navigate inside the page
  finish <url>               report page load finished
  error <code> <text>        report page load error
  progress <percent>         report load progress
  call <json>                invoke the call surface as hosted script would
  quit";

/// One harness command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessCommand {
    Foreground,
    Background,
    Tag(Vec<u8>),
    Back,
    Refresh,
    Open(String),
    Finish(String),
    Error { code: i32, description: String },
    Progress(u8),
    Call(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid tag id: {0}")]
    BadTag(String),

    #[error("invalid number: {0}")]
    BadNumber(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<HarnessCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "fg" | "foreground" => HarnessCommand::Foreground,
        "bg" | "background" => HarnessCommand::Background,
        "back" => HarnessCommand::Back,
        "refresh" => HarnessCommand::Refresh,
        "help" | "?" => HarnessCommand::Help,
        "quit" | "exit" => HarnessCommand::Quit,
        "tag" => HarnessCommand::Tag(parse_tag(required(rest, "tag")?)?),
        "open" => HarnessCommand::Open(required(rest, "open")?.to_owned()),
        "finish" => HarnessCommand::Finish(required(rest, "finish")?.to_owned()),
        "call" => HarnessCommand::Call(required(rest, "call")?.to_owned()),
        "progress" => {
            let arg = required(rest, "progress")?;
            let percent = arg
                .parse::<u8>()
                .map_err(|_| CommandError::BadNumber(arg.to_owned()))?;
            HarnessCommand::Progress(percent)
        }
        "error" => {
            let arg = required(rest, "error")?;
            let (code, description) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
            let code = code
                .parse::<i32>()
                .map_err(|_| CommandError::BadNumber(code.to_owned()))?;
            HarnessCommand::Error {
                code,
                description: description.trim().to_owned(),
            }
        }
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn required<'a>(rest: &'a str, verb: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(verb))
    } else {
        Ok(rest)
    }
}

/// Accept `04A1`, `04a1`, `04:A1` and `04 A1`.
fn parse_tag(arg: &str) -> Result<Vec<u8>, CommandError> {
    let digits: String = arg
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | ' '))
        .collect();
    hex::decode(&digits).map_err(|e| CommandError::BadTag(format!("{arg}: {e}")))
}
