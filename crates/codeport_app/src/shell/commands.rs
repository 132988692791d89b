use std::path::PathBuf;

use codeport_core::{TargetLanguage, UnknownLanguage};

/// One line of shell input. Entry numbers are 1-based as printed by `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Zip(PathBuf),
    Repo(String),
    Lang(Option<TargetLanguage>),
    Submit,
    Reprocess,
    List,
    Show(usize),
    Open,
    Close,
    Save { entry: usize, dir: Option<PathBuf> },
    Download(Option<PathBuf>),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("`{0}` is not an entry number")]
    BadEntry(String),
    #[error(transparent)]
    Language(#[from] UnknownLanguage),
}

/// Parses a non-empty input line. Returns `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "zip" => Command::Zip(PathBuf::from(required(rest, "zip", "a path")?)),
        "repo" => Command::Repo(required(rest, "repo", "a URL")?.to_string()),
        "lang" => {
            let name = required(rest, "lang", "a language or `none`")?;
            if name.eq_ignore_ascii_case("none") {
                Command::Lang(None)
            } else {
                Command::Lang(Some(name.parse()?))
            }
        }
        "submit" => Command::Submit,
        "reprocess" => Command::Reprocess,
        "list" | "ls" => Command::List,
        "show" => Command::Show(entry_number(required(rest, "show", "an entry number")?)?),
        "open" => Command::Open,
        "close" => Command::Close,
        "save" => {
            let rest = required(rest, "save", "an entry number")?;
            let (number, dir) = match rest.split_once(char::is_whitespace) {
                Some((number, dir)) => (number, Some(PathBuf::from(dir.trim()))),
                None => (rest, None),
            };
            Command::Save {
                entry: entry_number(number)?,
                dir,
            }
        }
        "download" => Command::Download(optional_path(rest)),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn optional_path(rest: &str) -> Option<PathBuf> {
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}

fn entry_number(text: &str) -> Result<usize, ParseError> {
    match text.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(ParseError::BadEntry(text.to_string())),
    }
}
