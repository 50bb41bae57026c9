//! Command token parsing.
//!
//! The first whitespace-separated token, lower-cased, is looked up exactly
//! in [`COMMANDS`]; there is no prefix matching, so `/deletealltruth` can
//! never be mistaken for `/deleteall`.

use crate::types::Partition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Hello,
    Admin,
    DeleteAll,
    DeleteAllTruths,
    DeleteAllDares,
    ShowTruths,
    ShowDares,
    AddTruth,
    AddDare,
    RoastMode,
    Truth,
    Dare,
}

const COMMANDS: &[(&str, Command)] = &[
    ("/hello", Command::Hello),
    ("/hi", Command::Hello),
    ("/admin", Command::Admin),
    ("/deleteall", Command::DeleteAll),
    ("/deletealltruth", Command::DeleteAllTruths),
    ("/deletealldare", Command::DeleteAllDares),
    ("/showtruths", Command::ShowTruths),
    ("/showdares", Command::ShowDares),
    ("/addtruth", Command::AddTruth),
    ("/adddare", Command::AddDare),
    ("/roastmode", Command::RoastMode),
    ("/truth", Command::Truth),
    ("/dare", Command::Dare),
];

impl Command {
    /// Exact lookup of an already lower-cased token.
    pub fn lookup(token: &str) -> Option<Command> {
        COMMANDS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, c)| *c)
    }

    /// Canonical token, as shown in help text.
    pub fn token(self) -> &'static str {
        match self {
            Command::Hello => "/hello",
            Command::Admin => "/admin",
            Command::DeleteAll => "/deleteall",
            Command::DeleteAllTruths => "/deletealltruth",
            Command::DeleteAllDares => "/deletealldare",
            Command::ShowTruths => "/showtruths",
            Command::ShowDares => "/showdares",
            Command::AddTruth => "/addtruth",
            Command::AddDare => "/adddare",
            Command::RoastMode => "/roastmode",
            Command::Truth => "/truth",
            Command::Dare => "/dare",
        }
    }

    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Command::DeleteAll
                | Command::DeleteAllTruths
                | Command::DeleteAllDares
                | Command::ShowTruths
                | Command::ShowDares
                | Command::AddTruth
                | Command::AddDare
        )
    }

    /// The single partition a command targets, if it targets exactly one.
    pub fn partition(self) -> Option<Partition> {
        match self {
            Command::DeleteAllTruths | Command::ShowTruths | Command::AddTruth | Command::Truth => {
                Some(Partition::Truths)
            }
            Command::DeleteAllDares | Command::ShowDares | Command::AddDare | Command::Dare => {
                Some(Partition::Dares)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A recognised command and the trimmed text after it (case preserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<'a> {
    pub command: Command,
    pub args: &'a str,
}

/// Parse message text; `None` when it is not a known command.
pub fn parse(text: &str) -> Option<Parsed<'_>> {
    let text = text.trim();
    let (head, rest) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };
    let command = Command::lookup(&head.to_lowercase())?;
    Some(Parsed {
        command,
        args: rest,
    })
}
