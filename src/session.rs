//! Line-oriented input session.
//!
//! Each stdin line is either a new search term (as if the user had typed it
//! into the search bar) or a `:` command. Changing the scope re-issues the
//! current term, the same way tapping a scope button refreshes results.

use std::collections::BTreeSet;

use store_search::{Query, Scope};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::error::{Result, StorefrontError};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Replace the search term.
    Term(String),
    /// Replace the active scopes.
    Scopes(BTreeSet<Scope>),
    /// Stop reading input.
    Quit,
}

/// Parse one line of user input.
///
/// `:scope a,b` selects scopes, `:clear` empties the term, `:quit` exits.
/// Any other line is a search term, kept verbatim apart from the line ending.
///
/// # Errors
///
/// Returns [`StorefrontError::Config`] for unknown commands or scope names.
pub fn parse_line(line: &str) -> Result<Input> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Term(line.to_string()));
    };

    let (name, args) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));
    match name {
        "scope" | "scopes" => {
            let scopes = parse_scopes(args)?;
            Ok(Input::Scopes(scopes))
        }
        "clear" => Ok(Input::Term(String::new())),
        "quit" | "q" => Ok(Input::Quit),
        other => Err(StorefrontError::Config(format!(
            "unknown command `:{other}`"
        ))),
    }
}

/// Parse a comma- or space-separated scope list. An empty list selects nothing.
///
/// # Errors
///
/// Returns an error naming the first unknown scope.
pub fn parse_scopes(list: &str) -> Result<BTreeSet<Scope>> {
    list.split([',', ' '])
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<Scope>().map_err(StorefrontError::from))
        .collect()
}

/// The query state the user has built up so far.
#[derive(Debug, Clone)]
pub struct Session {
    term: String,
    scopes: BTreeSet<Scope>,
}

impl Session {
    pub fn new(scope: Scope) -> Self {
        Self {
            term: String::new(),
            scopes: BTreeSet::from([scope]),
        }
    }

    /// Apply one input. Returns the query to issue, or `None` on quit.
    pub fn apply(&mut self, input: Input) -> Option<Query> {
        match input {
            Input::Term(term) => self.term = term,
            Input::Scopes(scopes) => self.scopes = scopes,
            Input::Quit => return None,
        }
        Some(self.query())
    }

    pub fn query(&self) -> Query {
        Query {
            term: self.term.clone(),
            scopes: self.scopes.clone(),
        }
    }
}

/// Why [`read_inputs`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The user asked to quit.
    Quit,
    /// The input stream closed.
    Eof,
}

/// Feed lines from `reader` through `session`, handing every query it
/// produces to `issue`.
///
/// Lines that are not valid UTF-8 or do not parse are logged and skipped.
///
/// # Errors
///
/// Returns [`StorefrontError::Io`] if reading fails.
pub async fn read_inputs<R, F>(
    mut reader: R,
    session: &mut Session,
    mut issue: F,
) -> Result<Ending>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Query),
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(Ending::Eof);
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "ignoring input that is not valid UTF-8");
                continue;
            }
        };
        let input = match parse_line(line) {
            Ok(input) => input,
            Err(e) => {
                warn!(error = %e, "ignoring input");
                continue;
            }
        };
        match session.apply(input) {
            Some(query) => issue(query),
            None => return Ok(Ending::Quit),
        }
    }
}
