use super::FormatError;
use regex::Regex;
use std::sync::OnceLock;

/// The only rule the engine runs, compared case-insensitively
pub const STANDARD_RULE: &str = "B3/S23";

/// The `x = <W>, y = <H>, rule = <RULE>` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Header {
    pub width: u32,
    pub height: u32,
}

/// A `#` line before, between or after the data lines
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Comment<'a> {
    Name(&'a str),
    Author(&'a str),
    Text(&'a str),
    /// Offsets (`#P`, `#R`), rule hints (`#r`) and anything else we do not use
    Ignored,
}

fn header_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"^x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)\s*(?:,\s*rule\s*=\s*(\S+)\s*)?$")
            .expect("header pattern is valid")
    })
}

/// Parses a trimmed header line; `number` is its 1-based line number
///
/// The rule clause may be left out, which means [`STANDARD_RULE`].
pub(super) fn parse_header(line: &str, number: usize) -> Result<Header, FormatError> {
    let malformed = || FormatError::MalformedHeader {
        line: number,
        text: line.to_owned(),
    };

    let captures = header_regex().captures(line).ok_or_else(malformed)?;
    let width = captures[1].parse().map_err(|_| malformed())?;
    let height = captures[2].parse().map_err(|_| malformed())?;

    if let Some(rule) = captures.get(3) {
        if !rule.as_str().eq_ignore_ascii_case(STANDARD_RULE) {
            return Err(FormatError::UnsupportedRule {
                rule: rule.as_str().to_owned(),
            });
        }
    }

    Ok(Header { width, height })
}

/// Classifies a trimmed line starting with `#`
pub(super) fn parse_comment(line: &str) -> Comment<'_> {
    let Some(body) = line.strip_prefix('#') else {
        return Comment::Ignored;
    };
    let mut chars = body.chars();
    let kind = chars.next();
    let value = chars.as_str().trim();

    match kind {
        Some('N') => Comment::Name(value),
        Some('O') => Comment::Author(value),
        Some('C' | 'c') => Comment::Text(value),
        _ => Comment::Ignored,
    }
}
