//! Changelog entries

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// One dated, authored record from the `%changelog` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    /// Date token as written, e.g. "Mon Jan 1 2020" (not validated)
    pub date: String,

    /// Author display name
    pub author: String,

    /// Author email without angle brackets
    #[serde(rename = "author_email")]
    pub email: String,

    /// Remainder of the header line after the email
    pub title: String,
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(
            r"^\s*\*\s+(?P<date>\w{3}\s+\w{3}\s+\d{1,2}\s+\d{4})\s+(?P<author>.*\S)\s*<(?P<email>[^<>]*)>\s*(?P<title>.*?)\s*$",
        )
        .expect("changelog header pattern must compile")
    })
}

impl ChangelogEntry {
    /// Parse a changelog header line
    ///
    /// Returns `None` for anything that is not a header, including the
    /// `- item` body lines that follow one.
    ///
    /// # Examples
    /// `* Mon Jan 1 2020 Jane Doe <jane@example.com> - 1.0-1` yields the date
    /// "Mon Jan 1 2020", author "Jane Doe", email "jane@example.com" and
    /// title "- 1.0-1".
    pub fn parse_header(line: &str) -> Option<Self> {
        let caps = header_regex().captures(line)?;
        Some(Self {
            date: caps["date"].to_string(),
            author: caps["author"].to_string(),
            email: caps["email"].to_string(),
            title: caps["title"].to_string(),
        })
    }
}
