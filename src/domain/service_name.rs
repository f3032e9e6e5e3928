use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

const MAX_LEN: usize = 256;

/// User supplied name of the tracked service ("Netflix", "Domain hosting", ...)
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceName(String);

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ServiceName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref INVALID_CHARS: HashSet<char> = vec!['/', '(', ')', '"', '<', '>', '\\', '{', '}']
                .into_iter()
                .collect();
        }

        if value.trim().is_empty() {
            return Err(Error::ParsingError("Name cannot be empty".into()));
        }
        if value.graphemes(true).count() > MAX_LEN {
            return Err(Error::ParsingError("Name too long".into()));
        }
        if value.chars().any(|c| INVALID_CHARS.contains(&c)) {
            return Err(Error::ParsingError(
                "Name contains invalid characters".into(),
            ));
        }
        Ok(Self(value.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use claims::{assert_err, assert_ok};

    use super::*;

    #[test]
    fn long_name_valid() {
        let name = "ё".repeat(MAX_LEN);
        assert_ok!(name.parse::<ServiceName>());
    }

    #[test]
    fn too_long_name_invalid() {
        let name = "ё".repeat(MAX_LEN + 10);
        assert_err!(name.parse::<ServiceName>());
    }

    #[test]
    fn empty_name_invalid() {
        let name = "";
        assert_err!(name.parse::<ServiceName>());
    }

    #[test]
    fn blank_name_invalid() {
        let name = "   ";
        assert_err!(name.parse::<ServiceName>());
    }

    #[test]
    fn bad_chars_invalid() {
        let name = "test{}\\\"/<>";
        assert_err!(name.parse::<ServiceName>());
    }

    #[test]
    fn plain_name_valid() {
        assert_ok!("Domain hosting".parse::<ServiceName>());
    }
}
