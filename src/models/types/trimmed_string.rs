use std::{convert::Infallible, fmt::Display, str::FromStr};

/// A string that has no leading or trailing whitespaces.
///
/// Implemented `From*` traits trim the strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrimmedString(String);

impl TrimmedString {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Trims an optional form value, treating a missing value as empty.
    pub fn from_optional(value: Option<&str>) -> TrimmedString {
        TrimmedString::from(value.unwrap_or_default())
    }
}

impl FromStr for TrimmedString {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TrimmedString(s.trim().to_owned()))
    }
}

impl From<String> for TrimmedString {
    fn from(value: String) -> Self {
        TrimmedString::from(value.as_str())
    }
}

impl From<&str> for TrimmedString {
    fn from(value: &str) -> Self {
        TrimmedString(value.trim().to_owned())
    }
}

impl From<TrimmedString> for String {
    fn from(value: TrimmedString) -> Self {
        value.0
    }
}

impl Display for TrimmedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrimmedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
