//! Language code type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A two-letter lowercase language code such as `en` or `vi`.
///
/// Localized fields are maps keyed by these codes. The default is
/// [`LanguageCode::ENGLISH`], which is also the fallback language.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// The fallback language key.
    pub const ENGLISH: &'static str = "en";

    /// Create a language code, trimming and lowercasing the input.
    ///
    /// # Errors
    ///
    /// Returns an error unless the normalized input is exactly two ASCII
    /// letters.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let normalized = s.as_ref().trim().to_ascii_lowercase();

        if normalized.len() != 2 || !normalized.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(InvalidInputError::LanguageCode {
                value: s.as_ref().to_string(),
                reason: "must be two ASCII letters".to_string(),
            }
            .into());
        }

        Ok(Self(normalized))
    }

    /// The English language code.
    pub fn english() -> Self {
        Self(Self::ENGLISH.to_string())
    }

    /// Returns the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the fallback language.
    pub fn is_english(&self) -> bool {
        self.0 == Self::ENGLISH
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
