use std::fmt;

use crate::error::InvalidRunId;

/// Upper bound on identifier length; real run ids are ~20 bytes.
pub const MAX_RUN_ID_LEN: usize = 128;

/// A validated run identifier.
///
/// The raw value comes from the webhook body and ends up as a directory name
/// under the workspace root and as a URL segment in the verdict. Only
/// `[A-Za-z0-9_-]` is accepted, which rules out separators, dots and
/// anything that would need escaping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn parse(raw: &str) -> Result<Self, InvalidRunId> {
        if raw.is_empty() {
            return Err(InvalidRunId::Empty);
        }
        if raw.len() > MAX_RUN_ID_LEN {
            return Err(InvalidRunId::TooLong {
                max: MAX_RUN_ID_LEN,
            });
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(InvalidRunId::DisallowedChar(c));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
