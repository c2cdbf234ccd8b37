//! Content source discriminator shared by reports, moderation and reputation.

use std::fmt;
use std::str::FromStr;

use olion_common::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of content a report, vote or moderation decision refers to.
///
/// The set is closed: every dispatch over it is an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentSource {
    #[sea_orm(string_value = "DISCUSSION")]
    Discussion,
    #[sea_orm(string_value = "ANSWER")]
    Answer,
    #[sea_orm(string_value = "COMMENT")]
    Comment,
}

impl ContentSource {
    /// Wire name of the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discussion => "DISCUSSION",
            Self::Answer => "ANSWER",
            Self::Comment => "COMMENT",
        }
    }

    /// Lowercase label used in human-readable messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Discussion => "discussion",
            Self::Answer => "answer",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both `DISCUSSION` and `discussion` (URL paths use the latter).
impl FromStr for ContentSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DISCUSSION" => Ok(Self::Discussion),
            "ANSWER" => Ok(Self::Answer),
            "COMMENT" => Ok(Self::Comment),
            _ => Err(AppError::InvalidSource(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "discussion".parse::<ContentSource>().ok(),
            Some(ContentSource::Discussion)
        );
        assert_eq!(
            "ANSWER".parse::<ContentSource>().ok(),
            Some(ContentSource::Answer)
        );
        assert_eq!(
            "Comment".parse::<ContentSource>().ok(),
            Some(ContentSource::Comment)
        );
    }

    #[test]
    fn test_unknown_source_is_invalid() {
        let err = "POLL".parse::<ContentSource>().unwrap_err();
        assert!(matches!(err, AppError::InvalidSource(s) if s == "POLL"));
    }
}
