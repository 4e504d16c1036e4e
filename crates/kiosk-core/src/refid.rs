//! Reference tokens: the opaque id a kiosk page carries in its URL.

use std::fmt;

use serde::{Deserialize, Serialize};

/// URL query parameter names accepted as a reference token, in priority order.
pub const REF_ID_ALIASES: [&str; 3] = ["refId", "referenceid", "ref"];

/// A trimmed, non-empty reference token.
///
/// Tokens are compared byte-for-byte (cache keys are case-sensitive); only the
/// upstream identity check is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefId(String);

impl RefId {
  /// Trim `raw`; returns `None` if nothing is left.
  pub fn parse(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
  }

  /// Pick the token out of decoded query pairs.
  ///
  /// Aliases are tried in [`REF_ID_ALIASES`] order; within an alias the first
  /// non-blank value wins.
  pub fn from_query_pairs<I, K, V>(pairs: I) -> Option<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let pairs: Vec<(K, V)> = pairs.into_iter().collect();
    REF_ID_ALIASES.iter().find_map(|alias| {
      pairs
        .iter()
        .filter(|(k, _)| k.as_ref() == *alias)
        .find_map(|(_, v)| Self::parse(v.as_ref()))
    })
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// Log-safe rendering: `abcd…wxyz`, or `****` for short tokens.
  pub fn masked(&self) -> String {
    let chars: Vec<char> = self.0.chars().collect();
    if chars.len() > 8 {
      let head: String = chars[..4].iter().collect();
      let tail: String = chars[chars.len() - 4..].iter().collect();
      format!("{head}…{tail}")
    } else {
      "****".to_owned()
    }
  }
}

impl fmt::Display for RefId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl TryFrom<String> for RefId {
  type Error = &'static str;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value).ok_or("reference id must not be blank")
  }
}

impl From<RefId> for String {
  fn from(value: RefId) -> Self { value.0 }
}
