//! Field path model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered list of property names locating a value inside a nested
/// response. A path crossing an array applies to every element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dotted path such as `declarant1.nom`.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.').filter(|s| !s.is_empty()))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_paths() {
        let path = FieldPath::parse("declarant1.nom");
        assert_eq!(path.segments(), ["declarant1", "nom"]);
        assert_eq!(path.to_string(), "declarant1.nom");
    }

    #[test]
    fn empty_input_gives_empty_path() {
        assert!(FieldPath::parse("").is_empty());
        assert!(FieldPath::parse("..").is_empty());
    }
}
