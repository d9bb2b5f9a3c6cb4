use serde::{Deserialize, Serialize};

/// Fields every record is seeded with from detail-page metadata.
pub const SEED_FIELDS: [&str; 3] = ["make", "model", "year"];

const DEFAULT_FIELDS: [&str; 16] = [
    "make",
    "model",
    "year",
    "city",
    "highway",
    "fuel tank capacity",
    "total seating capacity",
    "max cargo capacity",
    "drive type",
    "cylinder configuration",
    "engine liters",
    "horsepower",
    "transmission",
    "torque",
    "abs",
    "size",
];

/// Ordered list of recognized output attributes.
///
/// Doubles as the CSV header and as the allow-list of labels a detail page
/// may populate. Names are stored already normalized (see [`normalize_label`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FieldSchema {
    fields: Vec<String>,
}

impl FieldSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|f| normalize_label(f.as_ref()))
                .collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// First name that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<&str> {
        self.fields
            .iter()
            .enumerate()
            .find(|&(idx, name)| self.fields[..idx].contains(name))
            .map(|(_, name)| name.as_str())
    }
}

impl From<Vec<String>> for FieldSchema {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<FieldSchema> for Vec<String> {
    fn from(schema: FieldSchema) -> Self {
        schema.fields
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS)
    }
}

/// Normalize label (or value) text scraped from a page.
///
/// Drops newlines, tabs, carriage returns and colons, collapses the remaining
/// whitespace runs to single spaces, trims, and lower-cases.
pub fn normalize_label(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r' | ':'))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_colon_and_case() {
        assert_eq!(normalize_label("City:"), "city");
        assert_eq!(normalize_label("\n\tFuel Tank\n   Capacity:\n"), "fuel tank capacity");
    }

    #[test]
    fn duplicates_are_reported() {
        let schema = FieldSchema::new(["make", "model", "Make"]);
        assert_eq!(schema.first_duplicate(), Some("make"));
        assert_eq!(FieldSchema::default().first_duplicate(), None);
    }
}
