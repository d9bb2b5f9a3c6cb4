use std::collections::BTreeMap;

use crate::schema::{normalize_label, FieldSchema};

/// One extracted, possibly partial, mapping of schema fields to text values.
///
/// Absent fields are absent from the map; there is no null marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VehicleRecord {
    fields: BTreeMap<String, String>,
}

impl VehicleRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Values laid out in schema column order, empty where not populated.
    pub fn values_in<'a>(&'a self, schema: &FieldSchema) -> Vec<&'a str> {
        schema
            .names()
            .iter()
            .map(|name| self.get(name).unwrap_or(""))
            .collect()
    }
}

/// Assembles a [`VehicleRecord`] while enforcing the schema allow-list.
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    schema: &'a FieldSchema,
    fields: BTreeMap<String, String>,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self {
            schema,
            fields: BTreeMap::new(),
        }
    }

    /// Store a metadata value verbatim. A later scraped pair with the same
    /// label replaces it. Fields outside the schema are ignored.
    pub fn seed(mut self, field: &str, value: impl Into<String>) -> Self {
        if self.schema.contains(field) {
            self.fields.insert(field.to_string(), value.into());
        }
        self
    }

    /// Store a scraped label/value pair. Both sides are normalized; the pair is
    /// kept only when the label names a schema field, replacing any earlier
    /// value for it. Returns whether it was kept.
    pub fn insert_scraped(&mut self, raw_label: &str, raw_value: &str) -> bool {
        let label = normalize_label(raw_label);
        if !self.schema.contains(&label) {
            return false;
        }
        let value = normalize_label(raw_value);
        if value.is_empty() {
            return false;
        }
        self.fields.insert(label, value);
        true
    }

    pub fn build(self) -> VehicleRecord {
        VehicleRecord {
            fields: self.fields,
        }
    }
}
