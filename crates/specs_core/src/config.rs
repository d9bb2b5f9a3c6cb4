use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::schema::{FieldSchema, SEED_FIELDS};

const DEFAULT_ORIGIN: &str = "https://www.autobytel.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid site origin {origin:?}: {message}")]
    InvalidOrigin { origin: String, message: String },
    #[error("field schema is empty")]
    EmptySchema,
    #[error("field schema lists {0:?} more than once")]
    DuplicateField(String),
    #[error("field schema must contain seed field {0:?}")]
    MissingSeedField(&'static str),
    #[error("classification token must not be empty")]
    EmptyClassification,
}

/// Case-insensitive substring filter applied to listing section headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationFilter {
    pub token: String,
}

impl ClassificationFilter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn matches(&self, heading: &str) -> bool {
        heading
            .to_lowercase()
            .contains(&self.token.trim().to_lowercase())
    }
}

impl Default for ClassificationFilter {
    fn default() -> Self {
        Self::new("suv")
    }
}

/// Class and attribute names the extractors look for on the catalog site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLayout {
    /// Main content `div` on a category root page.
    pub category_container: String,
    /// Labeled sub-section `div`s inside the category container.
    pub section_class: String,
    pub heading_tag: String,
    pub heading_class: String,
    /// `div` holding the model-year list on a listing page.
    pub model_years_container: String,
    /// Appended to a model-year href to reach its specification page.
    pub detail_suffix: String,
    pub manufacturer_prop: String,
    pub model_prop: String,
    pub release_date_prop: String,
    /// `div` holding the labeled data sections on a detail page.
    pub data_container: String,
    pub data_section_class: String,
    pub label_class: String,
    pub value_class: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            category_container: "temp2-col-main".to_string(),
            section_class: "general-list".to_string(),
            heading_tag: "h2".to_string(),
            heading_class: "header-label".to_string(),
            model_years_container: "grid-2-5".to_string(),
            detail_suffix: "specifications/".to_string(),
            manufacturer_prop: "manufacturer".to_string(),
            model_prop: "model".to_string(),
            release_date_prop: "releaseDate".to_string(),
            data_container: "subnav-content".to_string(),
            data_section_class: "list-1-2".to_string(),
            label_class: "x-smaller".to_string(),
            value_class: "smaller".to_string(),
        }
    }
}

/// Everything the extractors need to know about the target site, passed
/// explicitly to each component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub origin: String,
    pub schema: FieldSchema,
    pub classification: ClassificationFilter,
    pub layout: SiteLayout,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            schema: FieldSchema::default(),
            classification: ClassificationFilter::default(),
            layout: SiteLayout::default(),
        }
    }
}

impl CrawlConfig {
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(self.origin()).map_err(|err| ConfigError::InvalidOrigin {
            origin: self.origin.clone(),
            message: err.to_string(),
        })?;
        if self.schema.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        if let Some(dup) = self.schema.first_duplicate() {
            return Err(ConfigError::DuplicateField(dup.to_string()));
        }
        if let Some(missing) = SEED_FIELDS.iter().find(|f| !self.schema.contains(f)) {
            return Err(ConfigError::MissingSeedField(*missing));
        }
        if self.classification.token.trim().is_empty() {
            return Err(ConfigError::EmptyClassification);
        }
        Ok(())
    }

    /// Site origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.origin.trim_end_matches('/')
    }

    /// `origin/category-lowercased`
    pub fn category_root_url(&self, category: &str) -> String {
        format!("{}/{}", self.origin(), category.to_lowercase())
    }

    /// Site-relative href made absolute by plain concatenation with the origin.
    pub fn absolute(&self, href: &str) -> String {
        format!("{}{}", self.origin(), href.trim())
    }

    pub fn detail_url(&self, model_year_href: &str) -> String {
        format!(
            "{}{}",
            self.absolute(model_year_href),
            self.layout.detail_suffix
        )
    }
}
