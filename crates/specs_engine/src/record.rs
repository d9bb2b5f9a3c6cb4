use specs_core::{CrawlConfig, RecordBuilder, VehicleRecord, SEED_FIELDS};

use crate::document::{parse_document, DocumentView, Query};
use crate::fetch::Fetcher;
use crate::ExtractError;

/// Build a record from a specification page.
///
/// Make, model and year come from `itemprop` metadata and are required; any
/// labeled pair in the data sections whose label names a schema field is
/// added on top. A page without the data container yields a seed-only record.
pub fn record_from(
    doc: &dyn DocumentView,
    config: &CrawlConfig,
    url: &str,
) -> Result<VehicleRecord, ExtractError> {
    let layout = &config.layout;
    let [make_field, model_field, year_field] = SEED_FIELDS;

    let make = required_meta(doc, &layout.manufacturer_prop, make_field, url)?;
    let model = required_meta(doc, &layout.model_prop, model_field, url)?;
    let year = required_meta(doc, &layout.release_date_prop, year_field, url)?;

    let mut builder = RecordBuilder::new(&config.schema)
        .seed(make_field, make)
        .seed(model_field, model)
        .seed(year_field, year);

    let Some(container) = doc.find_first(doc.root(), &Query::tag("div").class(&layout.data_container))
    else {
        return Ok(builder.build());
    };

    let label_query = Query::tag("span").class(&layout.label_class);
    let value_query = Query::tag("span").class(&layout.value_class);
    let section_query = Query::tag("ul").class(&layout.data_section_class);
    for section in doc.find_all(container, &section_query) {
        for item in doc.find_all(section, &Query::tag("li")) {
            let label = doc.find_first(item, &label_query);
            let value = doc.find_first(item, &value_query);
            if let (Some(label), Some(value)) = (label, value) {
                builder.insert_scraped(&doc.text_of(label), &doc.text_of(value));
            }
        }
    }

    Ok(builder.build())
}

/// Fetch a specification page and build its record.
pub async fn fetch_record(
    fetcher: &dyn Fetcher,
    config: &CrawlConfig,
    url: &str,
) -> Result<VehicleRecord, ExtractError> {
    let page = fetcher.fetch(url).await?;
    let doc = parse_document(&page.body)?;
    record_from(&doc, config, url)
}

fn required_meta(
    doc: &dyn DocumentView,
    itemprop: &str,
    field: &str,
    url: &str,
) -> Result<String, ExtractError> {
    doc.find_first(doc.root(), &Query::any().attr("itemprop", itemprop))
        .and_then(|node| doc.attr_of(node, "content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ExtractError::SchemaMismatch {
            field: field.to_string(),
            url: url.to_string(),
        })
}
