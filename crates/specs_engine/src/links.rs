use specs_core::{CrawlConfig, Link};

use crate::document::{parse_document, DocumentView, NodeHandle, ParseError, Query};
use crate::fetch::Fetcher;
use crate::ExtractError;

/// Listing-page links from a category root page.
///
/// Walks the labeled sections of the main container, keeps those whose heading
/// passes the classification filter, and returns every anchor in their item
/// lists in document order. No matching section is not an error: the result is
/// simply empty.
pub fn listing_links_from(
    doc: &dyn DocumentView,
    config: &CrawlConfig,
) -> Result<Vec<Link>, ParseError> {
    let layout = &config.layout;
    let container = doc
        .find_first(
            doc.root(),
            &Query::tag("div").class(&layout.category_container),
        )
        .ok_or_else(|| ParseError::missing(&layout.category_container))?;

    let heading_query = Query::tag(&layout.heading_tag).class(&layout.heading_class);
    let mut links = Vec::new();
    for section in doc.find_all(container, &Query::tag("div").class(&layout.section_class)) {
        let Some(heading) = doc.find_first(section, &heading_query) else {
            continue;
        };
        if !config.classification.matches(&doc.text_of(heading)) {
            continue;
        }
        let Some(list) = doc.find_first(section, &Query::tag("ul")) else {
            continue;
        };
        links.extend(
            anchor_hrefs(doc, list)
                .into_iter()
                .map(|href| Link::listing(config.absolute(&href))),
        );
    }
    Ok(links)
}

/// Detail-page links from a listing page's model-years list.
pub fn detail_links_from(
    doc: &dyn DocumentView,
    config: &CrawlConfig,
) -> Result<Vec<Link>, ParseError> {
    let layout = &config.layout;
    let container = doc
        .find_first(
            doc.root(),
            &Query::tag("div").class(&layout.model_years_container),
        )
        .ok_or_else(|| ParseError::missing(&layout.model_years_container))?;

    Ok(anchor_hrefs(doc, container)
        .into_iter()
        .map(|href| Link::detail(config.detail_url(&href)))
        .collect())
}

/// Fetch a category root page and extract its listing links.
pub async fn fetch_listing_links(
    fetcher: &dyn Fetcher,
    config: &CrawlConfig,
    category: &str,
) -> Result<Vec<Link>, ExtractError> {
    let page = fetcher.fetch(&config.category_root_url(category)).await?;
    let doc = parse_document(&page.body)?;
    Ok(listing_links_from(&doc, config)?)
}

/// Fetch one listing page and extract its detail links.
pub async fn fetch_detail_links(
    fetcher: &dyn Fetcher,
    config: &CrawlConfig,
    listing: &Link,
) -> Result<Vec<Link>, ExtractError> {
    let page = fetcher.fetch(&listing.url).await?;
    let doc = parse_document(&page.body)?;
    Ok(detail_links_from(&doc, config)?)
}

// hrefs of every anchor under each `li` of `list`
fn anchor_hrefs(doc: &dyn DocumentView, list: NodeHandle) -> Vec<String> {
    let anchor = Query::tag("a").has_attr("href");
    doc.find_all(list, &Query::tag("li"))
        .into_iter()
        .flat_map(|item| doc.find_all(item, &anchor))
        .filter_map(|a| doc.attr_of(a, "href"))
        .filter(|href| !href.trim().is_empty())
        .collect()
}
