//! HTML fixtures shaped like the catalog site.
#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Category root page with one labeled section per `(heading, hrefs)`.
pub fn category_page(sections: &[(&str, Vec<&str>)]) -> String {
    let mut html = String::from(r#"<html><body><div class="temp2-col-main">"#);
    for (heading, hrefs) in sections {
        html.push_str(&format!(
            r#"<div class="general-list"><h2 class="header-label">{heading}</h2><ul>"#
        ));
        for href in hrefs {
            html.push_str(&format!(r#"<li><a href="{href}">model</a></li>"#));
        }
        html.push_str("</ul></div>");
    }
    html.push_str("</div></body></html>");
    html
}

/// Listing page with a model-years list.
pub fn listing_page(year_hrefs: &[&str]) -> String {
    let items: String = year_hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">year</a></li>"#))
        .collect();
    format!(r#"<html><body><div class="grid-2-5"><ul>{items}</ul></div></body></html>"#)
}

/// Specification page with metadata and one data section.
pub fn detail_page(make: &str, model: &str, year: &str, pairs: &[(&str, &str)]) -> String {
    let items: String = pairs
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<li><span class="x-smaller">{label}</span> <span class="smaller">{value}</span></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><head>
<meta itemprop="manufacturer" content="{make}">
<meta itemprop="model" content="{model}">
<meta itemprop="releaseDate" content="{year}">
</head><body><div class="subnav-content"><ul class="list-1-2">{items}</ul></div></body></html>"#
    )
}

pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

pub async fn serve(server: &MockServer, at: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(at.to_string()))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// One SUV model with `years` specification pages, all well formed.
pub async fn serve_brand(server: &MockServer, brand: &str, model: &str, years: &[u16]) {
    let slug = brand.to_lowercase();
    let listing = format!("/{slug}/{model}/");
    let heading = format!("{brand} SUVs");
    serve(
        server,
        &format!("/{slug}"),
        category_page(&[(heading.as_str(), vec![listing.as_str()])]),
    )
    .await;

    let year_hrefs: Vec<String> = years.iter().map(|y| format!("{listing}{y}/")).collect();
    let year_refs: Vec<&str> = year_hrefs.iter().map(String::as_str).collect();
    serve(server, &listing, listing_page(&year_refs)).await;

    for (href, year) in year_hrefs.iter().zip(years) {
        serve(
            server,
            &format!("{href}specifications/"),
            detail_page(brand, model, &year.to_string(), &[("City:", "20 mpg")]),
        )
        .await;
    }
}
