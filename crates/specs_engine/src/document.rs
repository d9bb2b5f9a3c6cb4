//! Queryable view over a parsed page.
//!
//! Extractors only talk to [`DocumentView`]; [`ScraperDocument`] is the
//! html5ever-backed implementation used in production.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("page body is empty")]
    EmptyDocument,
    #[error("expected container {container:?} not found")]
    MissingContainer { container: String },
}

impl ParseError {
    pub fn missing(container: impl Into<String>) -> Self {
        ParseError::MissingContainer {
            container: container.into(),
        }
    }
}

/// Opaque reference to an element inside one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(NodeId);

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrPredicate {
    Equals { name: String, value: String },
    HasClass(String),
    Present(String),
}

/// Tag name plus attribute predicates; all must hold for an element to match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    tag: Option<String>,
    predicates: Vec<AttrPredicate>,
}

impl Query {
    /// Any element.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            tag: Some(name.into()),
            predicates: Vec::new(),
        }
    }

    /// `class` attribute contains `class` as one of its whitespace-separated tokens.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.predicates.push(AttrPredicate::HasClass(class.into()));
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.push(AttrPredicate::Equals {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn has_attr(mut self, name: impl Into<String>) -> Self {
        self.predicates.push(AttrPredicate::Present(name.into()));
        self
    }

    /// Test an element given its tag name and an attribute lookup.
    pub fn matches<'a, F>(&self, tag: &str, attr: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.predicates.iter().all(|predicate| match predicate {
            AttrPredicate::Equals { name, value } => attr(name) == Some(value.as_str()),
            AttrPredicate::HasClass(class) => attr("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
            AttrPredicate::Present(name) => attr(name).is_some(),
        })
    }
}

/// Search capabilities the extractors rely on. Searches cover descendants of
/// `scope`, not `scope` itself, in document order.
pub trait DocumentView {
    fn root(&self) -> NodeHandle;
    fn find_first(&self, scope: NodeHandle, query: &Query) -> Option<NodeHandle>;
    fn find_all(&self, scope: NodeHandle, query: &Query) -> Vec<NodeHandle>;
    /// Concatenated text of the element and its descendants.
    fn text_of(&self, node: NodeHandle) -> String;
    fn attr_of(&self, node: NodeHandle, name: &str) -> Option<String>;
}

pub struct ScraperDocument {
    html: Html,
}

/// Build a tree from a page body. Malformed markup degrades gracefully; only
/// an empty body is rejected.
pub fn parse_document(body: &str) -> Result<ScraperDocument, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }
    Ok(ScraperDocument {
        html: Html::parse_document(body),
    })
}

impl ScraperDocument {
    fn element(&self, node: NodeHandle) -> Option<ElementRef<'_>> {
        self.html.tree.get(node.0).and_then(ElementRef::wrap)
    }

    fn matching<'a>(
        &'a self,
        scope: NodeHandle,
        query: &'a Query,
    ) -> impl Iterator<Item = NodeHandle> + 'a {
        self.html
            .tree
            .get(scope.0)
            .into_iter()
            .flat_map(|node| node.descendants().skip(1))
            .filter_map(ElementRef::wrap)
            .filter(move |el| {
                let value = el.value();
                query.matches(value.name(), |name| value.attr(name))
            })
            .map(|el| NodeHandle(el.id()))
    }
}

impl DocumentView for ScraperDocument {
    fn root(&self) -> NodeHandle {
        NodeHandle(self.html.tree.root().id())
    }

    fn find_first(&self, scope: NodeHandle, query: &Query) -> Option<NodeHandle> {
        self.matching(scope, query).next()
    }

    fn find_all(&self, scope: NodeHandle, query: &Query) -> Vec<NodeHandle> {
        self.matching(scope, query).collect()
    }

    fn text_of(&self, node: NodeHandle) -> String {
        self.element(node)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    fn attr_of(&self, node: NodeHandle, name: &str) -> Option<String> {
        self.element(node)
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    }
}
