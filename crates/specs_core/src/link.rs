use std::fmt;

/// Which level of the catalog tree a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkRole {
    CategoryRoot,
    Listing,
    Detail,
}

/// A fully qualified URL tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub url: String,
    pub role: LinkRole,
}

impl Link {
    pub fn new(url: impl Into<String>, role: LinkRole) -> Self {
        Self {
            url: url.into(),
            role,
        }
    }

    pub fn category_root(url: impl Into<String>) -> Self {
        Self::new(url, LinkRole::CategoryRoot)
    }

    pub fn listing(url: impl Into<String>) -> Self {
        Self::new(url, LinkRole::Listing)
    }

    pub fn detail(url: impl Into<String>) -> Self {
        Self::new(url, LinkRole::Detail)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
