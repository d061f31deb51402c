//! Domain entity representing a single redirect rule.

/// A redirect row as read from the backing store.
///
/// `source` is the lookup key (a request path, or an absolute URL without its
/// query string, depending on the deployment key mode). `destination` is an
/// opaque redirect target handed back to the request pipeline unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub source: String,
    pub destination: String,
}

impl Redirect {
    /// Creates a new redirect rule.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Data required to insert a redirect row.
///
/// `domain` is the optional tenant discriminator; rows without a domain are only
/// visible to caches that are not scoped to a domain.
#[derive(Debug, Clone)]
pub struct NewRedirect {
    pub domain: Option<String>,
    pub source: String,
    pub destination: String,
}
