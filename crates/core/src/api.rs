use serde::Deserialize;

/// Paginated envelope the content API wraps every list response in.
///
/// Both `/article` and `/category` return `{ "docs": [...] }`; a missing or
/// null `docs` field deserializes to an empty list so callers never have to
/// distinguish "no docs key" from "zero records".
#[derive(Debug, Deserialize)]
pub struct DocsResponse<T> {
    #[serde(default = "Vec::new")]
    pub docs: Vec<T>,
}
