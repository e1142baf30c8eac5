//! Core library for the Simplified Ninja content client
//!
//! This crate implements the **Functional Core** of the project: every raw
//! record coming back from the content API passes through the pure mapping
//! functions in this crate before any other code is allowed to look at it.
//!
//! # Architecture Overview
//!
//! The workspace uses a two-crate architecture to enforce separation of
//! concerns:
//!
//! - **`ninja_core`** (this crate): Pure transformation functions with zero I/O
//! - **`ninja`**: HTTP fetching, CLI, and the site server (the Imperative Shell)
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Repeated mapping of the same raw record is
//!   bit-identical; the pseudo-metric fallbacks (`read_count`, `featured`,
//!   category badges) are keyed off the record id and list position, never
//!   off a random source
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`api`]: The paginated `{ docs: [...] }` envelope every list endpoint uses
//! - [`article`]: Raw article types and the article-to-post mapping layer
//! - [`category`]: Raw category types and the category mapping layer
//! - [`store`]: The in-memory filter/sort store backing interactive listings
//! - [`subscribe`]: Newsletter subscription validation and outcome classification
//!
//! The content API has drifted across backend schema revisions; the mapping
//! layer's primary job is absorbing that instability (category as object,
//! array, or bare slug) so that nothing downstream ever sees it.

pub mod api;
pub mod article;
pub mod category;
pub mod store;
pub mod subscribe;
