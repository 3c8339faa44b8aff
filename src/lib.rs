//! The library code for the `folio` page planner. The architecture can be
//! broken down into three steps:
//!
//! 1. Loading documents from a query result on disk ([`crate::source`])
//! 2. Planning the pages for those documents ([`crate::plan`])
//! 3. Handing each planned page to a page sink ([`crate::sink`])
//!
//! Of the three, the second step is the more involved. It creates one detail
//! page per document, linked to its neighbors, and then groups the documents
//! into "indices": the main listing (featured documents excluded), one index
//! per category and one per author. Each index is paginated--converted into
//! pages based on a configurable number of documents per page.
//!
//! [`crate::build`] stitches the steps together.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod document;
pub mod group;
pub mod plan;
pub mod sink;
pub mod slug;
pub mod source;
mod util;
