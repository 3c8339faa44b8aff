//! Exports the [`build_site`] function which stitches together the steps of
//! planning a site: loading the query result ([`crate::source`]), planning
//! pages ([`crate::plan`]), and handing every page to a [`PageSink`]
//! ([`crate::sink`]).

use crate::config::Config;
use crate::plan::{plan, Error as PlanError, PageKind};
use crate::sink::{CreatePage, Error as SinkError, PageSink};
use crate::source::{self, Error as SourceError};
use log::{error, info};
use std::fmt;

/// The number of pages of each kind handed to the sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub detail: usize,
    pub list: usize,
    pub category: usize,
    pub author: usize,
}

impl Summary {
    fn record(&mut self, kind: PageKind) {
        match kind {
            PageKind::Detail => self.detail += 1,
            PageKind::List => self.list += 1,
            PageKind::Category => self.category += 1,
            PageKind::Author => self.author += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.detail + self.list + self.category + self.author
    }
}

/// Plans the site described by `config` and registers every page with `sink`.
/// Loading and planning both finish before the sink sees anything, so a
/// failed run registers no pages.
pub fn build_site(config: &Config, sink: &mut dyn PageSink) -> Result<Summary> {
    info!("Loading documents from {}", config.source.display());
    let documents = match source::load(&config.source).and_then(|r| r.into_documents(&config.root)) {
        Ok(documents) => documents,
        Err(err) => {
            if let Some(errors) = err.upstream_errors() {
                for e in errors {
                    error!("Upstream query error: {}", e);
                }
            }
            return Err(Error::Source(err));
        }
    };
    info!("Loaded {} documents", documents.len());

    let pages = plan(&documents, &config.options())?;

    let mut summary = Summary::default();
    for page in pages {
        summary.record(page.kind);
        sink.create_page(CreatePage::new(page, &config.templates))?;
    }
    info!(
        "Planned {} pages (detail: {}, list: {}, category: {}, author: {})",
        summary.total(),
        summary.detail,
        summary.list,
        summary.category,
        summary.author,
    );
    Ok(summary)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for planning a site.
#[derive(Debug)]
pub enum Error {
    /// Returned when documents can't be loaded, including when the upstream
    /// query reported errors.
    Source(SourceError),

    /// Returned when the documents can't be planned.
    Plan(PlanError),

    /// Returned when the sink rejects a page.
    Sink(SinkError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Source(err) => write!(f, "{}", err),
            Error::Plan(err) => write!(f, "{}", err),
            Error::Sink(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(err) => Some(err),
            Error::Plan(err) => Some(err),
            Error::Sink(err) => Some(err),
        }
    }
}

impl From<SourceError> for Error {
    /// Converts [`SourceError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: SourceError) -> Error {
        Error::Source(err)
    }
}

impl From<PlanError> for Error {
    /// Converts [`PlanError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: PlanError) -> Error {
        Error::Plan(err)
    }
}

impl From<SinkError> for Error {
    /// Converts [`SinkError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: SinkError) -> Error {
        Error::Sink(err)
    }
}
