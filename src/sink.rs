//! Defines the [`PageSink`] trait, which receives planned pages, along with a
//! YAML manifest implementation.

use crate::config::Templates;
use crate::plan::{PageContext, PageDescriptor};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// A request to register a single page with a renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatePage {
    /// The site-relative URL of the page.
    pub path: String,

    /// The identifier of the template the page is rendered with.
    pub template: String,

    /// The parameters handed to the template.
    pub context: PageContext,
}

impl CreatePage {
    /// Pairs a planned page with its template identifier.
    pub fn new(page: PageDescriptor, templates: &Templates) -> CreatePage {
        CreatePage {
            template: templates.for_kind(page.kind).to_owned(),
            path: page.path,
            context: page.context,
        }
    }
}

/// Accepts page registrations.
pub trait PageSink {
    fn create_page(&mut self, page: CreatePage) -> Result<()>;
}

impl PageSink for Vec<CreatePage> {
    fn create_page(&mut self, page: CreatePage) -> Result<()> {
        self.push(page);
        Ok(())
    }
}

/// Collects page registrations and writes them to `W` as a single YAML
/// sequence when [`ManifestSink::finish`] is called.
pub struct ManifestSink<W: Write> {
    writer: W,
    pages: Vec<CreatePage>,
}

impl<W: Write> ManifestSink<W> {
    pub fn new(writer: W) -> ManifestSink<W> {
        ManifestSink {
            writer,
            pages: Vec::new(),
        }
    }

    /// Writes the manifest and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        serde_yaml::to_writer(&mut self.writer, &self.pages)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> PageSink for ManifestSink<W> {
    fn create_page(&mut self, page: CreatePage) -> Result<()> {
        self.pages.push(page);
        Ok(())
    }
}

/// The result of a fallible sink operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error registering pages.
#[derive(Debug)]
pub enum Error {
    /// An error serializing the manifest.
    SerializeYaml(serde_yaml::Error),

    /// An error writing the manifest.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::SerializeYaml(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SerializeYaml(err) => write!(f, "writing manifest: {}", err),
            Error::Io(err) => write!(f, "writing manifest: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SerializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}
