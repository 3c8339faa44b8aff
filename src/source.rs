//! Defines the [`QueryResult`] type and the logic for loading [`Document`]s
//! from a query-result file. A query result is a YAML document with a list of
//! `posts` and an optional list of `errors` reported by whatever produced it:
//!
//! ```yaml
//! errors: []
//! posts:
//!   - path: /hello-world/
//!     date: 2019-01-05
//!     author: jane
//!     category: [rust, web]
//!     featured: false
//! ```

use crate::document::{sort_by_date_desc, Document};
use crate::slug;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// The raw result of a document query.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct QueryResult {
    /// Errors reported upstream. A non-empty list means the query failed and
    /// `posts` must not be used.
    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub posts: Vec<Record>,
}

/// A single document as it appears in a query result.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Record {
    /// The document's canonical path. Derived from `path` and `date` when
    /// absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// The document's content path, e.g. `/hello-world/`.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Either `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,

    pub author: String,

    #[serde(default, alias = "categories")]
    pub category: Vec<String>,

    #[serde(default)]
    pub featured: bool,
}

impl Record {
    fn to_document(&self, root: &str) -> Result<Document> {
        let date = parse_date(&self.date)?;
        let slug = match (&self.slug, &self.path) {
            (Some(slug), _) => slug.clone(),
            (None, Some(path)) => slug::derive(root, date, path),
            (None, None) => return Err(Error::MissingSlug),
        };
        if slug.is_empty() {
            return Err(Error::EmptySlug);
        }
        Ok(Document {
            slug,
            title: self.title.clone(),
            date,
            author: self.author.clone(),
            categories: self.category.clone(),
            featured: self.featured,
        })
    }
}

impl QueryResult {
    /// Parses a query result from YAML text.
    pub fn from_str(input: &str) -> Result<QueryResult> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Converts the query result into documents sorted most recent first.
    /// Documents sharing a date keep their order from the query result.
    /// `root` is the listing root used to derive slugs for records that only
    /// carry a content path.
    ///
    /// Fails with [`Error::UpstreamQuery`] if the query reported any errors.
    pub fn into_documents(self, root: &str) -> Result<Vec<Document>> {
        if !self.errors.is_empty() {
            return Err(Error::UpstreamQuery(self.errors));
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut documents = Vec::with_capacity(self.posts.len());
        for (i, record) in self.posts.iter().enumerate() {
            let document = record.to_document(root).map_err(|e| {
                Error::Annotated(format!("converting post #{}", i + 1), Box::new(e))
            })?;
            if !seen.insert(document.slug.clone()) {
                return Err(Error::DuplicateSlug(document.slug));
            }
            documents.push(document);
        }

        sort_by_date_desc(&mut documents);
        Ok(documents)
    }
}

/// Loads and parses the query-result file at `path`.
pub fn load(path: &Path) -> Result<QueryResult> {
    match File::open(path) {
        Ok(file) => Ok(serde_yaml::from_reader(file)?),
        Err(e) => Err(Error::Annotated(
            format!("opening query result `{}`", path.display()),
            Box::new(Error::Io(e)),
        )),
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => match DateTime::parse_from_rfc3339(input) {
            Ok(date_time) => Ok(date_time.naive_local().date()),
            Err(err) => Err(Error::DateParse {
                input: input.to_owned(),
                err,
            }),
        },
    }
}

/// Represents the result of loading documents.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading documents.
#[derive(Debug)]
pub enum Error {
    /// Returned when the query result carries errors reported upstream.
    UpstreamQuery(Vec<String>),

    /// Returned when a record's date is neither `YYYY-MM-DD` nor RFC 3339.
    DateParse {
        input: String,
        err: chrono::ParseError,
    },

    /// Returned when a record has neither a slug nor a content path.
    MissingSlug,

    /// Returned when a record's slug is empty.
    EmptySlug,

    /// Returned when two records resolve to the same slug.
    DuplicateSlug(String),

    /// Returned when there was an error parsing the query result as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl Error {
    /// The errors reported upstream, if this is (or wraps) an
    /// [`Error::UpstreamQuery`].
    pub fn upstream_errors(&self) -> Option<&[String]> {
        match self {
            Error::UpstreamQuery(errors) => Some(errors.as_slice()),
            Error::Annotated(_, err) => err.upstream_errors(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UpstreamQuery(errors) => {
                write!(f, "query reported {} error(s)", errors.len())?;
                for err in errors {
                    write!(f, "\n  {}", err)?;
                }
                Ok(())
            }
            Error::DateParse { input, err } => {
                write!(f, "invalid date `{}`: {}", input, err)
            }
            Error::MissingSlug => write!(f, "post has neither `slug` nor `path`"),
            Error::EmptySlug => write!(f, "post has an empty slug"),
            Error::DuplicateSlug(slug) => write!(f, "duplicate slug `{}`", slug),
            Error::DeserializeYaml(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "{}", err),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DateParse { input: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    const POSTS: &str = "
posts:
  - path: /older/
    date: 2019-01-05
    author: jane
    category: [rust]
  - slug: /blog/2020/03/01/explicit
    title: Explicit
    date: 2020-03-01T10:30:00+02:00
    author: joe
    categories: [rust, web]
    featured: true
  - path: /blog/same-day/
    date: 2019-01-05
    author: joe
";

    #[test]
    fn test_into_documents() -> Result<()> {
        let documents = QueryResult::from_str(POSTS)?.into_documents("/blog")?;
        let slugs: Vec<&str> = documents.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(
            vec![
                "/blog/2020/03/01/explicit",
                "/blog/2019/01/05/older",
                "/blog/2019/01/05same-day",
            ],
            slugs
        );

        let explicit = &documents[0];
        assert_eq!(Some("Explicit".to_owned()), explicit.title);
        assert_eq!(NaiveDate::from_ymd_opt(2020, 3, 1), Some(explicit.date));
        assert_eq!(vec!["rust".to_owned(), "web".to_owned()], explicit.categories);
        assert!(explicit.featured);

        assert!(documents[2].categories.is_empty());
        assert!(!documents[2].featured);
        Ok(())
    }

    #[test]
    fn test_upstream_errors() -> Result<()> {
        let result = QueryResult::from_str(
            "
errors:
  - Cannot query field \"category\"
  - Unknown type
posts:
  - path: /a/
    date: 2019-01-05
    author: jane
",
        )?;
        match result.into_documents("/blog") {
            Err(Error::UpstreamQuery(errors)) => {
                assert_eq!(
                    vec!["Cannot query field \"category\"", "Unknown type"],
                    errors
                );
            }
            other => panic!("wanted upstream query error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_date() -> Result<()> {
        let result = QueryResult::from_str("posts: [{path: /a/, date: yesterday, author: jane}]")?;
        match result.into_documents("/blog") {
            Err(Error::Annotated(_, err)) => match *err {
                Error::DateParse { input, err: _ } => assert_eq!("yesterday", input),
                other => panic!("wanted date error, got {:?}", other),
            },
            other => panic!("wanted annotated error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_missing_slug() -> Result<()> {
        let result = QueryResult::from_str("posts: [{date: 2019-01-05, author: jane}]")?;
        let err = result.into_documents("/blog").unwrap_err();
        assert_eq!("converting post #1: post has neither `slug` nor `path`", err.to_string());
        Ok(())
    }

    #[test]
    fn test_duplicate_slug() -> Result<()> {
        let result = QueryResult::from_str(
            "
posts:
  - {slug: /a, date: 2019-01-05, author: jane}
  - {slug: /a, date: 2019-01-06, author: joe}
",
        )?;
        match result.into_documents("/blog") {
            Err(Error::DuplicateSlug(slug)) => assert_eq!("/a", slug),
            other => panic!("wanted duplicate slug error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_load() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(POSTS.as_bytes())?;
        let documents = load(file.path())?.into_documents("/blog")?;
        assert_eq!(3, documents.len());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("./does/not/exist.yaml")).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("opening query result `./does/not/exist.yaml`"));
        assert!(err.upstream_errors().is_none());
    }
}
