//! The page planner. Turns a date-ordered slice of [`Document`]s into the
//! [`PageDescriptor`]s a renderer needs: one detail page per document, the
//! paginated main listing, and paginated listings per category and per
//! author.

use crate::document::Document;
use crate::group::Tally;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// The default path under which all listing pages live.
pub const DEFAULT_ROOT: &str = "/blog";

/// The kinds of page a plan can contain. Each kind is rendered with its own
/// template (see [`crate::config::Templates`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    List,
    Category,
    Author,
    Detail,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            PageKind::List => "list",
            PageKind::Category => "category",
            PageKind::Author => "author",
            PageKind::Detail => "detail",
        })
    }
}

/// Pagination parameters for a single listing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContext {
    /// The number of grouped documents preceding this page. Always
    /// `(current_page - 1) * limit`.
    pub skip: usize,

    /// The page size.
    pub limit: usize,

    /// The 1-based page number.
    pub current_page: usize,

    /// The number of pages in this listing.
    pub num_pages: usize,
}

/// Pagination parameters for a category or author listing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupContext {
    #[serde(flatten)]
    pub list: ListContext,

    /// The category or author this page lists.
    pub group_key: String,

    /// Every distinct key of this grouping dimension, in first-seen order.
    pub all_keys: Vec<String>,
}

/// Parameters for a document's own page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailContext {
    pub slug: String,

    /// The slug of the next more recent document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_slug: Option<String>,

    /// The slug of the next older document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_slug: Option<String>,
}

/// The renderer parameters attached to a [`PageDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageContext {
    List(ListContext),
    Group(GroupContext),
    Detail(DetailContext),
}

/// A planned output page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    /// The site-relative URL of the page. Unique within a plan.
    pub path: String,

    pub kind: PageKind,

    pub context: PageContext,
}

/// Knobs for [`plan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// The number of documents per listing page. Must be positive.
    pub page_size: usize,

    /// The path of the first main listing page. Category and author listings
    /// live under `{root}/category/` and `{root}/author/`.
    pub root: String,

    /// When every document is featured (or there are none), the main listing
    /// has no pages at all. Setting this emits a single empty root page
    /// instead.
    pub emit_empty_listing: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            page_size: 3,
            root: DEFAULT_ROOT.to_owned(),
            emit_empty_listing: false,
        }
    }
}

/// Plans every page for `documents`, which must already be sorted most recent
/// first. The result holds detail pages, then main listing pages, then
/// category listings, then author listings. Groups appear in the order their
/// key was first seen and pages within a group in ascending order.
///
/// Nothing is returned unless the whole plan is valid: a zero page size or two
/// pages sharing a path fail the entire plan.
pub fn plan(documents: &[Document], options: &Options) -> Result<Vec<PageDescriptor>> {
    if options.page_size < 1 {
        return Err(Error::InvalidPageSize(options.page_size));
    }
    let root = options.root.trim_end_matches('/');

    let mut pages: Vec<PageDescriptor> = detail_pages(documents).collect();

    let listed = documents.iter().filter(|d| !d.featured).count();
    let listing = Index {
        base: root.to_owned(),
        count: listed,
    };
    if listed < 1 && options.emit_empty_listing {
        pages.push(PageDescriptor {
            path: listing.page_path(0),
            kind: PageKind::List,
            context: PageContext::List(ListContext {
                skip: 0,
                limit: options.page_size,
                current_page: 1,
                num_pages: 1,
            }),
        });
    } else {
        pages.extend(listing.to_pages(options.page_size).map(|(path, list)| PageDescriptor {
            path,
            kind: PageKind::List,
            context: PageContext::List(list),
        }));
    }

    let categories: Tally = documents
        .iter()
        .flat_map(|d| d.categories.iter().map(String::as_str))
        .collect();
    pages.extend(group_pages(
        &categories,
        &format!("{}/category", root),
        PageKind::Category,
        options.page_size,
    ));

    let authors: Tally = documents.iter().map(|d| d.author.as_str()).collect();
    pages.extend(group_pages(
        &authors,
        &format!("{}/author", root),
        PageKind::Author,
        options.page_size,
    ));

    let mut seen: HashSet<&str> = HashSet::with_capacity(pages.len());
    for page in pages.iter() {
        if !seen.insert(&page.path) {
            return Err(Error::DuplicatePath(page.path.clone()));
        }
    }

    Ok(pages)
}

/// Creates the detail [`PageDescriptor`] for each document, linking it to its
/// neighbors in the overall ordering.
fn detail_pages<'a>(documents: &'a [Document]) -> impl Iterator<Item = PageDescriptor> + 'a {
    documents.iter().enumerate().map(move |(i, document)| PageDescriptor {
        path: document.slug.clone(),
        kind: PageKind::Detail,
        context: PageContext::Detail(DetailContext {
            slug: document.slug.clone(),
            previous_slug: match i < 1 {
                true => None,
                false => Some(documents[i - 1].slug.clone()),
            },
            next_slug: documents.get(i + 1).map(|d| d.slug.clone()),
        }),
    })
}

/// Creates the listing pages for every key in `tally`. Each key's pages live
/// under `{base}/{key}`.
fn group_pages<'a>(
    tally: &'a Tally,
    base: &'a str,
    kind: PageKind,
    page_size: usize,
) -> impl Iterator<Item = PageDescriptor> + 'a {
    let all_keys: Vec<String> = tally.keys().map(str::to_owned).collect();
    tally.iter().flat_map(move |(key, count)| {
        log::debug!("{} `{}`: {} documents", kind, key, count);
        let index = Index {
            base: format!("{}/{}", base, key),
            count,
        };
        let all_keys = all_keys.clone();
        let group_key = key.to_owned();
        let pages: Vec<PageDescriptor> = index
            .to_pages(page_size)
            .map(move |(path, list)| PageDescriptor {
                path,
                kind,
                context: PageContext::Group(GroupContext {
                    list,
                    group_key: group_key.clone(),
                    all_keys: all_keys.clone(),
                }),
            })
            .collect();
        pages
    })
}

/// A paginated listing of `count` documents whose first page lives at `base`.
struct Index {
    base: String,
    count: usize,
}

impl Index {
    /// The number of pages needed to list every document.
    fn num_pages(&self, page_size: usize) -> usize {
        match self.count % page_size {
            0 => self.count / page_size,
            _ => self.count / page_size + 1,
        }
    }

    /// The path of the 0-based page `i`. An empty base is the site root.
    fn page_path(&self, i: usize) -> String {
        match (i > 0, self.base.is_empty()) {
            (false, true) => String::from("/"),
            (false, false) => self.base.clone(),
            (true, _) => format!("{}/page/{}", self.base, i + 1),
        }
    }

    /// Converts the index into `(path, context)` pairs, one per page.
    fn to_pages(&self, page_size: usize) -> impl Iterator<Item = (String, ListContext)> + '_ {
        let num_pages = self.num_pages(page_size);
        (0..num_pages).map(move |i| {
            (
                self.page_path(i),
                ListContext {
                    skip: i * page_size,
                    limit: page_size,
                    current_page: i + 1,
                    num_pages,
                },
            )
        })
    }
}

/// The result of a planning operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a plan that can't be produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the page size is zero.
    InvalidPageSize(usize),

    /// Returned when two planned pages would share a path, e.g. a category
    /// named `x/page/2` colliding with the second page of category `x`.
    DuplicatePath(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidPageSize(size) => {
                write!(f, "page size must be positive, got {}", size)
            }
            Error::DuplicatePath(path) => {
                write!(f, "more than one page planned for path `{}`", path)
            }
        }
    }
}

impl std::error::Error for Error {}
