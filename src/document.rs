//! Defines the [`Document`] type, the unit of input for page planning.

use chrono::NaiveDate;

/// A single blog document. Documents are built once by the
/// [`crate::source`] loader and are read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// The document's canonical site path, e.g. `/blog/2019/01/05/hello`.
    /// Unique across a collection and never empty.
    pub slug: String,

    /// The title of the document, if the source provided one.
    pub title: Option<String>,

    /// The publication date.
    pub date: NaiveDate,

    /// The document's author. Also the group key for author pages.
    pub author: String,

    /// The document's categories in display order. Each one is a group key
    /// for category pages.
    pub categories: Vec<String>,

    /// Featured documents are left out of the main listing but still appear
    /// in category and author listings.
    pub featured: bool,
}

impl Document {
    pub fn new(slug: &str, date: NaiveDate, author: &str) -> Document {
        Document {
            slug: slug.to_owned(),
            title: None,
            date,
            author: author.to_owned(),
            categories: Vec::new(),
            featured: false,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Document
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn featured(mut self, featured: bool) -> Document {
        self.featured = featured;
        self
    }
}

/// Sorts documents most recent first. Documents with the same date keep their
/// relative order.
pub fn sort_by_date_desc(documents: &mut [Document]) {
    documents.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sort_by_date_desc_is_stable() {
        let mut documents = vec![
            Document::new("/a", date(2019, 1, 1), "jane"),
            Document::new("/b", date(2020, 6, 1), "jane"),
            Document::new("/c", date(2019, 1, 1), "joe"),
            Document::new("/d", date(2021, 2, 3), "joe"),
        ];
        sort_by_date_desc(&mut documents);
        let slugs: Vec<&str> = documents.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(vec!["/d", "/b", "/a", "/c"], slugs);
    }

    #[test]
    fn test_builders() {
        let doc = Document::new("/x", date(2020, 1, 2), "jane")
            .with_categories(vec!["rust", "web"])
            .featured(true);
        assert_eq!(vec!["rust".to_owned(), "web".to_owned()], doc.categories);
        assert!(doc.featured);
        assert_eq!(None, doc.title);
    }
}
