//! Defines [`Tally`], an insertion-ordered frequency count used to group
//! documents by category and author.

use std::collections::HashMap;

/// Counts occurrences of string keys, remembering the order in which each key
/// was first seen. Iteration always follows first-seen order, regardless of
/// the final counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Keys and their counts in first-seen order.
    entries: Vec<(String, usize)>,

    /// Position of each key in `entries`.
    positions: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Tally {
        Tally::default()
    }

    /// Adds one occurrence of `key`.
    pub fn add(&mut self, key: &str) {
        match self.positions.get(key).copied() {
            Some(i) => self.entries[i].1 += 1,
            None => {
                self.positions.insert(key.to_owned(), self.entries.len());
                self.entries.push((key.to_owned(), 1));
            }
        }
    }

    /// Adds one occurrence of every key in `keys`.
    pub fn extend<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.add(key);
        }
    }

    /// The count for `key`, or zero if it was never added.
    pub fn count(&self, key: &str) -> usize {
        match self.positions.get(key) {
            Some(&i) => self.entries[i].1,
            None => 0,
        }
    }

    /// The distinct keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Key/count pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    /// The sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> std::iter::FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Tally {
        let mut tally = Tally::new();
        tally.extend(iter);
        tally
    }
}
