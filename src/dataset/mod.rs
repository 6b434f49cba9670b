use std::ops;
use std::slice::Iter;

use serde::{Deserialize, Serialize};

use crate::syntax::transition::Dependencies;

#[cfg(feature = "dataset-conll")]
pub mod conll;
pub mod json;

/// A training sentence: its words, aligned tags and gold dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub words: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub heads: Dependencies,
}

impl Example {
    pub fn new(words: Vec<String>, tags: Vec<String>, heads: Dependencies) -> Self {
        Example {
            words: words,
            tags: tags,
            heads: heads,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<(Vec<String>, Vec<String>, Dependencies)> for Example {
    fn from(triple: (Vec<String>, Vec<String>, Dependencies)) -> Self {
        let (words, tags, heads) = triple;
        Example::new(words, tags, heads)
    }
}

/// An ordered corpus. Iteration always follows insertion order.
#[derive(Debug, Clone)]
pub struct Dataset<T> {
    items: Vec<T>,
}

impl<T> Dataset<T> {
    pub fn new() -> Self {
        Dataset { items: vec![] }
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Dataset { items: items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> Iter<T> {
        self.items.iter()
    }
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Dataset::new()
    }
}

impl<T> ops::Deref for Dataset<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> ops::DerefMut for Dataset<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<'a, T> IntoIterator for &'a Dataset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.items.iter()
    }
}
