use std::io::Result as IOResult;
use std::ops;
use std::path::Path;
use std::slice::Iter;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::io::{FromLine, Read, Reader};
use crate::syntax::graph::Passage;

#[derive(Debug, Clone, Default)]
pub struct Dataset<T> {
    items: Vec<T>,
}

impl<T> Dataset<T> {
    pub fn new() -> Self {
        Dataset { items: vec![] }
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Dataset { items }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Dataset {
            items: Vec::with_capacity(capacity),
        }
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

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.items.shuffle(rng);
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: FromLine> Dataset<T> {
    /// Loads one item per line of `file`.
    pub fn load<P: AsRef<Path>>(file: P) -> IOResult<Self> {
        Dataset::load_until(file, usize::MAX)
    }

    pub fn load_until<P: AsRef<Path>>(file: P, size: usize) -> IOResult<Self> {
        let mut reader = Reader::<_, T>::open(file)?;
        let mut items = vec![];
        reader.read_upto(size, &mut items)?;
        Ok(Dataset::from_items(items))
    }
}

pub fn load_passages<P: AsRef<Path>>(file: P) -> IOResult<Dataset<Passage>> {
    Dataset::load(file)
}

impl<'a, T> IntoIterator for &'a Dataset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.items.iter()
    }
}

impl<T> ops::Index<usize> for Dataset<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        ops::Index::index(&self.items, index)
    }
}

impl<T> ops::IndexMut<usize> for Dataset<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        ops::IndexMut::index_mut(&mut self.items, index)
    }
}

impl<T> ops::Index<ops::Range<usize>> for Dataset<T> {
    type Output = [T];

    #[inline]
    fn index(&self, index: ops::Range<usize>) -> &[T] {
        ops::Index::index(&self.items, index)
    }
}

impl<T> ops::Index<ops::RangeFull> for Dataset<T> {
    type Output = [T];

    #[inline]
    fn index(&self, _index: ops::RangeFull) -> &[T] {
        &self.items
    }
}
