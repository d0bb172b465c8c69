//! Restartable lazy sequences
//!
//! Variation enumeration (`new_based_on`, `negative_based_on`) is lazy and
//! may be iterated any number of times. A `Variations<T>` holds the recipe
//! for the sequence rather than a half-consumed iterator, so every call to
//! `iter()` starts from the beginning.

use std::fmt;
use std::sync::Arc;

type Source<T> = dyn Fn() -> Box<dyn Iterator<Item = T> + Send> + Send + Sync;

/// A lazy, finite, restartable sequence
pub struct Variations<T> {
    source: Arc<Source<T>>,
}

impl<T: Send + 'static> Variations<T> {
    pub fn new<F, I>(make: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Iterator<Item = T> + Send + 'static,
    {
        Self {
            source: Arc::new(move || Box::new(make()) as Box<dyn Iterator<Item = T> + Send>),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty)
    }

    pub fn single(item: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(move || std::iter::once(item.clone()))
    }

    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(move || items.clone().into_iter())
    }

    /// Start a fresh pass over the sequence
    pub fn iter(&self) -> Box<dyn Iterator<Item = T> + Send> {
        (self.source)()
    }

    pub fn map<U, F>(self, f: F) -> Variations<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Variations::new(move || {
            let f = Arc::clone(&f);
            self.iter().map(move |item| f(item))
        })
    }

    pub fn filter<F>(self, keep: F) -> Variations<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let keep = Arc::new(keep);
        Variations::new(move || {
            let keep = Arc::clone(&keep);
            self.iter().filter(move |item| keep(item))
        })
    }

    pub fn flat_map<U, F>(self, f: F) -> Variations<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Variations<U> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Variations::new(move || {
            let f = Arc::clone(&f);
            self.iter().flat_map(move |item| f(item).iter())
        })
    }

    pub fn chain(self, other: Variations<T>) -> Variations<T> {
        Variations::new(move || self.iter().chain(other.iter()))
    }

    /// Concatenate several sequences in order
    pub fn concat(parts: Vec<Variations<T>>) -> Variations<T> {
        Variations::new(move || {
            parts
                .iter()
                .map(Variations::iter)
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
        })
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }
}

impl<T> Clone for Variations<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<T> fmt::Debug for Variations<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Variations(..)")
    }
}

impl<T: Send + 'static> IntoIterator for &Variations<T> {
    type Item = T;
    type IntoIter = Box<dyn Iterator<Item = T> + Send>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
