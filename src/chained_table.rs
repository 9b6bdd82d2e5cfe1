//! ChainedTable: fixed bucket array with head-linked chains in a node arena.

use crate::strategy::HashStrategy;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};
use thiserror::Error;

/// Bucket count used by `ChainedTable::default()`.
pub const DEFAULT_BUCKETS: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("failed to allocate {buckets} buckets")]
    Allocation { buckets: usize },
    #[error("key already present")]
    DuplicateKey,
}

/// An owned key/value binding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    key: String,
    value: i64,
}

impl Entry {
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn value(&self) -> i64 {
        self.value
    }
    pub fn into_parts(self) -> (String, i64) {
        (self.key, self.value)
    }
}

#[derive(Debug)]
struct Node {
    entry: Entry,
    next: Option<DefaultKey>,
}

/// Separate-chaining table with a bucket count fixed at construction.
///
/// The hash strategy is not stored; each call receives it. Callers must pass
/// the same strategy for every operation on one table.
#[derive(Debug)]
pub struct ChainedTable {
    buckets: Vec<Option<DefaultKey>>,
    nodes: SlotMap<DefaultKey, Node>, // sole owner of every chain node
}

impl Default for ChainedTable {
    fn default() -> Self {
        Self {
            buckets: vec![None; DEFAULT_BUCKETS],
            nodes: SlotMap::with_key(),
        }
    }
}

impl ChainedTable {
    /// Create an empty table with `size` buckets.
    ///
    /// Fails with `InvalidArgument` when `size` is zero and with `Allocation`
    /// when the bucket array cannot be reserved; nothing is retained on failure.
    pub fn new(size: usize) -> Result<Self, TableError> {
        if size == 0 {
            return Err(TableError::InvalidArgument("bucket count must be positive"));
        }
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(size)
            .map_err(|_| TableError::Allocation { buckets: size })?;
        buckets.resize(size, None);
        debug!("created chained table with {size} buckets");
        Ok(Self {
            buckets,
            nodes: SlotMap::with_key(),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries per bucket. Grows without bound since the table never resizes.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    /// Bucket addressed by `key`: `digest mod bucket_count`.
    pub fn bucket_index<S>(&self, key: &str, strategy: &S) -> usize
    where
        S: HashStrategy + ?Sized,
    {
        strategy.digest(key) as usize % self.buckets.len()
    }

    fn chain(&self, index: usize) -> Chain<'_> {
        Chain {
            nodes: &self.nodes,
            cursor: self.buckets[index],
        }
    }

    /// Link a new binding at the head of its bucket. Existing bindings of the
    /// same key are kept and shadowed until this one is deleted.
    pub fn insert<S>(&mut self, key: &str, value: i64, strategy: &S)
    where
        S: HashStrategy + ?Sized,
    {
        let index = self.bucket_index(key, strategy);
        self.link_head(index, key, value);
    }

    fn link_head(&mut self, index: usize, key: &str, value: i64) {
        let next = self.buckets[index];
        let entry = Entry {
            key: key.to_owned(),
            value,
        };
        let k = self.nodes.insert(Node { entry, next });
        self.buckets[index] = Some(k);
        trace!("linked key {key:?} at head of bucket {index}");
    }

    /// Insert only if `key` has no binding yet.
    pub fn insert_unique<S>(&mut self, key: &str, value: i64, strategy: &S) -> Result<(), TableError>
    where
        S: HashStrategy + ?Sized,
    {
        let index = self.bucket_index(key, strategy);
        if self.chain(index).any(|(_, e)| e.key == key) {
            return Err(TableError::DuplicateKey);
        }
        self.link_head(index, key, value);
        Ok(())
    }

    /// Overwrite the visible binding of `key` in place, returning the old
    /// value, or insert a new binding when `key` is absent.
    pub fn upsert<S>(&mut self, key: &str, value: i64, strategy: &S) -> Option<i64>
    where
        S: HashStrategy + ?Sized,
    {
        let index = self.bucket_index(key, strategy);
        let found = self.chain(index).find(|(_, e)| e.key == key).map(|(k, _)| k);
        match found.and_then(|k| self.nodes.get_mut(k)) {
            Some(node) => Some(std::mem::replace(&mut node.entry.value, value)),
            None => {
                self.link_head(index, key, value);
                None
            }
        }
    }

    /// Value of the most recent binding of `key`, or `None` if absent.
    pub fn search<S>(&self, key: &str, strategy: &S) -> Option<i64>
    where
        S: HashStrategy + ?Sized,
    {
        let index = self.bucket_index(key, strategy);
        self.chain(index)
            .find(|(_, e)| e.key == key)
            .map(|(_, e)| e.value)
    }

    pub fn contains_key<S>(&self, key: &str, strategy: &S) -> bool
    where
        S: HashStrategy + ?Sized,
    {
        self.search(key, strategy).is_some()
    }

    /// Every binding of `key`, newest first.
    pub fn search_all<S>(&self, key: &str, strategy: &S) -> Vec<i64>
    where
        S: HashStrategy + ?Sized,
    {
        let index = self.bucket_index(key, strategy);
        self.chain(index)
            .filter(|(_, e)| e.key == key)
            .map(|(_, e)| e.value)
            .collect()
    }

    /// Unlink and return the most recent binding of `key`. Older bindings of
    /// the same key stay linked and become visible again.
    pub fn delete<S>(&mut self, key: &str, strategy: &S) -> Option<Entry>
    where
        S: HashStrategy + ?Sized,
    {
        let index = self.bucket_index(key, strategy);
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[index];
        while let Some(k) = cursor {
            let node = self.nodes.get(k)?;
            if node.entry.key == key {
                let next = node.next;
                // Relink before releasing the node so the chain never dangles.
                match prev {
                    Some(p) => {
                        if let Some(p) = self.nodes.get_mut(p) {
                            p.next = next;
                        }
                    }
                    None => self.buckets[index] = next,
                }
                let removed = self.nodes.remove(k)?;
                trace!("unlinked key {key:?} from bucket {index}");
                return Some(removed.entry);
            }
            prev = Some(k);
            cursor = node.next;
        }
        None
    }

    /// Number of nodes in bucket `index`. Panics if `index` is out of range.
    pub fn chain_len(&self, index: usize) -> usize {
        self.chain(index).count()
    }

    pub fn chain_lengths(&self) -> Vec<usize> {
        (0..self.buckets.len()).map(|i| self.chain_len(i)).collect()
    }

    /// All live entries, bucket by bucket, newest first within a bucket.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            bucket: 0,
            chain: None,
        }
    }

    /// Release every entry; the bucket count is unchanged.
    pub fn clear(&mut self) {
        let released = self.nodes.len();
        self.nodes.clear();
        self.buckets.iter_mut().for_each(|b| *b = None);
        debug!("cleared {released} entries from {} buckets", self.buckets.len());
    }

    /// Release every node, the bucket array and the table, returning the
    /// number of entries released. Consuming `self` rules out reuse.
    pub fn destroy(self) -> usize {
        let released = self.nodes.len();
        debug!(
            "destroying chained table: {} buckets, {released} entries",
            self.buckets.len()
        );
        drop(self);
        released
    }
}

/// Walks one bucket's chain from head to tail.
struct Chain<'a> {
    nodes: &'a SlotMap<DefaultKey, Node>,
    cursor: Option<DefaultKey>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (DefaultKey, &'a Entry);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let node = self.nodes.get(k)?;
        self.cursor = node.next;
        Some((k, &node.entry))
    }
}

/// Iterator over the entries of a `ChainedTable`.
pub struct Iter<'a> {
    table: &'a ChainedTable,
    bucket: usize,
    chain: Option<Chain<'a>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, i64);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chain) = self.chain.as_mut() {
                if let Some((_, e)) = chain.next() {
                    return Some((e.key.as_str(), e.value));
                }
            }
            if self.bucket >= self.table.buckets.len() {
                return None;
            }
            self.chain = Some(self.table.chain(self.bucket));
            self.bucket += 1;
        }
    }
}
