//! chain-table: a fixed-bucket hash table with separate chaining and
//! per-call injectable hash strategies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative container from `String` keys to `i64`
//!   values whose only real invariants are chain ownership, duplicate-key
//!   semantics, and correct probe/removal under collisions.
//! - Layers:
//!   - `HashStrategy`: a pure `&str -> u32` digest. Four built-ins (`Sum`,
//!     `Djb2`, `Sdbm`, `Murmur`); any `Fn(&str) -> u32` also qualifies.
//!   - `ChainedTable`: a bucket array of chain heads over a node arena.
//!     Every operation asks the strategy for a digest, reduces it modulo the
//!     bucket count, then walks that bucket's chain.
//!
//! Constraints
//! - Bucket count is fixed at construction; there is no resize or rehash,
//!   so the load factor grows with every insert.
//! - The strategy is passed to each call and never stored. Using different
//!   strategies on one table is a caller error: lookups address the wrong
//!   bucket and miss.
//! - Single-threaded mutation through `&mut self`; callers that share a
//!   table across threads wrap it in their own lock.
//!
//! Duplicate keys
//! - `insert` links a new node at the bucket head without checking for an
//!   existing binding. The newest binding shadows older ones; `delete`
//!   removes only the newest, after which the previous one is visible again.
//! - `insert_unique` (reject) and `upsert` (overwrite in place) are provided
//!   for callers that want a different policy.
//!
//! Ownership
//! - The table copies each key into an owned `String` at insertion, so a
//!   caller may reuse or free its buffer immediately.
//! - Nodes live in a `SlotMap` owned by the table; bucket heads and `next`
//!   links are arena keys. Unlinking always relinks the predecessor (or the
//!   bucket head) before the node is released.
//! - `destroy(self)` consumes the table, so a destroyed table cannot be
//!   used or destroyed again.
//!
//! Not-found
//! - Missing keys are `None`, never a sentinel value; `-1` is an ordinary
//!   storable value.

mod chained_table;
mod chained_table_proptest;
pub mod strategy;

// Public surface
pub use chained_table::{ChainedTable, Entry, Iter, TableError, DEFAULT_BUCKETS};
pub use strategy::{builtin_strategies, Djb2, HashStrategy, Murmur, Sdbm, Sum};
