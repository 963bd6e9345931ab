//! cidrtree - an in-memory binary search tree mapping IP networks to opaque data
//!
//! `cidrtree` builds and mutates a compact trie keyed by IPv4/IPv6 CIDR
//! blocks, then serializes it into the bit-packed node-record stream used by
//! compact geolocation-style binary databases (the data section, header, and
//! outer file layout are a caller's concern — see the `Serializer` and
//! `Merger` traits in [`collab`]).
//!
//! # Quick start
//!
//! ```rust
//! use cidrtree::{Family, Network, RecordSize, Tree};
//!
//! let mut tree: Tree<&str> = Tree::new(Family::V4, RecordSize::Bits32, 1 << 16);
//!
//! let wide = Network::parse("192.168.0.0", 16, Family::V4)?;
//! tree.insert_network(wide, b"wide", "datacenter-a")?;
//!
//! let narrow = Network::parse("192.168.1.0", 24, Family::V4)?;
//! tree.insert_network(narrow, b"narrow", "datacenter-b")?;
//!
//! assert_eq!(tree.lookup_ip("192.168.1.5".parse()?)?, Some(&"datacenter-b"));
//! assert_eq!(tree.lookup_ip("192.168.2.5".parse()?)?, Some(&"datacenter-a"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   insert/delete/lookup    ┌──────────────┐
//! │   Network   │ ◄───────────────────────  │   Tree core  │
//! │ (addr/mask) │                            │  (src/tree)  │
//! └─────────────┘                            └──────┬───────┘
//!                                                    │ allocates / interns
//!                                      ┌──────────────┴───────────────┐
//!                                      ▼                              ▼
//!                               ┌─────────────┐               ┌──────────────┐
//!                               │    Arena    │               │  Data table  │
//!                               │ (src/arena) │               │(src/data_table)
//!                               └─────────────┘               └──────────────┘
//!                                      │
//!                         finalize / write_tree / iterate
//!                                      ▼
//!                               ┌─────────────┐   store_data   ┌─────────────┐
//!                               │  Traversal  │ ─────────────► │  Serializer │
//!                               │ + Encoder   │                │  (external) │
//!                               └─────────────┘                └─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Node arena: stable-identity, chunked allocation of binary nodes
pub mod arena;
/// External collaborator traits (`Merger`, `Serializer`)
pub mod collab;
/// Data table: interning of opaque `(key, value)` pairs
pub mod data_table;
/// Bit-packed record stream encoder
pub mod encoder;
/// Error types for tree engine operations
pub mod error;
/// IP address/prefix model and per-bit indexing
pub mod network;
/// Hard-coded reserved-prefix tables
pub mod reserved;
/// Tree core: insert, delete, lookup, alias, finalize, encode
pub mod tree;
/// Depth-first traversal and node numbering
pub mod traversal;
/// Iterator callback contract
pub mod visitor;

pub use crate::collab::{Merger, Serializer};
pub use crate::encoder::RecordSize;
pub use crate::error::{CidrTreeError, Result};
pub use crate::network::{Family, Network};
pub use crate::tree::Tree;
pub use crate::visitor::{Dir, TreeVisitor};
