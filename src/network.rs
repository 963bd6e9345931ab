//! Network model
//!
//! Represents an IP address/prefix as fixed-width big-endian bytes plus a
//! depth index, and provides per-bit indexing used by tree descent.
//!
//! IPv4 text parsed against a v6-family tree is auto-mapped to
//! `::ffff:0:0/96 + v4_bits`, matching the `ip_tree_builder.rs` convention of
//! folding IPv4 addresses into the IPv6 address space rather than keeping a
//! second address representation around.

use crate::error::{CidrTreeError, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// IP address family a [`Network`] (or a [`crate::tree::Tree`]) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// IPv4
    V4,
    /// IPv6 (may carry IPv4-mapped data via `::ffff:0:0/96`)
    V6,
}

impl Family {
    /// Number of address bits for this family (32 for v4, 128 for v6)
    pub fn max_depth(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }
}

/// An IP network: fixed-width big-endian bytes plus a prefix length
///
/// `bytes` always holds 16 bytes regardless of family; for `Family::V4`
/// only the first 4 are meaningful. This mirrors storing a v4 address as
/// `u32` and a v6 address as `u128` from a single byte buffer, the way
/// `ip_tree_builder.rs` converts both into a common `u128` bit-space before
/// walking bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    bytes: [u8; 16],
    mask_length: u8,
    family: Family,
}

impl Network {
    /// Build a network directly from bytes, without going through text
    /// parsing. `bytes` must already be laid out for `family` (first 4 bytes
    /// meaningful for v4, all 16 for v6).
    pub fn from_bytes(bytes: [u8; 16], mask_length: u8, family: Family) -> Self {
        Self {
            bytes,
            mask_length,
            family,
        }
    }

    /// Parse IP text plus a mask length against a tree of the given family.
    ///
    /// If `tree_family` is v6 and `ip_text` parses as IPv4, the address is
    /// mapped into `::ffff:0:0/96` and `mask_length` becomes `96 + v4_mask`.
    /// A v6 address against a v4 tree is rejected with `VersionMismatch`
    /// rather than `ParseError`, since the text itself is valid — only the
    /// combination with this tree is not.
    pub fn parse(ip_text: &str, mask_length: u8, tree_family: Family) -> Result<Network> {
        let addr: IpAddr = ip_text
            .parse()
            .map_err(|e: std::net::AddrParseError| CidrTreeError::ParseError(e.to_string()))?;

        if mask_length == 0 {
            return Err(CidrTreeError::ParseError(
                "mask length 0 is not a representable leaf position".into(),
            ));
        }

        match (addr, tree_family) {
            (IpAddr::V4(v4), Family::V4) => {
                if mask_length > 32 {
                    return Err(CidrTreeError::ParseError(format!(
                        "IPv4 prefix length {} exceeds 32",
                        mask_length
                    )));
                }
                Ok(Network::from_bytes(v4_mapped_bytes(v4), mask_length, Family::V4))
            }
            (IpAddr::V4(v4), Family::V6) => {
                if mask_length > 32 {
                    return Err(CidrTreeError::ParseError(format!(
                        "IPv4 prefix length {} exceeds 32",
                        mask_length
                    )));
                }
                Ok(Network::from_bytes(
                    v4_in_v6_bytes(v4),
                    96 + mask_length,
                    Family::V6,
                ))
            }
            (IpAddr::V6(_), Family::V4) => Err(CidrTreeError::VersionMismatch),
            (IpAddr::V6(v6), Family::V6) => {
                if mask_length > 128 {
                    return Err(CidrTreeError::ParseError(format!(
                        "IPv6 prefix length {} exceeds 128",
                        mask_length
                    )));
                }
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(&v6.octets());
                Ok(Network::from_bytes(bytes, mask_length, Family::V6))
            }
        }
    }

    /// Family this network belongs to
    pub fn family(self) -> Family {
        self.family
    }

    /// Prefix length (1..=max_depth)
    pub fn mask_length(self) -> u8 {
        self.mask_length
    }

    /// Raw big-endian bytes backing this network (16 bytes; only the first
    /// 4 are meaningful for `Family::V4`)
    pub fn bytes(self) -> [u8; 16] {
        self.bytes
    }

    /// Test bit at `depth` (0-indexed from the most significant bit, which
    /// is examined first). `depth` must be `< mask_length`.
    ///
    /// This implements spec's `bit_at` formula directly: bit `b` at
    /// `b = max_depth0 - depth` is
    /// `byte[(max_depth0-b)>>3] & (1 << (~(max_depth0-b)&7))`, which reduces
    /// to testing byte `depth >> 3`, bit `7 - (depth & 7)` — the standard
    /// big-endian, MSB-first bit numbering.
    pub fn bit_at(self, depth: u8) -> u8 {
        let byte = self.bytes[(depth >> 3) as usize];
        (byte >> (7 - (depth & 7))) & 1
    }

    /// Same bytes, `mask_length - 1`. Panics if `mask_length == 0`.
    pub fn prefix_parent(self) -> Network {
        assert!(self.mask_length > 0, "prefix_parent of a /0 network");
        Network {
            bytes: self.bytes,
            mask_length: self.mask_length - 1,
            family: self.family,
        }
    }

    /// `max_depth - 1`, the bit index of the root per spec's indexing
    pub fn max_depth0(self) -> u8 {
        self.family.max_depth() - 1
    }

    /// Extend this prefix by one bit, growing `mask_length` by 1 and writing
    /// `bit` (0 or 1) at the newly covered position. Used by traversal to
    /// track the prefix reached at each descent step alongside the arena
    /// walk, rather than threading it through `Tree`'s own descent.
    pub fn child(self, bit: u8) -> Network {
        let depth = self.mask_length;
        let mut bytes = self.bytes;
        if bit != 0 {
            let byte_idx = (depth >> 3) as usize;
            bytes[byte_idx] |= 1 << (7 - (depth & 7));
        }
        Network {
            bytes,
            mask_length: depth + 1,
            family: self.family,
        }
    }
}

fn v4_mapped_bytes(v4: Ipv4Addr) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes[..4].copy_from_slice(&v4.octets());
    bytes
}

/// Fold a v4 address into the low 32 bits of a v6 byte buffer, `::ffff:0:0`
/// style: `[0;10] ++ [0xff,0xff] ++ v4.octets()`, leaving the high 96 bits
/// carrying the `::ffff:0:0/96` marker rather than the v4 address itself.
/// Mirrors `ip_tree_builder.rs`'s `insert_bits_u128(bits, 96 + prefix_len,
/// …)`, which folds the v4 bit pattern into the low bits of a `u128` rather
/// than the high ones.
fn v4_in_v6_bytes(v4: Ipv4Addr) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes[10] = 0xff;
    bytes[11] = 0xff;
    bytes[12..16].copy_from_slice(&v4.octets());
    bytes
}

/// Build the `::ffff:0:0/96` network used to locate the root of the IPv4
/// address space embedded in a v6 tree.
pub fn ipv4_mapped_prefix() -> Network {
    let mut bytes = [0u8; 16];
    bytes[10] = 0xff;
    bytes[11] = 0xff;
    Network::from_bytes(bytes, 96, Family::V6)
}

/// Build the `::ffff:0:0/95` alias prefix (see `Tree::alias_ipv4`)
pub fn ipv4_mapped_alias_prefix() -> Network {
    let mut bytes = [0u8; 16];
    bytes[10] = 0xff;
    bytes[11] = 0xff;
    Network::from_bytes(bytes, 95, Family::V6)
}

/// Build the `2002::/16` (6to4) alias prefix (see `Tree::alias_ipv4`)
pub fn six_to_four_alias_prefix() -> Network {
    let mut bytes = [0u8; 16];
    bytes[0] = 0x20;
    bytes[1] = 0x02;
    Network::from_bytes(bytes, 16, Family::V6)
}

/// Turn an `IpAddr` into a full-width bit source for address lookup (as
/// opposed to network/prefix matching); always 16 bytes, first 4 meaningful
/// for v4.
pub fn address_bytes(addr: IpAddr) -> ([u8; 16], Family) {
    match addr {
        IpAddr::V4(v4) => (v4_mapped_bytes(v4), Family::V4),
        IpAddr::V6(v6) => {
            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(&v6.octets());
            (bytes, Family::V6)
        }
    }
}
