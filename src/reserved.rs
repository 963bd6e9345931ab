//! Reserved prefix tables
//!
//! Hard-coded IPv4 and IPv6 special-purpose prefixes (IANA special-purpose
//! address registries), consulted by `Tree::delete_reserved_networks`. These
//! are address-space constants, not derived from anything in the tree
//! engine itself, so they live in their own table rather than in
//! `tree.rs`.

/// One reserved prefix: dotted/colon text plus its mask length, parsed the
/// same way caller-supplied networks are.
pub struct ReservedPrefix {
    /// Network address in text form
    pub text: &'static str,
    /// Prefix length
    pub mask_length: u8,
}

/// IPv4 special-purpose prefixes (RFC 5735 / RFC 6890 style)
pub const IPV4_RESERVED: &[ReservedPrefix] = &[
    ReservedPrefix { text: "0.0.0.0", mask_length: 8 },
    ReservedPrefix { text: "10.0.0.0", mask_length: 8 },
    ReservedPrefix { text: "100.64.0.0", mask_length: 10 },
    ReservedPrefix { text: "127.0.0.0", mask_length: 8 },
    ReservedPrefix { text: "169.254.0.0", mask_length: 16 },
    ReservedPrefix { text: "172.16.0.0", mask_length: 12 },
    ReservedPrefix { text: "192.0.0.0", mask_length: 24 },
    ReservedPrefix { text: "192.0.2.0", mask_length: 24 },
    ReservedPrefix { text: "192.88.99.0", mask_length: 24 },
    ReservedPrefix { text: "192.168.0.0", mask_length: 16 },
    ReservedPrefix { text: "198.18.0.0", mask_length: 15 },
    ReservedPrefix { text: "198.51.100.0", mask_length: 24 },
    ReservedPrefix { text: "203.0.113.0", mask_length: 24 },
    ReservedPrefix { text: "224.0.0.0", mask_length: 4 },
    ReservedPrefix { text: "240.0.0.0", mask_length: 4 },
    ReservedPrefix { text: "255.255.255.255", mask_length: 32 },
];

/// IPv6 special-purpose prefixes, native mask (not v4-mapped)
pub const IPV6_RESERVED: &[ReservedPrefix] = &[
    ReservedPrefix { text: "::1", mask_length: 128 },
    ReservedPrefix { text: "::", mask_length: 128 },
    ReservedPrefix { text: "64:ff9b::", mask_length: 96 },
    ReservedPrefix { text: "100::", mask_length: 64 },
    ReservedPrefix { text: "2001::", mask_length: 23 },
    ReservedPrefix { text: "2001:db8::", mask_length: 32 },
    ReservedPrefix { text: "2002::", mask_length: 16 },
    ReservedPrefix { text: "fc00::", mask_length: 7 },
    ReservedPrefix { text: "fe80::", mask_length: 10 },
];
