/// Error types for the cidrtree library
use std::fmt;

/// Result type alias for tree engine operations
pub type Result<T> = std::result::Result<T, CidrTreeError>;

/// Main error type for tree engine operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CidrTreeError {
    /// A network of the wrong IP version was inserted into a tree
    VersionMismatch,

    /// The IP text or mask length could not be parsed
    ParseError(String),

    /// Lookup descent ended on a `Node` record at full address depth
    ///
    /// Indicates tree corruption: a real trie should always bottom out in
    /// `Data` or `Empty` once every address bit has been consumed.
    UnexpectedNode,

    /// The external serializer returned an unexpected shape while encoding
    SerializerContract(String),
}

impl fmt::Display for CidrTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CidrTreeError::VersionMismatch => {
                write!(f, "network IP version does not match the tree's ip_version")
            }
            CidrTreeError::ParseError(msg) => write!(f, "invalid network: {}", msg),
            CidrTreeError::UnexpectedNode => {
                write!(f, "lookup descent ended on a node record at full depth")
            }
            CidrTreeError::SerializerContract(msg) => {
                write!(f, "serializer contract violated: {}", msg)
            }
        }
    }
}

impl std::error::Error for CidrTreeError {}

impl From<std::net::AddrParseError> for CidrTreeError {
    fn from(err: std::net::AddrParseError) -> Self {
        CidrTreeError::ParseError(err.to_string())
    }
}
