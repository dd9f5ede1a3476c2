use core::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KobjError {
    /// No node at the given id or path.
    NotFound,
    /// A sibling with the same name already exists.
    Exists,
    /// The node is not a directory.
    NotDirectory,
    /// The node is not a regular node.
    NotRegular,
    /// The node does not support the requested access.
    PermissionDenied,
    /// Empty names and names containing '/' are rejected.
    InvalidName,
}

impl Display for KobjError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            KobjError::NotFound => "no such object",
            KobjError::Exists => "object already exists",
            KobjError::NotDirectory => "not a directory",
            KobjError::NotRegular => "not a regular object",
            KobjError::PermissionDenied => "permission denied",
            KobjError::InvalidName => "invalid object name",
        };
        f.write_str(msg)
    }
}
