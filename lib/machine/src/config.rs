//! Constants of the machine subsystem.

/// Identifier reported when the machine cannot provide its own.
pub const DEFAULT_UNIQUE_ID: &str = "0123456789";

/// Size of a derived machine key, equal to the SHA-256 digest size.
pub const MACHINE_KEY_SIZE: usize = 32;

/// Top-level object directory grouping devices by class.
pub const CLASS_DIR: &str = "class";
/// Class directory that holds one sub-directory per registered machine.
pub const MACHINE_CLASS: &str = "machine";

pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_MAP: &str = "map";
pub const ATTR_UNIQUE_ID: &str = "uniqueid";
