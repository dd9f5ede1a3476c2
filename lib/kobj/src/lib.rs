//! Kernel object tree.
//!
//! Subsystems publish their state as a hierarchy of directories and regular nodes
//! (`/class/machine/<name>/description`, ...). A regular node carries callbacks that render the
//! current value on demand into a caller-supplied buffer, so nothing is cached in the tree itself.
//!
//! Producers only depend on the [AttributeTree] trait; [ObjectTree] is the in-memory
//! implementation the kernel mounts at its root.
#![no_std]
extern crate alloc;

mod error;
mod tree;

pub use error::KobjError;
pub use tree::*;

use alloc::sync::Arc;
use bitflags::bitflags;
use lazy_static::lazy_static;

/// Size of the scratch buffer a read renders into.
pub const READ_BUFFER_SIZE: usize = 4096;

utils::define_struct!(copy, KobjId, usize);

/// Render callback: write the attribute value into the buffer and return the byte count.
pub type ReadFn = Arc<dyn Fn(&mut [u8]) -> usize + Send + Sync>;
/// Store callback: consume the written bytes and return how many were accepted.
pub type WriteFn = Arc<dyn Fn(&[u8]) -> usize + Send + Sync>;

bitflags! {
    /// Access bits of a regular node, derived from the callbacks it was created with.
    pub struct KobjMode: u8 {
        const READ = 0b01;
        const WRITE = 0b10;
    }
}

/// The operations a producer needs from an object tree.
pub trait AttributeTree: Sync {
    /// The root directory.
    fn root(&self) -> KobjId;

    /// Find the directory `name` under `parent`, creating it if missing.
    fn search_directory_with_create(&self, parent: KobjId, name: &str)
    -> Result<KobjId, KobjError>;

    /// Create a new, empty directory `name` under `parent`.
    fn add_directory(&self, parent: KobjId, name: &str) -> Result<KobjId, KobjError>;

    /// Attach a regular node to the directory `dir`.
    fn add_regular(
        &self,
        dir: KobjId,
        name: &str,
        read: Option<ReadFn>,
        write: Option<WriteFn>,
    ) -> Result<KobjId, KobjError>;

    /// Detach `node` from its parent and drop it together with everything below it.
    fn remove(&self, node: KobjId) -> Result<(), KobjError>;
}

lazy_static! {
    static ref KOBJ_ROOT: ObjectTree = ObjectTree::new();
}

/// The kernel-wide object tree.
pub fn kobj_root() -> &'static ObjectTree {
    &KOBJ_ROOT
}
