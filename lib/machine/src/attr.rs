//! Publishing machine descriptors in the object tree.
//!
//! Each registered machine gets `/class/machine/<name>/` with the read-only attributes
//! `description`, `map` and `uniqueid`, all rendered from the descriptor on every read.
use crate::{
    config::{ATTR_DESCRIPTION, ATTR_MAP, ATTR_UNIQUE_ID, CLASS_DIR, MACHINE_CLASS},
    identity::machine_unique_id,
    machine::Machine,
};
use alloc::sync::Arc;
use core::fmt::Write;
use kobj::{AttributeTree, KobjError, KobjId, ReadFn};
use utils::fmt::{BufWriter, format_into};

type Render = fn(&Machine, &mut [u8]) -> usize;

const ATTRIBUTES: [(&str, Render); 3] = [
    (ATTR_DESCRIPTION, render_description),
    (ATTR_MAP, render_map),
    (ATTR_UNIQUE_ID, render_unique_id),
];

pub fn render_description(mach: &Machine, buf: &mut [u8]) -> usize {
    format_into(buf, format_args!("{}", mach.description))
}

/// One `name: virt - phys` line per region.
pub fn render_map(mach: &Machine, buf: &mut [u8]) -> usize {
    let mut out = BufWriter::new(buf);
    for region in mach.regions() {
        if writeln!(out, "{}: {:#x} - {:#x}", region.name, region.virt, region.phys).is_err() {
            break;
        }
    }
    out.written()
}

pub fn render_unique_id(mach: &Machine, buf: &mut [u8]) -> usize {
    format_into(buf, format_args!("{}", machine_unique_id(Some(mach))))
}

/// The `/class/machine` directory, created on first use.
pub fn machine_class(tree: &dyn AttributeTree) -> Result<KobjId, KobjError> {
    let class = tree.search_directory_with_create(tree.root(), CLASS_DIR)?;
    tree.search_directory_with_create(class, MACHINE_CLASS)
}

/// Create the directory of `mach` with its attributes; nothing is left behind on failure.
pub fn expose(tree: &dyn AttributeTree, mach: &'static Machine) -> Result<KobjId, KobjError> {
    let dir = tree.add_directory(machine_class(tree)?, mach.name)?;
    for (name, render) in ATTRIBUTES {
        let read: ReadFn = Arc::new(move |buf: &mut [u8]| render(mach, buf));
        if let Err(err) = tree.add_regular(dir, name, Some(read), None) {
            withdraw(tree, dir);
            return Err(err);
        }
    }
    Ok(dir)
}

/// Remove a directory created by [expose].
pub fn withdraw(tree: &dyn AttributeTree, dir: KobjId) {
    if let Err(err) = tree.remove(dir) {
        log::warn!("Failed to remove machine object {:?}: {}", dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmap::{MapType, MemoryMap};
    use kobj::ObjectTree;

    static MAP: [MemoryMap; 3] = [
        MemoryMap::new("ram", 0x8000_0000, 0x8000_0000, 0x4000_0000, MapType::Memory),
        MemoryMap::new("uart0", 0x1000_0000, 0x1000_0000, 0x100, MapType::Device),
        MemoryMap::END,
    ];
    static BOARD: Machine = Machine::new("virt", "QEMU RISC-V virt").with_map(&MAP);

    #[test]
    fn map_lists_regions_before_terminator() {
        let mut buf = [0u8; 128];
        let len = render_map(&BOARD, &mut buf);
        assert_eq!(
            &buf[..len],
            b"ram: 0x80000000 - 0x80000000\nuart0: 0x10000000 - 0x10000000\n"
        );
    }

    #[test]
    fn map_truncates_at_buffer_end() {
        let mut buf = [0u8; 40];
        let len = render_map(&BOARD, &mut buf);
        assert_eq!(len, 40);
        assert!(buf.starts_with(b"ram: 0x80000000 - 0x80000000\n"));
    }

    #[test]
    fn expose_publishes_three_attributes() {
        let tree = ObjectTree::new();
        expose(&tree, &BOARD).unwrap();
        let names = tree.list("/class/machine/virt").unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(
            tree.read("/class/machine/virt/description").unwrap(),
            "QEMU RISC-V virt"
        );
        assert_eq!(
            tree.read("/class/machine/virt/uniqueid").unwrap(),
            crate::config::DEFAULT_UNIQUE_ID
        );
    }

    #[test]
    fn withdraw_removes_directory() {
        let tree = ObjectTree::new();
        let dir = expose(&tree, &BOARD).unwrap();
        withdraw(&tree, dir);
        assert!(!tree.exists("/class/machine/virt"));
        assert!(tree.exists("/class/machine"));
    }
}
