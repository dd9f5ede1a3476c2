//! Static memory layout of a machine.
//!
//! Boards describe their regions as a table that ends with a zero-sized entry, see
//! [MemoryMap::END]. Iteration through [Regions] stops at that entry, and also at the end of the
//! slice when the table has no terminator.
use core::slice::Iter;
use utils::define_struct;

define_struct!(address, VirtAddr, usize);
define_struct!(address, PhysAddr, usize);

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapType {
    Device = 0,
    Memory = 1,
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryMap {
    pub name: &'static str,
    pub virt: VirtAddr,
    pub phys: PhysAddr,
    pub size: usize,
    pub map_type: MapType,
}

impl MemoryMap {
    /// Table terminator.
    pub const END: MemoryMap = MemoryMap::new("", 0, 0, 0, MapType::Device);

    pub const fn new(
        name: &'static str,
        virt: usize,
        phys: usize,
        size: usize,
        map_type: MapType,
    ) -> MemoryMap {
        MemoryMap {
            name,
            virt: VirtAddr::from_const(virt),
            phys: PhysAddr::from_const(phys),
            size,
            map_type,
        }
    }

    pub const fn is_end(&self) -> bool {
        self.size == 0
    }
}

/// Regions of a memory map before its terminator.
#[derive(Debug, Clone)]
pub struct Regions<'a> {
    inner: Iter<'a, MemoryMap>,
}

impl<'a> Regions<'a> {
    pub fn new(map: &'a [MemoryMap]) -> Regions<'a> {
        Regions { inner: map.iter() }
    }
}

impl<'a> Iterator for Regions<'a> {
    type Item = &'a MemoryMap;

    fn next(&mut self) -> Option<Self::Item> {
        let region = self.inner.next()?;
        if region.is_end() {
            // Nothing after the terminator is defined.
            self.inner = (&[]).iter();
            return None;
        }
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MAP: [MemoryMap; 4] = [
        MemoryMap::new("ram", 0x8000_0000, 0x8000_0000, 0x800_0000, MapType::Memory),
        MemoryMap::new("uart", 0x1000_0000, 0x1000_0000, 0x1000, MapType::Device),
        MemoryMap::END,
        MemoryMap::new("ghost", 0x1, 0x1, 0x1, MapType::Device),
    ];

    #[test]
    fn stops_at_terminator() {
        let names: [&str; 2] = [MAP[0].name, MAP[1].name];
        assert!(Regions::new(&MAP).map(|r| r.name).eq(names));
        let mut regions = Regions::new(&MAP);
        regions.by_ref().for_each(drop);
        assert!(regions.next().is_none());
    }

    #[test]
    fn unterminated_table_ends_with_slice() {
        assert_eq!(Regions::new(&MAP[..2]).count(), 2);
        assert_eq!(Regions::new(&[]).count(), 0);
        assert_eq!(Regions::new(&MAP[2..]).count(), 0);
    }
}
