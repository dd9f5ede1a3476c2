//! Machine descriptors.
//!
//! A board support module describes each variant it supports with a `static` [Machine] and
//! hands a `&'static` reference to the registry. The descriptor, and the hook functions it points
//! to, stay owned by the board; the registry only links to them.
//!
//! ```
//! use machine::{Machine, MapType, MemoryMap};
//!
//! static MAP: [MemoryMap; 2] = [
//!     MemoryMap::new("ram", 0x4000_0000, 0x4000_0000, 0x1000_0000, MapType::Memory),
//!     MemoryMap::END,
//! ];
//!
//! fn detect() -> bool {
//!     true
//! }
//!
//! static VIRT: Machine = Machine::new("virt", "QEMU virt board")
//!     .with_map(&MAP)
//!     .with_detect(detect);
//!
//! assert_eq!(VIRT.regions().count(), 1);
//! ```
use crate::{
    config::MACHINE_KEY_SIZE,
    mmap::{MemoryMap, Regions},
};
use alloc::string::String;
use core::fmt::Debug;

/// A machine-wide action such as power off. Return whether it was carried out.
pub type MachineHook = fn() -> bool;
/// Read a machine-specific identifier, e.g. from fuses. `None` or an empty string means none.
pub type UniqueIdHook = fn() -> Option<String>;
/// Derive key material for `msg` into `key` and return the number of bytes produced; `0` means
/// the machine could not derive a key.
///
/// The buffer is fixed at [MACHINE_KEY_SIZE] bytes, so a hook can never be handed a shorter one.
pub type KeyGenHook = fn(msg: &[u8], key: &mut MachineKey) -> usize;

/// Output buffer of key derivation, always [MACHINE_KEY_SIZE] bytes.
pub type MachineKey = [u8; MACHINE_KEY_SIZE];

pub struct Machine {
    pub name: &'static str,
    pub description: &'static str,
    pub map: &'static [MemoryMap],
    pub detect: Option<MachineHook>,
    pub power_on: Option<MachineHook>,
    pub power_off: Option<MachineHook>,
    pub reboot: Option<MachineHook>,
    pub sleep: Option<MachineHook>,
    pub cleanup: Option<MachineHook>,
    pub unique_id: Option<UniqueIdHook>,
    pub key_gen: Option<KeyGenHook>,
}

impl Machine {
    pub const fn new(name: &'static str, description: &'static str) -> Machine {
        Machine {
            name,
            description,
            map: &[],
            detect: None,
            power_on: None,
            power_off: None,
            reboot: None,
            sleep: None,
            cleanup: None,
            unique_id: None,
            key_gen: None,
        }
    }

    pub const fn with_map(mut self, map: &'static [MemoryMap]) -> Machine {
        self.map = map;
        self
    }

    pub const fn with_detect(mut self, hook: MachineHook) -> Machine {
        self.detect = Some(hook);
        self
    }

    pub const fn with_power_on(mut self, hook: MachineHook) -> Machine {
        self.power_on = Some(hook);
        self
    }

    pub const fn with_power_off(mut self, hook: MachineHook) -> Machine {
        self.power_off = Some(hook);
        self
    }

    pub const fn with_reboot(mut self, hook: MachineHook) -> Machine {
        self.reboot = Some(hook);
        self
    }

    pub const fn with_sleep(mut self, hook: MachineHook) -> Machine {
        self.sleep = Some(hook);
        self
    }

    pub const fn with_cleanup(mut self, hook: MachineHook) -> Machine {
        self.cleanup = Some(hook);
        self
    }

    pub const fn with_unique_id(mut self, hook: UniqueIdHook) -> Machine {
        self.unique_id = Some(hook);
        self
    }

    pub const fn with_key_gen(mut self, hook: KeyGenHook) -> Machine {
        self.key_gen = Some(hook);
        self
    }

    /// Memory regions before the map terminator.
    pub fn regions(&self) -> Regions<'static> {
        Regions::new(self.map)
    }
}

impl Debug for Machine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Machine")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("regions", &self.regions().count())
            .field("detect", &self.detect.is_some())
            .field("power_on", &self.power_on.is_some())
            .field("power_off", &self.power_off.is_some())
            .field("reboot", &self.reboot.is_some())
            .field("sleep", &self.sleep.is_some())
            .field("cleanup", &self.cleanup.is_some())
            .field("unique_id", &self.unique_id.is_some())
            .field("key_gen", &self.key_gen.is_some())
            .finish()
    }
}
