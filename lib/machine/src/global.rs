//! Kernel-wide machine subsystem and its free-function interface.
//!
//! Board modules call [register_machine] from their init code; bring-up calls
//! [subsys_init_machine] once all of them have run. The registry publishes into
//! [kobj::kobj_root].
use crate::{
    context::{Activation, MachineContext},
    machine::{Machine, MachineKey},
};
use alloc::borrow::Cow;
use lazy_static::lazy_static;

lazy_static! {
    static ref MACHINES: MachineContext<'static> = MachineContext::new(kobj::kobj_root());
}

pub fn machines() -> &'static MachineContext<'static> {
    &MACHINES
}

pub fn register_machine(mach: &'static Machine) -> bool {
    MACHINES.register(mach).is_ok()
}

pub fn unregister_machine(mach: &'static Machine) -> bool {
    MACHINES.unregister(mach).is_ok()
}

pub fn search_machine(name: &str) -> Option<&'static Machine> {
    MACHINES.find_by_name(name)
}

pub fn get_machine() -> Option<&'static Machine> {
    MACHINES.active()
}

pub fn machine_poweroff() -> bool {
    MACHINES.power_off()
}

pub fn machine_reboot() -> bool {
    MACHINES.reboot()
}

pub fn machine_sleep() -> bool {
    MACHINES.sleep()
}

pub fn machine_cleanup() -> bool {
    MACHINES.cleanup()
}

pub fn machine_uniqueid() -> Cow<'static, str> {
    MACHINES.unique_id()
}

pub fn machine_keygen(msg: &[u8], key: &mut MachineKey) -> usize {
    MACHINES.key_gen(msg, key)
}

/// Run machine detection. Call once, after every board module has registered.
pub fn subsys_init_machine() -> Activation {
    MACHINES.run_activation()
}
