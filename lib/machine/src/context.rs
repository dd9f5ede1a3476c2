//! The machine subsystem as one object: registry, activation and dispatch.
//!
//! Lifecycle:
//! 1. Board modules [MachineContext::register] their descriptors.
//! 2. Bring-up calls [MachineContext::run_activation] once, after every board has registered and
//!    before anything may register or unregister concurrently. The first machine whose `detect`
//!    hook answers `true` becomes the active machine.
//! 3. Everything else reads the active machine through [MachineContext::active], which never
//!    takes a lock.
//!
//! Unregistering the active machine clears the active reference, after which lifecycle
//! operations fail and identity falls back to its defaults.
use crate::{
    error::MachineError,
    identity,
    machine::{Machine, MachineHook, MachineKey},
    registry::Registry,
};
use alloc::borrow::Cow;
use core::{
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};
use kobj::AttributeTree;
use spin::Once;

/// Outcome of detection. Both states are final.
#[derive(Debug, Clone, Copy)]
pub enum Activation {
    Selected(&'static Machine),
    NoneFound,
}

impl Activation {
    pub fn machine(&self) -> Option<&'static Machine> {
        match self {
            Activation::Selected(mach) => Some(mach),
            Activation::NoneFound => None,
        }
    }
}

impl PartialEq for Activation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Activation::Selected(a), Activation::Selected(b)) => ptr::eq(*a, *b),
            (Activation::NoneFound, Activation::NoneFound) => true,
            _ => false,
        }
    }
}

impl Eq for Activation {}

pub struct MachineContext<'t> {
    registry: Registry<'t>,
    active: AtomicPtr<Machine>,
    activation: Once<Activation>,
}

impl<'t> MachineContext<'t> {
    pub const fn new(tree: &'t dyn AttributeTree) -> MachineContext<'t> {
        MachineContext {
            registry: Registry::new(tree),
            active: AtomicPtr::new(ptr::null_mut()),
            activation: Once::new(),
        }
    }

    pub fn registry(&self) -> &Registry<'t> {
        &self.registry
    }

    pub fn register(&self, mach: &'static Machine) -> Result<(), MachineError> {
        self.registry.register(mach)
    }

    /// Unregister `mach`, clearing the active machine if it is the one removed.
    pub fn unregister(&self, mach: &'static Machine) -> Result<(), MachineError> {
        self.registry.unregister(mach)?;
        let cleared = self
            .active
            .compare_exchange(
                ptr::from_ref(mach).cast_mut(),
                ptr::null_mut(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if cleared {
            log::warn!("Active machine [{}] unregistered.", mach.name);
        }
        Ok(())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&'static Machine> {
        self.registry.find_by_name(name)
    }

    /// The machine selected by detection, if it is still registered.
    pub fn active(&self) -> Option<&'static Machine> {
        let mach = self.active.load(Ordering::Acquire);
        // Only ever set from a `&'static Machine`.
        unsafe { mach.as_ref() }
    }

    // region: Activation

    /// Select the active machine. Only the first call probes; later calls return its outcome.
    pub fn run_activation(&self) -> Activation {
        let mut probed = false;
        let outcome = *self.activation.call_once(|| {
            probed = true;
            self.detect()
        });
        if !probed {
            log::warn!("Machine detection already ran.");
        }
        outcome
    }

    /// Outcome of [MachineContext::run_activation], `None` while it has not run.
    pub fn activation(&self) -> Option<Activation> {
        self.activation.get().copied()
    }

    fn detect(&self) -> Activation {
        for mach in self.registry.snapshot() {
            let Some(detect) = mach.detect else {
                continue;
            };
            if !detect() {
                continue;
            }
            self.active
                .store(ptr::from_ref(mach).cast_mut(), Ordering::Release);
            if let Some(power_on) = mach.power_on {
                // Best effort, the machine stays selected either way.
                power_on();
            }
            log::info!("Found machine [{}]", mach.name);
            return Activation::Selected(mach);
        }
        log::warn!("Not found any machine");
        Activation::NoneFound
    }

    // endregion

    // region: Lifecycle

    fn dispatch(&self, select: fn(&Machine) -> Option<MachineHook>) -> Result<bool, MachineError> {
        let mach = self.active().ok_or(MachineError::NoActiveMachine)?;
        let hook = select(mach).ok_or(MachineError::HookAbsent)?;
        Ok(hook())
    }

    fn lifecycle(&self, op: &str, select: fn(&Machine) -> Option<MachineHook>) -> bool {
        self.dispatch(select).unwrap_or_else(|err| {
            log::debug!("Machine {} not performed: {}.", op, err);
            false
        })
    }

    pub fn power_off(&self) -> bool {
        self.lifecycle("power off", |mach| mach.power_off)
    }

    pub fn reboot(&self) -> bool {
        self.lifecycle("reboot", |mach| mach.reboot)
    }

    pub fn sleep(&self) -> bool {
        self.lifecycle("sleep", |mach| mach.sleep)
    }

    pub fn cleanup(&self) -> bool {
        self.lifecycle("cleanup", |mach| mach.cleanup)
    }

    // endregion

    // region: Identity

    pub fn unique_id(&self) -> Cow<'static, str> {
        identity::machine_unique_id(self.active())
    }

    /// Derive a key for `msg` through the active machine, see [identity::machine_key_gen].
    ///
    /// `key` is a fixed [MachineKey] of [MACHINE_KEY_SIZE](crate::config::MACHINE_KEY_SIZE)
    /// bytes rather than a caller-sized slice, so the SHA-256 fallback always has room for a
    /// full digest.
    pub fn key_gen(&self, msg: &[u8], key: &mut MachineKey) -> usize {
        identity::machine_key_gen(self.active(), msg, key)
    }

    // endregion
}
