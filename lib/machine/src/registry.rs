//! Registry of machine descriptors.
//!
//! Ownership and concurrency notes:
//! - The registry stores `&'static` links to descriptors owned by board modules, plus the
//!   object-tree directory it created for each of them.
//! - The list is guarded by an [IrqSpinLock]: registration may happen from hot-plug interrupt
//!   handlers, so no context on the same hart may observe the list mid-update.
//! - Insertion order is preserved; it is the order detection probes the machines in.
//! - Hooks and object-tree calls never run with the lock held. Callers that walk the machines
//!   work on a [Registry::snapshot].
use crate::{attr, error::MachineError, machine::Machine};
use alloc::vec::Vec;
use core::ptr;
use kobj::{AttributeTree, KobjId};
use utils::{debug_ex, sync::IrqSpinLock};

struct Entry {
    mach: &'static Machine,
    kobj: KobjId,
}

pub struct Registry<'t> {
    tree: &'t dyn AttributeTree,
    list: IrqSpinLock<Vec<Entry>>,
}

impl<'t> Registry<'t> {
    /// Create an empty registry that publishes machines into `tree`.
    pub const fn new(tree: &'t dyn AttributeTree) -> Registry<'t> {
        Registry {
            tree,
            list: IrqSpinLock::new(Vec::new()),
        }
    }

    /// Register a machine.
    ///
    /// Steps:
    /// 1. Reject unnamed descriptors and names already present.
    /// 2. Publish the machine attributes under `/class/machine/<name>`.
    /// 3. Append the machine under the lock, rechecking the name in the same critical section.
    ///
    /// A failure at any step leaves both the registry and the object tree unchanged.
    pub fn register(&self, mach: &'static Machine) -> Result<(), MachineError> {
        if mach.name.is_empty() || mach.name.contains('/') {
            return Err(MachineError::InvalidName);
        }
        if self.find_by_name(mach.name).is_some() {
            return Err(MachineError::DuplicateName);
        }

        let kobj = attr::expose(self.tree, mach)?;
        let linked = {
            let mut list = self.list.lock();
            if list.iter().any(|entry| entry.mach.name == mach.name) {
                Err(MachineError::DuplicateName)
            } else if list.try_reserve(1).is_err() {
                Err(MachineError::AllocationFailure)
            } else {
                list.push(Entry { mach, kobj });
                Ok(())
            }
        };
        match linked {
            Ok(()) => {
                debug_ex!("Registered machine '{}'.", mach.name);
                Ok(())
            }
            Err(err) => {
                attr::withdraw(self.tree, kobj);
                Err(err)
            }
        }
    }

    /// Unregister the machine `mach` points to. Lookup is by identity, not by name.
    pub fn unregister(&self, mach: &'static Machine) -> Result<(), MachineError> {
        let entry = {
            let mut list = self.list.lock();
            let index = list
                .iter()
                .position(|entry| ptr::eq(entry.mach, mach))
                .ok_or(MachineError::NotFound)?;
            list.remove(index)
        };
        attr::withdraw(self.tree, entry.kobj);
        debug_ex!("Unregistered machine '{}'.", entry.mach.name);
        Ok(())
    }

    /// Find a registered machine by exact, case-sensitive name.
    pub fn find_by_name(&self, name: &str) -> Option<&'static Machine> {
        self.list
            .lock()
            .iter()
            .find(|entry| entry.mach.name == name)
            .map(|entry| entry.mach)
    }

    pub fn contains(&self, mach: &'static Machine) -> bool {
        self.list
            .lock()
            .iter()
            .any(|entry| ptr::eq(entry.mach, mach))
    }

    /// Registered machines in registration order.
    ///
    /// The caller receives its own copy so no lock is held while it probes the machines.
    pub fn snapshot(&self) -> Vec<&'static Machine> {
        self.list.lock().iter().map(|entry| entry.mach).collect()
    }

    pub fn len(&self) -> usize {
        self.list.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
