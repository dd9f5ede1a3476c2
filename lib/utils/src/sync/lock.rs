use super::irq::{self, InterruptControl, IrqFlags};
use core::{
    fmt::Debug,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};
use spin::{MutexGuard, Spin, mutex::Mutex};

/// A spin lock that masks local interrupts for as long as it is held.
///
/// Acquiring saves the interrupt state and masks interrupts before spinning, and dropping the
/// guard releases the lock before the saved state is restored. An interrupt handler running on
/// the same hart can therefore never observe the protected data half-updated, nor deadlock
/// spinning on a lock its own context holds.
pub struct IrqSpinLock<T: ?Sized> {
    control: Option<&'static dyn InterruptControl>,
    inner: Mutex<T, Spin>,
}

impl<T> IrqSpinLock<T> {
    /// Create a lock that masks interrupts through the backend installed at the time it is
    /// acquired, see [irq::control].
    pub const fn new(value: T) -> IrqSpinLock<T> {
        IrqSpinLock {
            control: None,
            inner: Mutex::new(value),
        }
    }

    /// Create a lock bound to a specific backend.
    pub const fn with_control(
        value: T,
        control: &'static dyn InterruptControl,
    ) -> IrqSpinLock<T> {
        IrqSpinLock {
            control: Some(control),
            inner: Mutex::new(value),
        }
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: ?Sized> IrqSpinLock<T> {
    pub fn lock(&self) -> IrqSpinLockGuard<'_, T> {
        let control = self.control.unwrap_or_else(irq::control);
        let flags = control.disable();
        IrqSpinLockGuard {
            inner: ManuallyDrop::new(self.inner.lock()),
            control,
            flags,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

impl<T: ?Sized + Debug> Debug for IrqSpinLock<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqSpinLock")
            .field("locked", &self.is_locked())
            .finish()
    }
}

// region: IrqSpinLockGuard

pub struct IrqSpinLockGuard<'a, T: ?Sized> {
    inner: ManuallyDrop<MutexGuard<'a, T>>,
    control: &'static dyn InterruptControl,
    flags: IrqFlags,
}

impl<T: ?Sized> Drop for IrqSpinLockGuard<'_, T> {
    fn drop(&mut self) {
        // Unlock first, interrupts come back afterwards.
        unsafe { ManuallyDrop::drop(&mut self.inner) };
        self.control.restore(self.flags);
    }
}

impl<T: ?Sized> Deref for IrqSpinLockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: ?Sized> DerefMut for IrqSpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

// endregion
