//! Local interrupt masking.
//!
//! The lock in [super::IrqSpinLock] must mask interrupts on the current hart while it is held,
//! but the way to do that is arch-specific. Platform code installs its backend once with
//! [set_control]; until then a software mask ([SoftIrqMask]) stands in, which keeps the
//! bookkeeping honest on hosted targets where there are no real interrupts to mask.
//!
//! [disable_intr] and [restore_intr] always appear in matching pairs: the token returned by
//! the former carries the state that the latter puts back.
use core::sync::atomic::{AtomicUsize, Ordering};
use spin::Once;

crate::define_struct!(copy, IrqFlags, usize);

impl IrqFlags {
    /// Flags of a context where interrupts were enabled.
    pub const ENABLED: IrqFlags = IrqFlags::from_const(1);
    /// Flags of a context where interrupts were already masked.
    pub const DISABLED: IrqFlags = IrqFlags::from_const(0);

    pub fn were_enabled(&self) -> bool {
        self.inner != 0
    }
}

/// Backend that masks and unmasks interrupts on the current execution context.
pub trait InterruptControl: Sync {
    /// Mask interrupts and return the state before masking.
    fn disable(&self) -> IrqFlags;
    /// Put back the state captured by a matching [InterruptControl::disable].
    fn restore(&self, flags: IrqFlags);
    /// Whether interrupts are currently enabled.
    fn enabled(&self) -> bool;
}

/// Software interrupt mask used when no hardware backend has been installed.
///
/// Masking nests: interrupts count as enabled only once every [InterruptControl::disable]
/// has been paired with its [InterruptControl::restore], in whatever order holders release.
#[derive(Debug)]
pub struct SoftIrqMask {
    depth: AtomicUsize,
}

impl SoftIrqMask {
    pub const fn new() -> SoftIrqMask {
        SoftIrqMask {
            depth: AtomicUsize::new(0),
        }
    }
}

impl Default for SoftIrqMask {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptControl for SoftIrqMask {
    fn disable(&self) -> IrqFlags {
        if self.depth.fetch_add(1, Ordering::AcqRel) == 0 {
            IrqFlags::ENABLED
        } else {
            IrqFlags::DISABLED
        }
    }

    fn restore(&self, _flags: IrqFlags) {
        // An unpaired restore must not wrap the depth around.
        let _ = self
            .depth
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |depth| depth.checked_sub(1));
    }

    fn enabled(&self) -> bool {
        self.depth.load(Ordering::Acquire) == 0
    }
}

static SOFT_MASK: SoftIrqMask = SoftIrqMask::new();
static CONTROL: Once<&'static dyn InterruptControl> = Once::new();

/// Install the platform interrupt backend.
///
/// Only the first call takes effect. Return `false` if a backend was already installed.
pub fn set_control(control: &'static dyn InterruptControl) -> bool {
    let mut installed = false;
    CONTROL.call_once(|| {
        installed = true;
        control
    });
    installed
}

/// The installed backend, or the software mask if none was installed.
pub fn control() -> &'static dyn InterruptControl {
    match CONTROL.get() {
        Some(control) => *control,
        None => &SOFT_MASK,
    }
}

/// Mask interrupts through the installed backend.
pub fn disable_intr() -> IrqFlags {
    control().disable()
}

/// Restore the interrupt state saved by [disable_intr].
pub fn restore_intr(flags: IrqFlags) {
    control().restore(flags)
}
