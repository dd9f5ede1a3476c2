//! Synchronization primitives that cooperate with the interrupt controller.

pub mod irq;
mod lock;
pub use lock::*;
