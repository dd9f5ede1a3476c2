//! Machine abstraction.
//!
//! Responsibilities:
//! - Keep the registry of [Machine] descriptors provided by board support modules, see
//!   [Registry].
//! - Select exactly one active machine at boot by running each descriptor's `detect` hook in
//!   registration order, see [MachineContext::run_activation].
//! - Forward power management to the active machine's hooks, failing closed when there is no
//!   machine or no hook.
//! - Always produce a unique id and key material, falling back to a fixed id and SHA-256 when the
//!   machine cannot.
//! - Publish every registered machine under `/class/machine` in the object tree.
#![no_std]
extern crate alloc;

mod attr;
pub mod config;
mod context;
mod error;
mod global;
pub mod identity;
mod machine;
mod mmap;
mod registry;

pub use attr::{machine_class, render_description, render_map, render_unique_id};
pub use context::*;
pub use error::MachineError;
pub use global::*;
pub use machine::*;
pub use mmap::*;
pub use registry::Registry;
