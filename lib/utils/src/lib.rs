#![no_std]
extern crate alloc;

pub mod chain;
pub mod fmt;
pub mod logging;
pub mod macros;
pub mod sync;
