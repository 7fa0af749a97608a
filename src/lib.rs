//! Drivers for the on-chip peripherals of the RISC-V Steel microcontroller.
//!
//! Every peripheral is a block of 32-bit memory-mapped registers. The drivers
//! in this crate are thin wrappers around a pointer to such a block and never
//! hold any state on their own.
#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![allow(clippy::missing_safety_doc)]
#![cfg_attr(not(test), no_std)]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("steel-hal requires a 32 or 64 bit target");

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub mod csr;
pub mod gpio;
pub mod mtimer;
#[cfg(feature = "logging")]
pub mod print;
pub mod spi;
pub mod uart;

#[cfg(test)]
mod testing;

pub use gpio::Gpio;
pub use mtimer::MTimer;
pub use spi::{Spi, SpiMode};
pub use uart::Uart;

/// Base address of the built-in UART.
pub const UART_BASE: usize = 0x8000_0000;

/// Base address of the machine timer.
pub const MTIMER_BASE: usize = 0x8001_0000;

/// Base address of the GPIO controller.
pub const GPIO_BASE: usize = 0x8002_0000;

/// Base address of the SPI controller.
pub const SPI_BASE: usize = 0x8003_0000;
