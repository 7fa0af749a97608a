//! Host-side stand-in for the memory-mapped register blocks,
//! so the drivers can be unit tested without hardware.
//!
//! This module is only compiled for `cfg(test)`.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// `N` zero-initialized 32-bit registers. The tests play the hardware by
/// poking the registers a driver can only read, possibly from another thread.
///
/// The block lives on the heap, so the address handed to a driver stays valid
/// no matter where the `Arc` is moved.
pub(crate) struct MockRegisters<const N: usize> {
    words: [AtomicU32; N],
}

impl<const N: usize> MockRegisters<N> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            words: [(); N].map(|_| AtomicU32::new(0)),
        })
    }

    /// The address a driver should be created with.
    pub(crate) fn base(&self) -> *mut u8 {
        self.words.as_ptr() as *mut u8
    }

    /// Read the register at the given byte offset.
    pub(crate) fn read(&self, offset: usize) -> u32 {
        self.words[offset / 4].load(Ordering::SeqCst)
    }

    /// Write the register at the given byte offset.
    pub(crate) fn write(&self, offset: usize, value: u32) {
        self.words[offset / 4].store(value, Ordering::SeqCst)
    }
}
