//! Driver for the built-in UART.
//!
//! Receiving is meant to be interrupt driven: the UART raises an interrupt
//! as soon as a byte arrived, and [`Uart::read`] just returns it.

use core::fmt;
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_structs,
    registers::{ReadOnly, ReadWrite},
};

register_structs! {
    /// The raw MMIO block of the UART.
    #[allow(non_snake_case)]
    pub UartRegisters {
        (0x00 => pub WDATA: ReadWrite<u32>),
        (0x04 => pub RDATA: ReadOnly<u32>),
        // `1` if the transmitter can take a new byte
        (0x08 => pub READY: ReadOnly<u32>),
        (0x0C => @END),
    }
}

/// Driver for the UART.
pub struct Uart {
    base: *const UartRegisters,
}

impl Uart {
    /// Create a new Uart device that is mapped at the given address.
    ///
    /// # Safety
    ///
    /// `base` must point to the register block of a UART.
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self {
            base: base as *const _,
        }
    }

    fn regs(&self) -> &UartRegisters {
        unsafe { &*self.base }
    }

    /// Check if the transmitter can take a new byte.
    pub fn is_ready(&self) -> bool {
        self.regs().READY.get() == 1
    }

    /// Returns the last received byte.
    pub fn read(&self) -> u8 {
        self.regs().RDATA.get() as u8
    }

    /// Spins until the transmitter is ready and then sends the byte.
    pub fn write(&self, x: u8) {
        while !self.is_ready() {}
        self.regs().WDATA.set(x as u32);
    }

    /// Tries to send data but will fail if the transmitter is not ready.
    ///
    /// Returns `Some(x)` with the given value if the data couldn't be send.
    pub fn try_write(&self, x: u8) -> Option<u8> {
        if self.is_ready() {
            self.regs().WDATA.set(x as u32);
            None
        } else {
            Some(x)
        }
    }
}

unsafe impl Send for Uart {}

impl fmt::Write for Uart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for x in s.bytes() {
            self.write(x);
        }
        Ok(())
    }
}
