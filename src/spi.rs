//! Driver for the SPI controller.
//!
//! The controller always acts as the bus master. A transfer is started by
//! writing a byte into `WDATA`, and the hardware keeps `BUSY` non-zero until
//! the byte is shifted out and the received byte is stored in `RDATA`.

use core::convert::TryFrom;
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_structs,
    registers::{ReadOnly, ReadWrite},
};

register_structs! {
    /// The raw MMIO block of the SPI controller.
    #[allow(non_snake_case)]
    pub SpiRegisters {
        // Clock polarity, `0` or `1`.
        (0x00 => pub CPOL: ReadWrite<u32>),
        // Clock phase, `0` or `1`.
        (0x04 => pub CPHA: ReadWrite<u32>),
        // Id of the selected peripheral, or `NO_CHIP_SELECTED`.
        (0x08 => pub CHIP_SELECT: ReadWrite<u32>),
        // Clock divider configuration.
        (0x0C => pub CLOCK_CONF: ReadWrite<u32>),
        // Byte to transmit. Writing it starts a transfer.
        (0x10 => pub WDATA: ReadWrite<u32>),
        // Byte received by the last transfer.
        (0x14 => pub RDATA: ReadOnly<u32>),
        // Non-zero while a transfer is in progress.
        (0x18 => pub BUSY: ReadOnly<u32>),
        (0x1C => @END),
    }
}

/// The value of `CHIP_SELECT` while no peripheral is selected.
pub const NO_CHIP_SELECTED: u32 = 0xFFFF_FFFF;

displaydoc_lite::displaydoc! {
    /// Errors that are related to the SPI controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Error {
        /// The number is not one of the four SPI modes.
        InvalidMode,
    }
}

/// The four combinations of clock polarity (CPOL) and clock phase (CPHA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SpiMode {
    /// CPOL = 0, CPHA = 0
    Mode0 = 0,
    /// CPOL = 0, CPHA = 1
    Mode1 = 1,
    /// CPOL = 1, CPHA = 0
    Mode2 = 2,
    /// CPOL = 1, CPHA = 1
    Mode3 = 3,
}

impl SpiMode {
    /// The clock polarity of this mode.
    pub const fn polarity(self) -> u32 {
        (self as u32) >> 1
    }

    /// The clock phase of this mode.
    pub const fn phase(self) -> u32 {
        (self as u32) & 1
    }

    /// Build the mode out of a polarity and a phase bit.
    pub const fn from_bits(polarity: u32, phase: u32) -> Self {
        match ((polarity & 1) << 1) | (phase & 1) {
            0 => SpiMode::Mode0,
            1 => SpiMode::Mode1,
            2 => SpiMode::Mode2,
            _ => SpiMode::Mode3,
        }
    }
}

impl TryFrom<u8> for SpiMode {
    type Error = Error;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(SpiMode::Mode0),
            1 => Ok(SpiMode::Mode1),
            2 => Ok(SpiMode::Mode2),
            3 => Ok(SpiMode::Mode3),
            _ => Err(Error::InvalidMode),
        }
    }
}

/// Driver for the SPI controller.
pub struct Spi {
    base: *const SpiRegisters,
}

impl Spi {
    /// Create a new SPI driver for the controller mapped at the given address.
    ///
    /// # Safety
    ///
    /// `base` must point to the register block of a SPI controller, and
    /// must stay valid for as long as the driver is used.
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self {
            base: base as *const _,
        }
    }

    fn regs(&self) -> &SpiRegisters {
        unsafe { &*self.base }
    }

    /// Set the clock polarity.
    ///
    /// Values other than `0` and `1` are ignored.
    pub fn set_clock_polarity(&self, cpol: u32) {
        if cpol <= 1 {
            self.regs().CPOL.set(cpol);
        }
    }

    /// Set the clock phase.
    ///
    /// Values other than `0` and `1` are ignored.
    pub fn set_clock_phase(&self, cpha: u32) {
        if cpha <= 1 {
            self.regs().CPHA.set(cpha);
        }
    }

    pub fn get_clock_polarity(&self) -> u32 {
        self.regs().CPOL.get()
    }

    pub fn get_clock_phase(&self) -> u32 {
        self.regs().CPHA.get()
    }

    /// Configure polarity and phase at once.
    pub fn set_mode(&self, mode: SpiMode) {
        self.set_clock_polarity(mode.polarity());
        self.set_clock_phase(mode.phase());
        log::debug!("spi mode set to {:?}", mode);
    }

    /// Same as [`set_mode`](Self::set_mode), but takes the raw mode number.
    ///
    /// Numbers outside of `0..=3` are ignored.
    pub fn set_mode_raw(&self, mode: u8) {
        if let Ok(mode) = SpiMode::try_from(mode) {
            self.set_mode(mode);
        }
    }

    /// Read back the mode from the polarity and phase registers.
    pub fn get_mode(&self) -> SpiMode {
        SpiMode::from_bits(self.get_clock_polarity(), self.get_clock_phase())
    }

    /// Assert the chip select line of the given peripheral.
    ///
    /// The id is not validated; selecting a peripheral that doesn't exist
    /// simply selects nothing.
    pub fn select(&self, peripheral_id: u8) {
        self.regs().CHIP_SELECT.set(peripheral_id as u32);
    }

    /// Deassert all chip select lines.
    pub fn deselect(&self) {
        self.regs().CHIP_SELECT.set(NO_CHIP_SELECTED);
    }

    /// Returns the raw value of `CHIP_SELECT`, which is [`NO_CHIP_SELECTED`]
    /// if no peripheral is selected.
    pub fn get_selected(&self) -> u32 {
        self.regs().CHIP_SELECT.get()
    }

    /// Check if the controller is idle.
    pub fn is_ready(&self) -> bool {
        self.regs().BUSY.get() == 0
    }

    /// Spins until the controller is idle.
    ///
    /// There's no timeout, so this never returns if the hardware keeps `BUSY`
    /// set.
    pub fn wait_ready(&self) {
        while !self.is_ready() {}
    }

    /// Set the clock divider.
    ///
    /// The resulting SCLK frequency is `source / (2 * (conf + 1))`.
    pub fn set_clock_divider(&self, conf: u8) {
        self.regs().CLOCK_CONF.set(conf as u32);
        log::debug!("spi clock divider set to {}", conf);
    }

    pub fn get_clock_divider(&self) -> u8 {
        self.regs().CLOCK_CONF.get() as u8
    }

    /// Returns the SCLK frequency for the current divider, given the
    /// frequency of the clock that drives the controller.
    pub fn sclk_frequency(&self, source_hz: u32) -> u32 {
        source_hz / (2 * (self.get_clock_divider() as u32 + 1))
    }

    /// Program the fastest divider whose SCLK frequency doesn't exceed
    /// `target_hz`, and return the divider.
    ///
    /// If even the largest divider is too fast, `255` is used.
    pub fn set_frequency(&self, source_hz: u32, target_hz: u32) -> u8 {
        let conf = if target_hz == 0 {
            u8::MAX
        } else {
            // smallest `conf + 1` so that `source / (2 * (conf + 1)) <= target`
            let step = 2 * target_hz as u64;
            let div = (source_hz as u64 + step - 1) / step;
            div.saturating_sub(1).min(u8::MAX as u64) as u8
        };

        self.set_clock_divider(conf);
        conf
    }

    /// Send a byte and wait until the transfer is done.
    ///
    /// The byte that was received at the same time is discarded.
    pub fn write(&self, byte: u8) {
        self.regs().WDATA.set(byte as u32);
        self.wait_ready();
    }

    /// Exchange a byte with the selected peripheral.
    pub fn transfer(&self, byte: u8) -> u8 {
        self.regs().WDATA.set(byte as u32);
        self.wait_ready();
        self.regs().RDATA.get() as u8
    }

    /// Send all bytes, one after another.
    pub fn write_all(&self, bytes: &[u8]) {
        for &x in bytes {
            self.write(x);
        }
    }

    /// Exchange every byte of `buf`, replacing it with the received byte.
    pub fn transfer_in_place(&self, buf: &mut [u8]) {
        for x in buf.iter_mut() {
            *x = self.transfer(*x);
        }
    }
}

unsafe impl Send for Spi {}
