//! Driver for the GPIO controller.
//!
//! The controller drives up to 32 pins, one bit per pin in every register.
//! Pin ids outside of `0..32` are ignored by all setters and read as low.

use tock_registers::{
    interfaces::{Readable, Writeable},
    register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

register_structs! {
    /// The raw MMIO block of the GPIO controller.
    #[allow(non_snake_case)]
    pub GpioRegisters {
        // Input level of every pin.
        (0x00 => pub IN: ReadOnly<u32>),
        // Output enable, `1` makes the pin an output.
        (0x04 => pub OE: ReadWrite<u32>),
        // Output level of every pin.
        (0x08 => pub OUT: ReadWrite<u32>),
        // Writing `1` drives the pin low.
        (0x0C => pub CLR: WriteOnly<u32>),
        // Writing `1` drives the pin high.
        (0x10 => pub SET: WriteOnly<u32>),
        (0x14 => @END),
    }
}

/// The number of pins a GPIO controller can drive.
pub const PIN_COUNT: u32 = 32;

/// The logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low = 0,
    High = 1,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Returns the mask for the given pin, or `None` if there's no such pin.
#[inline]
fn pin_mask(pin: u32) -> Option<u32> {
    1u32.checked_shl(pin)
}

/// Driver for the GPIO controller.
pub struct Gpio {
    base: *const GpioRegisters,
}

impl Gpio {
    /// Create a new GPIO driver for the controller mapped at the given address.
    ///
    /// # Safety
    ///
    /// `base` must point to the register block of a GPIO controller.
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self {
            base: base as *const _,
        }
    }

    fn regs(&self) -> &GpioRegisters {
        unsafe { &*self.base }
    }

    /// Make the pin an output.
    pub fn set_output(&self, pin: u32) {
        if let Some(mask) = pin_mask(pin) {
            self.set_output_group(mask);
        }
    }

    /// Make the pin an input.
    pub fn set_input(&self, pin: u32) {
        if let Some(mask) = pin_mask(pin) {
            self.set_input_group(mask);
        }
    }

    /// Returns the input bit of the pin, still at its position inside the
    /// register. It's non-zero if the pin is high.
    pub fn read(&self, pin: u32) -> u32 {
        pin_mask(pin).map_or(0, |mask| self.read_all() & mask)
    }

    /// Drive the pin to the given level.
    pub fn write(&self, pin: u32, level: Level) {
        match level {
            Level::Low => self.clear(pin),
            Level::High => self.set(pin),
        }
    }

    /// Drive the pin high.
    pub fn set(&self, pin: u32) {
        if let Some(mask) = pin_mask(pin) {
            self.set_group(mask);
        }
    }

    /// Drive the pin low.
    pub fn clear(&self, pin: u32) {
        if let Some(mask) = pin_mask(pin) {
            self.clear_group(mask);
        }
    }

    /// Invert the output level of the pin.
    pub fn toggle(&self, pin: u32) {
        if let Some(mask) = pin_mask(pin) {
            self.toggle_group(mask);
        }
    }

    pub fn is_set(&self, pin: u32) -> bool {
        self.read(pin) != 0
    }

    pub fn is_clear(&self, pin: u32) -> bool {
        self.read(pin) == 0
    }

    /// Returns the level of the pin.
    pub fn level(&self, pin: u32) -> Level {
        Level::from(self.is_set(pin))
    }

    /// Make every pin in the mask an output.
    pub fn set_output_group(&self, mask: u32) {
        let oe = &self.regs().OE;
        oe.set(oe.get() | mask);
    }

    /// Make every pin in the mask an input.
    pub fn set_input_group(&self, mask: u32) {
        let oe = &self.regs().OE;
        oe.set(oe.get() & !mask);
    }

    /// Returns the input level of all pins.
    pub fn read_all(&self) -> u32 {
        self.regs().IN.get()
    }

    /// Overwrite the output level of all pins.
    pub fn write_group(&self, value: u32) {
        self.regs().OUT.set(value);
    }

    /// Drive every pin in the mask high.
    pub fn set_group(&self, mask: u32) {
        self.regs().SET.set(mask);
    }

    /// Drive every pin in the mask low.
    pub fn clear_group(&self, mask: u32) {
        self.regs().CLR.set(mask);
    }

    /// Invert the output level of every pin in the mask.
    pub fn toggle_group(&self, mask: u32) {
        let out = &self.regs().OUT;
        out.set(out.get() ^ mask);
    }
}

unsafe impl Send for Gpio {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegisters;
    use std::sync::Arc;

    const IN: usize = 0x00;
    const OE: usize = 0x04;
    const OUT: usize = 0x08;
    const CLR: usize = 0x0C;
    const SET: usize = 0x10;

    fn setup() -> (Arc<MockRegisters<5>>, Gpio) {
        let regs = MockRegisters::new();
        let gpio = unsafe { Gpio::new(regs.base()) };
        (regs, gpio)
    }

    #[test]
    fn driver_keeps_register_address() {
        let (regs, gpio) = setup();
        assert_eq!(gpio.base as *mut u8, regs.base());

        gpio.set_output(2);
        assert_eq!(regs.read(OE), 1 << 2);
    }

    #[test]
    fn direction() {
        let (regs, gpio) = setup();

        gpio.set_output(3);
        gpio.set_output(31);
        assert_eq!(regs.read(OE), (1 << 3) | (1 << 31));

        gpio.set_input(3);
        assert_eq!(regs.read(OE), 1 << 31);

        gpio.set_output_group(0xF0);
        gpio.set_input_group(0x30);
        assert_eq!(regs.read(OE), (1 << 31) | 0xC0);
    }

    #[test]
    fn write_uses_set_and_clear_registers() {
        let (regs, gpio) = setup();

        gpio.write(5, Level::High);
        assert_eq!(regs.read(SET), 1 << 5);

        gpio.write(7, Level::Low);
        assert_eq!(regs.read(CLR), 1 << 7);

        gpio.set(0);
        assert_eq!(regs.read(SET), 1);
        gpio.clear(1);
        assert_eq!(regs.read(CLR), 2);

        gpio.set_group(0xAA);
        gpio.clear_group(0x55);
        assert_eq!(regs.read(SET), 0xAA);
        assert_eq!(regs.read(CLR), 0x55);
        assert_eq!(regs.read(OUT), 0);
    }

    #[test]
    fn toggle_flips_output_bits() {
        let (regs, gpio) = setup();
        gpio.write_group(0b1010);

        gpio.toggle(1);
        assert_eq!(regs.read(OUT), 0b1000);
        gpio.toggle(0);
        assert_eq!(regs.read(OUT), 0b1001);

        gpio.toggle_group(0xF);
        assert_eq!(regs.read(OUT), 0b0110);
    }

    #[test]
    fn read_pins() {
        let (regs, gpio) = setup();
        regs.write(IN, (1 << 4) | (1 << 31));

        assert_eq!(gpio.read(4), 1 << 4);
        assert_eq!(gpio.read(5), 0);
        assert!(gpio.is_set(31));
        assert!(gpio.is_clear(0));
        assert_eq!(gpio.level(4), Level::High);
        assert_eq!(gpio.level(6), Level::Low);
        assert_eq!(gpio.read_all(), (1 << 4) | (1 << 31));
    }

    #[test]
    fn out_of_range_pins_are_ignored() {
        let (regs, gpio) = setup();
        regs.write(IN, 0xFFFF_FFFF);
        gpio.write_group(0x1234);

        gpio.set_output(PIN_COUNT);
        gpio.set(32);
        gpio.clear(40);
        gpio.toggle(u32::MAX);
        gpio.write(33, Level::High);

        assert_eq!(regs.read(OE), 0);
        assert_eq!(regs.read(SET), 0);
        assert_eq!(regs.read(CLR), 0);
        assert_eq!(regs.read(OUT), 0x1234);

        assert_eq!(gpio.read(32), 0);
        assert!(!gpio.is_set(32));
        assert!(gpio.is_clear(32));
    }
}
