//! Driver for the machine timer (MTIMER).
//!
//! The timer holds the 64-bit `mtime` counter and the 64-bit `mtimecmp`
//! comparator, each split into two 32-bit registers. A timer interrupt is
//! pending as long as `mtime >= mtimecmp`.

use tock_registers::{
    interfaces::{ReadWriteable, Readable, Writeable},
    register_bitfields, register_structs,
    registers::ReadWrite,
};

register_bitfields! {
    u32,

    /// Control Register
    pub CR [
        /// Enables counting. While set, `mtime` is incremented on every
        /// rising edge of the clock.
        EN OFFSET(0) NUMBITS(1) []
    ]
}

register_structs! {
    /// The raw MMIO block of the machine timer.
    #[allow(non_snake_case)]
    pub MTimerRegisters {
        (0x00 => pub CR: ReadWrite<u32, CR::Register>),
        (0x04 => pub MTIMEL: ReadWrite<u32>),
        (0x08 => pub MTIMEH: ReadWrite<u32>),
        (0x0C => pub MTIMECMPL: ReadWrite<u32>),
        (0x10 => pub MTIMECMPH: ReadWrite<u32>),
        (0x14 => @END),
    }
}

/// Driver for the machine timer.
pub struct MTimer {
    base: *const MTimerRegisters,
}

impl MTimer {
    /// Create a new timer driver for the timer mapped at the given address.
    ///
    /// # Safety
    ///
    /// `base` must point to the register block of the machine timer.
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self {
            base: base as *const _,
        }
    }

    fn regs(&self) -> &MTimerRegisters {
        unsafe { &*self.base }
    }

    /// Start counting.
    pub fn enable(&self) {
        self.regs().CR.modify(CR::EN::SET);
        log::debug!("mtimer enabled");
    }

    /// Stop counting. The counter keeps its value.
    pub fn disable(&self) {
        self.regs().CR.modify(CR::EN::CLEAR);
        log::debug!("mtimer disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.regs().CR.is_set(CR::EN)
    }

    /// Overwrite the counter, low word first.
    pub fn set_counter(&self, value: u64) {
        let regs = self.regs();
        regs.MTIMEL.set(value as u32);
        regs.MTIMEH.set((value >> 32) as u32);
    }

    /// Read the 64-bit counter.
    pub fn get_counter(&self) -> u64 {
        let regs = self.regs();

        // the low word may overflow into the high word between the two reads,
        // so read the high word again and retry if it changed.
        loop {
            let high = regs.MTIMEH.get();
            let low = regs.MTIMEL.get();
            if regs.MTIMEH.get() == high {
                return ((high as u64) << 32) | low as u64;
            }
        }
    }

    /// Reset the counter to zero.
    pub fn clear_counter(&self) {
        let regs = self.regs();
        regs.MTIMEL.set(0);
        regs.MTIMEH.set(0);
    }

    /// Set the value the counter is compared against.
    pub fn set_compare(&self, value: u64) {
        let regs = self.regs();

        // Setting the low word to all ones first means the comparator never
        // holds a value below both the old and the new one during the update,
        // which would fire a spurious interrupt.
        regs.MTIMECMPL.set(u32::MAX);
        regs.MTIMECMPH.set((value >> 32) as u32);
        regs.MTIMECMPL.set(value as u32);
    }

    pub fn get_compare(&self) -> u64 {
        let regs = self.regs();
        ((regs.MTIMECMPH.get() as u64) << 32) | regs.MTIMECMPL.get() as u64
    }
}

unsafe impl Send for MTimer {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegisters;
    use std::sync::Arc;

    const CR: usize = 0x00;
    const MTIMEL: usize = 0x04;
    const MTIMEH: usize = 0x08;
    const MTIMECMPL: usize = 0x0C;
    const MTIMECMPH: usize = 0x10;

    fn setup() -> (Arc<MockRegisters<5>>, MTimer) {
        let regs = MockRegisters::new();
        let timer = unsafe { MTimer::new(regs.base()) };
        (regs, timer)
    }

    #[test]
    fn driver_keeps_register_address() {
        let (regs, timer) = setup();
        assert_eq!(timer.base as *mut u8, regs.base());

        timer.enable();
        assert_eq!(regs.read(CR), 1);
    }

    #[test]
    fn enable_only_touches_en_bit() {
        let (regs, timer) = setup();
        regs.write(CR, 0xF0);

        timer.enable();
        assert!(timer.is_enabled());
        assert_eq!(regs.read(CR), 0xF1);

        timer.disable();
        assert!(!timer.is_enabled());
        assert_eq!(regs.read(CR), 0xF0);
    }

    #[test]
    fn counter_round_trips_above_32_bits() {
        let (regs, timer) = setup();

        timer.set_counter(0x1234_5678_9ABC_DEF0);
        assert_eq!(regs.read(MTIMEL), 0x9ABC_DEF0);
        assert_eq!(regs.read(MTIMEH), 0x1234_5678);
        assert_eq!(timer.get_counter(), 0x1234_5678_9ABC_DEF0);

        timer.set_counter(1 << 32);
        assert_eq!(timer.get_counter(), 1 << 32);

        timer.clear_counter();
        assert_eq!(timer.get_counter(), 0);
        assert_eq!(regs.read(MTIMEH), 0);
    }

    #[test]
    fn counter_reads_hardware_value() {
        let (regs, timer) = setup();
        regs.write(MTIMEL, 0xFFFF_FFFF);
        regs.write(MTIMEH, 0x1);

        assert_eq!(timer.get_counter(), 0x1_FFFF_FFFF);
    }

    #[test]
    fn compare_holds_new_value() {
        let (regs, timer) = setup();
        timer.set_compare(0xDEAD_BEEF_0000_0010);

        assert_eq!(regs.read(MTIMECMPL), 0x0000_0010);
        assert_eq!(regs.read(MTIMECMPH), 0xDEAD_BEEF);
        assert_eq!(timer.get_compare(), 0xDEAD_BEEF_0000_0010);

        timer.set_compare(u64::MAX);
        assert_eq!(timer.get_compare(), u64::MAX);
    }
}
