//! Machine-level RISC-V CSRs used to drive interrupts and timing.

#[macro_use]
mod macros;

pub mod mtvec;

use bitflags::bitflags;

bitflags! {
    /// The interrupt sources, laid out as in `mie` and `mip`.
    pub struct Interrupts: usize {
        /// Machine software interrupt.
        const SOFTWARE = 1 << 3;
        /// Machine timer interrupt, driven by the MTIMER.
        const TIMER = 1 << 7;
        /// Machine external interrupt.
        const EXTERNAL = 1 << 11;

        // platform specific fast interrupt lines
        const FAST0 = 1 << 16;
        const FAST1 = 1 << 17;
        const FAST2 = 1 << 18;
        const FAST3 = 1 << 19;
        const FAST4 = 1 << 20;
        const FAST5 = 1 << 21;
        const FAST6 = 1 << 22;
        const FAST7 = 1 << 23;
        const FAST8 = 1 << 24;
        const FAST9 = 1 << 25;
        const FAST10 = 1 << 26;
        const FAST11 = 1 << 27;
        const FAST12 = 1 << 28;
        const FAST13 = 1 << 29;
        const FAST14 = 1 << 30;
        const FAST15 = 1 << 31;
    }
}

/// The `mstatus` CSR.
pub mod mstatus {
    read_csr!(mstatus);
    set_csr!(mstatus);
    clear_csr!(mstatus);

    /// The global machine interrupt enable bit.
    const MIE: usize = 1 << 3;

    /// Globally enable interrupts.
    #[inline]
    pub fn enable_interrupts() {
        unsafe { _set(MIE) }
    }

    /// Globally disable interrupts.
    #[inline]
    pub fn disable_interrupts() {
        unsafe { _clear(MIE) }
    }

    #[inline]
    pub fn interrupts_enabled() -> bool {
        unsafe { _read() & MIE != 0 }
    }
}

/// The `mie` CSR.
pub mod mie {
    use super::Interrupts;

    read_csr!(mie);
    set_csr!(mie);
    clear_csr!(mie);

    /// Returns the enabled interrupt sources.
    #[inline]
    pub fn read() -> Interrupts {
        Interrupts::from_bits_truncate(unsafe { _read() })
    }

    /// Enable the given interrupt sources.
    #[inline]
    pub fn enable(irqs: Interrupts) {
        unsafe { _set(irqs.bits()) }
    }

    /// Disable the given interrupt sources.
    #[inline]
    pub fn disable(irqs: Interrupts) {
        unsafe { _clear(irqs.bits()) }
    }
}

/// The `mip` CSR.
pub mod mip {
    use super::Interrupts;

    read_csr!(mip);

    /// Returns the pending interrupt sources.
    #[inline]
    pub fn read() -> Interrupts {
        Interrupts::from_bits_truncate(unsafe { _read() })
    }
}

/// The `mcycle` CSR, counting clock cycles.
pub mod mcycle {
    read_counter!(mcycle, mcycleh);
}

/// The `minstret` CSR, counting retired instructions.
pub mod minstret {
    read_counter!(minstret, minstreth);
}

/// Stall the hart until an interrupt becomes pending.
#[inline]
pub fn wait_for_interrupt() {
    unsafe { core::arch::asm!("wfi", options(nomem, nostack)) }
}
