//! The `mtvec` CSR, which holds the address of the trap handler.

read_csr!(mtvec);
write_csr!(mtvec);

/// A value read out of `mtvec`.
#[derive(Debug, Clone, Copy)]
pub struct Mtvec {
    bits: usize,
}

impl Mtvec {
    /// Returns the raw bits of this `mtvec` value.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Returns the trap-vector base address.
    pub fn address(&self) -> usize {
        self.bits & !0b11
    }

    /// Returns the trap-vector mode.
    pub fn mode(&self) -> Option<TrapMode> {
        match self.bits & 0b11 {
            0 => Some(TrapMode::Direct),
            1 => Some(TrapMode::Vectored),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TrapMode {
    /// All traps set `pc` to `BASE`.
    Direct = 0,
    /// Interrupts set `pc` to `BASE + 4 * cause`.
    Vectored = 1,
}

#[inline]
pub fn read() -> Mtvec {
    let bits = unsafe { _read() };
    Mtvec { bits }
}

/// Write the base address and the given mode into the `mtvec` register.
///
/// The base address must be aligned to 4 bytes.
#[inline]
pub fn write(base: usize, mode: TrapMode) {
    let bits = (base & !0b11) | mode as usize;
    unsafe {
        _write(bits);
    }
}
