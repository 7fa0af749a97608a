macro_rules! read_csr {
    ($name:ident) => {
        /// Read the raw value out of the CSR.
        #[inline]
        unsafe fn _read() -> usize {
            let bits: usize;
            core::arch::asm!(
                concat!("csrr {}, ", stringify!($name)),
                out(reg) bits,
                options(nomem, nostack)
            );
            bits
        }
    };
}

macro_rules! write_csr {
    ($name:ident) => {
        /// Write the raw bits into the register.
        #[inline]
        unsafe fn _write(bits: usize) {
            core::arch::asm!(
                concat!("csrw ", stringify!($name), ", {}"),
                in(reg) bits,
                options(nostack)
            );
        }
    };
}

macro_rules! set_csr {
    ($name:ident) => {
        /// Set all bits of the mask inside the register.
        #[inline]
        unsafe fn _set(mask: usize) {
            core::arch::asm!(
                concat!("csrs ", stringify!($name), ", {}"),
                in(reg) mask,
                options(nostack)
            );
        }
    };
}

macro_rules! clear_csr {
    ($name:ident) => {
        /// Clear all bits of the mask inside the register.
        #[inline]
        unsafe fn _clear(mask: usize) {
            core::arch::asm!(
                concat!("csrc ", stringify!($name), ", {}"),
                in(reg) mask,
                options(nostack)
            );
        }
    };
}

/// Defines a `read` function that returns the full 64-bit value of a
/// counter CSR. On RV32 the upper half lives in a separate `*h` CSR.
macro_rules! read_counter {
    ($name:ident, $high:ident) => {
        #[cfg(target_arch = "riscv64")]
        #[inline]
        pub fn read() -> u64 {
            let bits: usize;
            unsafe {
                core::arch::asm!(
                    concat!("csrr {}, ", stringify!($name)),
                    out(reg) bits,
                    options(nomem, nostack)
                );
            }
            bits as u64
        }

        #[cfg(target_arch = "riscv32")]
        #[inline]
        pub fn read() -> u64 {
            loop {
                let (high, low, again): (u32, u32, u32);
                unsafe {
                    core::arch::asm!(
                        concat!("csrr {0}, ", stringify!($high)),
                        concat!("csrr {1}, ", stringify!($name)),
                        concat!("csrr {2}, ", stringify!($high)),
                        out(reg) high,
                        out(reg) low,
                        out(reg) again,
                        options(nomem, nostack)
                    );
                }
                if high == again {
                    return ((high as u64) << 32) | low as u64;
                }
            }
        }
    };
}
