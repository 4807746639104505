//! Width-exact volatile register accessors.
//!
//! Several EP93xx peripherals decode a register differently depending on
//! the size of the bus transaction, so a 16-bit register must be accessed
//! with exactly one halfword load or store — never synthesized from two
//! byte accesses. [`Register`] guarantees that by issuing a single
//! `read_volatile`/`write_volatile` of the declared word type: the
//! compiler may not reorder, cache, or elide the access, since the
//! underlying memory changes with hardware state rather than program
//! logic.

use std::ops::{BitAnd, BitOr, Not};
use std::ptr;

use crate::error::{Error, Result};
use crate::system::PageWindow;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A machine word that can back a hardware register.
///
/// Sealed: the EP93xx register file is 8/16/32-bit only.
pub trait Word:
    sealed::Sealed
    + Copy
    + Eq
    + std::fmt::Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + 'static
{
    /// Width of the register access in bits.
    const BITS: u32;
    const ZERO: Self;

    /// The word with only bit `n` set. `n` must be below [`Self::BITS`].
    fn bit(n: u32) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty),*) => {$(
        impl Word for $ty {
            const BITS: u32 = <$ty>::BITS;
            const ZERO: Self = 0;

            #[inline]
            fn bit(n: u32) -> Self {
                1 << n
            }
        }
    )*};
}

impl_word!(u8, u16, u32);

/// A memory-mapped register accessed with loads and stores of exactly
/// `W`'s width.
///
/// Holds its [`PageWindow`], so the backing mapping stays alive for as
/// long as the register does. Clones alias the same physical register;
/// read-modify-write sequences through aliases are not atomic and must be
/// serialized by the caller.
#[derive(Debug, Clone)]
pub struct Register<W: Word> {
    addr: *mut W,
    #[allow(dead_code)]
    window: PageWindow,
}

// Safety: the pointer targets device registers reached only through
// volatile accesses; the window's page is itself Send + Sync.
unsafe impl<W: Word> Send for Register<W> {}
unsafe impl<W: Word> Sync for Register<W> {}

impl<W: Word> Register<W> {
    /// Bind a register to the address `window` resolves to.
    ///
    /// Fails with [`Error::InvalidArgument`] if the resolved pointer is
    /// null, i.e. the backing page never mapped.
    pub fn new(window: PageWindow) -> Result<Self> {
        let addr = window.as_ptr().cast::<W>();
        if addr.is_null() {
            return Err(Error::InvalidArgument(
                "register window resolves to a null pointer",
            ));
        }

        Ok(Self { addr, window })
    }

    /// Issue a single load of exactly `W`'s width.
    #[inline]
    pub fn read(&self) -> W {
        unsafe { ptr::read_volatile(self.addr) }
    }

    /// Issue a single store of exactly `W`'s width.
    #[inline]
    pub fn write(&mut self, word: W) {
        unsafe { ptr::write_volatile(self.addr, word) }
    }
}

pub type Reg8 = Register<u8>;
pub type Reg16 = Register<u16>;
pub type Reg32 = Register<u32>;
