//! Userspace hardware abstraction layer for the TS-7300 single-board
//! computer (Cirrus EP9302).
//!
//! # Module Organization
//!
//! - [`system`]: the physical-memory device, page mapping and page cache
//! - [`registers`]: width-exact volatile register accessors
//! - [`ports`]: word/bit/trigger/DIO views over registers
//! - [`board`]: TS-7300 devices (DIO1, XDIO, LCD, SPI) and board bring-up
//!
//! Peripheral registers are reached through pages of `/dev/mem` mapped on
//! demand: [`system::MemorySpace`] keeps one mapping per page-aligned
//! physical address and hands out windows into it, and
//! [`registers::Register`] turns a window into an 8/16/32-bit accessor
//! that always issues bus transactions of exactly its declared width.
//!
//! # Example
//!
//! ```no_run
//! use ts7300::board::Board;
//! use ts7300::system::MemorySpace;
//!
//! fn main() -> ts7300::Result<()> {
//!     let mut mem = MemorySpace::new()?;
//!     mem.open()?;
//!
//!     let mut board = Board::new(&mem)?;
//!     board.init()?;
//!     board.lcd().init();
//!     board.lcd().print("hello");
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod error;
pub mod ports;
pub mod registers;
pub mod system;

pub use error::{Error, Result};
