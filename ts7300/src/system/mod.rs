//! Physical memory access primitives.
//!
//! This module owns everything between the process and the raw address
//! space of the board:
//!
//! - [`MemFile`]: the opened physical-memory device (`/dev/mem`)
//! - [`MappedPage`]: one page-granular mapping of that device
//! - [`PageWindow`]: a cheap, clonable view into a mapped page
//! - [`MemorySpace`]: the page cache handing out windows on demand
//! - [`delay_ns`] / [`delay_us`]: busy-wait timing helpers

mod delay;
mod mapping;
mod mem_file;
mod memory;

pub use delay::{delay_ns, delay_us};
pub use mapping::{MappedPage, PageWindow};
pub use mem_file::{DEV_MEM_PATH, MemFile};
pub use memory::MemorySpace;
