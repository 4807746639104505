use std::ptr::NonNull;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::system::MemFile;

/// One page-granular mapping of the physical-memory device.
///
/// Maps exactly one page at a page-aligned physical base and unmaps it on
/// drop. Not clonable; shared access goes through [`PageWindow`].
#[derive(Debug)]
pub struct MappedPage {
    ptr: NonNull<u8>,
    len: usize,
    phys_base: u64,
    // Keeps the descriptor open for as long as the mapping lives.
    _file: Arc<MemFile>,
}

// Safety: the mapping points at device registers, not Rust-managed memory,
// and all access goes through volatile reads/writes. The page itself holds
// no interior state beyond the pointer.
unsafe impl Send for MappedPage {}
unsafe impl Sync for MappedPage {}

// The register banks live above 0x8000_0000; the mapping call must take a
// 64-bit offset or those bases wrap negative on 32-bit targets.
const _: () = assert!(size_of::<libc::off64_t>() == 8);

/// Physical address as an `mmap64` offset, rejecting anything that would
/// not survive the conversion.
fn mmap_offset(phys_base: u64) -> Result<libc::off64_t> {
    libc::off64_t::try_from(phys_base)
        .map_err(|_| Error::InvalidArgument("physical address exceeds the mmap offset range"))
}

/// Classify a failed mapping: exhaustion gets its own variant, everything
/// else carries the OS error.
fn map_error(err: std::io::Error) -> Error {
    if err.raw_os_error() == Some(libc::ENOMEM) {
        Error::NotEnoughMemory
    } else {
        Error::Io(err)
    }
}

impl MappedPage {
    /// Map `len` bytes of the device at physical offset `phys_base`.
    ///
    /// `phys_base` must be page-aligned and `len` a whole page; the caller
    /// ([`MemorySpace`](crate::system::MemorySpace)) guarantees both.
    pub(crate) fn map(file: Arc<MemFile>, len: usize, phys_base: u64) -> Result<Self> {
        let ptr = unsafe {
            libc::mmap64(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                mmap_offset(phys_base)?,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(map_error(std::io::Error::last_os_error()));
        }

        let ptr = NonNull::new(ptr.cast::<u8>()).ok_or(Error::Unknown)?;

        Ok(Self {
            ptr,
            len,
            phys_base,
            _file: file,
        })
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Page-aligned physical address this page is mapped at.
    pub fn phys_base(&self) -> u64 {
        self.phys_base
    }
}

impl Drop for MappedPage {
    fn drop(&mut self) {
        let rc = unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.len) };
        if rc != 0 {
            log::warn!(
                "munmap of page at {:#010x} failed: {}",
                self.phys_base,
                std::io::Error::last_os_error()
            );
        }
    }
}

/// A byte offset into a [`MappedPage`].
///
/// Cheap to clone; every clone keeps the underlying page (and with it the
/// device descriptor) alive, so a resolved pointer can never dangle.
#[derive(Debug, Clone)]
pub struct PageWindow {
    page: Arc<MappedPage>,
    offset: usize,
}

impl PageWindow {
    /// `offset` must already be reduced modulo the page size.
    pub(crate) fn new(page: Arc<MappedPage>, offset: usize) -> Self {
        debug_assert!(offset < page.len());
        Self { page, offset }
    }

    /// Pointer to the windowed byte: page base plus offset.
    pub fn as_ptr(&self) -> *mut u8 {
        unsafe { self.page.as_ptr().add(self.offset) }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Physical address this window resolves to.
    pub fn phys_addr(&self) -> u64 {
        self.page.phys_base() + self.offset as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_register_bases_survive_the_offset_conversion() {
        // Every bank above 0x8000_0000 must come through unchanged; a
        // 32-bit signed offset would wrap these negative.
        for addr in [
            0x2300_0000u64,
            0x7200_0040,
            0x8084_0000,
            0x808a_0000,
            0x8093_00c0,
        ] {
            assert_eq!(mmap_offset(addr).unwrap() as u64, addr);
        }
    }

    #[test]
    fn out_of_range_offsets_are_rejected() {
        assert!(matches!(
            mmap_offset(u64::MAX),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn mapping_failures_classify_by_errno() {
        let err = map_error(std::io::Error::from_raw_os_error(libc::ENOMEM));
        assert!(matches!(err, Error::NotEnoughMemory));

        let err = map_error(std::io::Error::from_raw_os_error(libc::EINVAL));
        assert!(matches!(err, Error::Io(_)));
    }
}
