use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::system::{DEV_MEM_PATH, MappedPage, MemFile, PageWindow};

/// Registry of mapped pages over the physical-memory device.
///
/// Pages are mapped on demand, one per distinct page-aligned physical
/// address, and cached so that nearby registers (device registers are
/// often a few bytes apart within one page) share a single live mapping.
///
/// The cache is guarded by a mutex, so windows may be requested from any
/// thread. Register access itself carries no locking: callers must
/// serialize read-modify-write sequences on a given physical register
/// themselves.
#[derive(Debug)]
pub struct MemorySpace {
    file: Option<Arc<MemFile>>,
    pages: Mutex<HashMap<u64, Arc<MappedPage>>>,
    page_size: usize,
}

impl MemorySpace {
    /// Query the system page size and set up an empty, unopened space.
    pub fn new() -> Result<Self> {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return Err(Error::last_os_error());
        }

        Ok(Self {
            file: None,
            pages: Mutex::new(HashMap::new()),
            page_size: page_size as usize,
        })
    }

    /// Size of each mapped page in bytes.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_opened(&self) -> bool {
        self.file.is_some()
    }

    /// Open the physical-memory device (`/dev/mem`).
    ///
    /// Fails with [`Error::InvalidState`] if already open and with
    /// [`Error::Io`] if the open syscall fails.
    pub fn open(&mut self) -> Result<()> {
        self.open_path(DEV_MEM_PATH)
    }

    /// Open an arbitrary device path in place of `/dev/mem`.
    ///
    /// Same semantics as [`open`](Self::open). Intended for mapping a file
    /// that stands in for the register space, e.g. in tests.
    pub fn open_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if self.is_opened() {
            return Err(Error::InvalidState("memory device is already open"));
        }

        self.file = Some(Arc::new(MemFile::open(path)?));
        log::debug!("memory device open, page size {} bytes", self.page_size);

        Ok(())
    }

    /// Hand out a window over the page containing `address`.
    ///
    /// The page is taken from the cache when present, mapped and inserted
    /// otherwise. Fails with [`Error::InvalidState`] when the device is not
    /// open and with [`Error::Io`] when the mapping syscall fails.
    pub fn get_region(&self, address: u64) -> Result<PageWindow> {
        let file = self
            .file
            .as_ref()
            .ok_or(Error::InvalidState("memory device is not open"))?;

        let offset = (address % self.page_size as u64) as usize;
        let aligned = address - offset as u64;

        let mut pages = self.lock_pages();
        if let Some(page) = pages.get(&aligned) {
            return Ok(PageWindow::new(Arc::clone(page), offset));
        }

        let page = Arc::new(MappedPage::map(
            Arc::clone(file),
            self.page_size,
            aligned,
        )?);
        pages.insert(aligned, Arc::clone(&page));
        log::trace!("mapped page at {aligned:#010x}");

        Ok(PageWindow::new(page, offset))
    }

    /// Drop every cached page, unmapping the ones no window still holds.
    ///
    /// The device handle itself stays open; subsequent [`get_region`]
    /// calls simply map fresh pages.
    ///
    /// [`get_region`]: Self::get_region
    pub fn close(&mut self) {
        if !self.is_opened() {
            return;
        }

        let mut pages = self.lock_pages();
        log::debug!("releasing {} cached page(s)", pages.len());
        pages.clear();
    }

    fn lock_pages(&self) -> MutexGuard<'_, HashMap<u64, Arc<MappedPage>>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
