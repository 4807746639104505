//! Shared test fixture: a sparse temp file standing in for `/dev/mem`.
//!
//! The file is large enough to cover every register bank the drivers
//! touch; only the pages actually mapped and written consume space.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::os::unix::fs::FileExt;

use tempfile::NamedTempFile;
use ts7300::system::MemorySpace;

/// Covers addresses up to the syscon bank at 0x8093_xxxx.
pub const BACKING_LEN: u64 = 0x8100_0000;

/// Create the sparse backing file and a `MemorySpace` opened over it.
pub fn sparse_space() -> (NamedTempFile, MemorySpace) {
    let file = NamedTempFile::new().expect("create backing file");
    file.as_file()
        .set_len(BACKING_LEN)
        .expect("extend backing file");

    let mut mem = MemorySpace::new().expect("query page size");
    mem.open_path(file.path()).expect("open backing file");

    (file, mem)
}

pub fn read_byte(file: &NamedTempFile, addr: u64) -> u8 {
    let mut buf = [0u8; 1];
    file.as_file().read_at(&mut buf, addr).expect("read backing file");
    buf[0]
}

pub fn write_byte(file: &NamedTempFile, addr: u64, value: u8) {
    file.as_file()
        .write_all_at(&[value], addr)
        .expect("write backing file");
}

pub fn read_u16(file: &NamedTempFile, addr: u64) -> u16 {
    let mut buf = [0u8; 2];
    file.as_file().read_at(&mut buf, addr).expect("read backing file");
    u16::from_le_bytes(buf)
}

pub fn write_u16(file: &NamedTempFile, addr: u64, value: u16) {
    file.as_file()
        .write_all_at(&value.to_le_bytes(), addr)
        .expect("write backing file");
}

pub fn read_u32(file: &NamedTempFile, addr: u64) -> u32 {
    let mut buf = [0u8; 4];
    file.as_file().read_at(&mut buf, addr).expect("read backing file");
    u32::from_le_bytes(buf)
}

pub fn write_u32(file: &NamedTempFile, addr: u64, value: u32) {
    file.as_file()
        .write_all_at(&value.to_le_bytes(), addr)
        .expect("write backing file");
}
