//! Page cache and typed register behavior over a file-backed mapping.

mod common;

use ts7300::Error;
use ts7300::registers::{Reg8, Reg16, Reg32};
use ts7300::system::MemorySpace;

const DIO1_DATA: u64 = 0x8084_0004;

#[test]
fn get_region_before_open_is_invalid_state() {
    let mem = MemorySpace::new().unwrap();
    assert!(matches!(
        mem.get_region(DIO1_DATA),
        Err(Error::InvalidState(_))
    ));
}

#[test]
fn opening_twice_is_invalid_state() {
    let (file, mut mem) = common::sparse_space();
    assert!(matches!(
        mem.open_path(file.path()),
        Err(Error::InvalidState(_))
    ));
    assert!(mem.is_opened());
}

#[test]
fn windows_share_a_page_iff_their_aligned_bases_match() {
    let (_file, mem) = common::sparse_space();
    let page = mem.page_size() as u64;
    let base = 0x8084_0000u64;

    // Same address twice: the cached mapping is reused.
    let w1 = mem.get_region(base).unwrap();
    let w2 = mem.get_region(base).unwrap();
    assert_eq!(w1.as_ptr(), w2.as_ptr());

    // Same page, different offset: same mapping, shifted pointer.
    let w3 = mem.get_region(base + 5).unwrap();
    assert_eq!(w3.as_ptr() as usize, w1.as_ptr() as usize + 5);
    assert_eq!(w3.offset(), 5);
    assert_eq!(w3.phys_addr(), base + 5);

    // Distinct pages: distinct mappings.
    for k in 1..4 {
        let wk = mem.get_region(base + k * page).unwrap();
        assert_eq!(wk.offset(), 0);
        assert_eq!(wk.phys_addr(), base + k * page);
        assert_ne!(wk.as_ptr(), w1.as_ptr());
    }
}

#[test]
fn window_offset_is_reduced_modulo_page_size() {
    let (_file, mem) = common::sparse_space();
    let page = mem.page_size() as u64;

    for addr in [0x8084_0000, 0x8084_0123, 0x8084_0000 + page - 1] {
        let window = mem.get_region(addr).unwrap();
        assert_eq!(window.offset() as u64, addr % page);
        assert!((window.offset() as u64) < page);
        assert_eq!(window.phys_addr(), addr);
    }
}

#[test]
fn registers_round_trip_through_the_backing_file() {
    let (file, mem) = common::sparse_space();

    let mut r8 = Reg8::new(mem.get_region(DIO1_DATA).unwrap()).unwrap();
    r8.write(0x5a);
    assert_eq!(r8.read(), 0x5a);
    assert_eq!(common::read_byte(&file, DIO1_DATA), 0x5a);

    let mut r16 = Reg16::new(mem.get_region(0x808a_0008).unwrap()).unwrap();
    r16.write(0xbeef);
    assert_eq!(r16.read(), 0xbeef);
    assert_eq!(common::read_u16(&file, 0x808a_0008), 0xbeef);

    let mut r32 = Reg32::new(mem.get_region(0x8093_0080).unwrap()).unwrap();
    r32.write(0x0814_0d00);
    assert_eq!(r32.read(), 0x0814_0d00);
    assert_eq!(common::read_u32(&file, 0x8093_0080), 0x0814_0d00);
}

#[test]
fn close_releases_the_cache_but_live_windows_keep_their_page() {
    let (_file, mut mem) = common::sparse_space();

    let mut reg = Reg8::new(mem.get_region(DIO1_DATA).unwrap()).unwrap();
    reg.write(0x77);

    mem.close();

    // The handle stays open and old registers still reach their page.
    assert!(mem.is_opened());
    assert_eq!(reg.read(), 0x77);

    // New regions map fresh pages over the same backing bytes.
    let reg2 = Reg8::new(mem.get_region(DIO1_DATA).unwrap()).unwrap();
    assert_eq!(reg2.read(), 0x77);
}
