use crate::error::Result;
use crate::ports::DioPort;
use crate::registers::Reg8;
use crate::system::MemorySpace;

const BASE_ADDR: u64 = 0x8084_0000;

/// The DIO1 header: an 8-bit GPIO bank (data at `+0x04`, direction at
/// `+0x14`) plus the auxiliary bank carrying the remaining header pins
/// (`+0x30`/`+0x34`).
#[derive(Debug)]
pub struct Dio1 {
    pins: DioPort<Reg8>,
    aux: DioPort<Reg8>,
}

impl Dio1 {
    pub fn new(mem: &MemorySpace) -> Result<Self> {
        let pins = DioPort::new(
            Reg8::new(mem.get_region(BASE_ADDR + 0x04)?)?,
            Reg8::new(mem.get_region(BASE_ADDR + 0x14)?)?,
        );
        let aux = DioPort::new(
            Reg8::new(mem.get_region(BASE_ADDR + 0x30)?)?,
            Reg8::new(mem.get_region(BASE_ADDR + 0x34)?)?,
        );

        Ok(Self { pins, aux })
    }

    /// Per-pin direction for the main bank: bit = 1 output, bit = 0 input.
    pub fn set_dir(&mut self, dir: u8) {
        self.pins.set_dir(dir);
    }

    pub fn get_dir(&self) -> u8 {
        self.pins.get_dir()
    }

    pub fn write(&mut self, word: u8) {
        self.pins.write(word);
    }

    pub fn read(&self) -> u8 {
        self.pins.read()
    }

    pub fn pins(&mut self) -> &mut DioPort<Reg8> {
        &mut self.pins
    }

    pub fn aux(&mut self) -> &mut DioPort<Reg8> {
        &mut self.aux
    }
}
