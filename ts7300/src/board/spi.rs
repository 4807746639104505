//! EP93xx SPI controller with injectable chip selects.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ports::{BitPort, BitWrite};
use crate::registers::Reg16;
use crate::system::MemorySpace;

const BASE_ADDR: u64 = 0x808a_0000;

/// Transmit-enable bit in the control register.
const TX_BIT: u32 = 4;
/// Busy bit in the status register.
const BUSY_BIT: u32 = 4;
/// Receive-FIFO-not-empty bit in the status register.
const INPUT_BIT: u32 = 2;

/// Default budget for busy and FIFO-drain poll loops.
pub const DEFAULT_BUSY_POLL_LIMIT: u32 = 100_000;

/// SPI bus driver.
///
/// Chip selects are not owned by the controller: any [`BitWrite`] can be
/// registered under an integer id, and the driver asserts exactly one of
/// them around each transaction.
pub struct Spi {
    data: Reg16,
    tx: BitPort<Reg16>,
    busy: BitPort<Reg16>,
    input_ready: BitPort<Reg16>,
    chips: HashMap<u32, Box<dyn BitWrite>>,
    busy_poll_limit: u32,
}

impl Spi {
    pub fn new(mem: &MemorySpace) -> Result<Self> {
        let ctrl = Reg16::new(mem.get_region(BASE_ADDR + 0x04)?)?;
        let data = Reg16::new(mem.get_region(BASE_ADDR + 0x08)?)?;
        let status = Reg16::new(mem.get_region(BASE_ADDR + 0x0c)?)?;

        Ok(Self {
            data,
            tx: BitPort::new(ctrl, TX_BIT)?,
            busy: BitPort::new(status.clone(), BUSY_BIT)?,
            input_ready: BitPort::new(status, INPUT_BIT)?,
            chips: HashMap::new(),
            busy_poll_limit: DEFAULT_BUSY_POLL_LIMIT,
        })
    }

    /// Bound every busy/drain poll loop to `polls` iterations before the
    /// driver gives up with [`Error::Timeout`].
    pub fn set_busy_poll_limit(&mut self, polls: u32) {
        self.busy_poll_limit = polls;
    }

    /// Strobe the transmitter once and drain stale words left in the
    /// receive FIFO.
    pub fn init(&mut self) -> Result<()> {
        self.tx.set();
        wait_clear(&self.busy, self.busy_poll_limit, "SPI controller stayed busy")?;
        self.tx.unset();
        wait_clear(&self.busy, self.busy_poll_limit, "SPI controller stayed busy")?;

        let mut polls = 0;
        while self.input_ready.get() {
            let _ = self.data.read();
            polls += 1;
            if polls >= self.busy_poll_limit {
                return Err(Error::Timeout("SPI receive FIFO did not drain"));
            }
        }

        Ok(())
    }

    /// Register a chip select under `id` and de-assert it.
    ///
    /// Ids are unique; a duplicate fails with [`Error::InvalidArgument`].
    pub fn add_chip(&mut self, id: u32, mut cs: Box<dyn BitWrite>) -> Result<()> {
        if self.chips.contains_key(&id) {
            return Err(Error::InvalidArgument("SPI chip id is already registered"));
        }

        cs.unset();
        self.chips.insert(id, cs);

        Ok(())
    }

    /// Clock `data` out to chip `id`, replacing it in place with the bytes
    /// read back.
    ///
    /// An unregistered `id` fails with [`Error::InvalidArgument`] without
    /// touching the bus.
    pub fn write_then_read(&mut self, id: u32, data: &mut [u8]) -> Result<()> {
        let cs = self
            .chips
            .get_mut(&id)
            .ok_or(Error::InvalidArgument("SPI chip id is not registered"))?;

        // Preload the transmit FIFO.
        for &byte in data.iter() {
            self.data.write(u16::from(byte));
        }

        cs.set();
        self.tx.set();
        wait_clear(
            &self.busy,
            self.busy_poll_limit,
            "SPI transfer never completed",
        )?;
        cs.unset();

        for byte in data.iter_mut() {
            *byte = self.data.read() as u8;
        }
        self.tx.unset();

        Ok(())
    }

    /// Like [`write_then_read`](Self::write_then_read), keeping the
    /// written bytes and collecting the reply into `reply`.
    pub fn write_then_read_into(&mut self, id: u32, data: &[u8], reply: &mut Vec<u8>) -> Result<()> {
        reply.clear();
        reply.extend_from_slice(data);
        self.write_then_read(id, reply)
    }
}

fn wait_clear(bit: &BitPort<Reg16>, polls: u32, what: &'static str) -> Result<()> {
    for _ in 0..polls {
        if !bit.get() {
            return Ok(());
        }
        std::hint::spin_loop();
    }

    Err(Error::Timeout(what))
}
