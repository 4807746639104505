//! TS-7300 board support.
//!
//! Device drivers for the peripherals wired up on the TS-7300 (EP9302):
//!
//! - [`Dio1`]: the DIO1 header pin bank
//! - [`Xdio`]: the mode-configurable XDIO ports
//! - [`Lcd`]: the HD44780-style character display header
//! - [`Spi`]: the SPI controller with injectable chip selects
//!
//! [`Board`] ties them together and performs the one-time bring-up
//! writes. All register addresses come from the TS-7300 manual (Apr 2010)
//! and must be reproduced exactly for hardware compatibility.

mod dio;
mod lcd;
mod spi;
mod xdio;

pub use dio::Dio1;
pub use lcd::Lcd;
pub use spi::{DEFAULT_BUSY_POLL_LIMIT, Spi};
pub use xdio::{Xdio, XdioMode};

use crate::error::Result;
use crate::ports::BitPort;
use crate::registers::{Reg8, Reg16, Reg32};
use crate::system::MemorySpace;

/// Syscon software lock register.
const SYSCON_SWLOCK: u64 = 0x8093_00c0;
/// Syscon device configuration register.
const SYSCON_DEVICE_CFG: u64 = 0x8093_0080;
/// PLD register carrying the boot EEPROM chip select on bit 0.
const EEPROM_CS_ADDR: u64 = 0x2300_0000;
/// PLD model register.
const MODEL_ADDR: u64 = 0x2200_0000;
/// PLD revision register.
const PLD_REV_ADDR: u64 = 0x2340_0000;

/// Free-running counter on the TS-7300 PLD, 14.7456 MHz.
const TS7300_COUNTER_ADDR: u64 = 0x1200_0004;
const TS7300_COUNTER_HZ: u32 = 14_745_600;
/// EP93xx RTC-derived counter used on other boards, 983.04 kHz.
const EP93XX_COUNTER_ADDR: u64 = 0x8081_0060;
const EP93XX_COUNTER_HZ: u32 = 983_040;

/// The TS-7300 board: every on-board device plus the bring-up registers.
pub struct Board {
    swlock: Reg32,
    device_cfg: Reg32,
    eeprom_cs: BitPort<Reg8>,
    xdio1: Xdio,
    xdio2: Xdio,
    dio1: Dio1,
    lcd: Lcd,
    spi: Spi,
}

impl Board {
    /// Bind every device to its registers. Nothing is written yet.
    pub fn new(mem: &MemorySpace) -> Result<Self> {
        Ok(Self {
            swlock: Reg32::new(mem.get_region(SYSCON_SWLOCK)?)?,
            device_cfg: Reg32::new(mem.get_region(SYSCON_DEVICE_CFG)?)?,
            eeprom_cs: BitPort::new(Reg8::new(mem.get_region(EEPROM_CS_ADDR)?)?, 0)?,
            xdio1: Xdio::new(mem, 0)?,
            xdio2: Xdio::new(mem, 1)?,
            dio1: Dio1::new(mem)?,
            lcd: Lcd::new(mem)?,
            spi: Spi::new(mem)?,
        })
    }

    /// One-time board bring-up.
    ///
    /// The LCD is deliberately not initialized here: a display may not be
    /// attached, and its init sequence writes to the bus. Callers with a
    /// display run [`Lcd::init`] themselves.
    pub fn init(&mut self) -> Result<()> {
        // Unlock the syscon software lock so the device configuration
        // register accepts the following write.
        self.swlock.write(0x0000_00aa);

        // Route the DIO header pins as GPIO and keep DMA off them.
        self.device_cfg.write(0x0814_0d00);

        // ATTENTION: the boot EEPROM chip select shares the SPI bus and
        // must always be driven low. Raising it enables the boot chip, and
        // a stray bus transaction can overwrite the boot magic word
        // ("CRUS") and brick the board for good. TS-7300 manual, Apr 2010,
        // page 14.
        self.eeprom_cs.unset();

        self.xdio1.init();
        self.xdio2.init();
        self.spi.init()?;

        log::info!("board initialized");
        Ok(())
    }

    pub fn xdio1(&mut self) -> &mut Xdio {
        &mut self.xdio1
    }

    pub fn xdio2(&mut self) -> &mut Xdio {
        &mut self.xdio2
    }

    pub fn dio1(&mut self) -> &mut Dio1 {
        &mut self.dio1
    }

    pub fn lcd(&mut self) -> &mut Lcd {
        &mut self.lcd
    }

    pub fn spi(&mut self) -> &mut Spi {
        &mut self.spi
    }
}

/// Board models this crate can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardModel {
    Unknown,
    Ts7300,
}

/// Identify the board from the PLD model and revision registers.
pub fn identify(mem: &MemorySpace) -> Result<BoardModel> {
    let model = Reg16::new(mem.get_region(MODEL_ADDR)?)?.read();
    let pld_rev = Reg16::new(mem.get_region(PLD_REV_ADDR)?)?.read();

    if model & 0x07 == 0x03 && pld_rev & 0x07 == 0x03 {
        Ok(BoardModel::Ts7300)
    } else {
        Ok(BoardModel::Unknown)
    }
}

/// Seconds since power-up, read from the board's free-running counter.
pub fn uptime(mem: &MemorySpace) -> Result<f32> {
    let (addr, hz) = match identify(mem)? {
        BoardModel::Ts7300 => (TS7300_COUNTER_ADDR, TS7300_COUNTER_HZ),
        BoardModel::Unknown => (EP93XX_COUNTER_ADDR, EP93XX_COUNTER_HZ),
    };

    let ticks = Reg32::new(mem.get_region(addr)?)?.read();
    Ok(ticks as f32 / hz as f32)
}
