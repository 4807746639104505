use crate::error::{Error, Result};
use crate::ports::DioPort;
use crate::registers::Reg8;
use crate::system::MemorySpace;

const BASE_ADDR: u64 = 0x7200_0040;

/// XDIO operating mode, held in bits 6–7 of the configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XdioMode {
    /// No mode has been read from or written to the hardware yet.
    Uninitialized,
    Dio,
    EdgeQuadCounter,
    InputPulseTimer,
    Pwm,
}

impl XdioMode {
    /// Decode the 2-bit mode field of a configuration byte.
    fn from_conf(conf: u8) -> Self {
        match (conf >> 6) & 0x03 {
            0x00 => XdioMode::Dio,
            0x01 => XdioMode::EdgeQuadCounter,
            0x02 => XdioMode::InputPulseTimer,
            _ => XdioMode::Pwm,
        }
    }

    /// Encode the mode into a configuration byte. There is no valid bit
    /// pattern for an unset mode.
    fn conf_bits(self) -> Result<u8> {
        let bits = match self {
            XdioMode::Dio => 0x00,
            XdioMode::EdgeQuadCounter => 0x01,
            XdioMode::InputPulseTimer => 0x02,
            XdioMode::Pwm => 0x03,
            XdioMode::Uninitialized => {
                return Err(Error::InvalidState("XDIO mode has not been set"));
            }
        };

        Ok(bits << 6)
    }
}

/// A mode-configurable XDIO port.
///
/// Each port occupies four consecutive bytes at `0x7200_0040 + 4n`:
/// the configuration register, then the DIO data and direction registers,
/// then a fourth register used only by the counter/timer/PWM modes.
///
/// DIO is the only mode with an explicit transition; the other three are
/// recognized when read back from the hardware but cannot be entered yet.
pub struct Xdio {
    conf: Reg8,
    dio: DioPort<Reg8>,
    mode: XdioMode,
}

impl Xdio {
    /// `n` selects the port: 0 (XDIO1) or 1 (XDIO2).
    pub fn new(mem: &MemorySpace, n: u32) -> Result<Self> {
        if n > 1 {
            return Err(Error::InvalidArgument("XDIO port index must be 0 or 1"));
        }

        let base = BASE_ADDR + u64::from(n) * 4;
        let conf = Reg8::new(mem.get_region(base)?)?;
        let dio = DioPort::new(
            Reg8::new(mem.get_region(base + 1)?)?,
            Reg8::new(mem.get_region(base + 2)?)?,
        );

        Ok(Self {
            conf,
            dio,
            mode: XdioMode::Uninitialized,
        })
    }

    /// Adopt whatever mode the hardware currently reports.
    pub fn init(&mut self) {
        self.mode = XdioMode::from_conf(self.conf.read());
    }

    pub fn mode(&self) -> XdioMode {
        self.mode
    }

    /// Switch the port to DIO mode and write the configuration register.
    pub fn set_mode_dio(&mut self) -> Result<()> {
        self.mode = XdioMode::Dio;
        self.write_conf()
    }

    /// DIO view of the port. Fails with [`Error::InvalidState`] unless the
    /// current mode is exactly DIO.
    pub fn dio(&mut self) -> Result<&mut DioPort<Reg8>> {
        if self.mode != XdioMode::Dio {
            return Err(Error::InvalidState("XDIO port is not in DIO mode"));
        }

        Ok(&mut self.dio)
    }

    fn write_conf(&mut self) -> Result<()> {
        let bits = self.mode.conf_bits()?;
        self.conf.write(bits);
        Ok(())
    }
}
