//! HD44780-style character display on the TS-7300 LCD header.
//!
//! The display sits behind three DIO banks: port A carries data lines
//! DB0–DB6, port C bit 0 carries DB7, and port H drives the EN/RS/WR
//! control lines. All timing constants come from the controller
//! datasheet.

use crate::error::{Error, Result};
use crate::ports::DioPort;
use crate::registers::Reg8;
use crate::system::{MemorySpace, delay_ns, delay_us};

const BASE_ADDR: u64 = 0x8084_0000;

// Data line split between port A and port C.
const DATA_MASK: u8 = 0x7f;
const DATA7_MASK: u8 = 0x01;
const BUSY_FLAG: u8 = 0x80;

// Control lines on port H.
const CTRL_EN: u8 = 0x08;
const CTRL_RS: u8 = 0x10;
const CTRL_WR: u8 = 0x20;

// Controller command set.
const CMD_CLEAR: u8 = 0x01;
const CMD_HOME: u8 = 0x02;
const CMD_ENTRY: u8 = 0x04;
const ENTRY_DIR_RIGHT: u8 = 0x02;
const CMD_CTRL: u8 = 0x08;
const CTRL_DISPLAY_ON: u8 = 0x04;
const CMD_FNSET: u8 = 0x20;
const FNSET_FONT_5X8: u8 = 0x00;
const FNSET_TWO_LINES: u8 = 0x08;
const FNSET_BUS_8BIT: u8 = 0x10;
const CMD_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each display row.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Poll bound while waiting for the busy flag to clear.
const BUSY_POLL_LIMIT: u32 = 1024;

/// Character display driver.
pub struct Lcd {
    /// Port A: data lines DB0–DB6.
    data: DioPort<Reg8>,
    /// Port C: data line DB7 on bit 0.
    data7: DioPort<Reg8>,
    /// Port H: EN/RS/WR control lines.
    ctrl: DioPort<Reg8>,
}

impl Lcd {
    pub fn new(mem: &MemorySpace) -> Result<Self> {
        let data = DioPort::new(
            Reg8::new(mem.get_region(BASE_ADDR)?)?,
            Reg8::new(mem.get_region(BASE_ADDR + 0x10)?)?,
        );
        let data7 = DioPort::new(
            Reg8::new(mem.get_region(BASE_ADDR + 0x08)?)?,
            Reg8::new(mem.get_region(BASE_ADDR + 0x18)?)?,
        );
        let ctrl = DioPort::new(
            Reg8::new(mem.get_region(BASE_ADDR + 0x40)?)?,
            Reg8::new(mem.get_region(BASE_ADDR + 0x44)?)?,
        );

        Ok(Self { data, data7, ctrl })
    }

    /// Power-on initialization: 8-bit bus, two lines, 5x8 font, display
    /// on, cursor and blink off. Delays follow the datasheet power-on
    /// sequence.
    pub fn init(&mut self) {
        // Control lines become outputs; EN and RS start de-asserted.
        let dir = self.ctrl.get_dir();
        self.ctrl.set_dir(dir | CTRL_EN | CTRL_RS | CTRL_WR);
        let c = self.ctrl.read();
        self.ctrl.write(c & !(CTRL_RS | CTRL_EN));

        let fnset = CMD_FNSET | FNSET_FONT_5X8 | FNSET_TWO_LINES | FNSET_BUS_8BIT;

        delay_us(15_000);
        self.command(fnset);
        delay_us(4_100);
        self.command(fnset);
        delay_us(100);
        self.command(fnset);
        delay_us(39);
        self.wait();

        self.command(fnset);
        self.wait();

        self.command(CMD_ENTRY | ENTRY_DIR_RIGHT);
        delay_us(39);
        self.wait();

        self.command(CMD_CLEAR);
        delay_us(1_530);
        self.wait();

        self.command(CMD_CTRL | CTRL_DISPLAY_ON);
        self.wait();

        self.command(CMD_HOME);
        delay_us(1_530);
        self.wait();
    }

    pub fn print(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    /// Move the cursor to the first column of `row` (0–3).
    pub fn move_to_row(&mut self, row: u8) -> Result<()> {
        let offset = ROW_OFFSETS
            .get(usize::from(row))
            .copied()
            .ok_or(Error::InvalidArgument("LCD row must be 0-3"))?;

        self.command(CMD_DDRAM | offset);
        self.wait();
        Ok(())
    }

    /// Send raw bytes to display RAM at the current cursor position.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data_pins_out();

        let mut c = self.ctrl.read();
        for &byte in bytes {
            self.put_data(byte);

            // Assert WR and RS.
            c = (c & !CTRL_WR) | CTRL_RS;
            self.ctrl.write(c);
            delay_ns(100);

            // Assert EN.
            c |= CTRL_EN;
            self.ctrl.write(c);
            delay_ns(300);

            // De-assert EN.
            c &= !CTRL_EN;
            self.ctrl.write(c);
            delay_ns(200);
        }
    }

    /// Latch a raw controller command.
    pub fn command(&mut self, cmd: u8) {
        let mut c = self.ctrl.read();

        self.data_pins_out();
        self.put_data(cmd);

        // De-assert RS, assert WR.
        c &= !(CTRL_RS | CTRL_WR);
        self.ctrl.write(c);
        delay_ns(100);

        // Assert EN.
        c |= CTRL_EN;
        self.ctrl.write(c);
        delay_ns(300);

        // De-assert EN.
        c &= !CTRL_EN;
        self.ctrl.write(c);
        delay_ns(200);
    }

    /// Poll the busy flag until the controller reports ready.
    ///
    /// Returns `false` if the flag is still set after the poll bound; the
    /// display is treated as best-effort and callers may carry on.
    pub fn wait(&mut self) -> bool {
        // Data pins become inputs for the status read.
        let dir = self.data.get_dir();
        self.data.set_dir(dir & !DATA_MASK);
        let dir7 = self.data7.get_dir();
        self.data7.set_dir(dir7 & !DATA7_MASK);

        let mut c = self.ctrl.read();
        let mut tries = 0;
        loop {
            // De-assert RS, keep WR high (read cycle).
            c = (c | CTRL_WR) & !CTRL_RS;
            self.ctrl.write(c);
            delay_ns(100);

            // Assert EN and sample the status byte.
            c |= CTRL_EN;
            self.ctrl.write(c);
            delay_ns(300);

            let status = (self.data.read() & DATA_MASK) | ((self.data7.read() & DATA7_MASK) << 7);

            c &= !CTRL_EN;
            self.ctrl.write(c);
            delay_ns(200);

            if status & BUSY_FLAG == 0 {
                return true;
            }

            tries += 1;
            if tries >= BUSY_POLL_LIMIT {
                log::warn!("LCD busy flag stuck after {BUSY_POLL_LIMIT} polls");
                return false;
            }
        }
    }

    /// Turn the data lines into outputs without disturbing other pins
    /// sharing the direction registers.
    fn data_pins_out(&mut self) {
        let dir = self.data.get_dir();
        self.data.set_dir(dir | DATA_MASK);
        let dir7 = self.data7.get_dir();
        self.data7.set_dir(dir7 | DATA7_MASK);
    }

    /// Place a byte on the split data lines.
    fn put_data(&mut self, byte: u8) {
        let d = self.data.read();
        self.data.write((d & !DATA_MASK) | (byte & DATA_MASK));
        let d7 = self.data7.read();
        self.data7.write((d7 & !DATA7_MASK) | ((byte >> 7) & DATA7_MASK));
    }
}
