//! Board smoke test: open the memory device, bring the board up, and
//! write a test string to the LCD.

use std::process::ExitCode;

use log::info;
use ts7300::board::{self, Board};
use ts7300::system::MemorySpace;

fn run() -> ts7300::Result<()> {
    let mut mem = MemorySpace::new()?;
    mem.open()?;
    info!("memory device open, page size {} bytes", mem.page_size());

    if let Ok(model) = board::identify(&mem) {
        info!("board model: {model:?}, uptime {:.1}s", board::uptime(&mem)?);
    }

    let mut board = Board::new(&mem)?;
    board.init()?;

    board.lcd().init();
    board.lcd().print("testing...");

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => {
            println!("done.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("lcd-demo: {} error: {err}", err.category());
            ExitCode::FAILURE
        }
    }
}
