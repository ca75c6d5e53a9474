//! Interactive hot-reload demo.
//!
//! Points a maintainer at a shared library and a niladic C function it
//! exports, then reads commands from stdin: `r` reloads the library (after
//! the caller rebuilt it in another terminal), `c` closes the handle, `q`
//! quits, and anything else calls the resolved function.
//!
//! ```sh
//! RUST_LOG=error cargo run --example hot_demo -- ./libshared.so print_text
//! ```

use std::{
    env,
    io::{self, BufRead, Write},
};

use anyhow::{bail, Result};
use hotlink::{LoadStrategy, LogSink, MaintainerBuilder};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(library), Some(symbol)) = (args.next(), args.next()) else {
        bail!("usage: hot_demo <library> <symbol>");
    };

    // Temp-copy loads keep the original file free to be rebuilt while the
    // demo is running.
    let mut maintainer = unsafe {
        MaintainerBuilder::new(&library)
            .load_strategy(LoadStrategy::TempCopy)
            .diagnostic_sink(LogSink)
            .load()
    };
    maintainer.register_symbol(symbol.as_str());
    if maintainer.resolve_all().is_err() {
        eprintln!("failed to resolve `{symbol}`; rebuild the library and press `r`");
    }

    let stdin = io::stdin();
    loop {
        print!("enter (r = reload, c = close, q = quit, anything else = call): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "q" => break,
            "r" => {
                println!("reloading...");
                if let Err(error) = unsafe { maintainer.reload() } {
                    eprintln!("failed to reload: {error}");
                }
            }
            "c" => {
                println!("closing library handle...");
                let _ = maintainer.release();
            }
            _ => match maintainer
                .symbol_address(&symbol)
                .and_then(|address| address.current())
            {
                Some(address) => {
                    // The demo assumes a niladic C function; the cast is the
                    // caller's contract, exactly as in library code.
                    let callee: extern "C" fn() = unsafe { std::mem::transmute(address) };
                    callee();
                }
                None => eprintln!("`{symbol}` is not resolved against a live library"),
            },
        }
    }

    Ok(())
}
