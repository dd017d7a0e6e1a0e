/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use clap::Parser;
use cli::Cli;
use std::env;

mod cli;
mod logger;
mod plan;
mod version;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    logger::init()?;
    setup_panic_hook();

    cli.run().await
}

fn setup_panic_hook() {
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        eprintln!("\n============================================================");
        eprintln!("tsprov has panicked. This is a bug in tsprov. Please report this");
        eprintln!("at https://github.com/tsprov/tsprov/issues/new.");
        eprintln!("If you can reliably reproduce this panic, include the");
        eprintln!("reproduction steps and re-run with the RUST_BACKTRACE=1 env");
        eprintln!("var set and include the backtrace in your report.");
        eprintln!();
        eprintln!("Platform: {} {}", env::consts::OS, env::consts::ARCH);
        eprintln!("Version: {}", version::LONG_VERSION);
        eprintln!("Args: {:?}", env::args().collect::<Vec<_>>());
        eprintln!();
        orig_hook(panic_info);
        std::process::exit(1);
    }));
}
