//! Host binary for the oc8 CHIP-8 virtual machine: loads a program
//! image, installs the glyph sprites, and drives the core against SDL2
//! input and output.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use oc8_core::Quirks;

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 virtual machine")]
struct Args {
    /// Path to the program image (.ch8)
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u64).range(1..))]
    ips: u64,

    /// 8XY6/8XYE copy VY into VX before shifting (original behavior)
    #[arg(long)]
    shift_quirk: bool,

    /// FX55/FX65 advance I by X + 1 after the block copy
    #[arg(long)]
    increment_quirk: bool,

    /// BNNN takes its jump offset from VX instead of V0
    #[arg(long)]
    jump_quirk: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let quirks = Quirks {
        shift_copies_vy: args.shift_quirk,
        load_store_increments_i: args.increment_quirk,
        jump_uses_vx: args.jump_quirk,
    };

    if let Err(e) = run::run(args.rom, quirks, args.ips) {
        eprintln!("oc8: {}", e);
        process::exit(1);
    }
}
