use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use chip8_vm::Program;
use clap::Parser;

mod control;
mod display;
mod run;

#[derive(Parser, Debug)]
#[clap(name = "chip8", version, about = "Runs a Chip-8 program and prints its frames as text")]
struct Args {
    /// ROM to run (a .ch8 file); runs the built-in demo when left out
    rom: Option<PathBuf>,

    /// How long to run for
    #[clap(short, long, value_name = "SECONDS", default_value = "5", value_parser = parse_seconds)]
    seconds: Duration,

    /// Keypad keys (1234 QWER ASDF ZXCV) and controls (P 0 [ ] = < K J), one per refresh
    #[clap(short, long, default_value = "")]
    keys: String,
}

fn parse_seconds(arg: &str) -> Result<Duration, String> {
    let seconds: f64 = arg.parse().map_err(|_| format!("{:?} is not a number", arg))?;
    Duration::try_from_secs_f64(seconds).map_err(|_| format!("{:?} is not a run time", arg))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let program = match &args.rom {
        Some(rom) => {
            let program = Program::open(rom)?;
            log::info!("loaded {} ({} bytes)", rom.display(), program.len());
            program
        }
        None => {
            log::info!("no ROM given; running the demo");
            Program::demo()
        }
    };

    run::run(&program, args.seconds, &args.keys)
}
