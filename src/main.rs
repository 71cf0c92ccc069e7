use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};

use boba::boot_rom::BootRom;
use boba::bus::Bus;
use boba::cartridge::Cartridge;
use boba::cpu::Cpu;
use boba::device::Device;
use boba::error::EmulatorError;

/// Headless DMG CPU/bus core runner.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a 256-byte DMG boot ROM image.
    boot_rom: PathBuf,

    /// Path to the cartridge ROM image to run.
    cartridge_rom: PathBuf,

    /// Frames to emulate per second of wall-clock time. Must be a power of two.
    #[arg(long, default_value_t = 64)]
    frame_rate: u32,

    /// Number of frames to run before exiting. Runs forever if unset.
    #[arg(long)]
    frames: Option<u64>,
}

fn run(args: Args) -> Result<(), EmulatorError> {
    let boot_rom_bytes = fs::read(&args.boot_rom).map_err(|source| EmulatorError::Io {
        path: args.boot_rom.display().to_string(),
        source,
    })?;
    let boot_rom = BootRom::from_bytes(&boot_rom_bytes)?;

    let cartridge_bytes = fs::read(&args.cartridge_rom).map_err(|source| EmulatorError::Io {
        path: args.cartridge_rom.display().to_string(),
        source,
    })?;
    let cartridge = Cartridge::from_bytes(&cartridge_bytes)?;
    info!(
        "loaded cartridge \"{}\" ({} bytes)",
        cartridge.header().title,
        cartridge_bytes.len()
    );

    let bus = Bus::new(boot_rom, cartridge);
    let cpu = Cpu::new();
    let mut device = Device::new(cpu, bus, args.frame_rate)?;

    let frame_duration = Duration::from_nanos(1_000_000_000u64 / args.frame_rate as u64);
    let mut frames_run: u64 = 0;
    loop {
        if let Some(limit) = args.frames {
            if frames_run >= limit {
                break;
            }
        }

        let frame_start = Instant::now();
        device.run_frame();
        frames_run += 1;

        if let Some(remaining) = frame_duration.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    info!(
        "ran {} frame(s), {} total CPU cycles",
        frames_run,
        device.cpu().total_cycles()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
