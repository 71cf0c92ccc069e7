//! Top-level device: owns the CPU and bus and paces execution by frame.
//!
//! Mirrors the teacher's `app/emulator.rs::run_frame` cycle-accumulation
//! loop (CPU step, accumulate T-states, stop once a frame's worth has run),
//! minus the PPU/APU steps it also drove — this core has neither.

use log::info;

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::error::EmulatorError;

pub const CPU_FREQ_HZ: u32 = 4_194_304;

pub struct Device {
    cpu: Cpu,
    bus: Bus,
    cycles_per_frame: u32,
}

impl Device {
    /// `frame_rate` must be a power of two (spec.md's configuration
    /// constraint): the bus's boot-ROM overlay and interrupt timing are
    /// exact regardless, but a non-power-of-two would make the frame
    /// boundary an uneven fraction of a T-state, which no real display
    /// timing value is.
    pub fn new(cpu: Cpu, bus: Bus, frame_rate: u32) -> Result<Self, EmulatorError> {
        if frame_rate == 0 || !frame_rate.is_power_of_two() {
            return Err(EmulatorError::FrameRateNotPowerOfTwo(frame_rate));
        }
        let cycles_per_frame = CPU_FREQ_HZ / frame_rate;
        info!(
            "device initialized: frame_rate={} cycles_per_frame={}",
            frame_rate, cycles_per_frame
        );
        Ok(Self {
            cpu,
            bus,
            cycles_per_frame,
        })
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs CPU steps until at least one frame's worth of T-states has
    /// elapsed, returning the actual number of T-states consumed (usually
    /// slightly over `cycles_per_frame` since the last instruction in the
    /// frame isn't split).
    pub fn run_frame(&mut self) -> u32 {
        let mut cycles_this_frame: u32 = 0;
        while cycles_this_frame < self.cycles_per_frame {
            let executed = self.cpu.step(&mut self.bus);
            cycles_this_frame += executed as u32;
        }
        cycles_this_frame
    }
}
