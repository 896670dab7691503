//! Afterglow: the whole scene decays toward black at a real-time rate.
//!
//! Two interchangeable strategies, picked once at startup:
//!
//! - [`FineFader`] keeps a time debt and subtracts whole intensity units from every
//!   byte with a wide saturating subtract. One unit per `vector_fade_step` seconds
//!   (1/480 s by default), so the rate holds at any display frequency.
//! - [`CoarseFader`] runs at most once per 1/60 s and maps every pixel through a
//!   256^3 table that knocks 8 off each channel.
//!
//! Both lose about 480 units per second.

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::clock::INTERVAL;
use crate::color::{decode, encode};
use crate::scene::SceneBuffer;
use crate::simd::SimdOps;

/// Which strategy to run; `Auto` asks the CPU probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FaderChoice {
    #[default]
    Auto,
    Fine,
    Coarse,
}

pub enum Fader {
    Fine(FineFader),
    Coarse(CoarseFader),
}

impl Fader {
    /// Resolve `choice` against the probe result. Deterministic for a given machine.
    pub fn select(simd: SimdOps, choice: FaderChoice) -> Self {
        let fine = match choice {
            FaderChoice::Auto => simd.features().has_wide_lanes(),
            FaderChoice::Fine => true,
            FaderChoice::Coarse => false,
        };
        if fine {
            info!("fade path: fine ({:?})", simd.features());
            Fader::Fine(FineFader::new(simd))
        } else {
            info!("fade path: coarse lookup table");
            Fader::Coarse(CoarseFader::new())
        }
    }

    /// Age the scene by `elapsed` seconds. `fine_step` only matters on the fine path.
    pub fn fade(&mut self, scene: &mut SceneBuffer, elapsed: f64, fine_step: f64) {
        match self {
            Fader::Fine(f) => {
                f.fade(&mut scene.pixels, elapsed, fine_step);
            }
            Fader::Coarse(c) => {
                c.fade(&mut scene.pixels, elapsed);
            }
        }
    }

    pub fn is_fine(&self) -> bool {
        matches!(self, Fader::Fine(_))
    }
}

pub struct FineFader {
    simd: SimdOps,
    /// Seconds of fading owed (negative) or pre-paid (positive).
    fade_debt: f64,
}

impl FineFader {
    pub fn new(simd: SimdOps) -> Self {
        Self { simd, fade_debt: 0.0 }
    }

    /// Returns the number of intensity units removed this call.
    pub fn fade(&mut self, pixels: &mut [u32], elapsed: f64, step: f64) -> u32 {
        self.fade_debt -= elapsed;
        let mut units = 0u32;
        while self.fade_debt + step <= 0.0 {
            self.fade_debt += step;
            units += 1;
        }
        if units == 0 {
            return 0;
        }
        let value = units.min(255) as u8;
        self.simd
            .subtract_saturating(bytemuck::cast_slice_mut(pixels), value);
        units
    }
}

pub struct CoarseFader {
    table: Vec<u32>,
    fade_time: f64,
}

/// Channel drop per coarse step.
const COARSE_STEP: u32 = 8;

impl CoarseFader {
    pub fn new() -> Self {
        let started = Instant::now();
        let table: Vec<u32> = (0..1u32 << 24)
            .into_par_iter()
            .map(|rgb| {
                let (r, g, b) = decode(rgb);
                encode(
                    r.saturating_sub(COARSE_STEP),
                    g.saturating_sub(COARSE_STEP),
                    b.saturating_sub(COARSE_STEP),
                )
            })
            .collect();
        debug!("coarse fade table built in {:?}", started.elapsed());
        Self { table, fade_time: 0.0 }
    }

    #[inline]
    pub fn lookup(&self, color: u32) -> u32 {
        self.table[(color & 0x00FF_FFFF) as usize]
    }

    /// Returns true when a fade step ran.
    pub fn fade(&mut self, pixels: &mut [u32], elapsed: f64) -> bool {
        self.fade_time -= elapsed;
        if self.fade_time > 0.0 {
            return false;
        }
        self.fade_time += INTERVAL;
        let table = &self.table;
        pixels
            .par_iter_mut()
            .for_each(|p| *p = table[(*p & 0x00FF_FFFF) as usize]);
        true
    }
}

impl Default for CoarseFader {
    fn default() -> Self {
        Self::new()
    }
}
