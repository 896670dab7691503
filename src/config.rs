//! Command line and the optional tunables file.
//!
//! The TOML file only overrides what it names, e.g.
//!
//! ```toml
//! gravity = 120.0
//! new_spark_count = 24
//! color_set = "Standard RGB+CMY+W"
//! draw_flare = false
//! ```
//!
//! Values go through the clamping setters of [`Params`], so out-of-range numbers
//! are pulled into range rather than rejected.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::warn;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fader::FaderChoice;
use crate::params::Params;
use crate::pool::DEFAULT_MAX_SPARKS;

#[derive(Debug, Parser)]
#[command(name = "sparkfall", about = "Software-rendered fireworks with phosphor afterglow")]
pub struct Cli {
    /// Scene width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: usize,

    /// Scene height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: usize,

    /// Spark pool capacity
    #[arg(long, default_value_t = DEFAULT_MAX_SPARKS)]
    pub max_sparks: usize,

    /// Seed for a reproducible show
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fade algorithm (auto picks by CPU)
    #[arg(long, value_enum, default_value_t = FaderChoice::Auto)]
    pub fader: FaderChoice,

    /// TOML file with tunable overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// PNG glyph atlas for HUD text (built-in 5x7 font otherwise)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Glyph cell size of --font, as WxH
    #[arg(long, default_value = "9x16", value_parser = parse_cell)]
    pub font_cell: (usize, usize),

    /// Frame-rate cap for the window (0 = minifb default)
    #[arg(long, default_value_t = 0)]
    pub target_fps: usize,

    /// Start with the frame-time chart hidden
    #[arg(long)]
    pub no_chart: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if self.width < 3 || self.height < 3 {
            return Err(Error::Config(format!(
                "scene must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_sparks == 0 {
            return Err(Error::Config("max-sparks must be positive".into()));
        }
        Ok(())
    }

    /// Defaults, then the TOML file, then command-line switches.
    pub fn params(&self) -> Result<Params> {
        let mut params = Params::default();
        if let Some(path) = &self.config {
            Tunables::load(path)?.apply(&mut params);
        }
        if self.no_chart {
            params.draw_frame_chart = false;
        }
        Ok(params)
    }
}

fn parse_cell(s: &str) -> std::result::Result<(usize, usize), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w = w.trim().parse::<usize>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<usize>().map_err(|e| e.to_string())?;
    if w == 0 || h == 0 {
        return Err("cell size must be positive".into());
    }
    Ok((w, h))
}

/// Optional overrides read from the tunables file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tunables {
    pub main_launch_seconds: Option<f64>,
    pub burst_seconds: Option<f64>,
    pub burst_variance: Option<f64>,
    pub gravity: Option<f64>,
    pub new_spark_count: Option<u32>,
    pub stages: Option<u32>,
    pub vector_fade_step: Option<f64>,
    pub draw_flare: Option<bool>,
    pub draw_frame_chart: Option<bool>,
    pub color_set: Option<String>,
}

impl Tunables {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply(&self, params: &mut Params) {
        if let Some(v) = self.main_launch_seconds { params.main_launch_seconds.set(v); }
        if let Some(v) = self.burst_seconds { params.burst_seconds.set(v); }
        if let Some(v) = self.burst_variance { params.burst_variance.set(v); }
        if let Some(v) = self.gravity { params.gravity.set(v); }
        if let Some(v) = self.new_spark_count { params.new_spark_count.set(v); }
        if let Some(v) = self.stages { params.stages.set(v); }
        if let Some(v) = self.vector_fade_step { params.vector_fade_step.set(v); }
        if let Some(v) = self.draw_flare { params.draw_flare = v; }
        if let Some(v) = self.draw_frame_chart { params.draw_frame_chart = v; }
        if let Some(name) = &self.color_set {
            if !params.select_color_set(name) {
                warn!("unknown color set {name:?}, keeping {:?}", params.color_set().name);
            }
        }
    }
}
