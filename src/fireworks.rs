//! The per-frame renderer.
//!
//! [`Fireworks::render`] ages the persistent scene, moves the cursor, runs the
//! fixed sub-steps of the simulation, splats every live spark and finally copies
//! the scene into the presentation frame with the debug overlay on top. The scene
//! itself is never cleared; the fader is what makes trails go away.

use std::sync::Arc;

use crate::compositor;
use crate::decay::DecayTable;
use crate::draw::{GlyphAtlas, draw_cursor, draw_rect, draw_text_5x7};
use crate::fader::Fader;
use crate::input::PointerInput;
use crate::params::Params;
use crate::scene::{FrameBuffer, SceneBuffer};
use crate::sim::Simulation;
use crate::stats::FrameStats;

const TEXT_COLOR: u32 = 0x00FF_FFFF;
const CURSOR_COLOR: u32 = 0x00FF_FF00;
/// Cursor while the left button is held.
const CURSOR_PRESSED_COLOR: u32 = 0x00FF_8000;
const CHART_BACKDROP: u32 = 0x0020_2020;
const CHART_COLOR: u32 = 0x0000_FF00;
const CHART_REF_COLOR: u32 = 0x00FF_0000;
/// Frames kept for the average and the chart.
const STATS_FRAMES: usize = 120;
const CHART_HEIGHT: i32 = 50;

pub struct Fireworks {
    scene: SceneBuffer,
    fader: Fader,
    sim: Simulation,
    params: Params,
    stats: FrameStats,
    atlas: Option<GlyphAtlas>,
    pointer: PointerInput,
    cursor: (i32, i32),
}

impl Fireworks {
    pub fn new(
        width: usize,
        height: usize,
        max_sparks: usize,
        seed: Option<u64>,
        fader: Fader,
        params: Params,
    ) -> Self {
        let decay = Arc::new(DecayTable::new());
        Self {
            scene: SceneBuffer::new(width, height),
            fader,
            sim: Simulation::new(width, height, max_sparks, decay, seed),
            params,
            stats: FrameStats::new(STATS_FRAMES),
            atlas: None,
            pointer: PointerInput::new(),
            cursor: (width as i32 / 2, height as i32 / 2),
        }
    }

    /// HUD text uses this atlas instead of the built-in 5x7 font.
    pub fn with_atlas(mut self, atlas: GlyphAtlas) -> Self {
        self.atlas = Some(atlas);
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn scene(&self) -> &SceneBuffer {
        &self.scene
    }

    /// Where the window reports pointer motion.
    pub fn pointer(&self) -> &PointerInput {
        &self.pointer
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Produce one frame covering `seconds` of real time since the previous one.
    pub fn render(&mut self, frame: &mut FrameBuffer, seconds: f64) {
        let seconds = seconds.max(0.0);
        self.stats.record(seconds);

        self.fader
            .fade(&mut self.scene, seconds, self.params.vector_fade_step.get());

        let (dx, dy) = self.pointer.take_delta();
        let (w, h) = (self.scene.width as i32, self.scene.height as i32);
        self.cursor = (
            (self.cursor.0 + dx).clamp(0, w - 1),
            (self.cursor.1 + dy).clamp(0, h - 1),
        );

        self.sim.advance(seconds, &self.params);
        compositor::splat(self.sim.sparks(), &mut self.scene, self.params.draw_flare);

        frame.copy_from_scene(&self.scene);
        self.draw_overlay(frame);
    }

    fn draw_overlay(&self, frame: &mut FrameBuffer) {
        let hud = format!(
            "Particle count: {}, FPS (average): {:.1}",
            self.sim.spark_count(),
            self.stats.average_fps()
        );
        let h = frame.height as i32;
        self.text(frame, 10, 10, &hud);
        self.text(frame, 10, h - 20, "Press ESC to Exit.");

        if self.params.draw_frame_chart {
            let top = 10 + self.line_height() + 6;
            draw_rect(frame, 10, top, STATS_FRAMES as i32, CHART_HEIGHT + 1, CHART_BACKDROP);
            self.stats
                .draw_chart(frame, 10, top, CHART_HEIGHT, CHART_COLOR, CHART_REF_COLOR);
        }

        let color = if self.pointer.left() { CURSOR_PRESSED_COLOR } else { CURSOR_COLOR };
        draw_cursor(frame, self.cursor.0, self.cursor.1, color);
    }

    fn text(&self, frame: &mut FrameBuffer, x: i32, y: i32, text: &str) {
        match &self.atlas {
            Some(atlas) => atlas.draw_text(frame, x, y, text, TEXT_COLOR),
            None => draw_text_5x7(frame, x, y, text, TEXT_COLOR),
        }
    }

    fn line_height(&self) -> i32 {
        self.atlas.as_ref().map_or(7, |a| a.cell_size().1 as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fader::FaderChoice;
    use crate::simd::{CpuFeatures, SimdOps};
    use crate::spark::Spark;

    fn renderer(width: usize, height: usize) -> Fireworks {
        let fader = Fader::select(SimdOps::with_features(CpuFeatures::none()), FaderChoice::Fine);
        Fireworks::new(width, height, 1000, Some(7), fader, Params::default())
    }

    #[test]
    fn cursor_follows_pointer_and_stays_on_screen() {
        let mut fw = renderer(64, 48);
        let mut frame = FrameBuffer::new(64, 48);
        assert_eq!(fw.cursor(), (32, 24));
        fw.pointer().push_delta(5, -4);
        fw.render(&mut frame, 0.0);
        assert_eq!(fw.cursor(), (37, 20));
        fw.pointer().push_delta(1000, -1000);
        fw.render(&mut frame, 0.0);
        assert_eq!(fw.cursor(), (63, 0));
        // cursor tip is painted yellow
        assert_eq!(frame.pixels[63], CURSOR_COLOR);

        fw.pointer().set_left(true);
        fw.render(&mut frame, 0.0);
        assert_eq!(frame.pixels[63], CURSOR_PRESSED_COLOR);
    }

    #[test]
    fn chart_sits_on_a_backdrop() {
        let mut fw = renderer(200, 100);
        fw.simulation_mut().set_launch_countdown(10.0);
        let mut frame = FrameBuffer::new(200, 100);
        fw.render(&mut frame, 0.0);
        // box spans y = 23..=73 below the HUD line; a 0 ms bar only touches its base
        assert_eq!(frame.pixels[30 * 200 + 50], CHART_BACKDROP);
        assert_eq!(frame.pixels[73 * 200 + 10], CHART_COLOR);
        assert_eq!(frame.pixels[30 * 200 + 5], 0);

        fw.params_mut().draw_frame_chart = false;
        fw.render(&mut frame, 0.0);
        assert_eq!(frame.pixels[30 * 200 + 50], 0);
    }

    #[test]
    fn sparks_land_in_the_persistent_scene() {
        let mut fw = renderer(64, 48);
        fw.simulation_mut().set_launch_countdown(10.0);
        fw.params_mut().draw_flare = false;
        fw.spawn_still(40.0, 20.0, 0x0000_0040);
        let mut frame = FrameBuffer::new(64, 48);
        fw.render(&mut frame, 0.0);
        assert_eq!(fw.scene().get(40, 20), 0x0000_0040);
        assert_eq!(frame.pixels[20 * 64 + 40], 0x0000_0040);
        // accumulates while the spark sits still
        fw.render(&mut frame, 0.0);
        assert_eq!(fw.scene().get(40, 20), 0x0000_0080);
    }

    #[test]
    fn hud_text_is_drawn_top_left() {
        let mut fw = renderer(400, 100);
        fw.params_mut().draw_frame_chart = false;
        let mut frame = FrameBuffer::new(400, 100);
        fw.render(&mut frame, 1.0 / 60.0);
        // 'P' has a full-height left stroke
        assert_eq!(frame.pixels[10 * 400 + 10], TEXT_COLOR);
        assert_eq!(frame.pixels[16 * 400 + 10], TEXT_COLOR);
    }

    impl Fireworks {
        fn spawn_still(&mut self, x: f64, y: f64, color: u32) {
            let spark = Spark { x, y, time: 100.0, color, ..Spark::default() };
            assert!(self.sim.spawn(spark));
        }
    }
}
