// What you SEE:
// • Rockets rise from the bottom edge and burst into rings of sparks, up to three times.
// • One rocket in five is a flare that drifts up shedding short-lived sparkles.
// • Everything leaves a glowing trail that fades to black.
// • F toggles the flare glow, C cycles the colour set, G toggles the frame chart. ESC quits.

use std::time::{Duration, Instant};

use clap::Parser;
use log::{LevelFilter, info};

use sparkfall::config::Cli;
use sparkfall::draw::{Drawer, GlyphAtlas};
use sparkfall::fader::Fader;
use sparkfall::scene::FrameBuffer;
use sparkfall::simd::SimdOps;
use sparkfall::{Error, Fireworks};

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    /* --- Logging ---
       RUST_LOG wins; otherwise info, raised by -v. */
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    cli.validate()?;
    let params = cli.params()?;
    let (w, h) = (cli.width, cli.height);

    /* --- Engine setup ---
       Visual: black scene, first rocket within a quarter second. */
    let simd = SimdOps::new();
    info!("cpu features: {:?}", simd.features());
    info!("scene {w}x{h}, pool of {} sparks, {}", cli.max_sparks, params.color_set());
    let fader = Fader::select(simd, cli.fader);
    let mut fireworks = Fireworks::new(w, h, cli.max_sparks, cli.seed, fader, params);
    if let Some(path) = &cli.font {
        let (cw, ch) = cli.font_cell;
        fireworks = fireworks.with_atlas(GlyphAtlas::load(path, cw, ch)?);
        info!("HUD font {}", path.display());
    }

    let mut drawer = Drawer::new("Sparkfall", w, h, cli.target_fps)?;
    let mut screen = FrameBuffer::new(w, h);

    let mut last_log_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f64();
        last_frame_time = now;

        /* 1) Inputs */
        drawer.feed_pointer(fireworks.pointer());
        let params = fireworks.params_mut();
        if drawer.f_pressed_once() {
            params.draw_flare = !params.draw_flare;
            info!("flare glow {}", if params.draw_flare { "on" } else { "off" });
        }
        if drawer.c_pressed_once() {
            let name = params.cycle_color_set();
            info!("color set: {name}");
        }
        if drawer.g_pressed_once() {
            params.draw_frame_chart = !params.draw_frame_chart;
        }

        /* 2) Fade, simulate, splat, overlay */
        fireworks.render(&mut screen, dt);

        /* 3) Present */
        drawer.present(&screen)?;

        /* 4) Once a second: FPS and particle count to the log */
        frames_this_second += 1;
        let since = now.duration_since(last_log_time);
        if since >= Duration::from_secs(1) {
            let fps = frames_this_second as f64 / since.as_secs_f64();
            let sim = fireworks.simulation();
            info!(
                "FPS: {fps:.1}, particles: {}, launches: {}",
                sim.spark_count(),
                sim.launch_count()
            );
            frames_this_second = 0;
            last_log_time = now;
        }
    }

    Ok(())
}
