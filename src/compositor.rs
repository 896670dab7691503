// Splat: add every live spark's light into the scene, in parallel across sparks.
//
// Workers share the pixel buffer without locks. Each pixel is an AtomicU32 touched
// with a Relaxed load and a Relaxed store, so two sparks landing on the same pixel
// in the same instant may lose one contribution, but every stored value is a whole,
// well-formed colour.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::color::saturating_add;
use crate::scene::SceneBuffer;
use crate::spark::Spark;

/// Sparks per rayon task; small enough to balance, large enough to amortize.
const SPLAT_CHUNK: usize = 4096;

/// Glow offsets as (dx, dy): left, top, bottom, right.
pub const FLARE_OFFSETS: [(i64, i64); 4] = [(-1, 0), (0, 1), (0, -1), (1, 0)];

fn atomic_view(pixels: &mut [u32]) -> &[AtomicU32] {
    // SAFETY: AtomicU32 has the same size and alignment as u32, and the exclusive
    // borrow guarantees no non-atomic access happens while the view is alive.
    unsafe { std::slice::from_raw_parts(pixels.as_mut_ptr().cast::<AtomicU32>(), pixels.len()) }
}

#[inline]
fn blend(pixel: &AtomicU32, color: u32) {
    let old = pixel.load(Ordering::Relaxed);
    pixel.store(saturating_add(old, color), Ordering::Relaxed);
}

/// Add each spark's colour at its pixel and, with `draw_flare`, its flare colour
/// on the four neighbours. Sparks within one pixel of any edge are skipped.
pub fn splat(sparks: &[Spark], scene: &mut SceneBuffer, draw_flare: bool) {
    let (width, height) = (scene.width as i64, scene.height as i64);
    let offsets = FLARE_OFFSETS.map(|(dx, dy)| dx * height + dy);
    let pixels = atomic_view(&mut scene.pixels);

    sparks.par_chunks(SPLAT_CHUNK).for_each(|chunk| {
        for spark in chunk {
            let (tx, ty) = spark.pixel();
            if tx < 1 || tx > width - 2 || ty < 1 || ty > height - 2 {
                continue;
            }
            let pos = tx * height + ty;
            blend(&pixels[pos as usize], spark.color);
            if draw_flare {
                for off in offsets {
                    blend(&pixels[(pos + off) as usize], spark.flare_color);
                }
            }
        }
    });
}
