// Window + software overlay drawing.
// Overlay pieces provided here:
// 1) The window that shows the fireworks frame.
// 2) Lines, filled rectangles and an arrow cursor that follows the mouse.
// 3) A built-in 5x7 bitmap font, plus PNG glyph atlases for nicer HUD text.

use std::path::Path;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::{Error, Result};
use crate::input::PointerInput;
use crate::scene::FrameBuffer;

pub struct Drawer {
    window: Window,                 // the on-screen window you see
    last_mouse: Option<(f32, f32)>, // previous pointer position, for deltas
}

impl Drawer {
    /// Create a window sized to the scene. `target_fps` of 0 keeps minifb's own pacing.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        if target_fps > 0 {
            window.set_target_fps(target_fps);
        }
        Ok(Self {
            window,
            last_mouse: None,
        })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    // toggles flare glow
    pub fn f_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::F, KeyRepeat::No)
    }

    // cycles the colour set
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    // toggles the frame-time chart
    pub fn g_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::G, KeyRepeat::No)
    }

    /// Forward pointer motion since the last call, and the left button state.
    pub fn feed_pointer(&mut self, input: &PointerInput) {
        if let Some((x, y)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            if let Some((lx, ly)) = self.last_mouse {
                input.push_delta((x - lx).round() as i32, (y - ly).round() as i32);
            } else {
                // first sighting: jump the cursor straight to the pointer
                input.push_delta(x as i32, y as i32);
            }
            self.last_mouse = Some((x, y));
        }
        input.set_left(self.window.get_mouse_down(MouseButton::Left));
    }
}

/* ---------- Software drawing: pixels, lines, rectangles, cursor ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham. Both ends included.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Fill a w x h rectangle with its top-left at (x,y), clipped to the frame.
pub fn draw_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let x_start = x.max(0) as usize;
    let y_start = y.max(0) as usize;
    let x_end = (x + w).clamp(0, fb.width as i32) as usize;
    let y_end = (y + h).clamp(0, fb.height as i32) as usize;
    if x_start >= x_end {
        return;
    }
    for row in y_start..y_end {
        let ofs = row * fb.width;
        fb.pixels[ofs + x_start..ofs + x_end].fill(color);
    }
}

/// Arrow cursor with its tip at (x,y): down 20, across 10, back to the tip.
pub fn draw_cursor(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    draw_line(fb, x, y, x, y + 20, color);
    draw_line(fb, x, y + 20, x + 10, y + 20, color);
    draw_line(fb, x + 10, y + 20, x, y, color);
}

/* ---------- 5x7 bitmap font (digits, A-Z, HUD punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels
/// (bit 4 = leftmost). Lowercase letters use the uppercase shapes.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (shift, ink) in [(1, 0x0000_0000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + shift, y + ry as i32 + shift, ink);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

/* ---------- Glyph atlas (PNG font sheets) ---------- */

const INK: u32 = 0x00FF_FFFF;

/// Font sheet of fixed-size cells laid out left-to-right, top-to-bottom in ASCII
/// order. White pixels are ink; everything else is transparent.
pub struct GlyphAtlas {
    width: usize,
    height: usize,
    pixels: Vec<u32>, // row-major 0x00RRGGBB
    cell_w: usize,
    cell_h: usize,
}

impl GlyphAtlas {
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u32>, cell_w: usize, cell_h: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Atlas("empty glyph sheet".into()));
        }
        if cell_w == 0 || cell_h == 0 || width % cell_w != 0 || height % cell_h != 0 {
            return Err(Error::Atlas(format!(
                "{width}x{height} sheet is not a grid of {cell_w}x{cell_h} cells"
            )));
        }
        if pixels.len() != width * height {
            return Err(Error::Atlas(format!(
                "expected {} pixels, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels, cell_w, cell_h })
    }

    /// Decode a PNG (or any format `image` reads) into an atlas.
    pub fn load(path: &Path, cell_w: usize, cell_h: usize) -> Result<Self> {
        let img = image::open(path)?.to_rgb8();
        let (w, h) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
            .collect();
        Self::from_pixels(w as usize, h as usize, pixels, cell_w, cell_h)
    }

    pub fn cell_size(&self) -> (usize, usize) {
        (self.cell_w, self.cell_h)
    }

    /// Draw `text` with its top-left at (x,y); '\n' starts a new line.
    pub fn draw_text(&self, fb: &mut FrameBuffer, x: i32, y: i32, text: &str, color: u32) {
        let per_row = self.width / self.cell_w;
        let rows = self.height / self.cell_h;
        let (mut pen_x, mut pen_y) = (x, y);
        for byte in text.bytes() {
            if byte == b'\n' || byte == b'\r' {
                pen_x = x;
                pen_y += self.cell_h as i32;
                continue;
            }
            let (row, col) = (byte as usize / per_row, byte as usize % per_row);
            if row < rows {
                let (sx, sy) = (col * self.cell_w, row * self.cell_h);
                for gy in 0..self.cell_h {
                    let ofs = (sy + gy) * self.width + sx;
                    for gx in 0..self.cell_w {
                        if self.pixels[ofs + gx] == INK {
                            put_pixel(fb, pen_x + gx as i32, pen_y + gy as i32, color);
                        }
                    }
                }
            }
            pen_x += self.cell_w as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_covers_both_ends() {
        let mut fb = FrameBuffer::new(8, 8);
        draw_line(&mut fb, 1, 1, 5, 3, 9);
        assert_eq!(fb.pixels[8 + 1], 9);
        assert_eq!(fb.pixels[3 * 8 + 5], 9);
        assert_eq!(fb.pixels.iter().filter(|&&p| p == 9).count(), 5);
    }

    #[test]
    fn rect_is_clipped() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_rect(&mut fb, -1, 2, 3, 5, 1);
        assert_eq!(fb.pixels, vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn text_5x7_draws_known_glyphs_only() {
        let mut fb = FrameBuffer::new(40, 10);
        draw_text_5x7(&mut fb, 0, 0, "~", 0x00FF_FFFF);
        assert!(fb.pixels.iter().all(|&p| p == 0));
        draw_text_5x7(&mut fb, 0, 0, "Esc", 0x00FF_FFFF);
        // top row of 'E' is solid
        assert!(fb.pixels[..5].iter().all(|&p| p == 0x00FF_FFFF));
    }

    #[test]
    fn atlas_rejects_ragged_cells() {
        assert!(GlyphAtlas::from_pixels(10, 16, vec![0; 160], 3, 16).is_err());
        assert!(GlyphAtlas::from_pixels(9, 16, vec![0; 10], 9, 16).is_err());
    }

    #[test]
    fn atlas_rejects_empty_sheet() {
        assert!(matches!(GlyphAtlas::from_pixels(0, 0, Vec::new(), 9, 16), Err(Error::Atlas(_))));
        assert!(matches!(GlyphAtlas::from_pixels(0, 16, Vec::new(), 9, 16), Err(Error::Atlas(_))));
    }

    #[test]
    fn atlas_indexes_by_ascii() {
        // 16 cells per row of 2x1 pixels; 'A' (65) is row 4, column 1
        let (w, h) = (32, 8);
        let mut pixels = vec![0u32; w * h];
        pixels[4 * w + 2] = INK; // left pixel of cell (1, 4)
        let atlas = GlyphAtlas::from_pixels(w, h, pixels, 2, 1).unwrap();

        let mut fb = FrameBuffer::new(10, 3);
        atlas.draw_text(&mut fb, 1, 0, "AB\nA", 7);
        assert_eq!(fb.pixels[1], 7);
        assert_eq!(fb.pixels[2], 0);
        assert_eq!(fb.pixels[3], 0); // 'B' has no ink
        assert_eq!(fb.pixels[10 + 1], 7); // second line
    }
}
