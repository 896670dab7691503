// Pixel stores.
// SceneBuffer is the accumulated light (column-major, never cleared, only faded).
// FrameBuffer is what the window shows (row-major, 0x00RRGGBB for minifb).

use rayon::prelude::*;

pub struct SceneBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>, // index = x * height + y
}

impl SceneBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: u32) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }
}

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb, index = y * width + x
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Overwrite the whole frame with the scene (column-major -> row-major).
    pub fn copy_from_scene(&mut self, scene: &SceneBuffer) {
        debug_assert_eq!((self.width, self.height), (scene.width, scene.height));
        let height = scene.height;
        let src = &scene.pixels;
        self.pixels
            .par_chunks_mut(self.width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = src[x * height + y];
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_is_column_major() {
        let mut scene = SceneBuffer::new(3, 2);
        scene.set(2, 1, 7);
        assert_eq!(scene.pixels[2 * 2 + 1], 7);
        assert_eq!(scene.get(2, 1), 7);
    }

    #[test]
    fn copy_transposes_into_rows() {
        let mut scene = SceneBuffer::new(3, 2);
        for x in 0..3 {
            for y in 0..2 {
                scene.set(x, y, (10 * y + x) as u32);
            }
        }
        let mut frame = FrameBuffer::new(3, 2);
        frame.copy_from_scene(&scene);
        assert_eq!(frame.pixels, vec![0, 1, 2, 10, 11, 12]);
    }
}
