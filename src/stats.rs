// Frame-time history: average FPS for the HUD and a small bar chart overlay.

use std::collections::VecDeque;

use crate::draw::draw_line;
use crate::scene::FrameBuffer;

pub struct FrameStats {
    frame_times: VecDeque<f64>,
    capacity: usize,
}

impl FrameStats {
    /// Keep the last `capacity` frame times.
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, seconds: f64) {
        if self.frame_times.len() == self.capacity {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(seconds);
    }

    pub fn average_frame_time(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
    }

    pub fn average_fps(&self) -> f64 {
        let avg = self.average_frame_time();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// One vertical bar per frame, 1 pixel per millisecond, bottom at `y0 + height`.
    /// A frame at 60 Hz reaches the reference tick drawn in `ref_color`.
    pub fn draw_chart(&self, fb: &mut FrameBuffer, x0: i32, y0: i32, height: i32, color: u32, ref_color: u32) {
        let base = y0 + height;
        for (i, t) in self.frame_times.iter().enumerate() {
            let ms = ((t * 1000.0).round() as i32).clamp(0, height);
            let x = x0 + i as i32;
            draw_line(fb, x, base, x, base - ms, color);
        }
        let sixty = base - (1000.0f64 / 60.0).round() as i32;
        draw_line(fb, x0, sixty, x0 + self.capacity as i32, sixty, ref_color);
    }
}
