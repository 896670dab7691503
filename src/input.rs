// Pointer state shared between the window side and the renderer.
// The window adds motion as it sees it; the renderer takes it once per frame.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

#[derive(Debug, Default)]
pub struct PointerInput {
    dx: AtomicI32,
    dy: AtomicI32,
    left: AtomicBool,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate motion until the next `take_delta`.
    pub fn push_delta(&self, dx: i32, dy: i32) {
        self.dx.fetch_add(dx, Ordering::AcqRel);
        self.dy.fetch_add(dy, Ordering::AcqRel);
    }

    /// Exchange-and-reset: motion since the last call, counted exactly once.
    pub fn take_delta(&self) -> (i32, i32) {
        (self.dx.swap(0, Ordering::AcqRel), self.dy.swap(0, Ordering::AcqRel))
    }

    pub fn set_left(&self, down: bool) {
        self.left.store(down, Ordering::Release);
    }

    pub fn left(&self) -> bool {
        self.left.load(Ordering::Acquire)
    }
}
