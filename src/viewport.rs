/// Tracks the available size of the host surface and the change produced by
/// the most recent resize.
///
/// Deltas are `old - new`, so a positive delta means the surface shrank. The
/// fit pass uses them to keep a window visually anchored while the surface
/// is being resized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    width: i32,
    height: i32,
    width_delta: i32,
    height_delta: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            width_delta: 0,
            height_delta: 0,
        }
    }

    pub fn current(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width_delta(&self) -> i32 {
        self.width_delta
    }

    pub fn height_delta(&self) -> i32 {
        self.height_delta
    }

    /// Record a new surface size. Host dimensions are trusted as-is.
    pub fn on_resize(&mut self, width: i32, height: i32) {
        self.width_delta = self.width - width;
        self.height_delta = self.height - height;
        self.width = width;
        self.height = height;
    }
}
