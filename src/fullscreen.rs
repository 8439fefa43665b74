//! Host fullscreen capability.

use crate::window::WindowId;

/// The host's fullscreen mechanism. All calls are best effort.
///
/// A manager built without one treats fullscreen requests as `restore` and
/// marks every window with the `no-full` class.
pub trait FullscreenSurface {
    /// Ask the host to present `window` fullscreen.
    fn request(&mut self, window: WindowId);
    /// Leave fullscreen, whoever holds it.
    fn exit(&mut self);
    /// Whether anything is currently fullscreen, including content the
    /// manager did not put there.
    fn is_active(&self) -> bool;
}

/// A surface that takes effect immediately and remembers the presented
/// window. The terminal host renders this window across the whole screen.
#[derive(Debug, Default, Clone)]
pub struct InPageFullscreen {
    presented: Option<WindowId>,
}

impl InPageFullscreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> Option<WindowId> {
        self.presented
    }
}

impl FullscreenSurface for InPageFullscreen {
    fn request(&mut self, window: WindowId) {
        self.presented = Some(window);
    }

    fn exit(&mut self) {
        self.presented = None;
    }

    fn is_active(&self) -> bool {
        self.presented.is_some()
    }
}
