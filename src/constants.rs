//! Shared crate-wide constants.

/// Minimum window width used when the configuration does not provide one.
pub const DEFAULT_MIN_WIDTH: i32 = 150;

/// Chrome (title bar) height used when the configuration does not provide one.
/// Doubles as the default minimum height and the height of a docked window.
pub const DEFAULT_HEADER_HEIGHT: i32 = 35;

/// Widest slot a minimized window may occupy in the dock.
pub const DOCK_SLOT_MAX_WIDTH: f64 = 250.0;

/// Starting value of the z-index counter. The first focused window gets
/// `BASE_Z_INDEX + 1`.
pub const BASE_Z_INDEX: i32 = 10;

/// Two activations of the drag handle closer together than this toggle
/// maximize instead of starting a drag.
pub const DOUBLE_ACTIVATION_MS: u64 = 300;

/// Amount of an `overflow` window that must stay inside the viewport
/// horizontally so the user can grab it again.
///
/// Units: pixels.
pub const OVERFLOW_GRAB_MARGIN: i32 = 30;

/// Default inset used by the fit pass when it has to pull a window back
/// into view.
///
/// Units: pixels, per axis.
pub const DEFAULT_FIT_OFFSET: (i32, i32) = (20, 20);
