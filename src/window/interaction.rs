use std::time::Instant;

use crate::constants::OVERFLOW_GRAB_MARGIN;
use crate::viewport::Viewport;

use super::view::class;
use super::{Window, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::Top,
        ResizeEdge::Bottom,
        ResizeEdge::Left,
        ResizeEdge::Right,
        ResizeEdge::TopLeft,
        ResizeEdge::TopRight,
        ResizeEdge::BottomRight,
        ResizeEdge::BottomLeft,
    ];

    /// Parse a compass direction (`n`, `se`, ...).
    pub fn from_dir(dir: &str) -> Option<Self> {
        let edge = match dir {
            "n" => ResizeEdge::Top,
            "s" => ResizeEdge::Bottom,
            "w" => ResizeEdge::Left,
            "e" => ResizeEdge::Right,
            "nw" => ResizeEdge::TopLeft,
            "ne" => ResizeEdge::TopRight,
            "sw" => ResizeEdge::BottomLeft,
            "se" => ResizeEdge::BottomRight,
            _ => return None,
        };
        Some(edge)
    }

    pub fn dir(self) -> &'static str {
        match self {
            ResizeEdge::Top => "n",
            ResizeEdge::Bottom => "s",
            ResizeEdge::Left => "w",
            ResizeEdge::Right => "e",
            ResizeEdge::TopLeft => "nw",
            ResizeEdge::TopRight => "ne",
            ResizeEdge::BottomLeft => "sw",
            ResizeEdge::BottomRight => "se",
        }
    }

    fn grows_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    fn grows_down(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }
}

/// The chrome element a pointer session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Drag,
    Resize(ResizeEdge),
}

/// A pointer position in page pixels. Input modality is not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSample {
    pub x: i32,
    pub y: i32,
}

impl PointerSample {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Touch input only follows the first contact.
    pub fn from_touches(touches: &[PointerSample]) -> Option<Self> {
        touches.first().copied()
    }
}

/// When geometry produced by pointer samples reaches the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Every sample commits.
    Immediate,
    /// Samples mark a pending commit that the next `frame_tick` applies.
    #[default]
    Batched,
}

/// What a pointer press on a window handle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDown {
    /// A session is now active.
    Started,
    /// The window was minimized and got restored instead.
    Restored,
    /// Second activation of the drag handle toggled maximize.
    ToggledMaximize,
    /// Nothing to interact with (a resize handle on a docked window).
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct InteractionSession {
    pub window: WindowId,
    pub handle: Handle,
    pub anchor: PointerSample,
    pub pending_resize: bool,
    pub pending_move: bool,
}

impl InteractionSession {
    pub(crate) fn new(window: WindowId, handle: Handle, origin: PointerSample) -> Self {
        Self {
            window,
            handle,
            anchor: origin,
            pending_resize: false,
            pending_move: false,
        }
    }

    /// Only axes that produced a change move the anchor, so a clamped axis
    /// keeps accumulating pointer travel.
    pub(crate) fn advance(&mut self, point: PointerSample, outcome: DeltaOutcome) {
        if outcome.advance_x {
            self.anchor.x = point.x;
        }
        if outcome.advance_y {
            self.anchor.y = point.y;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DeltaOutcome {
    pub resized: bool,
    pub moved: bool,
    pub advance_x: bool,
    pub advance_y: bool,
}

/// Tracks double activations of a window's drag handle.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActivationTimer {
    last: Option<Instant>,
}

impl ActivationTimer {
    /// Record an activation at `now`; returns the elapsed time since the
    /// previous one in milliseconds.
    pub(crate) fn activate(&mut self, now: Instant) -> Option<u128> {
        let elapsed = self
            .last
            .map(|last| now.saturating_duration_since(last).as_millis());
        self.last = Some(now);
        elapsed
    }
}

/// Apply the pointer travel since `anchor` to the window's stored geometry.
///
/// Nothing is painted here. The caller commits whatever the outcome reports
/// as changed.
pub(crate) fn apply_pointer_delta(
    window: &mut Window,
    vp: &Viewport,
    handle: Handle,
    anchor: PointerSample,
    point: PointerSample,
) -> DeltaOutcome {
    let dx = point.x - anchor.x;
    let dy = point.y - anchor.y;
    let (root_w, root_h) = vp.current();
    let limits = window.constraints();
    let margins = window.margins();

    let (old_x, old_y, old_w, old_h) = (window.x, window.y, window.width, window.height);
    let mut resize_w = false;
    let mut resize_h = false;
    let mut move_x = false;
    let mut move_y = false;

    match handle {
        Handle::Drag => {
            if window.has_class(class::NO_MOVE) {
                return DeltaOutcome::default();
            }
            window.x += dx;
            window.y += dy;
            move_x = true;
            move_y = true;
        }
        Handle::Resize(edge) => {
            if edge.grows_right() {
                window.width += dx;
                resize_w = true;
            } else if edge.moves_left() {
                window.x += dx;
                window.width -= dx;
                resize_w = true;
                move_x = true;
            }
            if edge.grows_down() {
                window.height += dy;
                resize_h = true;
            } else if edge.moves_top() {
                window.y += dy;
                window.height -= dy;
                resize_h = true;
                move_y = true;
            }
        }
    }

    if resize_w {
        window.width = window
            .width
            .min(limits.maxwidth)
            .min(root_w - window.x - margins.right)
            .max(limits.minwidth);
        resize_w = window.width != old_w;
    }

    if resize_h {
        window.height = window
            .height
            .min(limits.maxheight)
            .min(root_h - window.y - margins.bottom)
            .max(limits.minheight);
        resize_h = window.height != old_h;
    }

    if move_x {
        if window.max {
            let third = f64::from(root_w) / 3.0;
            let px = f64::from(point.x);
            let torn = if px < third {
                margins.left
            } else if px > third * 2.0 {
                root_w - window.width - margins.right
            } else {
                (f64::from(root_w) / 2.0 - f64::from(window.width) / 2.0) as i32
            };
            window.x = torn + dx;
        }
        let (lo, hi) = if window.overflow() {
            (OVERFLOW_GRAB_MARGIN - window.width, root_w - OVERFLOW_GRAB_MARGIN)
        } else {
            (margins.left, root_w - window.width - margins.right)
        };
        window.x = window.x.min(hi).max(lo);
        move_x = window.x != old_x;
    }

    if move_y {
        if window.max {
            window.y = margins.top + dy;
        }
        let hi = if window.overflow() {
            root_h - window.header()
        } else {
            root_h - window.height - margins.bottom
        };
        window.y = window.y.min(hi).max(margins.top);
        move_y = window.y != old_y;
    }

    DeltaOutcome {
        resized: resize_w || resize_h,
        moved: move_x || move_y,
        advance_x: resize_w || move_x,
        advance_y: resize_h || move_y,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::window::config::{Length, WindowConfig};

    fn window(vp: &Viewport, config: WindowConfig) -> Window {
        Window::new(WindowId::new(1), "winbox-1".into(), config, vp, true).0
    }

    fn at(x: i32, y: i32) -> PointerSample {
        PointerSample::new(x, y)
    }

    #[test]
    fn parses_compass_directions() {
        for edge in ResizeEdge::ALL {
            assert_eq!(ResizeEdge::from_dir(edge.dir()), Some(edge));
        }
        assert_eq!(ResizeEdge::from_dir("drag"), None);
    }

    #[test]
    fn drag_moves_and_clamps_to_viewport() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(&vp, WindowConfig::default());
        let out = apply_pointer_delta(&mut win, &vp, Handle::Drag, at(10, 10), at(110, 60));
        assert!(out.moved && !out.resized);
        assert_eq!((win.x, win.y), (100, 50));

        let out = apply_pointer_delta(&mut win, &vp, Handle::Drag, at(0, 0), at(2000, 2000));
        assert!(out.moved);
        assert_eq!((win.x, win.y), (500, 400));
    }

    #[test]
    fn drag_is_ignored_with_no_move() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(
            &vp,
            WindowConfig {
                no_move: true,
                ..WindowConfig::default()
            },
        );
        let out = apply_pointer_delta(&mut win, &vp, Handle::Drag, at(0, 0), at(50, 50));
        assert_eq!(out, DeltaOutcome::default());
        assert_eq!((win.x, win.y), (0, 0));
    }

    #[test]
    fn east_edge_grows_width_up_to_the_viewport() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(&vp, WindowConfig::default());
        let edge = Handle::Resize(ResizeEdge::Right);
        apply_pointer_delta(&mut win, &vp, edge, at(500, 10), at(620, 90));
        assert_eq!((win.width, win.height), (620, 400));
        apply_pointer_delta(&mut win, &vp, edge, at(0, 0), at(900, 0));
        assert_eq!(win.width, 1000);
    }

    #[test]
    fn west_edge_moves_with_the_pointer_past_the_minimum() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(
            &vp,
            WindowConfig {
                x: Some(Length::Px(200.0)),
                width: Some(Length::Px(300.0)),
                ..WindowConfig::default()
            },
        );
        let edge = Handle::Resize(ResizeEdge::Left);
        let out = apply_pointer_delta(&mut win, &vp, edge, at(200, 0), at(400, 0));
        assert!(out.resized && out.moved);
        assert_eq!((win.x, win.width), (400, 150));
    }

    #[test]
    fn north_west_adjusts_all_four() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(
            &vp,
            WindowConfig {
                x: Some(Length::Px(100.0)),
                y: Some(Length::Px(100.0)),
                ..WindowConfig::default()
            },
        );
        let edge = Handle::Resize(ResizeEdge::TopLeft);
        apply_pointer_delta(&mut win, &vp, edge, at(100, 100), at(80, 70));
        assert_eq!((win.x, win.y, win.width, win.height), (80, 70, 520, 430));
    }

    #[test]
    fn north_edge_clamps_height_without_moving_back() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(
            &vp,
            WindowConfig {
                y: Some(Length::Px(100.0)),
                height: Some(Length::Px(100.0)),
                ..WindowConfig::default()
            },
        );
        let edge = Handle::Resize(ResizeEdge::Top);
        apply_pointer_delta(&mut win, &vp, edge, at(0, 100), at(0, 180));
        assert_eq!((win.y, win.height), (180, 35));
    }

    #[test]
    fn overflow_allows_partial_off_screen_placement() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(
            &vp,
            WindowConfig {
                overflow: true,
                ..WindowConfig::default()
            },
        );
        apply_pointer_delta(&mut win, &vp, Handle::Drag, at(0, 0), at(-2000, 2000));
        assert_eq!(win.x, 30 - 500);
        assert_eq!(win.y, 800 - 35);
    }

    #[test]
    fn maximized_drag_tears_off_by_pointer_third() {
        let vp = Viewport::new(900, 800);
        let mut win = window(&vp, WindowConfig::default());
        win.max = true;
        apply_pointer_delta(&mut win, &vp, Handle::Drag, at(800, 10), at(805, 20));
        assert_eq!(win.x, 900 - 450);
        assert_eq!(win.y, 10);

        let mut win = window(&vp, WindowConfig::default());
        win.max = true;
        apply_pointer_delta(&mut win, &vp, Handle::Drag, at(450, 10), at(455, 10));
        assert_eq!(win.x, 225 + 5);
    }

    #[test]
    fn clamped_axis_keeps_anchor() {
        let vp = Viewport::new(1000, 800);
        let mut win = window(&vp, WindowConfig::default());
        let mut session = InteractionSession::new(win.id(), Handle::Drag, at(0, 0));
        let out = apply_pointer_delta(&mut win, &vp, Handle::Drag, session.anchor, at(-40, 30));
        session.advance(at(-40, 30), out);
        assert_eq!(session.anchor, at(0, 30));
    }

    #[test]
    fn activation_timer_reports_elapsed_time() {
        let mut timer = ActivationTimer::default();
        let start = Instant::now();
        assert_eq!(timer.activate(start), None);
        assert_eq!(timer.activate(start + Duration::from_millis(120)), Some(120));
    }
}
