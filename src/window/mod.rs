pub mod callbacks;
pub mod config;
pub mod controls;
pub mod decorator;
pub mod interaction;
pub mod view;

mod window_manager;

use std::fmt;

use crate::constants::{DEFAULT_HEADER_HEIGHT, DEFAULT_MIN_WIDTH};
use crate::viewport::Viewport;

use callbacks::{Callbacks, Hook};
use controls::{Control, ControlSet, ControlSlot};
use config::{Content, Length, MountHandle, SizeLimits, WindowConfig, resolve_or};
use view::{Chrome, ChromePart, class};

pub use window_manager::{CloseOutcome, DockGroup, ManagerOptions, WindowManager, WmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Signed rectangle in page pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FloatRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Viewport insets a window keeps clear of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Resolved size limits in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub minwidth: i32,
    pub minheight: i32,
    pub maxwidth: i32,
    pub maxheight: i32,
}

/// Mode requests from the configuration that the manager applies after
/// the window is registered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub index: Option<i32>,
    pub min: bool,
    pub max: bool,
    pub hidden: bool,
}

/// One open window.
///
/// `x`, `y`, `width` and `height` hold the restorable geometry. Maximize and
/// the dock paint a different frame without touching them, so leaving either
/// mode only has to apply the stored values again.
#[derive(Debug)]
pub struct Window {
    id: WindowId,
    dom_id: String,
    title: String,
    index: i32,

    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
    constraints: Constraints,
    limits: SizeLimits,
    margins: Margins,
    header: i32,
    overflow: bool,

    pub(crate) min: bool,
    pub(crate) max: bool,
    pub(crate) full: bool,
    pub(crate) hidden: bool,
    pub(crate) focused: bool,
    pub(crate) resize_control: bool,

    frame: FloatRect,
    content: Option<Content>,
    chrome: Chrome,
    controls: ControlSet,
    pub(crate) callbacks: Callbacks,
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        dom_id: String,
        config: WindowConfig,
        vp: &Viewport,
        fullscreen_capable: bool,
    ) -> (Self, Placement) {
        let (vw, vh) = vp.current();

        let margins = Margins {
            top: resolve_or(config.top, vh, 0, 0),
            right: resolve_or(config.right, vw, 0, 0),
            bottom: resolve_or(config.bottom, vh, 0, 0),
            left: resolve_or(config.left, vw, 0, 0),
        };
        let header = config
            .header
            .filter(|&h| h > 0)
            .unwrap_or(DEFAULT_HEADER_HEIGHT);
        let constraints = resolve_constraints(&config.limits, vw, vh, header);

        let (width, height) = if config.autosize {
            let border = config.border.unwrap_or(0);
            (
                (vw + border * 2 + 1)
                    .min(constraints.maxwidth)
                    .max(constraints.minwidth),
                (vh + header + border + 1)
                    .min(constraints.maxheight)
                    .max(constraints.minheight),
            )
        } else {
            let default_w =
                (f64::from(constraints.maxwidth) / 2.0).max(f64::from(constraints.minwidth));
            let default_h =
                (f64::from(constraints.maxheight) / 2.0).max(f64::from(constraints.minheight));
            (
                resolve_or(config.width, constraints.maxwidth, 0, default_w as i32),
                resolve_or(config.height, constraints.maxheight, 0, default_h as i32),
            )
        };
        let x = resolve_or(config.x, vw, width, margins.left);
        let y = resolve_or(config.y, vh, height, margins.top);

        let mut chrome = Chrome::new(config.view);
        for user_class in &config.classes {
            chrome.set_class(user_class, true);
        }
        if config.animate {
            chrome.set_class(class::ANIMATE, true);
        }
        if config.modal {
            chrome.set_class(class::MODAL, true);
        }
        if config.no_move {
            chrome.set_class(class::NO_MOVE, true);
        }
        if config.no_max {
            chrome.set_class(class::NO_MAX, true);
        }
        if !fullscreen_capable {
            chrome.set_class(class::NO_FULL, true);
        }

        let mut window = Self {
            id,
            dom_id,
            title: String::new(),
            index: 0,
            x,
            y,
            width,
            height,
            constraints,
            limits: config.limits,
            margins,
            header,
            overflow: config.overflow,
            min: false,
            max: false,
            full: false,
            hidden: false,
            focused: false,
            resize_control: false,
            frame: FloatRect::default(),
            content: None,
            chrome,
            controls: ControlSet::default(),
            callbacks: config.callbacks,
        };

        if let Some(background) = config.background.as_deref() {
            window.set_background(background);
        }
        if let Some(border) = config.border {
            window.set_border(border);
        }
        window.set_header(header);
        window.set_title(&config.title);
        if let Some(icon) = config.icon.as_deref() {
            window.set_icon(icon);
        }
        if let Some(content) = config.content {
            window.mount(content);
        }

        let placement = Placement {
            index: config.index,
            min: config.min,
            max: config.max,
            hidden: config.hidden,
        };
        (window, placement)
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// The string id (`winbox-N` unless configured).
    pub fn dom_id(&self) -> &str {
        &self.dom_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current z-index.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Stored (restorable) geometry.
    pub fn rect(&self) -> FloatRect {
        FloatRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Geometry last applied to the view.
    pub fn frame(&self) -> FloatRect {
        self.frame
    }

    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn header(&self) -> i32 {
        self.header
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn is_minimized(&self) -> bool {
        self.min
    }

    pub fn is_maximized(&self) -> bool {
        self.max
    }

    pub fn is_fullscreen(&self) -> bool {
        self.full
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_under_resize_control(&self) -> bool {
        self.resize_control
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.chrome.has_class(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.chrome.classes()
    }

    /// Last value pushed to the view for a style property.
    pub fn style(&self, part: ChromePart, property: &str) -> Option<&str> {
        self.chrome.cache().style(part, property)
    }

    pub(crate) fn set_index(&mut self, index: i32) {
        self.index = index;
        self.chrome
            .style(ChromePart::Root, "z-index", &index.to_string());
    }

    pub(crate) fn set_class(&mut self, name: &str, enabled: bool) -> bool {
        self.chrome.set_class(name, enabled)
    }

    /// Title bar buttons from left to right.
    pub fn control_row(&self) -> Vec<ControlSlot> {
        self.controls.row(|name| self.chrome.has_class(name))
    }

    pub fn control(&self, slot: usize) -> Option<&Control> {
        self.controls.get(slot)
    }

    pub(crate) fn add_control(&mut self, control: Control) {
        self.chrome
            .add_control(&control.class, &control.glyph, control.index);
        self.controls.add(control);
    }

    pub(crate) fn remove_control(&mut self, name: &str) -> bool {
        let removed = self.controls.remove(name);
        if removed {
            self.chrome.remove_control(name);
        }
        removed
    }

    /// Returns `false` if there is no custom button at `slot`.
    pub(crate) fn click_control(&mut self, slot: usize) -> bool {
        let id = self.id;
        match self.controls.get_mut(slot) {
            Some(control) => {
                control.click(id);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_title_attribute(&mut self, value: Option<&str>) {
        self.chrome.attribute("title", value);
    }

    // Position

    /// Apply the stored position to the frame.
    pub(crate) fn apply_position(&mut self) {
        self.paint_position(self.x, self.y);
    }

    /// Resolve and store a new position, then apply it. A missing `y`
    /// resolves to 0.
    pub(crate) fn set_position(&mut self, vp: &Viewport, x: Length, y: Option<Length>) {
        let base_w = vp.width() - self.margins.left - self.margins.right;
        let base_h = vp.height() - self.margins.top - self.margins.bottom;
        self.x = resolve_or(Some(x), base_w, self.width, 0);
        self.y = resolve_or(y, base_h, self.height, 0);
        self.apply_position();
    }

    /// Paint a position without storing it.
    pub(crate) fn apply_frame_position(&mut self, x: i32, y: i32) {
        self.paint_position(x, y);
    }

    fn paint_position(&mut self, x: i32, y: i32) {
        self.frame.x = x;
        self.frame.y = y;
        self.chrome.px("left", x);
        self.chrome.px("top", y);
        self.callbacks.emit_move(self.id, self.x, self.y);
    }

    pub(crate) fn place(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.apply_position();
    }

    // Size

    /// Clamp the stored size into the current limits and apply it.
    pub(crate) fn apply_size(&mut self) {
        self.width = self.clamp_width(self.width);
        self.height = self.clamp_height(self.height);
        self.paint_size(self.width, self.height);
    }

    /// Resolve and store a new size against the maximum limits, then apply it.
    pub(crate) fn set_size(&mut self, width: Length, height: Option<Length>) {
        self.width = resolve_or(Some(width), self.constraints.maxwidth, 0, 0);
        self.height = resolve_or(height, self.constraints.maxheight, 0, 0);
        self.apply_size();
    }

    /// Paint a size without storing it.
    pub(crate) fn apply_frame_size(&mut self, width: i32, height: i32) {
        self.paint_size(width, height);
    }

    fn paint_size(&mut self, width: i32, height: i32) {
        self.frame.width = width;
        self.frame.height = height;
        self.chrome.px("width", width);
        self.chrome.px("height", height);
        self.callbacks.emit_resize(self.id, self.width, self.height);
    }

    pub(crate) fn size_to(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.apply_size();
    }

    // The minimum wins when a tiny viewport pushes max below min.
    fn clamp_width(&self, width: i32) -> i32 {
        width
            .min(self.constraints.maxwidth)
            .max(self.constraints.minwidth)
    }

    fn clamp_height(&self, height: i32) -> i32 {
        height
            .min(self.constraints.maxheight)
            .max(self.constraints.minheight)
    }

    /// Frame filling the viewport minus margins.
    pub(crate) fn maximized_frame(&self, vp: &Viewport) -> FloatRect {
        FloatRect {
            x: self.margins.left,
            y: self.margins.top,
            width: vp.width() - self.margins.left - self.margins.right,
            height: vp.height() - self.margins.top - self.margins.bottom,
        }
    }

    pub(crate) fn apply_frame(&mut self, frame: FloatRect) {
        self.apply_frame_size(frame.width, frame.height);
        self.apply_frame_position(frame.x, frame.y);
    }

    /// Pull a window that is partly or wholly outside the viewport back into
    /// view. Each axis is handled on its own.
    pub(crate) fn fit(&mut self, vp: &Viewport, offset: (i32, i32)) {
        let (ox, oy) = offset;
        let anchored = self.resize_control && !self.hidden;

        let root_w = vp.width();
        let reduced_w = root_w - ox * 2;
        let center_x = if reduced_w - self.width < 0 {
            ox
        } else {
            (reduced_w - self.width) / 2
        };
        if self.x < 0 {
            self.place(ox, self.y);
            if self.width > reduced_w {
                self.size_to(reduced_w, self.height);
            }
        } else if self.x + self.width > root_w {
            if self.width < reduced_w {
                let x = if anchored {
                    self.x - vp.width_delta()
                } else {
                    center_x
                };
                self.place(x, self.y);
            } else {
                self.place(center_x, self.y);
                self.size_to(reduced_w, self.height);
            }
        } else if self.x > root_w {
            // Unreachable for non-negative widths.
            if self.width < reduced_w {
                self.place(center_x, self.y);
            } else {
                self.place(ox, self.y);
                self.size_to(reduced_w, self.height);
            }
        }

        let root_h = vp.height();
        let reduced_h = root_h - oy * 2;
        let center_y = if reduced_h - self.height < 0 {
            oy
        } else {
            (reduced_h - self.height) / 2
        };
        if self.y < 0 {
            self.place(self.x, oy);
            if self.height > reduced_h {
                self.size_to(self.width, reduced_h);
            }
        } else if self.y + self.height > root_h {
            if self.height < reduced_h {
                let y = if anchored {
                    self.y - vp.height_delta()
                } else {
                    center_y
                };
                self.place(self.x, y);
            } else {
                self.place(self.x, center_y);
                self.size_to(self.width, reduced_h);
            }
        } else if self.y > root_h {
            if self.height < reduced_h {
                self.place(self.x, center_y);
            } else {
                self.place(self.x, oy);
                self.size_to(self.width, reduced_h);
            }
        }
    }

    /// Center horizontally, keeping `y`.
    pub(crate) fn lock_center(&mut self, vp: &Viewport) {
        self.place((vp.width() - self.width) / 2, self.y);
    }

    /// Resolve the configured limits again against the current viewport.
    pub(crate) fn change_size_limit(&mut self, vp: &Viewport) {
        self.constraints = resolve_constraints(&self.limits, vp.width(), vp.height(), self.header);
    }

    // Visibility

    /// Returns `true` if the window was hidden and is now shown.
    pub(crate) fn show(&mut self) -> bool {
        if !self.hidden {
            return false;
        }
        self.callbacks.emit_show(self.id);
        self.hidden = false;
        self.chrome.set_class(class::HIDE, false);
        true
    }

    /// Returns `true` if the window was visible and is now hidden.
    pub(crate) fn hide(&mut self) -> bool {
        if self.hidden {
            return false;
        }
        self.callbacks.emit_hide(self.id);
        self.hidden = true;
        self.chrome.set_class(class::HIDE, true);
        true
    }

    // Chrome setters. Empty values leave the chrome untouched.

    pub(crate) fn set_title(&mut self, title: &str) {
        if title.is_empty() {
            return;
        }
        self.title = title.to_string();
        self.chrome.text(ChromePart::Title, title);
    }

    pub(crate) fn set_icon(&mut self, src: &str) {
        if src.is_empty() {
            return;
        }
        self.chrome
            .style(ChromePart::Icon, "background-image", &format!("url({src})"));
        self.chrome
            .style(ChromePart::Icon, "display", "inline-block");
    }

    pub(crate) fn set_background(&mut self, background: &str) {
        if background.is_empty() {
            return;
        }
        self.chrome
            .style(ChromePart::Root, "background", background);
    }

    pub(crate) fn set_border(&mut self, border: i32) {
        if border == 0 {
            return;
        }
        self.chrome
            .style(ChromePart::Body, "margin", &format!("{border}px"));
    }

    pub(crate) fn set_header(&mut self, header: i32) {
        if header <= 0 {
            return;
        }
        self.header = header;
        let px = format!("{header}px");
        self.chrome.style(ChromePart::Header, "height", &px);
        self.chrome.style(ChromePart::Header, "line-height", &px);
        self.chrome.style(ChromePart::Body, "top", &px);
    }

    // Content

    pub(crate) fn mount(&mut self, content: Content) {
        if matches!(content, Content::Mount(_)) {
            self.unmount();
        }
        self.chrome.content(Some(&content));
        self.content = Some(content);
    }

    /// Detach the body content. Mounted host content is handed back.
    pub(crate) fn unmount(&mut self) -> Option<MountHandle> {
        let content = self.content.take()?;
        self.chrome.content(None);
        match content {
            Content::Mount(handle) => Some(handle),
            Content::Html(_) | Content::Url(_) => None,
        }
    }

    /// Point the body at a URL. An existing URL body is retargeted and keeps
    /// its load hook; otherwise `onload` replaces the configured one.
    pub(crate) fn set_url(&mut self, url: &str, onload: Option<Hook>) {
        let retarget = matches!(self.content, Some(Content::Url(_)));
        self.mount(Content::Url(url.to_string()));
        if !retarget {
            self.callbacks.set_onload(onload);
        }
    }

    pub(crate) fn release(&mut self) -> Option<MountHandle> {
        let handle = self.unmount();
        self.chrome.release();
        handle
    }
}

fn resolve_constraints(limits: &SizeLimits, vw: i32, vh: i32, header: i32) -> Constraints {
    let maxwidth = resolve_or(limits.maxwidth, vw, 0, vw);
    let maxheight = resolve_or(limits.maxheight, vh, 0, vh);
    Constraints {
        minwidth: resolve_or(limits.minwidth, maxwidth, 0, DEFAULT_MIN_WIDTH),
        minheight: resolve_or(limits.minheight, maxheight, 0, header),
        maxwidth,
        maxheight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_in(vp: &Viewport, config: WindowConfig) -> Window {
        Window::new(WindowId::new(1), "winbox-1".into(), config, vp, true).0
    }

    #[test]
    fn defaults_to_half_the_viewport() {
        let vp = Viewport::new(1000, 800);
        let win = window_in(&vp, WindowConfig::default());
        assert_eq!(
            win.rect(),
            FloatRect {
                x: 0,
                y: 0,
                width: 500,
                height: 400
            }
        );
        assert_eq!(
            win.constraints(),
            Constraints {
                minwidth: 150,
                minheight: 35,
                maxwidth: 1000,
                maxheight: 800
            }
        );
    }

    #[test]
    fn resolves_symbolic_geometry() {
        let vp = Viewport::new(1000, 800);
        let win = window_in(
            &vp,
            WindowConfig {
                x: Some(Length::Center),
                y: Some(Length::End),
                width: Some(Length::Percent(30.0)),
                height: Some(Length::Px(200.0)),
                ..WindowConfig::default()
            },
        );
        assert_eq!(win.rect(), FloatRect { x: 350, y: 600, width: 300, height: 200 });
    }

    #[test]
    fn autosize_fills_the_viewport_within_limits() {
        let vp = Viewport::new(1000, 800);
        let win = window_in(
            &vp,
            WindowConfig {
                autosize: true,
                border: Some(4),
                width: Some(Length::Px(300.0)),
                limits: SizeLimits {
                    maxwidth: Some(Length::Px(1200.0)),
                    maxheight: Some(Length::Percent(50.0)),
                    ..SizeLimits::default()
                },
                ..WindowConfig::default()
            },
        );
        assert_eq!((win.width, win.height), (1009, 400));
    }

    #[test]
    fn modal_and_animate_become_root_classes() {
        let vp = Viewport::new(1000, 800);
        let win = window_in(
            &vp,
            WindowConfig {
                modal: true,
                animate: true,
                ..WindowConfig::default()
            },
        );
        assert!(win.has_class(class::MODAL));
        assert!(win.has_class(class::ANIMATE));
        assert!(!window_in(&vp, WindowConfig::default()).has_class(class::MODAL));
    }

    #[test]
    fn minimum_wins_over_maximum() {
        let vp = Viewport::new(100, 20);
        let mut win = window_in(&vp, WindowConfig::default());
        win.size_to(500, 500);
        assert_eq!((win.width, win.height), (150, 35));
    }

    #[test]
    fn fit_pulls_back_from_leading_edge() {
        let vp = Viewport::new(1000, 800);
        let mut win = window_in(&vp, WindowConfig::default());
        win.place(-50, -10);
        win.fit(&vp, (20, 20));
        assert_eq!((win.x, win.y), (20, 20));
    }

    #[test]
    fn fit_recenters_trailing_overflow_outside_resize_control() {
        let vp = Viewport::new(1000, 800);
        let mut win = window_in(&vp, WindowConfig::default());
        win.place(700, 0);
        win.fit(&vp, (20, 20));
        assert_eq!(win.x, (960 - 500) / 2);
    }

    #[test]
    fn fit_recovers_window_beyond_far_edge() {
        let vp = Viewport::new(1000, 800);
        let mut win = window_in(&vp, WindowConfig::default());
        win.place(1200, 900);
        win.fit(&vp, (20, 20));
        assert_eq!((win.x, win.y), (230, 180));
    }

    #[test]
    fn fit_shrinks_when_window_cannot_fit() {
        let vp = Viewport::new(400, 800);
        let mut win = window_in(
            &vp,
            WindowConfig {
                limits: SizeLimits {
                    maxwidth: Some(Length::Px(1000.0)),
                    ..SizeLimits::default()
                },
                width: Some(Length::Px(600.0)),
                ..WindowConfig::default()
            },
        );
        win.place(100, 0);
        win.fit(&vp, (20, 20));
        assert_eq!(win.width, 360);
        assert_eq!(win.x, 20);
    }

    #[test]
    fn set_position_resolves_against_margin_reduced_viewport() {
        let vp = Viewport::new(1000, 800);
        let mut win = window_in(
            &vp,
            WindowConfig {
                left: Some(Length::Px(100.0)),
                ..WindowConfig::default()
            },
        );
        win.set_position(&vp, Length::Center, None);
        assert_eq!((win.x, win.y), (200, 0));
    }

    #[test]
    fn url_retarget_keeps_content_slot() {
        let vp = Viewport::new(1000, 800);
        let mut win = window_in(&vp, WindowConfig::default());
        win.set_url("https://a.example", None);
        win.set_url("https://b.example", None);
        assert_eq!(
            win.content(),
            Some(&Content::Url("https://b.example".into()))
        );
        assert_eq!(win.unmount(), None);
    }

    #[test]
    fn unmount_hands_back_host_content() {
        let vp = Viewport::new(1000, 800);
        let mut win = window_in(
            &vp,
            WindowConfig {
                content: Some(Content::Mount(MountHandle(7))),
                ..WindowConfig::default()
            },
        );
        assert_eq!(win.release(), Some(MountHandle(7)));
        assert_eq!(win.content(), None);
    }
}
