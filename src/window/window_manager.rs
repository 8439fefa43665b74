use std::collections::BTreeMap;
use std::time::Instant;

use thiserror::Error;

use crate::constants::{BASE_Z_INDEX, DEFAULT_FIT_OFFSET, DOCK_SLOT_MAX_WIDTH, DOUBLE_ACTIVATION_MS};
use crate::fullscreen::FullscreenSurface;
use crate::viewport::Viewport;

use super::callbacks::Hook;
use super::config::{Content, Length, MountHandle, WindowConfig};
use super::controls::Control;
use super::interaction::{
    ActivationTimer, CommitPolicy, Handle, InteractionSession, PointerDown, PointerSample,
    apply_pointer_delta,
};
use super::view::class;
use super::{FloatRect, Window, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WmError {
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
}

/// Result of [`WindowManager::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The window is gone. Host content mounted in its body is handed back.
    Closed { content: Option<MountHandle> },
    /// `onclose` refused; nothing changed.
    Vetoed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerOptions {
    pub commit_policy: CommitPolicy,
    /// Inset the fit pass uses when it pulls a window back into view.
    pub fit_offset: (i32, i32),
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            commit_policy: CommitPolicy::default(),
            fit_offset: DEFAULT_FIT_OFFSET,
        }
    }
}

/// Minimized windows sharing one anchor corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockGroup {
    /// `(left, top)` margins of the members.
    pub anchor: (i32, i32),
    /// Members in minimize order.
    pub members: Vec<WindowId>,
}

/// Owns every window on one host surface together with the focus stack, the
/// dock and the fullscreen slot.
pub struct WindowManager {
    viewport: Viewport,
    windows: BTreeMap<WindowId, Window>,
    /// Rear is the most recently focused window.
    stack_win: Vec<WindowId>,
    /// Minimize order.
    stack_min: Vec<WindowId>,
    next_window_seq: u64,
    id_counter: u64,
    index_counter: i32,
    is_fullscreen: bool,
    fullscreen_holder: Option<WindowId>,
    fullscreen: Option<Box<dyn FullscreenSurface>>,
    window_clicked: bool,
    options: ManagerOptions,
    session: Option<InteractionSession>,
    activations: BTreeMap<WindowId, ActivationTimer>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("viewport", &self.viewport)
            .field("stack_win", &self.stack_win)
            .field("stack_min", &self.stack_min)
            .field("index_counter", &self.index_counter)
            .field("is_fullscreen", &self.is_fullscreen)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_options(width, height, ManagerOptions::default())
    }

    pub fn with_options(width: i32, height: i32, options: ManagerOptions) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            windows: BTreeMap::new(),
            stack_win: Vec::new(),
            stack_min: Vec::new(),
            next_window_seq: 0,
            id_counter: 0,
            index_counter: BASE_Z_INDEX,
            is_fullscreen: false,
            fullscreen_holder: None,
            fullscreen: None,
            window_clicked: false,
            options,
            session: None,
            activations: BTreeMap::new(),
        }
    }

    /// Install the host's fullscreen capability. Windows that already exist
    /// lose their `no-full` class.
    pub fn with_fullscreen_surface(mut self, surface: Box<dyn FullscreenSurface>) -> Self {
        self.fullscreen = Some(surface);
        for window in self.windows.values_mut() {
            window.set_class(class::NO_FULL, false);
        }
        self
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut Window, WmError> {
        self.windows.get_mut(&id).ok_or(WmError::UnknownWindow(id))
    }

    fn ensure(&self, id: WindowId) -> Result<(), WmError> {
        if self.windows.contains_key(&id) {
            Ok(())
        } else {
            Err(WmError::UnknownWindow(id))
        }
    }

    // Queries

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    /// Open windows in focus-stack order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.stack_win.iter().filter_map(|id| self.windows.get(id))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.windows().find(|w| w.is_focused()).map(Window::id)
    }

    pub fn stack(&self) -> &[WindowId] {
        &self.stack_win
    }

    pub fn min_stack(&self) -> &[WindowId] {
        &self.stack_min
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn fullscreen_holder(&self) -> Option<WindowId> {
        self.fullscreen_holder
    }

    pub fn index_counter(&self) -> i32 {
        self.index_counter
    }

    pub fn options(&self) -> ManagerOptions {
        self.options
    }

    /// Windows ordered bottom to top by z-index. Ties keep stack order.
    pub fn paint_order(&self) -> Vec<WindowId> {
        let mut order: Vec<&Window> = self.windows().collect();
        order.sort_by_key(|w| w.index());
        order.into_iter().map(Window::id).collect()
    }

    /// Topmost visible window whose frame contains the point.
    pub fn window_at(&self, x: i32, y: i32) -> Option<WindowId> {
        self.paint_order().into_iter().rev().find(|id| {
            self.windows
                .get(id)
                .is_some_and(|w| !w.is_hidden() && w.frame().contains(x, y))
        })
    }

    // Lifecycle

    /// Build a window from `config`, register it and run its initial
    /// placement.
    ///
    /// Geometry resolves against the current viewport in this order:
    /// margins, maximum size (default: viewport), header height (default 35),
    /// minimum size (default 150 wide, header tall), size (default half the
    /// maximum but at least the minimum), then position (default: the
    /// left/top margin). Zero values count as unset.
    pub fn create(&mut self, config: WindowConfig) -> WindowId {
        self.next_window_seq += 1;
        let id = WindowId::new(self.next_window_seq);
        let dom_id = match config.id.as_deref() {
            Some(given) if !given.is_empty() => given.to_string(),
            _ => {
                self.id_counter += 1;
                format!("winbox-{}", self.id_counter)
            }
        };
        let (window, placement) = Window::new(
            id,
            dom_id,
            config,
            &self.viewport,
            self.fullscreen.is_some(),
        );
        tracing::debug!(window_id = %id, dom_id = window.dom_id(), "creating window");
        self.windows.insert(id, window);
        self.stack_win.push(id);

        if placement.hidden {
            self.hide_window(id);
        } else {
            self.focus_window(id);
        }

        if let Some(index) = placement.index
            && let Some(window) = self.windows.get_mut(&id)
        {
            window.set_index(index);
            if index > self.index_counter {
                self.index_counter = index;
            }
        }

        if placement.max {
            self.maximize_window(id);
        } else if placement.min {
            self.minimize_window(id);
        } else if let Some(window) = self.windows.get_mut(&id) {
            window.apply_size();
            window.apply_position();
            window.fit(&self.viewport, self.options.fit_offset);
        }

        if let Some(window) = self.windows.get_mut(&id) {
            window.callbacks.emit_create(id);
        }
        id
    }

    /// Close a window. `onclose` may veto; `force` is passed through to it.
    pub fn close(&mut self, id: WindowId, force: bool) -> Result<CloseOutcome, WmError> {
        let window = self.window_mut(id)?;
        if window.callbacks.emit_close(id, force) {
            tracing::debug!(window_id = %id, force, "close vetoed");
            return Ok(CloseOutcome::Vetoed);
        }
        tracing::debug!(window_id = %id, force, "closing window");

        if window.min {
            self.remove_min_entry(id);
        }
        self.stack_win.retain(|other| *other != id);
        if self.fullscreen_holder == Some(id) {
            self.cancel_fullscreen();
        }
        if self.session.is_some_and(|session| session.window == id) {
            self.session = None;
        }
        self.activations.remove(&id);

        let mut content = None;
        let mut was_focused = false;
        if let Some(mut window) = self.windows.remove(&id) {
            was_focused = window.focused;
            content = window.release();
        }
        if was_focused {
            self.focus_next();
        }
        Ok(CloseOutcome::Closed { content })
    }

    // Focus

    pub fn focus(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.focus_window(id);
        Ok(())
    }

    pub fn blur(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.blur_window(id);
        Ok(())
    }

    /// `false` blurs, `true` focuses.
    pub fn set_focus(&mut self, id: WindowId, state: bool) -> Result<(), WmError> {
        if state { self.focus(id) } else { self.blur(id) }
    }

    fn focus_window(&mut self, id: WindowId) {
        if self.windows.get(&id).is_none_or(|w| w.focused) {
            return;
        }
        let previous = self
            .stack_win
            .iter()
            .rev()
            .copied()
            .find(|other| self.windows.get(other).is_some_and(|w| w.focused));
        if let Some(previous) = previous {
            self.blur_window(previous);
        }
        self.stack_win.retain(|other| *other != id);
        self.stack_win.push(id);

        self.index_counter += 1;
        let index = self.index_counter;
        if let Some(window) = self.windows.get_mut(&id) {
            window.set_index(index);
            window.set_class(class::FOCUS, true);
            window.focused = true;
            window.callbacks.emit_focus(id);
        }
    }

    fn blur_window(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(&id)
            && window.focused
        {
            window.set_class(class::FOCUS, false);
            window.focused = false;
            window.callbacks.emit_blur(id);
        }
    }

    /// Focus the most recently focused window that is not minimized.
    pub fn focus_next(&mut self) -> Option<WindowId> {
        let next = self
            .stack_win
            .iter()
            .rev()
            .copied()
            .find(|id| self.windows.get(id).is_some_and(|w| !w.min))?;
        self.focus_window(next);
        Some(next)
    }

    // Modes

    pub fn minimize(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.minimize_window(id);
        Ok(())
    }

    /// `false` restores.
    pub fn set_minimized(&mut self, id: WindowId, state: bool) -> Result<(), WmError> {
        if state { self.minimize(id) } else { self.restore(id) }
    }

    fn minimize_window(&mut self, id: WindowId) {
        if self.is_fullscreen {
            self.cancel_fullscreen();
        }
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.max {
            window.set_class(class::MAX, false);
            window.max = false;
        }
        if window.min {
            return;
        }
        let title = window.title().to_string();
        window.set_title_attribute(Some(&title));
        window.set_class(class::MIN, true);
        window.min = true;
        let was_focused = window.focused;
        self.stack_min.push(id);
        self.update_min_stack();
        tracing::debug!(window_id = %id, docked = self.stack_min.len(), "minimized window");

        if was_focused {
            self.blur_window(id);
            self.focus_next();
        }
        if let Some(window) = self.windows.get_mut(&id) {
            window.callbacks.emit_minimize(id);
        }
    }

    pub fn maximize(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.maximize_window(id);
        Ok(())
    }

    /// `false` restores.
    pub fn set_maximized(&mut self, id: WindowId, state: bool) -> Result<(), WmError> {
        if state { self.maximize(id) } else { self.restore(id) }
    }

    fn maximize_window(&mut self, id: WindowId) {
        if self.is_fullscreen {
            self.cancel_fullscreen();
        }
        if self.windows.get(&id).is_some_and(|w| w.min) {
            self.remove_min_entry(id);
        }
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.max {
            return;
        }
        window.set_class(class::MAX, true);
        let frame = window.maximized_frame(&self.viewport);
        window.apply_frame(frame);
        window.max = true;
        tracing::debug!(window_id = %id, ?frame, "maximized window");
        window.callbacks.emit_maximize(id);
    }

    /// Leave minimized or maximized mode, re-applying the stored geometry.
    pub fn restore(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.restore_window(id);
        Ok(())
    }

    fn restore_window(&mut self, id: WindowId) {
        if self.is_fullscreen {
            self.cancel_fullscreen();
        }
        if self.windows.get(&id).is_some_and(|w| w.min) {
            self.remove_min_entry(id);
            if let Some(window) = self.windows.get_mut(&id) {
                window.apply_size();
                window.apply_position();
                tracing::debug!(window_id = %id, "restored from dock");
                window.callbacks.emit_restore(id);
            }
        }
        if let Some(window) = self.windows.get_mut(&id)
            && window.max
        {
            window.max = false;
            window.set_class(class::MAX, false);
            window.apply_size();
            window.apply_position();
            tracing::debug!(window_id = %id, "restored from maximize");
            window.callbacks.emit_restore(id);
        }
    }

    /// Toggle fullscreen for a window.
    pub fn fullscreen(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.fullscreen_window(id, None);
        Ok(())
    }

    /// `true` enters fullscreen unless already there. `false` leaves it and
    /// restores; it does nothing when the window is not fullscreen.
    pub fn set_fullscreen(&mut self, id: WindowId, state: bool) -> Result<(), WmError> {
        self.ensure(id)?;
        self.fullscreen_window(id, Some(state));
        Ok(())
    }

    fn fullscreen_window(&mut self, id: WindowId, state: Option<bool>) {
        if self.fullscreen.is_none() {
            self.restore_window(id);
            return;
        }
        if self.windows.get(&id).is_some_and(|w| w.min) {
            self.remove_min_entry(id);
            if let Some(window) = self.windows.get_mut(&id) {
                window.apply_size();
                window.apply_position();
            }
        }

        let holds = self.is_fullscreen && self.fullscreen_holder == Some(id);
        let surface_active = self.fullscreen.as_ref().is_some_and(|s| s.is_active());
        if holds && surface_active {
            if state == Some(true) {
                return;
            }
            self.cancel_fullscreen();
            if state == Some(false) {
                self.restore_window(id);
            }
            return;
        }
        if state == Some(false) {
            return;
        }

        // Someone else holds the surface, or our flag went stale.
        if self.is_fullscreen {
            self.cancel_fullscreen();
        } else if surface_active && let Some(surface) = self.fullscreen.as_mut() {
            surface.exit();
        }

        if let Some(surface) = self.fullscreen.as_mut() {
            surface.request(id);
        }
        self.is_fullscreen = true;
        self.fullscreen_holder = Some(id);
        if let Some(window) = self.windows.get_mut(&id) {
            window.full = true;
            tracing::debug!(window_id = %id, "entered fullscreen");
            window.callbacks.emit_fullscreen(id);
        }
    }

    /// Clear the fullscreen flag and ask the surface to exit if anything is
    /// presented. Returns whether an exit was requested.
    pub fn cancel_fullscreen(&mut self) -> bool {
        self.is_fullscreen = false;
        if let Some(holder) = self.fullscreen_holder.take()
            && let Some(window) = self.windows.get_mut(&holder)
        {
            window.full = false;
        }
        match self.fullscreen.as_mut() {
            Some(surface) if surface.is_active() => {
                surface.exit();
                tracing::debug!("left fullscreen");
                true
            }
            _ => false,
        }
    }

    // Visibility

    pub fn show(&mut self, id: WindowId) -> Result<(), WmError> {
        self.window_mut(id)?.show();
        Ok(())
    }

    pub fn hide(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.hide_window(id);
        Ok(())
    }

    /// `false` hides, `true` shows.
    pub fn set_visible(&mut self, id: WindowId, visible: bool) -> Result<(), WmError> {
        if visible { self.show(id) } else { self.hide(id) }
    }

    fn hide_window(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.hide();
        }
    }

    // Geometry

    /// Store and apply a new position. Lengths resolve against the viewport
    /// minus the window's margins.
    pub fn move_to(
        &mut self,
        id: WindowId,
        x: impl Into<Length>,
        y: impl Into<Length>,
    ) -> Result<(), WmError> {
        let window = self.windows.get_mut(&id).ok_or(WmError::UnknownWindow(id))?;
        window.set_position(&self.viewport, x.into(), Some(y.into()));
        Ok(())
    }

    /// Store and apply a new size, clamped to the window's limits. Lengths
    /// resolve against the maximum size.
    pub fn resize_to(
        &mut self,
        id: WindowId,
        width: impl Into<Length>,
        height: impl Into<Length>,
    ) -> Result<(), WmError> {
        self.window_mut(id)?
            .set_size(width.into(), Some(height.into()));
        Ok(())
    }

    /// Apply the stored geometry to the frame again.
    pub fn refresh(&mut self, id: WindowId) -> Result<(), WmError> {
        let window = self.window_mut(id)?;
        window.apply_size();
        window.apply_position();
        Ok(())
    }

    pub fn fit(&mut self, id: WindowId) -> Result<(), WmError> {
        let offset = self.options.fit_offset;
        self.fit_with_offset(id, offset)
    }

    pub fn fit_with_offset(&mut self, id: WindowId, offset: (i32, i32)) -> Result<(), WmError> {
        let window = self.windows.get_mut(&id).ok_or(WmError::UnknownWindow(id))?;
        window.fit(&self.viewport, offset);
        Ok(())
    }

    /// Run the fit pass over every window in normal mode.
    pub fn fit_all(&mut self) {
        let offset = self.options.fit_offset;
        for id in self.stack_win.clone() {
            if let Some(window) = self.windows.get_mut(&id)
                && !window.min
                && !window.max
            {
                window.fit(&self.viewport, offset);
            }
        }
    }

    pub fn lock_center(&mut self, id: WindowId) -> Result<(), WmError> {
        let window = self.windows.get_mut(&id).ok_or(WmError::UnknownWindow(id))?;
        window.lock_center(&self.viewport);
        Ok(())
    }

    // Chrome and content

    pub fn set_title(&mut self, id: WindowId, title: &str) -> Result<(), WmError> {
        let window = self.window_mut(id)?;
        window.set_title(title);
        if window.min {
            let title = window.title().to_string();
            window.set_title_attribute(Some(&title));
        }
        Ok(())
    }

    pub fn set_icon(&mut self, id: WindowId, src: &str) -> Result<(), WmError> {
        self.window_mut(id)?.set_icon(src);
        Ok(())
    }

    pub fn set_background(&mut self, id: WindowId, background: &str) -> Result<(), WmError> {
        self.window_mut(id)?.set_background(background);
        Ok(())
    }

    pub fn set_border(&mut self, id: WindowId, border: i32) -> Result<(), WmError> {
        self.window_mut(id)?.set_border(border);
        Ok(())
    }

    /// Change the chrome height. The dock picks it up on its next layout.
    pub fn set_header(&mut self, id: WindowId, header: i32) -> Result<(), WmError> {
        let window = self.window_mut(id)?;
        window.set_header(header);
        if window.min {
            self.update_min_stack();
        }
        Ok(())
    }

    pub fn mount(&mut self, id: WindowId, content: Content) -> Result<(), WmError> {
        self.window_mut(id)?.mount(content);
        Ok(())
    }

    pub fn unmount(&mut self, id: WindowId) -> Result<Option<MountHandle>, WmError> {
        Ok(self.window_mut(id)?.unmount())
    }

    pub fn set_url(
        &mut self,
        id: WindowId,
        url: &str,
        onload: Option<Hook>,
    ) -> Result<(), WmError> {
        self.window_mut(id)?.set_url(url, onload);
        Ok(())
    }

    /// Relay the host's content-loaded signal to `onload`.
    pub fn notify_loaded(&mut self, id: WindowId) -> Result<(), WmError> {
        self.window_mut(id)?.callbacks.emit_load(id);
        Ok(())
    }

    pub fn add_class(&mut self, id: WindowId, name: &str) -> Result<(), WmError> {
        self.window_mut(id)?.set_class(name, true);
        Ok(())
    }

    pub fn remove_class(&mut self, id: WindowId, name: &str) -> Result<(), WmError> {
        self.window_mut(id)?.set_class(name, false);
        Ok(())
    }

    /// Returns whether the class is now set.
    pub fn toggle_class(&mut self, id: WindowId, name: &str) -> Result<bool, WmError> {
        let window = self.window_mut(id)?;
        let enabled = !window.has_class(name);
        window.set_class(name, enabled);
        Ok(enabled)
    }

    // Title bar buttons

    pub fn add_control(&mut self, id: WindowId, control: Control) -> Result<(), WmError> {
        tracing::debug!(window_id = %id, class = %control.class, "adding control");
        self.window_mut(id)?.add_control(control);
        Ok(())
    }

    /// Remove the first button carrying `class`. Built-in buttons are named
    /// by [`crate::window::controls::button`]. Returns whether one was removed.
    pub fn remove_control(&mut self, id: WindowId, class: &str) -> Result<bool, WmError> {
        Ok(self.window_mut(id)?.remove_control(class))
    }

    /// Run the click hook of the custom button at `slot`.
    pub fn click_control(&mut self, id: WindowId, slot: usize) -> Result<bool, WmError> {
        Ok(self.window_mut(id)?.click_control(slot))
    }

    // Dock

    /// Minimized windows grouped by anchor corner, groups in order of first
    /// appearance.
    pub fn dock_groups(&self) -> Vec<DockGroup> {
        let mut groups: Vec<DockGroup> = Vec::new();
        for id in &self.stack_min {
            let Some(window) = self.windows.get(id) else {
                continue;
            };
            let margins = window.margins();
            let anchor = (margins.left, margins.top);
            match groups.iter_mut().find(|group| group.anchor == anchor) {
                Some(group) => group.members.push(*id),
                None => groups.push(DockGroup {
                    anchor,
                    members: vec![*id],
                }),
            }
        }
        groups
    }

    /// Lay out the dock: each anchor group splits the width between its
    /// margins evenly, at most `DOCK_SLOT_MAX_WIDTH` per slot, pinned to the
    /// bottom of the viewport.
    pub fn update_min_stack(&mut self) {
        let (root_w, root_h) = self.viewport.current();
        for group in self.dock_groups() {
            let count = group.members.len() as f64;
            for (slot, id) in group.members.iter().enumerate() {
                let Some(window) = self.windows.get_mut(id) else {
                    continue;
                };
                let margins = window.margins();
                let header = window.header();
                let width = (f64::from(root_w - margins.left - margins.right) / count)
                    .min(DOCK_SLOT_MAX_WIDTH);
                window.apply_frame(FloatRect {
                    x: (f64::from(margins.left) + slot as f64 * width) as i32,
                    y: root_h - margins.bottom - header,
                    width: width as i32,
                    height: header,
                });
            }
        }
    }

    /// Take a window out of the dock and clear its minimized state. The
    /// stored geometry is not re-applied.
    pub fn remove_from_min_stack(&mut self, id: WindowId) -> Result<(), WmError> {
        self.ensure(id)?;
        self.remove_min_entry(id);
        Ok(())
    }

    fn remove_min_entry(&mut self, id: WindowId) {
        self.stack_min.retain(|other| *other != id);
        self.update_min_stack();
        if let Some(window) = self.windows.get_mut(&id) {
            window.set_class(class::MIN, false);
            window.min = false;
            window.set_title_attribute(None);
        }
    }

    // Viewport

    /// Record a host surface resize. Every window goes under resize control
    /// and re-resolves its size limits; maximized windows and the dock are
    /// laid out again. Call [`Self::fit_all`] to pull windows back into view.
    pub fn on_viewport_resize(&mut self, width: i32, height: i32) {
        self.viewport.on_resize(width, height);
        tracing::debug!(
            width,
            height,
            width_delta = self.viewport.width_delta(),
            height_delta = self.viewport.height_delta(),
            "viewport resized"
        );
        for window in self.windows.values_mut() {
            window.resize_control = true;
            window.change_size_limit(&self.viewport);
            if window.max && !window.min {
                let frame = window.maximized_frame(&self.viewport);
                window.apply_frame(frame);
            }
        }
        self.update_min_stack();
    }

    /// End the resize burst: windows go back to re-centering in the fit pass.
    pub fn settle_viewport_resize(&mut self) {
        for window in self.windows.values_mut() {
            window.resize_control = false;
        }
    }

    // Click-outside bookkeeping for the host.

    pub fn note_window_clicked(&mut self) {
        self.window_clicked = true;
    }

    pub fn take_window_clicked(&mut self) -> bool {
        std::mem::take(&mut self.window_clicked)
    }

    // Interaction

    pub fn commit_policy(&self) -> CommitPolicy {
        self.options.commit_policy
    }

    pub fn set_commit_policy(&mut self, policy: CommitPolicy) {
        self.options.commit_policy = policy;
    }

    /// Window and handle of the active pointer session.
    pub fn active_interaction(&self) -> Option<(WindowId, Handle)> {
        self.session.map(|session| (session.window, session.handle))
    }

    pub fn pointer_down(
        &mut self,
        id: WindowId,
        handle: Handle,
        point: PointerSample,
    ) -> Result<PointerDown, WmError> {
        self.pointer_down_at(id, handle, point, Instant::now())
    }

    /// Press on a window handle at time `now`.
    ///
    /// The window is focused first. On the drag handle a docked window is
    /// restored, and a second press within `DOUBLE_ACTIVATION_MS` toggles
    /// maximize unless the window carries `no-max`. Otherwise a session
    /// starts and the body is locked until [`Self::pointer_up`].
    pub fn pointer_down_at(
        &mut self,
        id: WindowId,
        handle: Handle,
        point: PointerSample,
        now: Instant,
    ) -> Result<PointerDown, WmError> {
        self.ensure(id)?;
        if self.session.is_some() {
            self.pointer_up();
        }
        self.focus_window(id);

        let (min, max, no_max) = match self.windows.get(&id) {
            Some(w) => (w.min, w.max, w.has_class(class::NO_MAX)),
            None => return Err(WmError::UnknownWindow(id)),
        };
        if handle == Handle::Drag {
            if min {
                self.restore_window(id);
                return Ok(PointerDown::Restored);
            }
            if !no_max {
                let elapsed = self.activations.entry(id).or_default().activate(now);
                if elapsed.is_some_and(|ms| ms < u128::from(DOUBLE_ACTIVATION_MS)) {
                    if max {
                        self.restore_window(id);
                    } else {
                        self.maximize_window(id);
                    }
                    return Ok(PointerDown::ToggledMaximize);
                }
            }
        }
        if min {
            return Ok(PointerDown::Ignored);
        }

        let window = self.window_mut(id)?;
        window.set_class(class::LOCK, true);
        window.resize_control = false;
        self.session = Some(InteractionSession::new(id, handle, point));
        tracing::debug!(window_id = %id, ?handle, x = point.x, y = point.y, "interaction started");
        Ok(PointerDown::Started)
    }

    /// Feed a pointer sample to the active session. Returns whether the
    /// stored geometry changed.
    pub fn pointer_move(&mut self, point: PointerSample) -> bool {
        let Some(mut session) = self.session else {
            return false;
        };
        let id = session.window;
        let Some(window) = self.windows.get_mut(&id) else {
            self.session = None;
            return false;
        };
        let outcome =
            apply_pointer_delta(window, &self.viewport, session.handle, session.anchor, point);
        let was_max = window.max;

        if outcome.resized {
            self.commit_resize(&mut session);
        }
        if was_max && (outcome.resized || outcome.moved) {
            self.restore_window(id);
        }
        if outcome.moved {
            self.commit_move(&mut session);
        }
        session.advance(point, outcome);
        self.session = Some(session);
        outcome.resized || outcome.moved
    }

    fn commit_resize(&mut self, session: &mut InteractionSession) {
        match self.options.commit_policy {
            CommitPolicy::Immediate => {
                if let Some(window) = self.windows.get_mut(&session.window) {
                    window.apply_size();
                }
            }
            CommitPolicy::Batched => session.pending_resize = true,
        }
    }

    fn commit_move(&mut self, session: &mut InteractionSession) {
        match self.options.commit_policy {
            CommitPolicy::Immediate => {
                if let Some(window) = self.windows.get_mut(&session.window) {
                    window.apply_position();
                }
            }
            CommitPolicy::Batched => session.pending_move = true,
        }
    }

    /// Apply at most one pending resize and one pending move. Returns
    /// whether anything was committed.
    pub fn frame_tick(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let resize = std::mem::take(&mut session.pending_resize);
        let mv = std::mem::take(&mut session.pending_move);
        if let Some(window) = self.windows.get_mut(&session.window) {
            if resize {
                window.apply_size();
            }
            if mv {
                window.apply_position();
            }
        }
        resize || mv
    }

    /// End the session. Pending batched commits are dropped.
    pub fn pointer_up(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(window) = self.windows.get_mut(&session.window) {
            window.set_class(class::LOCK, false);
        }
        tracing::debug!(
            window_id = %session.window,
            dropped_resize = session.pending_resize,
            dropped_move = session.pending_move,
            "interaction ended"
        );
    }
}
