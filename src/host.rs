//! Terminal composition of a [`WindowManager`].
//!
//! The host owns the manager and translates crossterm events into engine
//! calls: mouse presses are hit-tested against each window's chrome in cells,
//! drags feed pointer samples in page pixels, and terminal resizes run the
//! viewport-resize pass. Rendering paints every visible window bottom to top
//! with a [`WindowDecorator`].

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Style};

use crate::drivers::mouse::{CellMetrics, PointerEvent, translate};
use crate::event_loop::ControlFlow;
use crate::fullscreen::InPageFullscreen;
use crate::window::config::{Content, Length, WindowConfig};
use crate::window::decorator::{CellRect, HeaderAction, OpenStepDecorator, WindowDecorator};
use crate::window::interaction::{Handle, PointerSample};
use crate::window::{CloseOutcome, ManagerOptions, WindowId, WindowManager, WmError};

const HINT: &str = "n new  tab cycle  m min  x max  f full  w close  q quit";

#[derive(Debug)]
pub struct TerminalHost {
    wm: WindowManager,
    metrics: CellMetrics,
    decorator: Box<dyn WindowDecorator>,
    columns: u16,
    rows: u16,
    spawned: u32,
}

impl TerminalHost {
    pub fn new(columns: u16, rows: u16, options: ManagerOptions) -> Self {
        let metrics = CellMetrics::default();
        let (width, height) = metrics.page_size(columns, rows);
        let wm = WindowManager::with_options(width, height, options)
            .with_fullscreen_surface(Box::new(InPageFullscreen::new()));
        Self {
            wm,
            metrics,
            decorator: Box::new(OpenStepDecorator),
            columns,
            rows,
            spawned: 0,
        }
    }

    pub fn with_decorator(mut self, decorator: Box<dyn WindowDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn manager_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn open_window(&mut self, config: WindowConfig) -> WindowId {
        self.spawned += 1;
        self.wm.create(config)
    }

    /// Open a titled window with some text, cascaded from the previous one.
    pub fn spawn_demo_window(&mut self) -> WindowId {
        let seq = self.spawned + 1;
        let (width, height) = self.wm.viewport().current();
        let step = i32::try_from(seq - 1).unwrap_or(0) * 4 * self.metrics.cell_width;
        let mut config = WindowConfig::titled(format!("Window {seq}"));
        config.x = Some(Length::from(step % (width / 2).max(1)));
        config.y = Some(Length::from(step % (height / 2).max(1)));
        config.width = Some(Length::Percent(50.0));
        config.height = Some(Length::Percent(50.0));
        config.content = Some(Content::Html(format!(
            "Window {seq}\n\nDrag the title bar to move.\nDrag an edge to resize."
        )));
        self.open_window(config)
    }

    /// Screen cells covered by a window, or the whole screen for the
    /// fullscreen holder.
    pub fn cell_rect(&self, id: WindowId) -> Option<CellRect> {
        if self.wm.fullscreen_holder() == Some(id) {
            return Some(CellRect {
                x: 0,
                y: 0,
                width: i32::from(self.columns),
                height: i32::from(self.rows),
            });
        }
        let window = self.wm.window(id)?;
        if window.is_hidden() {
            return None;
        }
        Some(self.metrics.cell_rect(window.frame()))
    }

    /// Topmost window drawn at a cell.
    pub fn window_at_cell(&self, column: u16, row: u16) -> Option<WindowId> {
        let (col, row) = (i32::from(column), i32::from(row));
        if let Some(holder) = self.wm.fullscreen_holder() {
            return Some(holder);
        }
        self.wm
            .paint_order()
            .into_iter()
            .rev()
            .find(|id| self.cell_rect(*id).is_some_and(|r| r.contains(col, row)))
    }

    /// Route one terminal event. `now` timestamps pointer presses for the
    /// double-activation check.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Result<ControlFlow, WmError> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse, now)?;
                Ok(ControlFlow::Continue)
            }
            Event::Resize(columns, rows) => {
                self.resize(*columns, *rows);
                Ok(ControlFlow::Continue)
            }
            _ => Ok(ControlFlow::Continue),
        }
    }

    /// Idle pass of the event loop. Returns whether a batched commit landed.
    pub fn tick(&mut self) -> bool {
        self.wm.frame_tick()
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
        let (width, height) = self.metrics.page_size(columns, rows);
        self.wm.on_viewport_resize(width, height);
        self.wm.fit_all();
        self.wm.settle_viewport_resize();
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<ControlFlow, WmError> {
        if key.kind != KeyEventKind::Press {
            return Ok(ControlFlow::Continue);
        }
        let focused = self.wm.focused();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(ControlFlow::Quit);
            }
            KeyCode::Char('q') => return Ok(ControlFlow::Quit),
            KeyCode::Char('n') => {
                self.spawn_demo_window();
            }
            KeyCode::Tab => {
                self.wm.focus_next();
            }
            KeyCode::Esc => {
                self.wm.cancel_fullscreen();
            }
            KeyCode::Char('m') => {
                if let Some(id) = focused {
                    self.wm.minimize(id)?;
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = focused {
                    self.toggle_maximize(id)?;
                }
            }
            KeyCode::Char('f') => {
                if let Some(id) = focused {
                    self.wm.fullscreen(id)?;
                }
            }
            KeyCode::Char('w') => {
                if let Some(id) = focused {
                    self.close(id)?;
                }
            }
            _ => {}
        }
        Ok(ControlFlow::Continue)
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) -> Result<(), WmError> {
        match translate(mouse, self.metrics) {
            Some(PointerEvent::Down { column, row, point }) => {
                self.pointer_down(column, row, point, now)?;
                if !self.wm.take_window_clicked()
                    && let Some(id) = self.wm.focused()
                {
                    self.wm.blur(id)?;
                }
            }
            Some(PointerEvent::Move(point)) => {
                self.wm.pointer_move(point);
            }
            Some(PointerEvent::Up(_)) => {
                self.wm.pointer_up();
            }
            None => {}
        }
        Ok(())
    }

    fn pointer_down(
        &mut self,
        column: u16,
        row: u16,
        point: PointerSample,
        now: Instant,
    ) -> Result<(), WmError> {
        let Some(id) = self.window_at_cell(column, row) else {
            return Ok(());
        };
        self.wm.note_window_clicked();
        let (Some(rect), Some(window)) = (self.cell_rect(id), self.wm.window(id)) else {
            return Ok(());
        };
        let action = self
            .decorator
            .hit_test(rect, window, i32::from(column), i32::from(row));
        tracing::debug!(window_id = %id, ?action, column, row, "pointer down");
        match action {
            HeaderAction::Minimize => self.wm.minimize(id)?,
            HeaderAction::Maximize => self.toggle_maximize(id)?,
            HeaderAction::Fullscreen => self.wm.fullscreen(id)?,
            HeaderAction::Close => self.close(id)?,
            HeaderAction::Control(slot) => {
                self.wm.focus(id)?;
                self.wm.click_control(id, slot)?;
            }
            HeaderAction::Drag => {
                self.wm.pointer_down_at(id, Handle::Drag, point, now)?;
            }
            HeaderAction::Resize(edge) => {
                if self.wm.fullscreen_holder() == Some(id) {
                    self.wm.focus(id)?;
                } else {
                    self.wm.pointer_down_at(id, Handle::Resize(edge), point, now)?;
                }
            }
            HeaderAction::Body => self.wm.focus(id)?,
            HeaderAction::None => {}
        }
        Ok(())
    }

    fn toggle_maximize(&mut self, id: WindowId) -> Result<(), WmError> {
        let maximized = self.wm.window(id).is_some_and(|w| w.is_maximized());
        if maximized {
            self.wm.restore(id)
        } else {
            self.wm.maximize(id)
        }
    }

    fn close(&mut self, id: WindowId) -> Result<(), WmError> {
        if let CloseOutcome::Vetoed = self.wm.close(id, false)? {
            tracing::debug!(window_id = %id, "close vetoed by host window");
        }
        Ok(())
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        self.render(frame.buffer_mut(), area);
    }

    /// Paint all windows bottom to top. The fullscreen holder, if any, is
    /// painted last across the whole area.
    pub fn render(&self, buffer: &mut Buffer, area: Rect) {
        let holder = self.wm.fullscreen_holder();
        for id in self.wm.paint_order() {
            if Some(id) == holder {
                continue;
            }
            if let (Some(rect), Some(window)) = (self.cell_rect(id), self.wm.window(id)) {
                self.decorator.render_window(buffer, area, rect, window);
            }
        }
        if let Some(id) = holder
            && let (Some(rect), Some(window)) = (self.cell_rect(id), self.wm.window(id))
        {
            self.decorator.render_window(buffer, area, rect, window);
        }
        if self.wm.is_empty() && area.height > 0 {
            buffer.set_string(
                area.x,
                area.y + area.height - 1,
                HINT,
                Style::default().fg(Color::DarkGray),
            );
        }
    }
}
