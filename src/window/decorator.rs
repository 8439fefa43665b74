use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::config::Content;
use super::controls::ControlSlot;
use super::interaction::ResizeEdge;
use super::Window;

/// Signed rectangle in terminal cells. May extend past the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.x && col <= self.right() && row >= self.y && row <= self.bottom()
    }
}

/// What a press at a given cell of a window's chrome means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Minimize,
    Maximize,
    Fullscreen,
    Close,
    /// A custom button, by its position in the window's control list.
    Control(usize),
    Drag,
    Resize(ResizeEdge),
    Body,
    None,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, buffer: &mut Buffer, bounds: Rect, rect: CellRect, window: &Window);

    fn hit_test(&self, rect: CellRect, window: &Window, col: i32, row: i32) -> HeaderAction;
}

#[derive(Debug)]
pub struct OpenStepDecorator;

impl OpenStepDecorator {
    /// Control buttons on the header row, right to left, with their column.
    fn controls(rect: CellRect, window: &Window) -> Vec<(i32, HeaderAction, &str)> {
        window
            .control_row()
            .into_iter()
            .rev()
            .filter_map(|slot| match slot {
                ControlSlot::Minimize => Some((HeaderAction::Minimize, "_")),
                ControlSlot::Maximize => Some((HeaderAction::Maximize, "□")),
                ControlSlot::Fullscreen => Some((HeaderAction::Fullscreen, "⛶")),
                ControlSlot::Close => Some((HeaderAction::Close, "×")),
                ControlSlot::Custom(pos) => window
                    .control(pos)
                    .map(|control| (HeaderAction::Control(pos), control.glyph.as_str())),
            })
            .enumerate()
            .map(|(slot, (action, symbol))| (rect.right() - 2 - slot as i32 * 2, action, symbol))
            .filter(|(col, _, _)| *col > rect.x)
            .collect()
    }
}

fn put(buffer: &mut Buffer, bounds: Rect, col: i32, row: i32, symbol: &str, style: Style) {
    let inside = col >= i32::from(bounds.x)
        && row >= i32::from(bounds.y)
        && col < i32::from(bounds.x) + i32::from(bounds.width)
        && row < i32::from(bounds.y) + i32::from(bounds.height);
    if !inside {
        return;
    }
    if let (Ok(x), Ok(y)) = (u16::try_from(col), u16::try_from(row))
        && let Some(cell) = buffer.cell_mut((x, y))
    {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

fn body_lines(window: &Window) -> Vec<String> {
    match window.content() {
        Some(Content::Html(text)) => text.lines().map(str::to_string).collect(),
        Some(Content::Url(url)) => vec![format!("<{url}>")],
        Some(Content::Mount(handle)) => vec![format!("[mounted {}]", handle.0)],
        None => Vec::new(),
    }
}

impl WindowDecorator for OpenStepDecorator {
    fn render_window(&self, buffer: &mut Buffer, bounds: Rect, rect: CellRect, window: &Window) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let header_style = if window.is_focused() {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        let border_style = Style::default().fg(Color::DarkGray).bg(Color::Reset);
        let body_style = Style::default().fg(Color::Gray).bg(Color::Reset);
        let (left, right, top, bottom) = (rect.x, rect.right(), rect.y, rect.bottom());
        let header_row = top + 1;

        // Body first so the frame lands on top of it.
        let lines = body_lines(window);
        for row in (header_row + 1)..bottom {
            let line = lines
                .get((row - header_row - 1) as usize)
                .map(String::as_str)
                .unwrap_or("");
            let mut chars = line.chars();
            for col in (left + 1)..right {
                let symbol = chars.next().map_or_else(|| " ".to_string(), String::from);
                put(buffer, bounds, col, row, &symbol, body_style);
            }
        }

        for col in left..=right {
            let symbol = if col == left {
                "┌"
            } else if col == right {
                "┐"
            } else {
                "─"
            };
            put(buffer, bounds, col, top, symbol, border_style);
            if bottom > header_row {
                let symbol = if col == left {
                    "└"
                } else if col == right {
                    "┘"
                } else {
                    "─"
                };
                put(buffer, bounds, col, bottom, symbol, border_style);
            }
        }
        for row in header_row..bottom.max(header_row + 1) {
            put(buffer, bounds, left, row, "│", border_style);
            put(buffer, bounds, right, row, "│", border_style);
        }

        // Header
        let controls = Self::controls(rect, window);
        let title_end = controls
            .iter()
            .map(|(col, _, _)| *col)
            .min()
            .unwrap_or(right)
            - 1;
        let mut title = window.title().chars();
        for col in (left + 1)..right {
            let symbol = if col > left + 1 && col < title_end {
                title.next().map_or_else(|| " ".to_string(), String::from)
            } else {
                " ".to_string()
            };
            put(buffer, bounds, col, header_row, &symbol, header_style);
        }
        for (col, _, symbol) in controls {
            put(buffer, bounds, col, header_row, symbol, header_style);
        }
    }

    fn hit_test(&self, rect: CellRect, window: &Window, col: i32, row: i32) -> HeaderAction {
        if !rect.contains(col, row) {
            return HeaderAction::None;
        }
        let (left, right, top, bottom) = (rect.x, rect.right(), rect.y, rect.bottom());
        if row == top {
            return HeaderAction::Resize(if col == left {
                ResizeEdge::TopLeft
            } else if col == right {
                ResizeEdge::TopRight
            } else {
                ResizeEdge::Top
            });
        }
        if row == top + 1 {
            if let Some((_, action, _)) = Self::controls(rect, window)
                .into_iter()
                .find(|(c, _, _)| *c == col)
            {
                return action;
            }
            if col != left && col != right {
                return HeaderAction::Drag;
            }
        }
        if row == bottom {
            return HeaderAction::Resize(if col == left {
                ResizeEdge::BottomLeft
            } else if col == right {
                ResizeEdge::BottomRight
            } else {
                ResizeEdge::Bottom
            });
        }
        if col == left {
            return HeaderAction::Resize(ResizeEdge::Left);
        }
        if col == right {
            return HeaderAction::Resize(ResizeEdge::Right);
        }
        HeaderAction::Body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;
    use crate::window::WindowId;
    use crate::window::config::WindowConfig;
    use crate::window::controls::{Control, button};

    fn window(fullscreen: bool) -> Window {
        let vp = Viewport::new(800, 600);
        Window::new(
            WindowId::new(1),
            "winbox-1".into(),
            WindowConfig::titled("Notes"),
            &vp,
            fullscreen,
        )
        .0
    }

    const RECT: CellRect = CellRect {
        x: 2,
        y: 1,
        width: 20,
        height: 6,
    };

    #[test]
    fn hit_test_maps_frame_regions() {
        let d = OpenStepDecorator;
        let w = window(true);
        assert_eq!(
            d.hit_test(RECT, &w, 2, 1),
            HeaderAction::Resize(ResizeEdge::TopLeft)
        );
        assert_eq!(d.hit_test(RECT, &w, 5, 2), HeaderAction::Drag);
        assert_eq!(d.hit_test(RECT, &w, 19, 2), HeaderAction::Close);
        assert_eq!(d.hit_test(RECT, &w, 17, 2), HeaderAction::Fullscreen);
        assert_eq!(d.hit_test(RECT, &w, 15, 2), HeaderAction::Maximize);
        assert_eq!(d.hit_test(RECT, &w, 13, 2), HeaderAction::Minimize);
        assert_eq!(
            d.hit_test(RECT, &w, 21, 4),
            HeaderAction::Resize(ResizeEdge::Right)
        );
        assert_eq!(
            d.hit_test(RECT, &w, 21, 6),
            HeaderAction::Resize(ResizeEdge::BottomRight)
        );
        assert_eq!(d.hit_test(RECT, &w, 8, 4), HeaderAction::Body);
        assert_eq!(d.hit_test(RECT, &w, 40, 4), HeaderAction::None);
    }

    #[test]
    fn fullscreen_button_needs_capability() {
        let d = OpenStepDecorator;
        let w = window(false);
        assert_eq!(d.hit_test(RECT, &w, 17, 2), HeaderAction::Maximize);
        assert_eq!(d.hit_test(RECT, &w, 15, 2), HeaderAction::Minimize);
    }

    #[test]
    fn custom_buttons_take_header_slots() {
        let d = OpenStepDecorator;
        let mut w = window(false);
        w.add_control(Control::new("pin", "*").at(3));
        w.remove_control(button::MIN);
        assert_eq!(d.hit_test(RECT, &w, 19, 2), HeaderAction::Control(0));
        assert_eq!(d.hit_test(RECT, &w, 17, 2), HeaderAction::Close);
        assert_eq!(d.hit_test(RECT, &w, 15, 2), HeaderAction::Maximize);
        assert_eq!(d.hit_test(RECT, &w, 13, 2), HeaderAction::Drag);

        let bounds = Rect::new(0, 0, 30, 10);
        let mut buffer = Buffer::empty(bounds);
        d.render_window(&mut buffer, bounds, RECT, &w);
        assert_eq!(buffer[(19, 2)].symbol(), "*");
    }

    #[test]
    fn renders_title_and_clips_to_bounds() {
        let d = OpenStepDecorator;
        let w = window(true);
        let bounds = Rect::new(0, 0, 10, 4);
        let mut buffer = Buffer::empty(bounds);
        d.render_window(&mut buffer, bounds, RECT, &w);
        assert_eq!(buffer[(2, 1)].symbol(), "┌");
        assert_eq!(buffer[(4, 2)].symbol(), "N");
        assert_eq!(buffer[(2, 3)].symbol(), "│");
    }
}
