//! Terminal mouse input expressed in page pixels.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::window::FloatRect;
use crate::window::decorator::CellRect;
use crate::window::interaction::PointerSample;

/// Pixel size of one terminal cell. Engine geometry is in pixels; the
/// terminal only knows cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 16,
        }
    }
}

impl CellMetrics {
    /// Page position of the center of a cell.
    pub fn page_point(&self, column: u16, row: u16) -> PointerSample {
        PointerSample::new(
            i32::from(column) * self.cell_width + self.cell_width / 2,
            i32::from(row) * self.cell_height + self.cell_height / 2,
        )
    }

    pub fn page_size(&self, columns: u16, rows: u16) -> (i32, i32) {
        (
            i32::from(columns) * self.cell_width,
            i32::from(rows) * self.cell_height,
        )
    }

    /// Smallest cell rectangle covering a pixel rectangle.
    pub fn cell_rect(&self, rect: FloatRect) -> CellRect {
        let x = rect.x.div_euclid(self.cell_width);
        let y = rect.y.div_euclid(self.cell_height);
        let right = (rect.x + rect.width + self.cell_width - 1).div_euclid(self.cell_width);
        let bottom = (rect.y + rect.height + self.cell_height - 1).div_euclid(self.cell_height);
        CellRect {
            x,
            y,
            width: (right - x).max(0),
            height: (bottom - y).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { column: u16, row: u16, point: PointerSample },
    Move(PointerSample),
    Up(PointerSample),
}

/// Left-button presses, drags and releases. Everything else is dropped.
pub fn translate(event: &MouseEvent, metrics: CellMetrics) -> Option<PointerEvent> {
    let point = metrics.page_point(event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down {
            column: event.column,
            row: event.row,
            point,
        }),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Move(point)),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up(point)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn cell_rect_covers_partial_cells() {
        let m = CellMetrics::default();
        let r = m.cell_rect(FloatRect {
            x: 4,
            y: 0,
            width: 500,
            height: 400,
        });
        assert_eq!(r, CellRect { x: 0, y: 0, width: 63, height: 25 });
    }

    #[test]
    fn cell_rect_floors_negative_origins() {
        let m = CellMetrics::default();
        let r = m.cell_rect(FloatRect {
            x: -10,
            y: -1,
            width: 20,
            height: 17,
        });
        assert_eq!((r.x, r.y), (-2, -1));
        assert_eq!((r.width, r.height), (4, 2));
    }

    #[test]
    fn translates_left_button_only() {
        let m = CellMetrics::default();
        let down = translate(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 1), m);
        assert_eq!(
            down,
            Some(PointerEvent::Down {
                column: 2,
                row: 1,
                point: PointerSample::new(20, 24)
            })
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Right), 2, 1), m),
            None
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0), m),
            Some(PointerEvent::Move(PointerSample::new(4, 8)))
        );
    }
}
