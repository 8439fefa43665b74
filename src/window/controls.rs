use std::fmt;

use super::WindowId;
use super::view::class;

/// Class names of the built-in title bar buttons, usable with
/// [`crate::window::WindowManager::remove_control`].
pub mod button {
    pub const MIN: &str = "wb-min";
    pub const MAX: &str = "wb-max";
    pub const FULL: &str = "wb-full";
    pub const CLOSE: &str = "wb-close";
}

type ClickHook = Box<dyn FnMut(WindowId)>;

/// A caller-supplied title bar button.
pub struct Control {
    pub class: String,
    /// Drawn in place of a button image.
    pub glyph: String,
    /// Position in the button row, counted from the left. Past the end means
    /// last.
    pub index: usize,
    click: Option<ClickHook>,
}

impl Control {
    pub fn new(class: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            glyph: glyph.into(),
            index: 0,
            click: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn on_click(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.click = Some(Box::new(hook));
        self
    }

    pub(crate) fn click(&mut self, id: WindowId) {
        if let Some(hook) = self.click.as_mut() {
            hook(id);
        }
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("class", &self.class)
            .field("glyph", &self.glyph)
            .field("index", &self.index)
            .field("click", &self.click.is_some())
            .finish()
    }
}

/// One button of the title bar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSlot {
    Minimize,
    Maximize,
    Fullscreen,
    Close,
    /// Position in the window's custom control list.
    Custom(usize),
}

impl ControlSlot {
    fn builtin_class(self) -> Option<&'static str> {
        match self {
            ControlSlot::Minimize => Some(button::MIN),
            ControlSlot::Maximize => Some(button::MAX),
            ControlSlot::Fullscreen => Some(button::FULL),
            ControlSlot::Close => Some(button::CLOSE),
            ControlSlot::Custom(_) => None,
        }
    }
}

/// Custom buttons plus the built-ins the caller removed.
#[derive(Debug, Default)]
pub(crate) struct ControlSet {
    custom: Vec<Control>,
    removed: Vec<&'static str>,
}

impl ControlSet {
    pub(crate) fn add(&mut self, control: Control) {
        self.custom.push(control);
    }

    /// Remove the first button carrying `name`, custom buttons first.
    pub(crate) fn remove(&mut self, name: &str) -> bool {
        if let Some(pos) = self.custom.iter().position(|c| c.class == name) {
            self.custom.remove(pos);
            return true;
        }
        let builtin = [button::MIN, button::MAX, button::FULL, button::CLOSE]
            .into_iter()
            .find(|b| *b == name);
        match builtin {
            Some(b) if !self.removed.contains(&b) => {
                self.removed.push(b);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&Control> {
        self.custom.get(slot)
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut Control> {
        self.custom.get_mut(slot)
    }

    /// The button row from left to right. Each custom button is inserted at
    /// its index in the order it was added.
    pub(crate) fn row(&self, classes: impl Fn(&str) -> bool) -> Vec<ControlSlot> {
        let mut row = vec![ControlSlot::Minimize, ControlSlot::Maximize];
        if !classes(class::NO_FULL) {
            row.push(ControlSlot::Fullscreen);
        }
        row.push(ControlSlot::Close);
        row.retain(|slot| {
            slot.builtin_class()
                .is_none_or(|name| !self.removed.contains(&name))
        });
        for (pos, control) in self.custom.iter().enumerate() {
            row.insert(control.index.min(row.len()), ControlSlot::Custom(pos));
        }
        row
    }
}
