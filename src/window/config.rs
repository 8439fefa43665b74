use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::callbacks::Callbacks;
use super::view::WindowView;

/// A configured length or coordinate before it is resolved to pixels.
///
/// Lengths resolve against a base dimension (usually the viewport or a size
/// limit). `Center` and `End` additionally need the extent of the thing being
/// placed so they can center it or align its far edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
    Center,
    /// `"right"` for x, `"bottom"` for y.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LengthParseError {
    #[error("empty length")]
    Empty,
    #[error("invalid length `{0}`")]
    Invalid(String),
}

impl Length {
    /// Resolve to whole pixels. Fractions truncate toward zero.
    pub fn resolve(self, base: i32, extent: i32) -> i32 {
        let base = f64::from(base);
        let extent = f64::from(extent);
        let value = match self {
            Length::Px(px) => px,
            Length::Percent(pct) => base / 100.0 * pct + 0.5,
            Length::Center => (base - extent) / 2.0 + 0.5,
            Length::End => base - extent,
        };
        value as i32
    }

    /// A zero pixel value is how hosts spell "unset".
    pub fn is_set(self) -> bool {
        !matches!(self, Length::Px(px) if px == 0.0)
    }

    /// Parse, discarding malformed input so the caller falls back to its default.
    pub fn parse_lossy(input: &str) -> Option<Length> {
        input.parse().ok()
    }
}

impl From<i32> for Length {
    fn from(px: i32) -> Self {
        Length::Px(f64::from(px))
    }
}

impl From<f64> for Length {
    fn from(px: f64) -> Self {
        Length::Px(px)
    }
}

impl FromStr for Length {
    type Err = LengthParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        match trimmed {
            "" => return Err(LengthParseError::Empty),
            "center" => return Ok(Length::Center),
            "right" | "bottom" => return Ok(Length::End),
            _ => {}
        }
        // Leading numeric prefix, then an optional unit. Only `%` changes the
        // meaning; `px`, `em` or anything else is read as pixels.
        let split = trimmed
            .char_indices()
            .find(|&(idx, ch)| {
                !(ch.is_ascii_digit() || ch == '.' || ((ch == '-' || ch == '+') && idx == 0))
            })
            .map_or(trimmed.len(), |(idx, _)| idx);
        let (number, unit) = trimmed.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| LengthParseError::Invalid(input.to_string()))?;
        if unit.trim() == "%" {
            Ok(Length::Percent(value))
        } else {
            Ok(Length::Px(value))
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(pct) => write!(f, "{pct}%"),
            Length::Center => f.write_str("center"),
            Length::End => f.write_str("end"),
        }
    }
}

/// Opaque handle to host-owned content that can be moved into a window body
/// and handed back when the window releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Html(String),
    Url(String),
    Mount(MountHandle),
}

/// Size limits as configured. Kept on the window so percentage limits can be
/// resolved again whenever the viewport changes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeLimits {
    pub minwidth: Option<Length>,
    pub minheight: Option<Length>,
    pub maxwidth: Option<Length>,
    pub maxheight: Option<Length>,
}

/// Everything needed to construct a window.
///
/// Every geometric field is optional; missing (or zero) values take the
/// defaults described on [`crate::window::WindowManager::create`].
#[derive(Default)]
pub struct WindowConfig {
    pub id: Option<String>,
    pub index: Option<i32>,
    pub title: String,
    pub icon: Option<String>,
    pub content: Option<Content>,
    pub background: Option<String>,
    pub border: Option<i32>,
    pub header: Option<i32>,
    pub classes: Vec<String>,

    pub x: Option<Length>,
    pub y: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub limits: SizeLimits,
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,

    pub overflow: bool,
    /// Size the window to the viewport plus its chrome instead of using
    /// `width`/`height`. The result is still clamped to the limits.
    pub autosize: bool,
    /// Adds the `modal` root class.
    pub modal: bool,
    /// Adds the `animate` root class.
    pub animate: bool,
    pub min: bool,
    pub max: bool,
    pub hidden: bool,
    /// Disables dragging from the title bar (`no-move`).
    pub no_move: bool,
    /// Disables the double-activation maximize toggle (`no-max`).
    pub no_max: bool,

    pub callbacks: Callbacks,
    pub view: Option<Box<dyn WindowView>>,
}

impl WindowConfig {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for WindowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowConfig")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("limits", &self.limits)
            .field("autosize", &self.autosize)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// Resolve an optional configured length, falling back when unset.
pub(crate) fn resolve_or(length: Option<Length>, base: i32, extent: i32, default: i32) -> i32 {
    match length {
        Some(length) if length.is_set() => length.resolve(base, extent),
        _ => default,
    }
}
