use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use super::config::Content;

/// State classes the engine toggles on a window's chrome.
pub mod class {
    pub const FOCUS: &str = "focus";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const HIDE: &str = "hide";
    pub const NO_FULL: &str = "no-full";
    /// Set while a pointer session is active so the body ignores pointer input.
    pub const LOCK: &str = "wb-lock";
    pub const NO_MOVE: &str = "no-move";
    pub const NO_MAX: &str = "no-max";
    pub const MODAL: &str = "modal";
    pub const ANIMATE: &str = "animate";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChromePart {
    Root,
    Header,
    Title,
    Icon,
    Body,
}

/// The skin a window renders through.
///
/// The engine never inspects the skin; it only pushes state into it. All
/// calls arrive already deduplicated by [`StyleCache`].
pub trait WindowView {
    fn set_style(&mut self, part: ChromePart, property: &str, value: &str);
    fn set_text(&mut self, part: ChromePart, text: &str);
    fn set_attribute(&mut self, name: &str, value: Option<&str>);
    fn set_class(&mut self, class: &str, enabled: bool);

    fn set_content(&mut self, _content: Option<&Content>) {}

    /// A custom title bar button was inserted at `index`, counted from the
    /// left of the button row.
    fn add_control(&mut self, _class: &str, _glyph: &str, _index: usize) {}

    fn remove_control(&mut self, _class: &str) {}

    /// Called once when the window is closed.
    fn release(&mut self) {}
}

/// A view that discards everything. Used when the host supplies none.
#[derive(Debug, Default)]
pub struct NullView;

impl WindowView for NullView {
    fn set_style(&mut self, _part: ChromePart, _property: &str, _value: &str) {}
    fn set_text(&mut self, _part: ChromePart, _text: &str) {}
    fn set_attribute(&mut self, _name: &str, _value: Option<&str>) {}
    fn set_class(&mut self, _class: &str, _enabled: bool) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Style(ChromePart, String, String),
    Text(ChromePart, String),
    Attribute(String, Option<String>),
    Class(String, bool),
    Content(Option<Content>),
    AddControl(String, usize),
    RemoveControl(String),
    Release,
}

/// A view that records every call it receives into a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    log: Rc<RefCell<Vec<ViewCall>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<Vec<ViewCall>>> {
        Rc::clone(&self.log)
    }
}

impl WindowView for RecordingView {
    fn set_style(&mut self, part: ChromePart, property: &str, value: &str) {
        self.log.borrow_mut().push(ViewCall::Style(
            part,
            property.to_string(),
            value.to_string(),
        ));
    }

    fn set_text(&mut self, part: ChromePart, text: &str) {
        self.log
            .borrow_mut()
            .push(ViewCall::Text(part, text.to_string()));
    }

    fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        self.log.borrow_mut().push(ViewCall::Attribute(
            name.to_string(),
            value.map(str::to_string),
        ));
    }

    fn set_class(&mut self, class: &str, enabled: bool) {
        self.log
            .borrow_mut()
            .push(ViewCall::Class(class.to_string(), enabled));
    }

    fn set_content(&mut self, content: Option<&Content>) {
        self.log
            .borrow_mut()
            .push(ViewCall::Content(content.cloned()));
    }

    fn add_control(&mut self, class: &str, _glyph: &str, index: usize) {
        self.log
            .borrow_mut()
            .push(ViewCall::AddControl(class.to_string(), index));
    }

    fn remove_control(&mut self, class: &str) {
        self.log
            .borrow_mut()
            .push(ViewCall::RemoveControl(class.to_string()));
    }

    fn release(&mut self) {
        self.log.borrow_mut().push(ViewCall::Release);
    }
}

/// Last value written per (part, key). Writes that would not change anything
/// are reported as redundant so the caller can skip them.
#[derive(Debug, Default)]
pub struct StyleCache {
    styles: BTreeMap<(ChromePart, String), String>,
    texts: BTreeMap<ChromePart, String>,
    attributes: BTreeMap<String, Option<String>>,
}

impl StyleCache {
    /// Returns `true` if `value` differs from the cached value.
    pub fn update_style(&mut self, part: ChromePart, property: &str, value: &str) -> bool {
        let key = (part, property.to_string());
        if self.styles.get(&key).is_some_and(|cached| cached == value) {
            return false;
        }
        self.styles.insert(key, value.to_string());
        true
    }

    pub fn update_text(&mut self, part: ChromePart, text: &str) -> bool {
        if self.texts.get(&part).is_some_and(|cached| cached == text) {
            return false;
        }
        self.texts.insert(part, text.to_string());
        true
    }

    pub fn update_attribute(&mut self, name: &str, value: Option<&str>) -> bool {
        if self
            .attributes
            .get(name)
            .is_some_and(|cached| cached.as_deref() == value)
        {
            return false;
        }
        self.attributes
            .insert(name.to_string(), value.map(str::to_string));
        true
    }

    pub fn style(&self, part: ChromePart, property: &str) -> Option<&str> {
        self.styles
            .get(&(part, property.to_string()))
            .map(String::as_str)
    }
}

/// A window's view together with its memoization state and class set.
pub(crate) struct Chrome {
    view: Box<dyn WindowView>,
    cache: StyleCache,
    classes: BTreeSet<String>,
}

impl Chrome {
    pub(crate) fn new(view: Option<Box<dyn WindowView>>) -> Self {
        Self {
            view: view.unwrap_or_else(|| Box::new(NullView)),
            cache: StyleCache::default(),
            classes: BTreeSet::new(),
        }
    }

    pub(crate) fn style(&mut self, part: ChromePart, property: &str, value: &str) {
        if self.cache.update_style(part, property, value) {
            self.view.set_style(part, property, value);
        }
    }

    pub(crate) fn px(&mut self, property: &str, value: i32) {
        self.style(ChromePart::Root, property, &format!("{value}px"));
    }

    pub(crate) fn text(&mut self, part: ChromePart, text: &str) {
        if self.cache.update_text(part, text) {
            self.view.set_text(part, text);
        }
    }

    pub(crate) fn attribute(&mut self, name: &str, value: Option<&str>) {
        if self.cache.update_attribute(name, value) {
            self.view.set_attribute(name, value);
        }
    }

    /// Returns `true` if the class set changed.
    pub(crate) fn set_class(&mut self, class: &str, enabled: bool) -> bool {
        let changed = if enabled {
            self.classes.insert(class.to_string())
        } else {
            self.classes.remove(class)
        };
        if changed {
            self.view.set_class(class, enabled);
        }
        changed
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub(crate) fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub(crate) fn content(&mut self, content: Option<&Content>) {
        self.view.set_content(content);
    }

    pub(crate) fn add_control(&mut self, class: &str, glyph: &str, index: usize) {
        self.view.add_control(class, glyph, index);
    }

    pub(crate) fn remove_control(&mut self, class: &str) {
        self.view.remove_control(class);
    }

    pub(crate) fn cache(&self) -> &StyleCache {
        &self.cache
    }

    pub(crate) fn release(&mut self) {
        self.view.release();
    }
}

impl fmt::Debug for Chrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chrome")
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_writes_reach_the_view_once() {
        let view = RecordingView::new();
        let log = view.log();
        let mut chrome = Chrome::new(Some(Box::new(view)));

        chrome.px("left", 10);
        chrome.px("left", 10);
        chrome.px("left", 12);
        chrome.text(ChromePart::Title, "a");
        chrome.text(ChromePart::Title, "a");

        let calls = log.borrow();
        assert_eq!(
            *calls,
            vec![
                ViewCall::Style(ChromePart::Root, "left".into(), "10px".into()),
                ViewCall::Style(ChromePart::Root, "left".into(), "12px".into()),
                ViewCall::Text(ChromePart::Title, "a".into()),
            ]
        );
    }

    #[test]
    fn class_toggles_report_changes_only() {
        let mut chrome = Chrome::new(None);
        assert!(chrome.set_class(class::FOCUS, true));
        assert!(!chrome.set_class(class::FOCUS, true));
        assert!(chrome.has_class(class::FOCUS));
        assert!(chrome.set_class(class::FOCUS, false));
        assert!(!chrome.set_class(class::FOCUS, false));
    }

    #[test]
    fn attribute_removal_is_memoized() {
        let mut cache = StyleCache::default();
        assert!(cache.update_attribute("title", Some("A")));
        assert!(cache.update_attribute("title", None));
        assert!(!cache.update_attribute("title", None));
    }
}
