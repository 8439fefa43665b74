use std::fmt;

use super::WindowId;

pub type Hook = Box<dyn FnMut(WindowId)>;
type PointHook = Box<dyn FnMut(WindowId, i32, i32)>;
type CloseHook = Box<dyn FnMut(WindowId, bool) -> bool>;

/// Lifecycle hooks supplied by the caller. Unset slots behave as no-ops.
///
/// Hooks run synchronously at the point the engine documents and are not
/// guarded: a panic inside a hook unwinds through the engine call.
#[derive(Default)]
pub struct Callbacks {
    oncreate: Option<Hook>,
    onclose: Option<CloseHook>,
    onfocus: Option<Hook>,
    onblur: Option<Hook>,
    onmove: Option<PointHook>,
    onresize: Option<PointHook>,
    onfullscreen: Option<Hook>,
    onminimize: Option<Hook>,
    onmaximize: Option<Hook>,
    onrestore: Option<Hook>,
    onhide: Option<Hook>,
    onshow: Option<Hook>,
    onload: Option<Hook>,
}

impl Callbacks {
    pub fn on_create(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.oncreate = Some(Box::new(hook));
        self
    }

    /// Returning `true` from the hook vetoes the close.
    pub fn on_close(mut self, hook: impl FnMut(WindowId, bool) -> bool + 'static) -> Self {
        self.onclose = Some(Box::new(hook));
        self
    }

    pub fn on_focus(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onfocus = Some(Box::new(hook));
        self
    }

    pub fn on_blur(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onblur = Some(Box::new(hook));
        self
    }

    pub fn on_move(mut self, hook: impl FnMut(WindowId, i32, i32) + 'static) -> Self {
        self.onmove = Some(Box::new(hook));
        self
    }

    pub fn on_resize(mut self, hook: impl FnMut(WindowId, i32, i32) + 'static) -> Self {
        self.onresize = Some(Box::new(hook));
        self
    }

    pub fn on_fullscreen(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onfullscreen = Some(Box::new(hook));
        self
    }

    pub fn on_minimize(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onminimize = Some(Box::new(hook));
        self
    }

    pub fn on_maximize(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onmaximize = Some(Box::new(hook));
        self
    }

    pub fn on_restore(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onrestore = Some(Box::new(hook));
        self
    }

    pub fn on_hide(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onhide = Some(Box::new(hook));
        self
    }

    pub fn on_show(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onshow = Some(Box::new(hook));
        self
    }

    pub fn on_load(mut self, hook: impl FnMut(WindowId) + 'static) -> Self {
        self.onload = Some(Box::new(hook));
        self
    }

    pub(crate) fn set_onload(&mut self, hook: Option<Hook>) {
        if hook.is_some() {
            self.onload = hook;
        }
    }

    pub(crate) fn emit_create(&mut self, id: WindowId) {
        fire(&mut self.oncreate, id);
    }

    pub(crate) fn emit_close(&mut self, id: WindowId, force: bool) -> bool {
        self.onclose.as_mut().is_some_and(|hook| hook(id, force))
    }

    pub(crate) fn emit_focus(&mut self, id: WindowId) {
        fire(&mut self.onfocus, id);
    }

    pub(crate) fn emit_blur(&mut self, id: WindowId) {
        fire(&mut self.onblur, id);
    }

    pub(crate) fn emit_move(&mut self, id: WindowId, x: i32, y: i32) {
        if let Some(hook) = self.onmove.as_mut() {
            hook(id, x, y);
        }
    }

    pub(crate) fn emit_resize(&mut self, id: WindowId, width: i32, height: i32) {
        if let Some(hook) = self.onresize.as_mut() {
            hook(id, width, height);
        }
    }

    pub(crate) fn emit_fullscreen(&mut self, id: WindowId) {
        fire(&mut self.onfullscreen, id);
    }

    pub(crate) fn emit_minimize(&mut self, id: WindowId) {
        fire(&mut self.onminimize, id);
    }

    pub(crate) fn emit_maximize(&mut self, id: WindowId) {
        fire(&mut self.onmaximize, id);
    }

    pub(crate) fn emit_restore(&mut self, id: WindowId) {
        fire(&mut self.onrestore, id);
    }

    pub(crate) fn emit_hide(&mut self, id: WindowId) {
        fire(&mut self.onhide, id);
    }

    pub(crate) fn emit_show(&mut self, id: WindowId) {
        fire(&mut self.onshow, id);
    }

    pub(crate) fn emit_load(&mut self, id: WindowId) {
        fire(&mut self.onload, id);
    }
}

fn fire(slot: &mut Option<Hook>, id: WindowId) {
    if let Some(hook) = slot.as_mut() {
        hook(id);
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<&str> = [
            ("oncreate", self.oncreate.is_some()),
            ("onclose", self.onclose.is_some()),
            ("onfocus", self.onfocus.is_some()),
            ("onblur", self.onblur.is_some()),
            ("onmove", self.onmove.is_some()),
            ("onresize", self.onresize.is_some()),
            ("onfullscreen", self.onfullscreen.is_some()),
            ("onminimize", self.onminimize.is_some()),
            ("onmaximize", self.onmaximize.is_some()),
            ("onrestore", self.onrestore.is_some()),
            ("onhide", self.onhide.is_some()),
            ("onshow", self.onshow.is_some()),
            ("onload", self.onload.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();
        f.debug_struct("Callbacks").field("set", &set).finish()
    }
}
