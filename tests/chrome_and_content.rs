use std::cell::Cell;
use std::rc::Rc;

use page_wm::window::config::{Content, MountHandle, WindowConfig};
use page_wm::window::controls::{Control, ControlSlot, button};
use page_wm::window::view::{ChromePart, RecordingView, ViewCall};
use page_wm::window::{CloseOutcome, WindowManager};

#[test]
fn unchanged_geometry_is_not_pushed_to_the_view_again() {
    let view = RecordingView::new();
    let log = view.log();
    let mut wm = WindowManager::new(1000, 800);
    let id = wm.create(WindowConfig {
        view: Some(Box::new(view)),
        ..WindowConfig::titled("cached")
    });
    let lefts = |log: &Vec<ViewCall>| {
        log.iter()
            .filter(|call| matches!(call, ViewCall::Style(ChromePart::Root, p, _) if p == "left"))
            .count()
    };
    let before = lefts(&log.borrow());
    assert_eq!(before, 1);
    wm.refresh(id).unwrap();
    wm.refresh(id).unwrap();
    assert_eq!(lefts(&log.borrow()), before);
    wm.move_to(id, 40, 0).unwrap();
    assert_eq!(lefts(&log.borrow()), before + 1);
}

#[test]
fn docked_windows_expose_their_title_as_an_attribute() {
    let view = RecordingView::new();
    let log = view.log();
    let mut wm = WindowManager::new(1000, 800);
    let id = wm.create(WindowConfig {
        view: Some(Box::new(view)),
        ..WindowConfig::titled("Inbox")
    });
    wm.minimize(id).unwrap();
    assert!(log.borrow().contains(&ViewCall::Attribute(
        "title".to_string(),
        Some("Inbox".to_string())
    )));
    wm.restore(id).unwrap();
    assert!(log
        .borrow()
        .contains(&ViewCall::Attribute("title".to_string(), None)));
}

#[test]
fn title_setter_ignores_empty_values() {
    let mut wm = WindowManager::new(1000, 800);
    let id = wm.create(WindowConfig::titled("first"));
    wm.set_title(id, "").unwrap();
    assert_eq!(wm.window(id).unwrap().title(), "first");
    wm.set_title(id, "second").unwrap();
    assert_eq!(wm.window(id).unwrap().title(), "second");
}

#[test]
fn url_load_hook_fires_on_host_signal() {
    let loads = Rc::new(Cell::new(0));
    let counter = Rc::clone(&loads);
    let mut wm = WindowManager::new(1000, 800);
    let id = wm.create(WindowConfig::default());
    wm.set_url(
        id,
        "https://example.org",
        Some(Box::new(move |_| counter.set(counter.get() + 1))),
    )
    .unwrap();
    assert_eq!(
        wm.window(id).unwrap().content(),
        Some(&Content::Url("https://example.org".to_string()))
    );
    wm.notify_loaded(id).unwrap();
    wm.set_url(id, "https://example.org/next", None).unwrap();
    wm.notify_loaded(id).unwrap();
    assert_eq!(loads.get(), 2);
}

#[test]
fn mounted_content_is_handed_back() {
    let mut wm = WindowManager::new(1000, 800);
    let id = wm.create(WindowConfig::default());
    wm.mount(id, Content::Mount(MountHandle(3))).unwrap();
    assert_eq!(wm.unmount(id).unwrap(), Some(MountHandle(3)));
    assert_eq!(wm.unmount(id).unwrap(), None);
    wm.mount(id, Content::Mount(MountHandle(4))).unwrap();
    assert_eq!(
        wm.close(id, false).unwrap(),
        CloseOutcome::Closed {
            content: Some(MountHandle(4))
        }
    );
}

#[test]
fn classes_toggle_and_lock_center_keeps_y() {
    let mut wm = WindowManager::new(1000, 800);
    let id = wm.create(WindowConfig::default());
    assert!(wm.toggle_class(id, "pinned").unwrap());
    assert!(wm.window(id).unwrap().has_class("pinned"));
    assert!(!wm.toggle_class(id, "pinned").unwrap());
    wm.add_class(id, "modal").unwrap();
    wm.remove_class(id, "modal").unwrap();
    assert!(!wm.window(id).unwrap().has_class("modal"));

    wm.move_to(id, 10, 120).unwrap();
    wm.lock_center(id).unwrap();
    let rect = wm.window(id).unwrap().rect();
    assert_eq!((rect.x, rect.y), (250, 120));
}

#[test]
fn custom_buttons_join_the_row_and_reach_the_view() {
    let view = RecordingView::new();
    let log = view.log();
    let mut wm = WindowManager::new(1000, 800);
    let id = wm.create(WindowConfig {
        view: Some(Box::new(view)),
        ..WindowConfig::titled("buttons")
    });
    let pinned = Rc::new(Cell::new(false));
    let flag = Rc::clone(&pinned);
    wm.add_control(
        id,
        Control::new("pin", "*").at(1).on_click(move |_| flag.set(true)),
    )
    .unwrap();
    assert!(wm.remove_control(id, button::MIN).unwrap());
    assert!(!wm.remove_control(id, "missing").unwrap());

    assert_eq!(
        wm.window(id).unwrap().control_row(),
        vec![ControlSlot::Maximize, ControlSlot::Custom(0), ControlSlot::Close]
    );
    assert!(wm.click_control(id, 0).unwrap());
    assert!(pinned.get());
    assert!(!wm.click_control(id, 3).unwrap());

    let calls = log.borrow();
    assert!(calls.contains(&ViewCall::AddControl("pin".into(), 1)));
    assert!(calls.contains(&ViewCall::RemoveControl(button::MIN.into())));
}
