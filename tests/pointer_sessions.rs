use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use page_wm::window::callbacks::Callbacks;
use page_wm::window::config::{Length, SizeLimits, WindowConfig};
use page_wm::window::interaction::{CommitPolicy, Handle, PointerDown, PointerSample, ResizeEdge};
use page_wm::window::view::class;
use page_wm::window::{ManagerOptions, WindowId, WindowManager};

fn limited() -> WindowConfig {
    WindowConfig {
        x: Some(Length::Px(300.0)),
        y: Some(Length::Px(200.0)),
        width: Some(Length::Px(300.0)),
        height: Some(Length::Px(200.0)),
        limits: SizeLimits {
            minwidth: Some(Length::Px(200.0)),
            minheight: Some(Length::Px(100.0)),
            maxwidth: Some(Length::Px(500.0)),
            maxheight: Some(Length::Px(400.0)),
        },
        ..WindowConfig::default()
    }
}

fn manager(policy: CommitPolicy) -> WindowManager {
    WindowManager::with_options(
        1000,
        800,
        ManagerOptions {
            commit_policy: policy,
            ..ManagerOptions::default()
        },
    )
}

fn counted(moves: &Rc<Cell<u32>>) -> WindowConfig {
    let m = Rc::clone(moves);
    WindowConfig {
        callbacks: Callbacks::default().on_move(move |_, _, _| m.set(m.get() + 1)),
        ..WindowConfig::default()
    }
}

fn drag(wm: &mut WindowManager, id: WindowId, steps: i32, tick_every: i32) {
    wm.pointer_down(id, Handle::Drag, PointerSample::new(10, 10))
        .unwrap();
    for step in 1..=steps {
        wm.pointer_move(PointerSample::new(10 + step, 10 + step));
        if step % tick_every == 0 {
            wm.frame_tick();
        }
    }
}

#[test]
fn resizing_from_every_edge_respects_limits() {
    let mut wm = manager(CommitPolicy::Immediate);
    let id = wm.create(limited());
    let path = [(-400, -300), (50, 20), (600, 500), (-90, 40), (0, -700)];
    for edge in ResizeEdge::ALL {
        wm.pointer_down(id, Handle::Resize(edge), PointerSample::new(500, 400))
            .unwrap();
        for (dx, dy) in path {
            wm.pointer_move(PointerSample::new(500 + dx, 400 + dy));
            let rect = wm.window(id).unwrap().rect();
            assert!((200..=500).contains(&rect.width), "{edge:?} {rect:?}");
            assert!((100..=400).contains(&rect.height), "{edge:?} {rect:?}");
            assert!(rect.x >= 0 && rect.y >= 0, "{edge:?} {rect:?}");
        }
        wm.pointer_up();
    }
}

#[test]
fn session_locks_the_window_until_release() {
    let mut wm = manager(CommitPolicy::Batched);
    let id = wm.create(WindowConfig::default());
    let started = wm
        .pointer_down(id, Handle::Resize(ResizeEdge::BottomRight), PointerSample::new(0, 0))
        .unwrap();
    assert_eq!(started, PointerDown::Started);
    assert!(wm.window(id).unwrap().has_class(class::LOCK));
    assert_eq!(
        wm.active_interaction(),
        Some((id, Handle::Resize(ResizeEdge::BottomRight)))
    );
    wm.pointer_up();
    assert!(!wm.window(id).unwrap().has_class(class::LOCK));
    assert_eq!(wm.active_interaction(), None);
}

#[test]
fn batching_folds_samples_into_one_commit_per_frame() {
    let immediate_moves = Rc::new(Cell::new(0));
    let mut wm = manager(CommitPolicy::Immediate);
    let id = wm.create(counted(&immediate_moves));
    immediate_moves.set(0);
    drag(&mut wm, id, 40, 10);
    wm.pointer_up();
    let immediate_rect = wm.window(id).unwrap().rect();

    let batched_moves = Rc::new(Cell::new(0));
    let mut wm = manager(CommitPolicy::Batched);
    let id = wm.create(counted(&batched_moves));
    batched_moves.set(0);
    drag(&mut wm, id, 40, 10);
    wm.pointer_up();

    assert_eq!(immediate_moves.get(), 40);
    assert_eq!(batched_moves.get(), 4);
    assert_eq!(wm.window(id).unwrap().rect(), immediate_rect);
    assert_eq!(wm.window(id).unwrap().frame(), immediate_rect);
}

#[test]
fn release_drops_a_pending_commit() {
    let mut wm = manager(CommitPolicy::Batched);
    let id = wm.create(WindowConfig::default());
    drag(&mut wm, id, 5, 100);
    let win = wm.window(id).unwrap();
    assert_eq!((win.rect().x, win.rect().y), (5, 5));
    assert_eq!((win.frame().x, win.frame().y), (0, 0));
    wm.pointer_up();
    assert!(!wm.frame_tick());
    assert_eq!(wm.window(id).unwrap().frame().x, 0);
}

#[test]
fn slow_second_press_starts_a_drag() {
    let mut wm = manager(CommitPolicy::Batched);
    let id = wm.create(WindowConfig::default());
    let t0 = Instant::now();
    let point = PointerSample::new(10, 10);
    wm.pointer_down_at(id, Handle::Drag, point, t0).unwrap();
    wm.pointer_up();
    let second = wm
        .pointer_down_at(id, Handle::Drag, point, t0 + Duration::from_millis(450))
        .unwrap();
    assert_eq!(second, PointerDown::Started);
    assert!(!wm.window(id).unwrap().is_maximized());
}
