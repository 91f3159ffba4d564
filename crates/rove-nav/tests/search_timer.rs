//! Type-ahead expiry under the async driver, with tokio's clock paused.

use crossterm::event::KeyCode;
use rove_core::dom::{Document, Element, NodeId};
use rove_core::{Driver, NavEvent};
use rove_nav::{KeyNav, Message, NavOptions};
use std::time::Duration;

fn fruit() -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = Document::new(Element::new("ul"));
    let root = doc.root();
    let items = ["Ab one", "B", "Ab two"]
        .iter()
        .map(|l| {
            doc.append(root, Element::new("li").with_tab_index(-1).with_label(*l))
                .unwrap()
        })
        .collect();
    (doc, root, items)
}

fn press(ch: char, target: NodeId) -> Message {
    Message::Key(NavEvent::from_code(KeyCode::Char(ch), target))
}

#[tokio::test(start_paused = true)]
async fn pause_longer_than_window_starts_new_search() {
    let (doc, root, items) = fruit();
    let driver = Driver::new(KeyNav::new(doc, root, ()));
    let handle = driver.handle();
    let task = tokio::spawn(driver.run());

    handle.send(press('a', root)).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    handle.send(press('b', root)).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    handle.shutdown();
    let nav = task.await.unwrap();
    assert_eq!(nav.focused_child(), Some(items[1]));
    assert_eq!(nav.search_state().buffer(), "b");
}

#[tokio::test(start_paused = true)]
async fn keystrokes_inside_window_accumulate() {
    let (doc, root, items) = fruit();
    let driver = Driver::new(KeyNav::new(doc, root, ()));
    let handle = driver.handle();
    let task = tokio::spawn(driver.run());

    handle.send(press('a', root)).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.send(press('b', root)).unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    // 1300ms after the first key, but only 800ms after the second.
    handle.shutdown();
    let nav = task.await.unwrap();
    assert_eq!(nav.focused_child(), Some(items[0]));
    assert_eq!(nav.search_state().buffer(), "ab");
}

#[tokio::test(start_paused = true)]
async fn window_closes_after_configured_duration() {
    let (doc, root, _) = fruit();
    let options = NavOptions::default().with_search_duration(Duration::from_millis(200));
    let driver = Driver::new(KeyNav::with_options(doc, root, (), options));
    let handle = driver.handle();
    let task = tokio::spawn(driver.run());

    handle.send(press('a', root)).unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    handle.shutdown();
    let nav = task.await.unwrap();
    assert!(!nav.search_state().is_armed());
    assert_eq!(nav.search_state().buffer(), "");
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_expiry() {
    let (doc, root, _) = fruit();
    let driver = Driver::new(KeyNav::new(doc, root, ()));
    let handle = driver.handle();
    let task = tokio::spawn(driver.run());

    handle.send(press('a', root)).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.shutdown();
    let nav = task.await.unwrap();

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(nav.search_state().is_armed());
    assert_eq!(nav.search_state().buffer(), "a");
    assert!(handle.send(Message::Blur).is_err());
}
