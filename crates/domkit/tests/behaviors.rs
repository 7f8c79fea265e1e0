#![cfg(test)]
#![allow(clippy::unwrap_used, reason = "tests")]

use dom::events::{MOUSE_DOWN, MOUSE_MOVE, MOUSE_UP};
use dom::{Document, NodeId, PointerButton};
use domkit::{Element, Kit, KitConfig, StyleConfig};

const LIFTED: &str = "0 4px 12px rgba(0, 0, 0, 0.2)";

fn kit() -> Kit {
    let _ignored = env_logger::builder().is_test(true).try_init();
    let config = KitConfig {
        z_index_base: Some(1000),
        ..KitConfig::default()
    };
    Kit::with_config(Document::new(), config)
}

/// A 200x100 box at (100, 50) in the body.
fn window(kit: &Kit, extra: &StyleConfig) -> Element {
    let element = kit.create("div");
    element.append_to(&kit.body()).styles(
        &StyleConfig::new()
            .with("left", "100px")
            .with("top", "50px")
            .with("width", "200px")
            .with("height", "100px"),
    );
    element.styles(extra);
    element
}

fn press(kit: &Kit, node: NodeId, x: i32, y: i32) {
    kit.document()
        .dispatch_pointer(node, MOUSE_DOWN, x, y, PointerButton::Primary);
}

fn move_to(kit: &Kit, x: i32, y: i32) {
    let root = kit.document().root();
    kit.document()
        .dispatch_pointer(root, MOUSE_MOVE, x, y, PointerButton::Primary);
}

fn release(kit: &Kit, x: i32, y: i32) {
    let root = kit.document().root();
    kit.document()
        .dispatch_pointer(root, MOUSE_UP, x, y, PointerButton::Primary);
}

fn z_index(element: &Element) -> i64 {
    element.style("z-index").unwrap().parse().unwrap()
}

fn resize_handle(element: &Element) -> Element {
    element.find(".styler-resize-handle").unwrap()
}

#[test]
fn front_bring_issues_increasing_z_indices() {
    let kit = kit();
    let first = window(&kit, &StyleConfig::new());
    let second = window(&kit, &StyleConfig::new().with("drag", true));
    let third = window(&kit, &StyleConfig::new().with("resize", true));

    let mut last = 1000;
    for element in [&first, &second, &first, &third, &second, &third] {
        press(&kit, element.node(), 110, 60);
        release(&kit, 110, 60);
        let current = z_index(element);
        assert!(current > last, "{current} is not above {last}");
        last = current;
    }
}

#[test]
fn front_bring_fires_for_descendants_and_ignores_other_buttons() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new());
    element.set_html("<p><span>deep</span></p>");
    let span = element.find("span").unwrap();

    kit.document()
        .dispatch_pointer(element.node(), MOUSE_DOWN, 0, 0, PointerButton::Secondary);
    assert_eq!(element.style("z-index"), None);

    press(&kit, span.node(), 0, 0);
    assert_eq!(z_index(&element), 1001);
}

#[test]
fn drag_keeps_the_grab_offset() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new().with("drag", true));
    assert_eq!(element.style("position").as_deref(), Some("absolute"));
    assert_eq!(element.style("user-select").as_deref(), Some("none"));
    assert_eq!(element.style("transition").as_deref(), Some("box-shadow 0.2s ease"));

    press(&kit, element.node(), 130, 70);
    assert_eq!(element.style("box-shadow").as_deref(), Some(LIFTED));
    // One value from front-bring, one from the drag start.
    assert_eq!(z_index(&element), 1002);

    move_to(&kit, 200, 300);
    assert_eq!(element.style("left").as_deref(), Some("170px"));
    assert_eq!(element.style("top").as_deref(), Some("280px"));

    move_to(&kit, 0, 0);
    assert_eq!(element.style("left").as_deref(), Some("-30px"));
    assert_eq!(element.style("top").as_deref(), Some("-20px"));

    release(&kit, 0, 0);
    assert_eq!(element.style("box-shadow").as_deref(), Some("none"));
}

#[test]
fn drag_by_handle_only_starts_on_the_handle() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new());
    element.set_html("<div class=\"title\">Title</div><p>body</p>");
    element.styles(&StyleConfig::new().with("drag", ".title"));
    assert!(element.is_draggable());

    let body = element.find("p").unwrap();
    press(&kit, body.node(), 150, 90);
    assert_eq!(element.style("box-shadow"), None);
    move_to(&kit, 400, 400);
    assert_eq!(element.style("left").as_deref(), Some("100px"));

    let title = element.find(".title").unwrap();
    press(&kit, title.node(), 110, 55);
    move_to(&kit, 120, 65);
    assert_eq!(element.style("left").as_deref(), Some("110px"));
    assert_eq!(element.style("top").as_deref(), Some("60px"));
}

#[test]
fn listeners_are_removed_on_release() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new().with("drag", true).with("resize", true));
    let document = kit.document();

    press(&kit, element.node(), 110, 60);
    assert_eq!(document.total_listener_count(MOUSE_MOVE), 1);
    release(&kit, 110, 60);
    assert_eq!(document.total_listener_count(MOUSE_MOVE), 0);
    assert_eq!(document.total_listener_count(MOUSE_UP), 0);

    move_to(&kit, 500, 500);
    assert_eq!(element.style("left").as_deref(), Some("100px"));

    let handle = resize_handle(&element);
    press(&kit, handle.node(), 295, 145);
    release(&kit, 295, 145);
    move_to(&kit, 900, 900);
    assert_eq!(element.style("width").as_deref(), Some("200px"));
    assert_eq!(document.total_listener_count(MOUSE_MOVE), 0);
}

#[test]
fn second_press_replaces_the_open_gesture() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new().with("drag", true));
    press(&kit, element.node(), 110, 60);
    press(&kit, element.node(), 120, 70);
    assert_eq!(kit.document().total_listener_count(MOUSE_MOVE), 1);
    release(&kit, 120, 70);
    assert_eq!(kit.document().total_listener_count(MOUSE_MOVE), 0);
}

#[test]
fn resize_handle_is_created_once_with_its_styles() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new().with("resize", true));
    element.styles(&StyleConfig::new().with("resize", true));
    element.enable_resize();
    assert!(element.is_resizable());
    assert_eq!(element.find_all(".styler-resize-handle").len(), 1);

    let handle = resize_handle(&element);
    assert_eq!(element.children().last(), Some(&handle));
    assert_eq!(handle.style("position").as_deref(), Some("absolute"));
    assert_eq!(handle.style("width").as_deref(), Some("10px"));
    assert_eq!(handle.style("height").as_deref(), Some("10px"));
    assert_eq!(handle.style("right").as_deref(), Some("0"));
    assert_eq!(handle.style("bottom").as_deref(), Some("0"));
    assert_eq!(handle.style("cursor").as_deref(), Some("nwse-resize"));
    assert_eq!(handle.style("background").as_deref(), Some("transparent"));
    assert_eq!(handle.style("z-index").as_deref(), Some("10"));
}

#[test]
fn resize_follows_the_pointer_delta() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new().with("resize", true));
    let handle = resize_handle(&element);

    press(&kit, handle.node(), 295, 145);
    move_to(&kit, 335, 165);
    assert_eq!(element.style("width").as_deref(), Some("240px"));
    assert_eq!(element.style("height").as_deref(), Some("120px"));

    // Only the latest pointer position matters.
    move_to(&kit, 100, 400);
    move_to(&kit, 305, 140);
    assert_eq!(element.style("width").as_deref(), Some("210px"));
    assert_eq!(element.style("height").as_deref(), Some("95px"));

    // No clamping.
    move_to(&kit, 0, 0);
    assert_eq!(element.style("width").as_deref(), Some("-95px"));
    release(&kit, 0, 0);
}

#[test]
fn pressing_the_resize_handle_never_drags() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new().with("drag", true).with("resize", true));
    let handle = resize_handle(&element);

    press(&kit, handle.node(), 295, 145);
    // Front-bring still runs.
    assert_eq!(z_index(&element), 1001);
    assert_eq!(element.style("box-shadow"), None);

    move_to(&kit, 305, 155);
    assert_eq!(element.style("left").as_deref(), Some("100px"));
    assert_eq!(element.style("top").as_deref(), Some("50px"));
    assert_eq!(element.style("width").as_deref(), Some("210px"));
    release(&kit, 305, 155);
}

#[test]
fn style_config_passes_properties_through() {
    let kit = kit();
    let element = kit.create("div");
    element.append_to(&kit.body());
    let config = StyleConfig::from_json(r##"{"color": "red", "backgroundColor": "#fff", "opacity": 0.5, "drag": true}"##)
        .unwrap();
    element.css(&config);

    assert_eq!(element.style("color").as_deref(), Some("red"));
    assert_eq!(element.style("background-color").as_deref(), Some("#fff"));
    assert_eq!(element.style("opacity").as_deref(), Some("0.5"));
    assert!(element.is_draggable());
    assert!(!element.attr("style").unwrap().contains("drag"));
}

#[test]
fn unrecognized_directive_values_are_ignored() {
    let kit = kit();
    let element = window(
        &kit,
        &StyleConfig::new().with("drag", false).with("resize", "yes").with("drag", 3),
    );
    assert!(!element.is_draggable());
    assert!(!element.is_resizable());
    assert!(element.find(".styler-resize-handle").is_none());
}

#[test]
fn missing_drag_handle_attaches_nothing() {
    let kit = kit();
    let element = kit.create("div");
    element.append_to(&kit.body()).enable_drag(Some(".nonexistent"));

    assert!(!element.is_draggable());
    assert_eq!(element.style("position"), None);
    assert_eq!(kit.document().listener_count(element.node(), MOUSE_DOWN), 0);

    element.enable_drag(Some("p:hover"));
    assert!(!element.is_draggable());
}

#[test]
fn repeated_styles_do_not_duplicate_listeners() {
    let kit = kit();
    let config = StyleConfig::new().with("drag", true).with("resize", true);
    let element = window(&kit, &config);
    element.styles(&config).styles(&config);

    // Front-bring and drag.
    assert_eq!(kit.document().listener_count(element.node(), MOUSE_DOWN), 2);
    assert_eq!(element.find_all(".styler-resize-handle").len(), 1);

    press(&kit, element.node(), 110, 60);
    assert_eq!(z_index(&element), 1002);
    release(&kit, 110, 60);
}

#[test]
fn custom_handle_class_still_blocks_drag() {
    let _ignored = env_logger::builder().is_test(true).try_init();
    let mut config = KitConfig::from_json(r#"{"resize_handle": {"class": "corner", "size_px": 16}}"#).unwrap();
    config.z_index_base = Some(0);
    let kit = Kit::with_config(Document::new(), config);
    let element = window(&kit, &StyleConfig::new().with("drag", true).with("resize", true));

    let handle = element.find(".corner").unwrap();
    assert_eq!(handle.style("width").as_deref(), Some("16px"));
    press(&kit, handle.node(), 290, 140);
    assert_eq!(element.style("box-shadow"), None);
    assert_eq!(z_index(&element), 1);
    release(&kit, 290, 140);
}

#[test]
fn disposed_element_cannot_gain_a_resize_handle() {
    let kit = kit();
    let element = window(&kit, &StyleConfig::new());
    let node = element.node();
    element.clone().dispose();

    element.enable_resize().enable_drag(None);
    assert!(!element.is_resizable());
    assert!(!element.is_draggable());
    assert_eq!(kit.document().listener_count(node, MOUSE_DOWN), 0);
    assert!(kit.query(".styler-resize-handle").is_err());
}
