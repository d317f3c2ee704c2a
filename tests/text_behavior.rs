use graphic_editor::behavior::text::DEFAULT_TEXT;
use graphic_editor::behavior::{
    MIN_FONT_SIZE, ResizePolicy, ShadowOptions, TextController, TextOptions, TextStyle, normalize_text_resize,
};
use graphic_editor::canvas::{ACCENT_COLOR, Canvas, CanvasObject, ObjectEvent, TextAlign};
use graphic_editor::config::EditorConfig;
use graphic_editor::element::TextDecoration;

fn textbox(id: &str, font_size: f64) -> CanvasObject {
    let mut object = TextController::create_text(
        "Hello",
        TextOptions {
            id: Some(id.to_owned()),
            font_size: Some(font_size),
            ..Default::default()
        },
    );
    object.width = 100.0;
    object.height = 50.0;
    object
}

fn canvas_with(objects: Vec<CanvasObject>) -> Canvas {
    let mut canvas = Canvas::new(&EditorConfig::default());
    for object in objects {
        canvas.add(object);
    }
    canvas
}

#[test]
fn test_create_text_defaults() {
    let object = TextController::create_text("Hi", TextOptions::default());
    let text = object.text().unwrap();
    assert_eq!(text.text, "Hi");
    assert_eq!(text.font_size, 20.0);
    assert_eq!(text.font_family, "Arial");
    assert_eq!(object.left, 100.0);
    assert_eq!(object.top, 100.0);
    assert!(object.is_editable);
    assert!(object.id.starts_with("text_"));

    let placeholder = TextController::create_text("", TextOptions::default());
    assert_eq!(placeholder.text().unwrap().text, DEFAULT_TEXT);
}

#[test]
fn test_single_axis_resize_reflows() {
    let mut object = textbox("t", 16.0);
    object.scale_x = 1.5;
    object.scale_y = 1.0;

    assert_eq!(normalize_text_resize(&mut object), Some(ResizePolicy::Reflow));
    assert_eq!((object.width, object.height), (150.0, 50.0));
    assert_eq!(object.text().unwrap().font_size, 16.0);
    assert_eq!((object.scale_x, object.scale_y), (1.0, 1.0));
}

#[test]
fn test_two_axis_resize_scales_by_smaller_factor() {
    let mut object = textbox("t", 16.0);
    object.scale_x = 1.5;
    object.scale_y = 1.4;

    let policy = normalize_text_resize(&mut object);
    assert!(matches!(policy, Some(ResizePolicy::Uniform { factor }) if (factor - 1.4).abs() < 1e-9));
    assert!((object.width - 140.0).abs() < 1e-9);
    assert!((object.height - 70.0).abs() < 1e-9);
    assert_eq!(object.text().unwrap().font_size, 22.0);
    assert_eq!((object.scale_x, object.scale_y), (1.0, 1.0));
}

#[test]
fn test_font_never_below_floor() {
    let mut object = textbox("t", 10.0);
    object.scale_x = 0.2;
    object.scale_y = 0.3;

    normalize_text_resize(&mut object);
    assert_eq!(object.text().unwrap().font_size, MIN_FONT_SIZE);
}

#[test]
fn test_tiny_scale_is_ignored() {
    let mut object = textbox("t", 16.0);
    object.scale_x = 1.005;
    object.scale_y = 0.995;

    assert_eq!(normalize_text_resize(&mut object), None);
    assert_eq!(object.width, 100.0);
}

#[test]
fn test_modified_event_normalizes() {
    let mut canvas = canvas_with(vec![textbox("t", 16.0)]);
    canvas.object_mut("t").unwrap().scale_x = 2.0;

    assert!(canvas.fire("t", &ObjectEvent::Modified));
    let object = canvas.object("t").unwrap();
    assert_eq!(object.width, 200.0);
    assert_eq!(object.scale_x, 1.0);
}

#[test]
fn test_edit_mode_is_exclusive() {
    let mut canvas = canvas_with(vec![textbox("a", 16.0), textbox("b", 16.0), textbox("c", 16.0)]);
    let mut controller = TextController::new();

    assert!(controller.enter_edit(&mut canvas, "a"));
    assert!(canvas.object("a").unwrap().is_editing());
    assert!(!canvas.object("b").unwrap().selectable);
    assert!(!canvas.object("c").unwrap().evented);

    assert!(controller.enter_edit(&mut canvas, "b"));
    assert_eq!(controller.editing_id(), Some("b"));
    let editing: Vec<_> = canvas.objects().iter().filter(|o| o.is_editing()).collect();
    assert_eq!(editing.len(), 1);
    assert!(!canvas.object("a").unwrap().selectable);

    assert!(controller.exit_edit(&mut canvas, "b"));
    assert!(canvas.objects().iter().all(|o| o.selectable && o.evented && !o.is_editing()));
}

#[test]
fn test_exit_edit_keeps_locked_objects_locked() {
    let mut locked = textbox("locked", 16.0);
    locked.selectable = false;
    locked.evented = false;
    let mut canvas = canvas_with(vec![textbox("a", 16.0), locked]);
    let mut controller = TextController::new();

    assert!(controller.enter_edit(&mut canvas, "a"));
    assert!(controller.force_exit_edit(&mut canvas));

    let locked = canvas.object("locked").unwrap();
    assert!(!locked.selectable);
    assert!(!locked.evented);
    assert!(!controller.is_editing());
}

#[test]
fn test_locked_textbox_cannot_be_edited() {
    let mut locked = textbox("t", 16.0);
    locked.selectable = false;
    let mut canvas = canvas_with(vec![locked]);
    let mut controller = TextController::new();

    assert!(!controller.enter_edit(&mut canvas, "t"));
    assert!(!controller.enter_edit(&mut canvas, "missing"));
    assert_eq!(controller.editing_id(), None);
}

#[test]
fn test_style_setters() {
    let mut canvas = canvas_with(vec![textbox("a", 16.0), textbox("b", 30.0)]);

    assert!(TextController::set_text(&mut canvas, "a", "Changed"));
    assert!(TextController::set_text_style(
        &mut canvas,
        "a",
        TextStyle {
            font_size: Some(48.0),
            fill: Some("#123456".to_owned()),
            text_decoration: Some(TextDecoration::LineThrough),
            ..Default::default()
        },
    ));
    assert!(TextController::set_text_align(&mut canvas, "a", TextAlign::Right));
    assert!(TextController::set_text_shadow(&mut canvas, "a", Some(ShadowOptions::default())));

    let a = canvas.object("a").unwrap();
    let text = a.text().unwrap();
    assert_eq!(text.text, "Changed");
    assert_eq!(text.font_size, 48.0);
    assert!(text.linethrough && !text.underline);
    assert_eq!(text.text_align, TextAlign::Right);
    assert_eq!(text.shadow.as_ref().unwrap().blur, 5.0);
    assert_eq!(a.fill, "#123456");

    assert!(TextController::copy_text_style(&mut canvas, "a", "b"));
    let b = canvas.object("b").unwrap();
    assert_eq!(b.text().unwrap().font_size, 48.0);
    assert_eq!(b.fill, "#123456");
    assert_eq!(b.text().unwrap().text, "Hello");

    assert!(!TextController::set_text(&mut canvas, "missing", "x"));
}

#[test]
fn test_switching_edit_keeps_real_locks() {
    let mut locked = textbox("locked", 16.0);
    locked.selectable = false;
    locked.evented = false;
    let mut canvas = canvas_with(vec![textbox("a", 16.0), textbox("b", 16.0), locked]);
    let mut controller = TextController::new();

    assert!(controller.enter_edit(&mut canvas, "a"));
    assert!(!controller.enter_edit(&mut canvas, "locked"));
    assert_eq!(controller.editing_id(), Some("a"));

    assert!(controller.enter_edit(&mut canvas, "b"));
    assert!(controller.enter_edit(&mut canvas, "a"));
    assert_eq!(controller.editing_id(), Some("a"));
    assert!(!canvas.object("b").unwrap().is_editing());

    assert!(controller.force_exit_edit(&mut canvas));
    assert!(canvas.object("b").unwrap().selectable);
    assert!(!canvas.object("locked").unwrap().selectable);
}

#[test]
fn test_strip_edit_state_on_copies() {
    let mut canvas = canvas_with(vec![textbox("a", 16.0), textbox("b", 16.0)]);
    let mut controller = TextController::new();
    assert!(controller.enter_edit(&mut canvas, "a"));

    let mut objects = canvas.objects().to_vec();
    controller.strip_edit_state(&mut objects);

    assert!(objects.iter().all(|o| o.selectable && o.evented && !o.is_editing()));
    assert_eq!(objects[0].appearance.border_color, ACCENT_COLOR);
    assert!(!canvas.object("b").unwrap().selectable);
    assert!(canvas.object("a").unwrap().is_editing());
}
