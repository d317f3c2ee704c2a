use graphic_editor::behavior::{TextController, TextOptions};
use graphic_editor::canvas::{Canvas, FontStyle, LockFlags, TextAlign};
use graphic_editor::config::EditorConfig;
use graphic_editor::style::{BOLD_WEIGHT, NORMAL_WEIGHT, StyleManager};

fn setup() -> (StyleManager, Canvas) {
    let mut canvas = Canvas::new(&EditorConfig::default());
    for id in ["a", "b"] {
        canvas.add(TextController::create_text(
            "Text",
            TextOptions {
                id: Some(id.to_owned()),
                ..Default::default()
            },
        ));
    }
    (StyleManager::new(), canvas)
}

fn selected(id: &str) -> (StyleManager, Canvas) {
    let (mut style, canvas) = setup();
    style.set_active_object(&canvas, Some(id));
    (style, canvas)
}

#[test]
fn test_everything_is_noop_without_selection() {
    let (mut style, mut canvas) = setup();
    let before = canvas.render_requests();

    assert!(!style.apply_font_size(&mut canvas, 40.0));
    assert!(!style.apply_opacity(&mut canvas, 0.5));
    assert!(!style.toggle_bold(&mut canvas));
    assert!(!style.toggle_lock(&mut canvas));
    assert!(!style.bring_to_front(&mut canvas));
    assert!(!style.copy_style_to(&mut canvas, "b"));

    assert_eq!(canvas.render_requests(), before);
    assert_eq!(style.current_style().font_size, 20.0);
}

#[test]
fn test_selection_reads_style_back() {
    let (mut style, mut canvas) = setup();
    canvas.object_mut("b").unwrap().text_mut().unwrap().font_size = 36.0;

    style.set_active_object(&canvas, Some("b"));
    assert_eq!(style.active_id(), Some("b"));
    assert!(style.is_text_object(&canvas));
    assert!(!style.is_image_object(&canvas));
    assert_eq!(style.current_style().font_size, 36.0);
}

#[test]
fn test_toggle_bold_twice() {
    let (mut style, mut canvas) = selected("a");

    assert!(style.toggle_bold(&mut canvas));
    assert_eq!(canvas.object("a").unwrap().text().unwrap().font_weight, BOLD_WEIGHT);
    assert!(style.toggle_bold(&mut canvas));
    assert_eq!(canvas.object("a").unwrap().text().unwrap().font_weight, NORMAL_WEIGHT);
}

#[test]
fn test_italic_underline_and_align() {
    let (mut style, mut canvas) = selected("a");

    assert!(style.toggle_italic(&mut canvas));
    assert!(style.toggle_underline(&mut canvas));
    assert!(style.set_text_align(&mut canvas, TextAlign::Center));

    let text = canvas.object("a").unwrap().text().unwrap();
    assert_eq!(text.font_style, FontStyle::Italic);
    assert!(text.underline);
    assert_eq!(text.text_align, TextAlign::Center);
}

#[test]
fn test_opacity_is_clamped() {
    let (mut style, mut canvas) = selected("a");

    assert!(style.apply_opacity(&mut canvas, 7.0));
    assert_eq!(canvas.object("a").unwrap().opacity, 1.0);
    assert!(style.apply_opacity(&mut canvas, -1.0));
    assert_eq!(canvas.object("a").unwrap().opacity, 0.0);
    assert_eq!(style.current_style().opacity, 0.0);
}

#[test]
fn test_toggle_lock_twice_restores_flags() {
    let (mut style, mut canvas) = selected("a");
    let before = canvas.object("a").unwrap().clone();

    assert!(style.toggle_lock(&mut canvas));
    let locked = canvas.object("a").unwrap();
    assert!(locked.is_locked());
    assert!(!locked.evented);
    assert!(locked.locks.movement_x && locked.locks.rotation && locked.locks.scaling_y);

    assert!(style.toggle_lock(&mut canvas));
    let unlocked = canvas.object("a").unwrap();
    assert_eq!(unlocked.selectable, before.selectable);
    assert_eq!(unlocked.evented, before.evented);
    assert_eq!(unlocked.locks, before.locks);
}

#[test]
fn test_reorder_and_z_index() {
    let (mut style, mut canvas) = selected("a");

    assert!(style.bring_to_front(&mut canvas));
    assert_eq!(canvas.index_of("a"), Some(1));
    assert_eq!(canvas.object("a").unwrap().z_index, 1);
    assert!(style.bring_forward(&mut canvas));
    assert_eq!(canvas.index_of("a"), Some(1));

    assert!(style.send_to_back(&mut canvas));
    assert_eq!(canvas.index_of("a"), Some(0));
}

#[test]
fn test_flip_and_reset_transform() {
    let (mut style, mut canvas) = selected("a");
    canvas.object_mut("a").unwrap().angle = 45.0;

    assert!(style.flip_horizontal(&mut canvas));
    assert!(style.flip_vertical(&mut canvas));
    assert!(canvas.object("a").unwrap().flip_y);

    assert!(style.reset_transform(&mut canvas));
    let object = canvas.object("a").unwrap();
    assert_eq!(object.angle, 0.0);
    assert!(!object.flip_x && !object.flip_y);
}

#[test]
fn test_copy_style_to_other_text() {
    let (mut style, mut canvas) = selected("a");
    style.apply_font_family(&mut canvas, "Georgia");
    style.apply_text_color(&mut canvas, "#ff0000");
    style.apply_border_width(&mut canvas, 3.0);

    assert!(style.copy_style_to(&mut canvas, "b"));
    let b = canvas.object("b").unwrap();
    assert_eq!(b.text().unwrap().font_family, "Georgia");
    assert_eq!(b.fill, "#ff0000");
    assert_eq!(b.stroke_width, 3.0);

    assert!(!style.copy_style_to(&mut canvas, "a"));
    assert!(!style.copy_style_to(&mut canvas, "missing"));
}

#[test]
fn test_toggle_lock_restores_mixed_flags() {
    let (mut style, mut canvas) = selected("a");
    {
        let object = canvas.object_mut("a").unwrap();
        object.evented = false;
        object.locks.movement_x = true;
    }
    let before = canvas.object("a").unwrap().clone();

    assert!(style.toggle_lock(&mut canvas));
    let locked = canvas.object("a").unwrap();
    assert!(locked.is_locked());
    assert_eq!(locked.locks, LockFlags::all(true));

    assert!(style.toggle_lock(&mut canvas));
    let unlocked = canvas.object("a").unwrap();
    assert!(unlocked.selectable);
    assert!(!unlocked.evented);
    assert_eq!(unlocked.locks, before.locks);
    assert!(unlocked.unlock_state.is_none());
}

#[test]
fn test_unlock_without_saved_flags_clears_locks() {
    let (mut style, mut canvas) = selected("a");
    {
        let object = canvas.object_mut("a").unwrap();
        object.selectable = false;
        object.evented = false;
        object.locks = LockFlags::all(true);
    }

    assert!(style.toggle_lock(&mut canvas));
    let object = canvas.object("a").unwrap();
    assert!(object.selectable && object.evented);
    assert_eq!(object.locks, LockFlags::default());
}
