use std::io::Cursor;
use std::sync::Arc;

use futures::executor::block_on;
use graphic_editor::assets::{ImageLoader, MemoryAssetSource};
use graphic_editor::behavior::{FlipAxis, ImageController, ImageOptions, apply_scaling_lock};
use graphic_editor::canvas::{Canvas, CanvasObject, Control, ObjectEvent};
use graphic_editor::config::EditorConfig;
use graphic_editor::error::LoadError;
use image::{ImageFormat, Rgba, RgbaImage};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn controller() -> ImageController {
    let source = MemoryAssetSource::new();
    source.insert("photo.png", png_bytes(200, 100));
    source.insert("broken.png", b"not an image".to_vec());
    ImageController::new(Arc::new(ImageLoader::new(source)))
}

fn photo(controller: &ImageController) -> CanvasObject {
    block_on(controller.create_image(
        "photo.png",
        ImageOptions {
            id: Some("img".to_owned()),
            ..Default::default()
        },
    ))
    .unwrap()
}

fn canvas_with(object: CanvasObject) -> Canvas {
    let mut canvas = Canvas::new(&EditorConfig::default());
    canvas.add(object);
    canvas
}

#[test]
fn test_create_image_uses_intrinsic_size() {
    let controller = controller();
    let object = photo(&controller);

    assert_eq!((object.width, object.height), (200.0, 100.0));
    assert_eq!((object.scale_x, object.scale_y), (1.0, 1.0));
    let image = object.image().unwrap();
    assert_eq!(image.original_width, Some(200.0));
    assert_eq!(image.src, "photo.png");
    assert!(!controller.is_loading());
}

#[test]
fn test_missing_or_undecodable_asset_fails() {
    let controller = controller();

    let missing = block_on(controller.create_image("nowhere.png", ImageOptions::default()));
    assert!(matches!(missing, Err(LoadError::Unreachable { .. })));

    let broken = block_on(controller.create_image("broken.png", ImageOptions::default()));
    assert!(matches!(broken, Err(LoadError::Decode { .. })));
    assert!(!controller.is_loading());
}

#[test]
fn test_corner_scaling_keeps_aspect_and_sign() {
    let controller = controller();
    let mut object = photo(&controller);
    object.scale_x = 2.0;
    object.scale_y = -1.3;

    apply_scaling_lock(&mut object, Control::Br);
    assert_eq!((object.scale_x, object.scale_y), (2.0, -2.0));
}

#[test]
fn test_edge_scaling_is_independent_unless_locked() {
    let controller = controller();
    let mut canvas = canvas_with(photo(&controller));
    {
        let object = canvas.object_mut("img").unwrap();
        object.scale_x = 1.8;
        object.scale_y = 1.0;
    }
    canvas.fire("img", &ObjectEvent::Scaling { control: Control::Mr });
    assert_eq!(canvas.object("img").unwrap().scale_y, 1.0);

    assert!(ImageController::set_uniform_scaling(&mut canvas, "img", true));
    canvas.fire("img", &ObjectEvent::Scaling { control: Control::Mr });
    let object = canvas.object("img").unwrap();
    assert_eq!((object.scale_x, object.scale_y), (1.8, 1.8));
}

#[test]
fn test_opacity_is_clamped() {
    let controller = controller();
    let mut canvas = canvas_with(photo(&controller));

    ImageController::set_opacity(&mut canvas, "img", -5.0);
    assert_eq!(canvas.object("img").unwrap().opacity, 0.0);
    ImageController::set_opacity(&mut canvas, "img", 3.7);
    assert_eq!(canvas.object("img").unwrap().opacity, 1.0);
}

#[test]
fn test_scale_to_width_is_idempotent() {
    let controller = controller();
    let mut canvas = canvas_with(photo(&controller));

    assert!(ImageController::scale_to_width(&mut canvas, "img", 50.0));
    let first = canvas.object("img").unwrap().scaled_size();
    assert!(ImageController::scale_to_width(&mut canvas, "img", 50.0));
    let second = canvas.object("img").unwrap().scaled_size();

    assert_eq!(first, (50.0, 25.0));
    assert_eq!(first, second);

    assert!(ImageController::scale_to_height(&mut canvas, "img", 200.0));
    assert_eq!(canvas.object("img").unwrap().scaled_size(), (400.0, 200.0));

    assert!(ImageController::reset_size(&mut canvas, "img"));
    let object = canvas.object("img").unwrap();
    assert_eq!((object.scale_x, object.scale_y), (1.0, 1.0));
    assert_eq!(object.scaled_size(), (200.0, 100.0));
}

#[test]
fn test_flip_toggles() {
    let controller = controller();
    let mut canvas = canvas_with(photo(&controller));

    assert!(ImageController::flip(&mut canvas, "img", FlipAxis::X));
    assert!(canvas.object("img").unwrap().flip_x);
    assert!(ImageController::flip(&mut canvas, "img", FlipAxis::X));
    assert!(!canvas.object("img").unwrap().flip_x);
    assert!(!ImageController::flip(&mut canvas, "missing", FlipAxis::Y));
}

#[test]
fn test_load_from_record_reloads_asset() {
    let controller = controller();
    let mut object = photo(&controller);
    object.scale_x = 0.5;
    object.scale_y = 0.5;
    object.angle = 30.0;
    let record = ImageController::to_element_record(&object).unwrap();
    assert_eq!(record.base.width, 100.0);

    let restored = block_on(controller.load_from_element_record(&record)).unwrap();
    assert_eq!(restored.width, 200.0);
    assert_eq!(restored.angle, 30.0);
    assert_eq!(ImageController::to_element_record(&restored).unwrap(), record);
}
