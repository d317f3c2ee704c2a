//! Flat rasterization of the canvas for image export.
//!
//! Objects are drawn as axis-aligned boxes in stacking order: shapes and text
//! backgrounds as filled rectangles, images as their decoded pixels resized to
//! the displayed size. Only the part of each box inside the canvas is
//! allocated. Rotation, skew and glyphs are not drawn.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose};
use egui::Color32;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageResult, Rgba, RgbaImage};
use log::debug;

use super::Canvas;
use super::object::{CanvasObject, ObjectKind};
use crate::assets::ImageLoader;

/// Output format for `Canvas` exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Parse a CSS-ish color: hex, `rgb()`/`rgba()`, or a few names.
/// Empty and `transparent` yield `None`.
pub fn parse_color(value: &str) -> Option<Color32> {
    let value = value.trim();
    match value {
        "" | "transparent" => None,
        "black" => Some(Color32::BLACK),
        "white" => Some(Color32::WHITE),
        "red" => Some(Color32::RED),
        "green" => Some(Color32::GREEN),
        "blue" => Some(Color32::BLUE),
        _ if value.starts_with("rgb") => parse_rgb_function(value),
        _ => Color32::from_hex(value).ok(),
    }
}

fn parse_rgb_function(value: &str) -> Option<Color32> {
    let inner = value
        .trim_start_matches("rgba")
        .trim_start_matches("rgb")
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    let a = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some(Color32::from_rgba_unmultiplied(r, g, b, a))
}

fn with_opacity(color: Color32, opacity: f64) -> Rgba<u8> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let a = (f64::from(a) * opacity.clamp(0.0, 1.0)).round() as u8;
    Rgba([r, g, b, a])
}

fn to_pixels(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

/// Render the canvas objects in stacking order
pub fn rasterize(canvas: &Canvas, images: &ImageLoader) -> RgbaImage {
    let background = parse_color(canvas.background())
        .map(|c| with_opacity(c, 1.0))
        .unwrap_or(Rgba([0, 0, 0, 0]));
    let mut target = RgbaImage::from_pixel(canvas.width(), canvas.height(), background);

    for object in canvas.objects() {
        draw_object(&mut target, object, images);
    }
    target
}

/// Pixel rectangle of an object's box that falls on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
struct Visible {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    /// Visible span as fractions of the object box, `[x0, y0, x1, y1]`
    fractions: [f64; 4],
}

fn visible_part(object: &CanvasObject, canvas_width: u32, canvas_height: u32) -> Option<Visible> {
    let (w, h) = object.scaled_size();
    if !(w > 0.0 && h > 0.0) || !w.is_finite() || !h.is_finite() {
        return None;
    }

    let x0 = object.left.max(0.0);
    let y0 = object.top.max(0.0);
    let x1 = (object.left + w).min(f64::from(canvas_width));
    let y1 = (object.top + h).min(f64::from(canvas_height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let (x, y) = (to_pixels(x0), to_pixels(y0));
    let width = to_pixels(x1).saturating_sub(x);
    let height = to_pixels(y1).saturating_sub(y);
    if width == 0 || height == 0 {
        return None;
    }

    Some(Visible {
        x,
        y,
        width,
        height,
        fractions: [
            (x0 - object.left) / w,
            (y0 - object.top) / h,
            (x1 - object.left) / w,
            (y1 - object.top) / h,
        ],
    })
}

/// Source pixel range for a visible span, mirrored when the axis is flipped
fn source_span(from: f64, to: f64, flipped: bool, size: u32) -> (u32, u32) {
    let (from, to) = if flipped { (1.0 - to, 1.0 - from) } else { (from, to) };
    let size_f = f64::from(size);
    let start = ((from * size_f).floor().max(0.0) as u32).min(size.saturating_sub(1));
    let end = ((to * size_f).ceil() as u32).clamp(start + 1, size);
    (start, end - start)
}

fn draw_object(target: &mut RgbaImage, object: &CanvasObject, images: &ImageLoader) {
    if object.opacity <= 0.0 {
        return;
    }
    let Some(visible) = visible_part(object, target.width(), target.height()) else {
        return;
    };
    let Visible { width, height, .. } = visible;

    let layer = match &object.kind {
        ObjectKind::Image(props) => {
            let Some(loaded) = images.cached(&props.src) else {
                debug!("No decoded pixels for {}, skipping", props.src);
                return;
            };
            let source = &loaded.pixels;
            if source.width() == 0 || source.height() == 0 {
                return;
            }
            let [fx0, fy0, fx1, fy1] = visible.fractions;
            let (sx, sw) = source_span(fx0, fx1, object.flip_x, source.width());
            let (sy, sh) = source_span(fy0, fy1, object.flip_y, source.height());
            let crop = imageops::crop_imm(source, sx, sy, sw, sh).to_image();

            let mut pixels = imageops::resize(&crop, width, height, FilterType::Triangle);
            if object.flip_x {
                imageops::flip_horizontal_in_place(&mut pixels);
            }
            if object.flip_y {
                imageops::flip_vertical_in_place(&mut pixels);
            }
            if object.opacity < 1.0 {
                for pixel in pixels.pixels_mut() {
                    pixel.0[3] = (f64::from(pixel.0[3]) * object.opacity).round() as u8;
                }
            }
            pixels
        }
        ObjectKind::Textbox(_) => {
            let Some(color) = parse_color(&object.background_color) else {
                return;
            };
            RgbaImage::from_pixel(width, height, with_opacity(color, object.opacity))
        }
        ObjectKind::Rect => {
            let Some(color) = parse_color(&object.fill) else {
                return;
            };
            RgbaImage::from_pixel(width, height, with_opacity(color, object.opacity))
        }
    };

    imageops::overlay(target, &layer, i64::from(visible.x), i64::from(visible.y));
}

/// Encode a rendered canvas. `quality` in [0, 1] only affects JPEG.
pub fn encode(image: RgbaImage, format: ExportFormat, quality: f32) -> ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        }
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            JpegEncoder::new_with_quality(&mut bytes, quality).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(bytes)
}

pub fn to_data_url(bytes: &[u8], format: ExportFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::assets::MemoryAssetSource;
    use crate::canvas::object::{ElementKind, ImageProps};
    use crate::config::EditorConfig;

    const RED: Rgba<u8> = Rgba([200, 10, 10, 255]);

    fn loader_with_red_image() -> ImageLoader {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(4, 2, RED)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let source = MemoryAssetSource::new();
        source.insert("red.png", bytes);
        let loader = ImageLoader::new(source);
        block_on(loader.load("red.png")).unwrap();
        loader
    }

    fn image_object(id: &str, scale: f64) -> CanvasObject {
        let props = ImageProps {
            src: "red.png".to_owned(),
            ..ImageProps::default()
        };
        let mut object = CanvasObject::new(id, ElementKind::Image, ObjectKind::Image(props));
        object.width = 4.0;
        object.height = 2.0;
        object.scale_x = scale;
        object.scale_y = scale;
        object
    }

    fn is_red(pixel: &Rgba<u8>) -> bool {
        pixel.0.iter().zip(RED.0).all(|(&a, b)| a.abs_diff(b) <= 1)
    }

    fn rect(id: &str, left: f64, top: f64, size: f64, fill: &str) -> CanvasObject {
        let mut object = CanvasObject::new(id, ElementKind::Shape, ObjectKind::Rect);
        object.left = left;
        object.top = top;
        object.width = size;
        object.height = size;
        object.fill = fill.to_owned();
        object
    }

    #[test]
    fn test_huge_image_is_clipped_to_canvas() {
        let loader = loader_with_red_image();
        let mut canvas = Canvas::new(&EditorConfig::default());
        let mut huge = image_object("huge", 1e6);
        huge.left = 10.0;
        huge.top = 20.0;
        canvas.add(huge);
        canvas.add(rect("gone_left", -5000.0, 0.0, 100.0, "#0000ff"));
        canvas.add(rect("gone_right", 1e9, 0.0, 1e9, "#0000ff"));

        let image = rasterize(&canvas, &loader);
        assert_eq!((image.width(), image.height()), (800, 600));
        assert_eq!(*image.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
        assert!(is_red(image.get_pixel(400, 300)));
        assert!(is_red(image.get_pixel(799, 599)));
    }

    #[test]
    fn test_partly_visible_rect() {
        let loader = loader_with_red_image();
        let mut canvas = Canvas::new(&EditorConfig::default());
        canvas.add(rect("corner", -50.0, -50.0, 100.0, "#000000"));

        let image = rasterize(&canvas, &loader);
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(49, 49), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(50, 50), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_flipped_crop_reads_mirrored_source() {
        assert_eq!(source_span(0.0, 0.25, false, 8), (0, 2));
        assert_eq!(source_span(0.0, 0.25, true, 8), (6, 2));
        assert_eq!(source_span(0.0, 1e-9, false, 8), (0, 1));
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!(parse_color("#ff0000"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_color("white"), Some(Color32::WHITE));
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("transparent"), None);
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Color32::from_rgb(1, 2, 3)));
        let shadow = parse_color("rgba(0,0,0,0.3)").unwrap();
        assert_eq!(shadow.to_srgba_unmultiplied()[3], 77);
        assert_eq!(parse_color("rgba(0,0)"), None);
    }

    #[test]
    fn test_opacity_scales_alpha() {
        assert_eq!(with_opacity(Color32::WHITE, 0.5), Rgba([255, 255, 255, 128]));
        assert_eq!(with_opacity(Color32::WHITE, 4.0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_png_data_url_prefix() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let bytes = encode(image, ExportFormat::Png, 1.0).unwrap();
        assert!(to_data_url(&bytes, ExportFormat::Png).starts_with("data:image/png;base64,"));
    }
}
