use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, error, info};

use crate::assets::ImageLoader;
use crate::canvas::{
    ACCENT_COLOR, Canvas, CanvasObject, Control, ControlsVisibility, CornerStyle, ElementKind, EventKind,
    ImageProps, ObjectEvent, ObjectKind, RecordSize,
};
use crate::element::{BaseElement, ImageElement};
use crate::error::LoadError;
use crate::id_generator::generate_id;

/// Options for [`ImageController::create_image`]; unset fields take the defaults
#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    pub id: Option<String>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    X,
    Y,
}

/// Keep both axes at the same magnitude while preserving each axis' sign
fn lock_uniform(object: &mut CanvasObject) {
    let scale = object.scale_x.abs().max(object.scale_y.abs());
    object.scale_x = if object.scale_x < 0.0 { -scale } else { scale };
    object.scale_y = if object.scale_y < 0.0 { -scale } else { scale };
}

/// Apply the scaling rule for one intermediate step of a resize gesture.
///
/// Corner handles resize proportionally; edge handles stretch a single axis
/// unless the image has uniform scaling locked.
pub fn apply_scaling_lock(object: &mut CanvasObject, control: Control) {
    let uniform_locked = object.image().is_some_and(|i| i.lock_uni_scaling);
    if control.is_corner() || (uniform_locked && control.is_edge()) {
        lock_uniform(object);
    }
}

/// Creation defaults, scaling rules and sizing operations for images
pub struct ImageController {
    loader: Arc<ImageLoader>,
    in_flight: AtomicUsize,
}

impl std::fmt::Debug for ImageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageController")
            .field("loader", &self.loader)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish()
    }
}

impl ImageController {
    pub fn new(loader: Arc<ImageLoader>) -> Self {
        Self {
            loader,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn loader(&self) -> &Arc<ImageLoader> {
        &self.loader
    }

    /// True while any image load started by this controller is pending
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Load `src` and build an image object around it
    pub async fn create_image(&self, src: &str, options: ImageOptions) -> Result<CanvasObject, LoadError> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let loaded = self.loader.load(src).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let loaded = loaded.inspect_err(|err| error!("❌ Failed to load image {}: {}", src, err))?;

        let width = f64::from(loaded.width);
        let height = f64::from(loaded.height);
        let props = ImageProps {
            src: src.to_owned(),
            alt: options.alt.unwrap_or_default(),
            lock_uni_scaling: false,
            original_width: Some(width),
            original_height: Some(height),
            ..ImageProps::default()
        };

        let id = options.id.unwrap_or_else(|| generate_id("img"));
        let mut object = CanvasObject::new(id, ElementKind::Image, ObjectKind::Image(props));
        object.left = options.left.unwrap_or(100.0);
        object.top = options.top.unwrap_or(100.0);
        object.width = width;
        object.height = height;
        object.scale_x = options.scale_x.unwrap_or(1.0);
        object.scale_y = options.scale_y.unwrap_or(1.0);

        object.appearance.corner_style = CornerStyle::Circle;
        object.appearance.corner_size = 12.0;
        object.appearance.border_color = ACCENT_COLOR.to_owned();
        object.appearance.corner_color = ACCENT_COLOR.to_owned();
        object.appearance.border_scale_factor = 2.0;
        object.appearance.transparent_corners = false;
        object.set_controls_visibility(ControlsVisibility::all(true));
        object.rotation_offset = -40.0;

        Self::install_handlers(&mut object);
        info!("🖼️ Created image {} from {} ({}x{})", object.id, src, width, height);
        Ok(object)
    }

    /// Replace the handlers on an image with the scaling behavior
    pub fn install_handlers(object: &mut CanvasObject) {
        object.clear_handlers();
        object.on(EventKind::Scaling, |obj, event| {
            if let ObjectEvent::Scaling { control } = event {
                apply_scaling_lock(obj, *control);
            }
        });
    }

    fn update(canvas: &mut Canvas, id: &str, f: impl FnOnce(&mut CanvasObject)) -> bool {
        let Some(object) = canvas.object_mut(id).filter(|o| o.image().is_some()) else {
            return false;
        };
        f(object);
        canvas.request_render();
        true
    }

    fn original_size(canvas: &Canvas, id: &str) -> Option<(f64, f64)> {
        let image = canvas.object(id)?.image()?;
        match (image.original_width, image.original_height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    }

    /// Back to the decoded size at scale 1
    pub fn reset_size(canvas: &mut Canvas, id: &str) -> bool {
        let Some((width, height)) = Self::original_size(canvas, id) else {
            return false;
        };
        Self::update(canvas, id, |object| {
            object.scale_x = 1.0;
            object.scale_y = 1.0;
            object.width = width;
            object.height = height;
        })
    }

    /// Scale proportionally so the displayed width is `target` pixels
    pub fn scale_to_width(canvas: &mut Canvas, id: &str, target: f64) -> bool {
        let Some((width, _)) = Self::original_size(canvas, id) else {
            return false;
        };
        let scale = target / width;
        Self::update(canvas, id, |object| {
            object.scale_x = scale;
            object.scale_y = scale;
        })
    }

    /// Scale proportionally so the displayed height is `target` pixels
    pub fn scale_to_height(canvas: &mut Canvas, id: &str, target: f64) -> bool {
        let Some((_, height)) = Self::original_size(canvas, id) else {
            return false;
        };
        let scale = target / height;
        Self::update(canvas, id, |object| {
            object.scale_x = scale;
            object.scale_y = scale;
        })
    }

    pub fn set_opacity(canvas: &mut Canvas, id: &str, opacity: f64) -> bool {
        Self::update(canvas, id, |object| object.opacity = opacity.clamp(0.0, 1.0))
    }

    pub fn flip(canvas: &mut Canvas, id: &str, axis: FlipAxis) -> bool {
        Self::update(canvas, id, |object| match axis {
            FlipAxis::X => object.flip_x = !object.flip_x,
            FlipAxis::Y => object.flip_y = !object.flip_y,
        })
    }

    pub fn set_uniform_scaling(canvas: &mut Canvas, id: &str, uniform: bool) -> bool {
        Self::update(canvas, id, |object| {
            if let Some(image) = object.image_mut() {
                image.lock_uni_scaling = uniform;
            }
        })
    }

    pub fn to_element_record(object: &CanvasObject) -> Option<ImageElement> {
        let image = object.image()?;
        let (width, height) = match image.record_size {
            Some(size) if size.matches(object) => (size.width, size.height),
            _ => (object.width * object.scale_x, object.height * object.scale_y),
        };
        Some(ImageElement {
            base: BaseElement {
                id: object.id.clone(),
                x: object.left,
                y: object.top,
                width,
                height,
                rotation: object.angle,
                z_index: object.z_index,
                opacity: object.opacity,
                radius: object.radius.clone(),
                parent_id: object.parent_id.clone(),
            },
            src: image.src.clone(),
            alt: image.alt.clone(),
            scale_x: object.scale_x,
            scale_y: object.scale_y,
            lock_uni_scaling: image.lock_uni_scaling,
        })
    }

    /// Rebuild an image object from its record without touching the asset.
    ///
    /// The intrinsic size is recovered by dividing out the scale factors.
    pub fn from_element_record(element: &ImageElement) -> CanvasObject {
        let base = &element.base;
        let unscale = |size: f64, scale: f64| if scale == 0.0 { size } else { size / scale };
        let width = unscale(base.width, element.scale_x);
        let height = unscale(base.height, element.scale_y);

        let props = ImageProps {
            src: element.src.clone(),
            alt: element.alt.clone(),
            lock_uni_scaling: element.lock_uni_scaling,
            original_width: Some(width),
            original_height: Some(height),
            ..ImageProps::default()
        };
        let mut object = CanvasObject::new(base.id.clone(), ElementKind::Image, ObjectKind::Image(props));
        object.left = base.x;
        object.top = base.y;
        object.width = width;
        object.height = height;
        object.scale_x = element.scale_x;
        object.scale_y = element.scale_y;
        object.angle = base.rotation;
        object.z_index = base.z_index;
        object.opacity = base.opacity;
        object.radius = base.radius.clone();
        object.parent_id = base.parent_id.clone();
        object.appearance.corner_style = CornerStyle::Circle;
        object.appearance.corner_size = 12.0;
        object.appearance.border_color = ACCENT_COLOR.to_owned();
        object.appearance.corner_color = ACCENT_COLOR.to_owned();
        object.rotation_offset = -40.0;
        let record_size = RecordSize::new(base.width, base.height, &object);
        if let Some(image) = object.image_mut() {
            image.record_size = Some(record_size);
        }

        Self::install_handlers(&mut object);
        object
    }

    /// Rebuild an image object from its record, reloading the asset first
    pub async fn load_from_element_record(&self, element: &ImageElement) -> Result<CanvasObject, LoadError> {
        let base = &element.base;
        let mut object = self
            .create_image(
                &element.src,
                ImageOptions {
                    id: Some(base.id.clone()),
                    left: Some(base.x),
                    top: Some(base.y),
                    scale_x: Some(element.scale_x),
                    scale_y: Some(element.scale_y),
                    alt: Some(element.alt.clone()),
                },
            )
            .await?;
        object.angle = base.rotation;
        object.z_index = base.z_index;
        object.opacity = base.opacity;
        object.radius = base.radius.clone();
        object.parent_id = base.parent_id.clone();
        if let Some(image) = object.image_mut() {
            image.lock_uni_scaling = element.lock_uni_scaling;
        }
        debug!("Reloaded image {} from record", object.id);
        Ok(object)
    }
}
