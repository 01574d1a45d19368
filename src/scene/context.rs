use crate::scene::camera::Camera;
use crate::scene::scene_object::SceneObject;
use std::ops::RangeInclusive;

/// Output resolution and frame range of the host scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub resolution_x: u32,
    pub resolution_y: u32,
    /// Resolution scale in percent (100 = full size).
    pub resolution_percentage: u32,
    pub frame_start: i32,
    pub frame_end: i32,
    pub frame_current: i32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution_x: 1920,
            resolution_y: 1080,
            resolution_percentage: 100,
            frame_start: 1,
            frame_end: 250,
            frame_current: 1,
        }
    }
}

impl RenderSettings {
    pub fn scale(&self) -> f64 {
        self.resolution_percentage as f64 / 100.0
    }

    /// Scaled output width in pixels, not rounded.
    pub fn width(&self) -> f64 {
        self.resolution_x as f64 * self.scale()
    }

    /// Scaled output height in pixels, not rounded.
    pub fn height(&self) -> f64 {
        self.resolution_y as f64 * self.scale()
    }

    /// Integer output resolution (truncated).
    pub fn pixel_resolution(&self) -> [u32; 2] {
        [self.width() as u32, self.height() as u32]
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    pub fn animation_range(&self) -> RangeInclusive<i32> {
        self.frame_start..=self.frame_end
    }
}

/// Holds all scene data the exporter reads, for the currently active frame.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub camera: Camera,
    pub render: RenderSettings,
    pub objects: Vec<SceneObject>,
    frame: i32,
}

impl SceneContext {
    pub fn new(camera: Camera, render: RenderSettings, objects: Vec<SceneObject>) -> Self {
        let frame = render.frame_current;
        let mut context = Self {
            camera,
            render,
            objects,
            frame,
        };
        context.set_frame(frame);
        context
    }

    pub fn frame(&self) -> i32 {
        self.frame
    }

    /// Activates `frame`: every keyframed camera and object parameter moves to its value there.
    pub fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
        self.camera.set_frame(frame);
        for obj in &mut self.objects {
            obj.set_frame(frame);
        }
    }
}
