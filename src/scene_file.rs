//! JSON scene descriptions.
//!
//! A scene file holds what an editor would save: the camera pose, sky and
//! sun parameters with separate intensities, and a list of planes given as
//! position plus three rotation angles. Every field has a default, so a
//! partial file (or `{}`) loads as the default scene: a red 10x10 checkered
//! ground plane under a blue-grey sky.

use std::fs;
use std::path::Path;

use glam::{Vec3, Vec3A};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::Result;
use crate::integrator::RenderMode;
use crate::material::{CheckerMaterial, Color};
use crate::motor::Motor;
use crate::plane::{Plane, PortalLink};
use crate::rotor::Rotor;

fn color(rgb: [f32; 3]) -> Color {
    Color::from_array(rgb)
}

/// Portal link as stored in a scene file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConnection {
    /// Index of the connected plane
    pub other_index: Option<usize>,
    /// Mirror flag, carried but not applied
    pub flip: bool,
}

impl From<PortalConnection> for PortalLink {
    fn from(connection: PortalConnection) -> Self {
        Self {
            target: connection.other_index,
            flip: connection.flip,
        }
    }
}

impl PortalConnection {
    /// Fix up the link after plane `removed` was deleted.
    fn forget(&mut self, removed: usize) {
        self.other_index = match self.other_index {
            Some(index) if index == removed => None,
            Some(index) if index > removed => Some(index - 1),
            other => other,
        };
    }
}

/// Camera pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    /// World position
    pub position: Vec3,
    /// Orientation
    pub rotation: Rotor,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: Vec3::Y * 1.1,
            rotation: Rotor::IDENTITY,
        }
    }
}

impl CameraDescription {
    /// Rotate, then move to `position`.
    pub fn motor(&self) -> Motor {
        Motor::from_rotor(self.rotation.normalised()).then(Motor::translation(self.position.into()))
    }
}

/// One plane of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneDescription {
    /// Display name
    pub name: String,
    /// Centre of the plane
    pub position: Vec3,
    /// Rotation in the XY plane, radians
    pub xy_rotation: f32,
    /// Rotation in the YZ plane, radians
    pub yz_rotation: f32,
    /// Rotation in the XZ plane, radians
    pub xz_rotation: f32,
    /// Extent along local X
    pub width: f32,
    /// Extent along local Z
    pub height: f32,
    /// Checker tiles along local X
    pub checker_count_x: u32,
    /// Checker tiles along local Z
    pub checker_count_z: u32,
    /// Base colour
    pub color: [f32; 3],
    /// Odd-cell factor for the base colour
    pub checker_darkness: f32,
    /// Emission colour before intensity
    pub emissive_color: [f32; 3],
    /// Multiplier for the emission colour
    pub emission_intensity: f32,
    /// Odd-cell factor for emission
    pub emissive_checker_darkness: f32,
    /// Link of the front face
    pub front_portal: PortalConnection,
    /// Link of the back face
    pub back_portal: PortalConnection,
}

impl Default for PlaneDescription {
    fn default() -> Self {
        Self {
            name: "Default Plane".into(),
            position: Vec3::ZERO,
            xy_rotation: 0.0,
            yz_rotation: 0.0,
            xz_rotation: 0.0,
            width: 1.0,
            height: 1.0,
            checker_count_x: 1,
            checker_count_z: 1,
            color: [1.0, 1.0, 1.0],
            checker_darkness: 0.5,
            emissive_color: [0.0, 0.0, 0.0],
            emission_intensity: 0.0,
            emissive_checker_darkness: 0.5,
            front_portal: PortalConnection::default(),
            back_portal: PortalConnection::default(),
        }
    }
}

impl PlaneDescription {
    /// Ground plane of the default scene.
    pub fn ground() -> Self {
        Self {
            name: "Ground".into(),
            width: 10.0,
            height: 10.0,
            checker_count_x: 10,
            checker_count_z: 10,
            color: [1.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    /// Orientation: the XZ angle is applied first, then YZ, then XY.
    pub fn rotor(&self) -> Rotor {
        Rotor::rotation_xy(self.xy_rotation)
            .after(Rotor::rotation_yz(self.yz_rotation))
            .after(Rotor::rotation_xz(self.xz_rotation))
    }

    /// Rotate in place, then move to `position`.
    pub fn motor(&self) -> Motor {
        Motor::from_rotor(self.rotor()).then(Motor::translation(self.position.into()))
    }

    /// Kernel plane with intensities folded into the colours.
    pub fn to_plane(&self) -> Plane {
        Plane {
            motor: self.motor(),
            width: self.width,
            height: self.height,
            checker_count_x: self.checker_count_x,
            checker_count_z: self.checker_count_z,
            material: CheckerMaterial {
                color: color(self.color),
                checker_darkness: self.checker_darkness,
                emissive_color: color(self.emissive_color) * self.emission_intensity,
                emissive_checker_darkness: self.emissive_checker_darkness,
            },
            front_portal: self.front_portal.into(),
            back_portal: self.back_portal.into(),
        }
    }
}

/// Transport settings stored with a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Light transport strategy
    pub render_type: RenderMode,
    /// Jitter samples inside pixels
    pub antialiasing: bool,
    /// Portal crossings per traced segment
    #[serde(alias = "recursive_portal_count")]
    pub max_portal_traversals: u32,
    /// Path length limit for lit rendering
    pub max_bounces: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_type: RenderMode::Unlit,
            antialiasing: true,
            max_portal_traversals: 10,
            max_bounces: 3,
        }
    }
}

/// Complete scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Camera pose
    pub camera: CameraDescription,
    /// Sky colour straight up
    pub up_sky_color: [f32; 3],
    /// Multiplier for `up_sky_color`
    pub up_sky_intensity: f32,
    /// Sky colour straight down
    pub down_sky_color: [f32; 3],
    /// Multiplier for `down_sky_color`
    pub down_sky_intensity: f32,
    /// Sun colour
    pub sun_color: [f32; 3],
    /// Multiplier for `sun_color`
    pub sun_intensity: f32,
    /// Direction towards the sun, need not be normalised
    pub sun_direction: Vec3,
    /// Angular radius of the sun, radians
    pub sun_size: f32,
    /// Planes in index order; portal links refer to these indices
    pub planes: Vec<PlaneDescription>,
    /// Transport settings
    pub render_settings: RenderSettings,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            camera: CameraDescription::default(),
            up_sky_color: [0.4, 0.5, 0.8],
            up_sky_intensity: 1.0,
            down_sky_color: [0.4, 0.4, 0.4],
            down_sky_intensity: 1.0,
            sun_color: [1.0, 1.0, 1.0],
            sun_intensity: 100.0,
            sun_direction: Vec3::new(0.4, 1.0, 0.2),
            sun_size: 6.0f32.to_radians(),
            planes: vec![PlaneDescription::ground()],
            render_settings: RenderSettings::default(),
        }
    }
}

impl SceneDescription {
    /// Read a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let scene: Self = serde_json::from_str(&text)?;
        info!("Loaded scene {} with {} planes", path.display(), scene.planes.len());
        Ok(scene)
    }

    /// Write the scene as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), text)?;
        debug!("Saved scene to {}", path.as_ref().display());
        Ok(())
    }

    /// Kernel planes in file order.
    pub fn to_planes(&self) -> Vec<Plane> {
        self.planes.iter().map(PlaneDescription::to_plane).collect()
    }

    /// Kernel camera record using the scene's own render settings.
    pub fn camera(&self) -> Camera {
        self.camera_with(&self.render_settings)
    }

    /// Kernel camera record with intensities applied and the sun
    /// direction normalised.
    pub fn camera_with(&self, settings: &RenderSettings) -> Camera {
        Camera {
            motor: self.camera.motor(),
            up_sky_color: color(self.up_sky_color) * self.up_sky_intensity,
            down_sky_color: color(self.down_sky_color) * self.down_sky_intensity,
            sun_color: color(self.sun_color) * self.sun_intensity,
            sun_direction: Vec3A::from(self.sun_direction).normalize_or(Vec3A::Y),
            sun_size: self.sun_size,
            max_bounces: settings.max_bounces,
            max_portal_traversals: settings.max_portal_traversals,
        }
    }

    /// Remove plane `index`, keeping every other portal link pointed at the
    /// same plane. Links to the removed plane are cleared.
    pub fn remove_plane(&mut self, index: usize) -> Option<PlaneDescription> {
        if index >= self.planes.len() {
            return None;
        }
        let removed = self.planes.remove(index);
        for plane in &mut self.planes {
            plane.front_portal.forget(index);
            plane.back_portal.forget(index);
        }
        debug!("Removed plane {} ({})", index, removed.name);
        Some(removed)
    }
}
