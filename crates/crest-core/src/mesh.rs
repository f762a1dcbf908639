//! Model, mesh and bounding-volume types shared between the asset loader and
//! the viewer. These avoid platform APIs so they compile on host and wasm.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::constants::{
    BASE_COLOR, EMISSIVE_COLOR, EMISSIVE_INTENSITY, METALNESS_DEFAULT, METALNESS_RANGE,
    ROUGHNESS_DEFAULT, ROUGHNESS_RANGE,
};

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
}

/// Material parameters after stylization. Every loaded mesh ends up inside
/// the same narrow band regardless of what the source asset authored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    pub roughness: f32,
    pub metalness: f32,
    pub base_color: [f32; 3],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub double_sided: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MaterialParams {
    /// Clamp authored values into the house style. `None` means the source
    /// asset did not author the channel at all.
    pub fn stylized(authored_roughness: Option<f32>, authored_metalness: Option<f32>) -> Self {
        let (r_lo, r_hi) = ROUGHNESS_RANGE;
        let (m_lo, m_hi) = METALNESS_RANGE;
        Self {
            roughness: authored_roughness.unwrap_or(ROUGHNESS_DEFAULT).clamp(r_lo, r_hi),
            metalness: authored_metalness.unwrap_or(METALNESS_DEFAULT).clamp(m_lo, m_hi),
            base_color: BASE_COLOR,
            emissive: EMISSIVE_COLOR,
            emissive_intensity: EMISSIVE_INTENSITY,
            double_sided: true,
            cast_shadow: true,
            receive_shadow: true,
        }
    }
}

/// One glTF primitive worth of geometry with its stylized material.
#[derive(Clone, Debug)]
pub struct MeshPart {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: MaterialParams,
}

/// Axis-aligned bounding box. Recomputed from the model's current transform
/// whenever needed rather than cached, so it can never go stale.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn max_dim(&self) -> f32 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }
}

/// The loaded 3D asset with its mutable transform. Rotation is stored as
/// Euler angles because the idle animation and the reduced-motion reset talk
/// about yaw/pitch/roll individually.
#[derive(Clone, Debug)]
pub struct Model {
    pub parts: Vec<MeshPart>,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub scale: f32,
}

impl Model {
    pub fn new(parts: Vec<MeshPart>) -> Self {
        Self {
            parts,
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            scale: 1.0,
        }
    }

    pub fn transform(&self) -> Mat4 {
        let rot = Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, self.roll);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rot, self.position)
    }

    /// World-space bounding box under the current transform.
    pub fn world_aabb(&self) -> Aabb {
        let m = self.transform();
        let mut out = Aabb::empty();
        for part in &self.parts {
            for v in &part.vertices {
                out.extend(m.transform_point3(Vec3::from(v.pos)));
            }
        }
        out
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.vertices.len()).sum()
    }
}
