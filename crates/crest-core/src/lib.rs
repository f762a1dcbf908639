pub mod assets;
pub mod camera;
pub mod catalog;
pub mod constants;
pub mod load;
pub mod mesh;
pub mod normalize;
pub mod orbit;
pub mod storefront;
pub mod viewer;

pub static CREST_WGSL: &str = include_str!("../shaders/crest.wgsl");

pub use camera::{frame_model, Camera, Framing};
pub use mesh::{Aabb, MaterialParams, MeshPart, Model, Vertex};
pub use normalize::normalize_model;
pub use orbit::OrbitControls;
pub use viewer::{backing_size, ViewerState};
