//! Scene normalization: center the model at the origin and scale it to a
//! fixed target size so any input asset renders consistently framed.

use crate::constants::TARGET_SIZE;
use crate::mesh::{Aabb, Model};

/// Normalize the model in place and return the final authoritative bounding
/// box used for camera framing.
///
/// The three steps must run in order, each recomputing the world box from the
/// previously committed transform: floating-point scaling is not exactly
/// invertible from the pre-scale estimate, so the last recompute is what the
/// framer trusts.
pub fn normalize_model(model: &mut Model) -> Aabb {
    // 1. Center the geometry at the origin.
    let aabb = model.world_aabb();
    model.position -= aabb.center();

    // 2. Uniform scale to the target size. The committed translation scales
    //    with the geometry so the center stays at the origin. A degenerate
    //    (empty or zero-size) box skips scaling entirely, leaving the model
    //    at unit scale.
    let aabb = model.world_aabb();
    let max_dim = aabb.max_dim();
    if max_dim > 0.0 {
        let factor = TARGET_SIZE / max_dim;
        model.scale *= factor;
        model.position *= factor;
    }

    // 3. Recompute once more after scaling; this box is authoritative.
    model.world_aabb()
}
