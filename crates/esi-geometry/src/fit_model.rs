//! Parametric deformation of an implicit surface (sphere / ellipsoid /
//! potatoid) fit against a reference point cloud by the global
//! optimizer.

use esi_optimizer::{CostFn, ParamKind};

use crate::bounding_box::BoundingBox;
use crate::param_kinds::*;
use crate::pset::Pset;

fn lookup(params: &[(ParamKind, f64)], kind: ParamKind, default: f64) -> f64 {
    params
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, v)| *v)
        .unwrap_or(default)
}

fn rotate(p: [f64; 3], rx: f64, ry: f64, rz: f64) -> [f64; 3] {
    let (sx, cx) = rx.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sz, cz) = rz.sin_cos();

    // X, then Y, then Z, applied to the point (matches the order the
    // fit models add their rotation dimensions in).
    let [x, y, z] = p;
    let (y1, z1) = (cx * y - sx * z, sx * y + cx * z);
    let (x2, z2) = (cy * x + sy * z1, -sy * x + cy * z1);
    let (x3, y3) = (cz * x2 - sz * y1, sz * x2 + cz * y1);
    [x3, y3, z2]
}

/// Cost function over a reference point set: sum of squared distances
/// from each reference point to the implicit deformed surface
/// parameterized by the current translation/scale/rotation/pinch/flatten
/// values. Unreferenced parameters default to the identity transform
/// (no translation, unit scale, no rotation, no pinch/flatten).
pub struct FitModelOnPoints {
    reference: Pset,
}

impl FitModelOnPoints {
    pub fn new(reference: Pset) -> Self {
        Self { reference }
    }

    pub fn bounding(&self) -> BoundingBox {
        self.reference.bounding_box()
    }

    /// Translation component of a parameter snapshot, defaulting
    /// unreferenced axes to zero.
    pub fn translation(params: &[(ParamKind, f64)]) -> [f64; 3] {
        [
            lookup(params, TRANSLATION_X, 0.0),
            lookup(params, TRANSLATION_Y, 0.0),
            lookup(params, TRANSLATION_Z, 0.0),
        ]
    }
}

/// Radius of the implicit deformed surface along a unit direction, given
/// the scale/pinch/flatten parameters only (translation and rotation are
/// the caller's responsibility since they act on the query direction
/// before it reaches here).
fn implicit_surface_radius(unit_dir: [f64; 3], params: &[(ParamKind, f64)]) -> f64 {
    let scale = lookup(params, SCALE, 1.0);
    let sx = lookup(params, SCALE_X, scale);
    let sy = lookup(params, SCALE_Y, scale);
    let sz = lookup(params, SCALE_Z, scale);
    let pinch_yx = lookup(params, SINUS_PINCH_Y_TO_X, 0.0);
    let pinch_yz = lookup(params, SINUS_PINCH_Y_TO_Z, 0.0);
    let flat_y_pos = lookup(params, FLATTEN_Y_POS, 0.0);
    let flat_y_neg = lookup(params, FLATTEN_Y_NEG, 0.0);
    let flat_z_pos = lookup(params, FLATTEN_Z_POS, 0.0);
    let flat_x = lookup(params, FLATTEN_X, 0.0);

    let (ux, uy, uz) = (unit_dir[0], unit_dir[1], unit_dir[2]);

    let ellipsoid = 1.0
        / ((ux / sx).powi(2) + (uy / sy).powi(2) + (uz / sz).powi(2))
            .sqrt()
            .max(1e-12);

    let mut surface = ellipsoid;
    surface *= 1.0 + pinch_yx * uy.max(0.0) * ux.abs();
    surface *= 1.0 + pinch_yz * uy.max(0.0) * uz.abs();
    if uy > 0.0 {
        surface *= 1.0 - flat_y_pos * uy;
    }
    if uy < 0.0 {
        surface *= 1.0 - flat_y_neg * (-uy);
    }
    if uz > 0.0 {
        surface *= 1.0 - flat_z_pos * uz;
    }
    surface *= 1.0 - flat_x * ux.abs();
    surface
}

impl FitModelOnPoints {
    /// Radius of the fitted surface in world space, along the direction
    /// from the fitted center to `world_point`. Used by lead-field
    /// assembly to probe a local skull/scalp thickness per electrode
    /// without re-running the optimizer.
    pub fn surface_radius_towards(&self, params: &[(ParamKind, f64)], world_point: [f64; 3]) -> f64 {
        let [tx, ty, tz] = Self::translation(params);
        let rx = lookup(params, ROTATION_X, 0.0).to_radians();
        let ry = lookup(params, ROTATION_Y, 0.0).to_radians();
        let rz = lookup(params, ROTATION_Z, 0.0).to_radians();

        let local = [world_point[0] - tx, world_point[1] - ty, world_point[2] - tz];
        let [x, y, z] = rotate(local, rx, ry, rz);
        let r = (x * x + y * y + z * z).sqrt().max(1e-12);
        implicit_surface_radius([x / r, y / r, z / r], params)
    }
}

impl CostFn for FitModelOnPoints {
    fn evaluate(&self, params: &[(ParamKind, f64)]) -> f64 {
        let [tx, ty, tz] = Self::translation(params);
        let rx = lookup(params, ROTATION_X, 0.0).to_radians();
        let ry = lookup(params, ROTATION_Y, 0.0).to_radians();
        let rz = lookup(params, ROTATION_Z, 0.0).to_radians();

        let scale = lookup(params, SCALE, 1.0);
        let sx = lookup(params, SCALE_X, scale);
        let sy = lookup(params, SCALE_Y, scale);
        let sz = lookup(params, SCALE_Z, scale);
        if sx <= 0.0 || sy <= 0.0 || sz <= 0.0 {
            return esi_optimizer::EVALUATE_FAILURE_SENTINEL;
        }

        let mut sum = 0.0;
        for p in self.reference.points() {
            let local = [p.x() - tx, p.y() - ty, p.z() - tz];
            let [x, y, z] = rotate(local, rx, ry, rz);
            let r = (x * x + y * y + z * z).sqrt();
            if r < 1e-12 {
                continue;
            }
            let unit = [x / r, y / r, z / r];
            let surface = implicit_surface_radius(unit, params);
            let d = r - surface;
            sum += d * d;
        }
        sum
    }
}
