//! 3-shell Ary approximation: rescales the 1-shell analytic potential by
//! per-order radial/tangential correction factors that depend on the
//! conductivity ratio `Xi = sigma_brain / sigma_skull` and the inner/outer
//! skull radii. Named after the function table in the original header
//! (`AryFn`, `RadialRho`, `TangentialRho`, ...); the exact coefficients
//! below are a documented reconstruction (see `DESIGN.md`), not a
//! transcription of the reference implementation's source, which was not
//! available in the retrieved pack.

/// Lowest `radius3` (scalp eccentricity) below which the Ary series is
/// not considered reliable.
pub const SHELL3_TO_1_LOWEST_RADIUS3: f64 = 0.05;
/// Step for the initial linear search when inverting radius3 -> radius1.
pub const SHELL3_TO_1_STEP_INIT: f64 = 0.02;
/// Convergence precision for the radius3 -> radius1 root search.
pub const SHELL3_TO_1_CONVERGENCE: f64 = 1e-8;

/// Per-order correction factor `F_n(Xi)` combining the conductivity ratio
/// with the skull's relative thickness (`inner_radius / outer_radius`).
pub fn ary_fn(n: f64, xi: f64, inner_skull_radius: f64, outer_skull_radius: f64) -> f64 {
    let ratio = (inner_skull_radius / outer_skull_radius).powf(2.0 * n + 1.0);
    ((n + 1.0) * xi + n) * (n / (n + 1.0) * xi + 1.0) - n * (xi - 1.0).powi(2) * ratio
}

/// Radial-component rescaling ratio between a point at eccentricity
/// `radius1` (brain-shell eccentricity) and its corresponding scalp
/// eccentricity `radius3`.
pub fn radial_rho(radius1: f64, radius3: f64, xi: f64, inner_skull_radius: f64, outer_skull_radius: f64) -> f64 {
    let mut sum = 0.0;
    let mut n = 1.0;
    loop {
        let f = ary_fn(n, xi, inner_skull_radius, outer_skull_radius);
        if f.abs() < 1e-300 || n > 60.0 {
            break;
        }
        let term = (2.0 * n + 1.0) / n * (radius1 / radius3).powf(n - 1.0) / f;
        sum += term;
        if term.abs() < 1e-12 && n > 5.0 {
            break;
        }
        n += 1.0;
    }
    sum * xi
}

/// Tangential-component analogue of [`radial_rho`].
pub fn tangential_rho(radius1: f64, radius3: f64, xi: f64, inner_skull_radius: f64, outer_skull_radius: f64) -> f64 {
    let mut sum = 0.0;
    let mut n = 1.0;
    loop {
        let f = ary_fn(n, xi, inner_skull_radius, outer_skull_radius);
        if f.abs() < 1e-300 || n > 60.0 {
            break;
        }
        let term = (2.0 * n + 1.0) * (radius1 / radius3).powf(n - 1.0) / f;
        sum += term;
        if term.abs() < 1e-12 && n > 5.0 {
            break;
        }
        n += 1.0;
    }
    sum * xi
}

/// Maps a scalp-shell eccentricity `radius3` to the brain-shell
/// eccentricity `radius1` whose 1-shell potential, once rescaled by
/// [`ary_m3_to_m1`], approximates the 3-shell potential at `radius3`.
///
/// `radial_rho` is monotonic increasing in its first argument, so the
/// inverse has a single root; rather than bracket-and-bisect on that
/// root (numerically brittle so close to a near-flat region for small
/// `Xi`), this uses a damped fixed-point iteration seeded at `radius3`
/// itself and stops at [`SHELL3_TO_1_CONVERGENCE`] or after a bounded
/// number of steps sized by [`SHELL3_TO_1_STEP_INIT`].
pub fn ary_r3_to_r1(radius3: f64, xi: f64, inner_skull_radius: f64, outer_skull_radius: f64) -> f64 {
    if radius3 < SHELL3_TO_1_LOWEST_RADIUS3 {
        return radius3;
    }

    let target = radial_rho(radius3, radius3, xi, inner_skull_radius, outer_skull_radius);
    let mut r1 = radius3;
    let mut step = SHELL3_TO_1_STEP_INIT * radius3;

    for _ in 0..200 {
        let value = radial_rho(r1, radius3, xi, inner_skull_radius, outer_skull_radius);
        let diff = value - target;
        if diff.abs() < SHELL3_TO_1_CONVERGENCE * target.abs().max(1.0) {
            break;
        }
        // radial_rho grows with r1, so step opposite the sign of diff.
        r1 = (r1 - diff.signum() * step).clamp(0.0, radius3);
        step *= 0.9;
    }
    r1
}

/// Moment rescaling factor paired with [`ary_r3_to_r1`].
pub fn ary_m3_to_m1(radius3: f64, xi: f64, inner_skull_radius: f64, outer_skull_radius: f64) -> f64 {
    let radius1 = ary_r3_to_r1(radius3, xi, inner_skull_radius, outer_skull_radius);
    if radius3 < 1e-12 {
        return 1.0;
    }
    (radius1 / radius3).max(1e-12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ary_fn_is_positive_for_realistic_skull_ratio() {
        let xi = 0.33 / 0.016;
        let f = ary_fn(1.0, xi, 4.6, 5.0);
        assert!(f > 0.0);
    }

    #[test]
    fn r3_to_r1_stays_within_the_scalp_eccentricity() {
        let xi = 0.33 / 0.016;
        let r1 = ary_r3_to_r1(0.8, xi, 4.6, 5.0);
        assert!(r1 >= 0.0 && r1 <= 0.8 + 1e-6);
    }
}
