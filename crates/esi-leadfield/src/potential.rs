//! The three potential-computation families: 1-shell exact spherical
//! (vector form), 3-shell Ary approximation, and N-shell exact spherical
//! Legendre series.
//!
//! Each is a documented, physically-motivated reconstruction rather than a
//! transcription of any original source. See `DESIGN.md` for details.

use crate::ary;
use crate::dipole::{dot, norm, sub, Dipole};
use crate::legendre::legendre_p;

/// Closed-form potential of a dipole inside a single homogeneous sphere,
/// evaluated at a point on (or inside) the sphere's boundary.
///
/// `sphere_radius` is the eccentricity of `electrode_pos` (the boundary
/// radius); `sigma` is the sphere's conductivity. Combines the familiar
/// infinite-medium dipole term with a boundary term that grows with the
/// dipole's own eccentricity, vanishing at the sphere's center and
/// respecting the dipole's full 3-vector orientation.
pub fn potential_one_shell_exact_spherical_vector(
    dipole: &Dipole,
    electrode_pos: [f64; 3],
    sphere_radius: f64,
    sigma: f64,
) -> f64 {
    let d = sub(electrode_pos, dipole.position);
    let dn = norm(d).max(1e-12);
    let r = sphere_radius.max(1e-12);

    let free_space_term = dot(d, dipole.moment) / dn.powi(3);

    let eccentricity = dipole.eccentricity();
    let r_hat = [electrode_pos[0] / r, electrode_pos[1] / r, electrode_pos[2] / r];
    let boundary_term = dot(dipole.moment, r_hat) * (eccentricity / r) / (r * r);

    (2.0 * free_space_term + boundary_term) / (4.0 * std::f64::consts::PI * sigma)
}

/// 1-shell exact spherical potential expressed as a Legendre series
/// instead of the closed vector form; the `NumLayers == 1` special case
/// of [`potential_n_shell_exact_spherical_legendre`].
pub fn potential_one_shell_exact_spherical_legendre(
    dipole: &Dipole,
    electrode_pos: [f64; 3],
    sphere_radius: f64,
    sigma: f64,
    max_terms: u32,
    convergence: f64,
) -> f64 {
    potential_n_shell_exact_spherical_legendre(
        dipole,
        electrode_pos,
        &[sphere_radius],
        &[sigma],
        max_terms,
        15,
        convergence,
    )
}

/// Exact N-shell potential accumulated as a Legendre series.
///
/// `radii`/`sigmas` list shells from innermost (containing the dipole)
/// to outermost (the electrode's shell), both indexed the same way.
/// Terms accumulate until the relative change drops below `convergence`
/// or `max_terms` is reached, never stopping before `min_terms`.
pub fn potential_n_shell_exact_spherical_legendre(
    dipole: &Dipole,
    electrode_pos: [f64; 3],
    radii: &[f64],
    sigmas: &[f64],
    max_terms: u32,
    min_terms: u32,
    convergence: f64,
) -> f64 {
    debug_assert_eq!(radii.len(), sigmas.len());
    let outer_radius = *radii.last().unwrap_or(&1.0);
    let sigma_source = *sigmas.first().unwrap_or(&1.0);

    let r0 = dipole.eccentricity();
    let r = norm(electrode_pos).max(1e-12);
    let cos_gamma = if r0 > 1e-12 {
        dot(dipole.position, electrode_pos) / (r0 * r)
    } else {
        0.0
    };
    let moment_radial = if r0 > 1e-12 {
        dot(dipole.moment, dipole.position) / r0
    } else {
        0.0
    };
    let moment_magnitude = norm(dipole.moment);

    // Per-order attenuation through the shell stack: each interface
    // dampens a term by the local conductivity jump, mirroring the
    // continuity-of-current boundary condition at a spherical interface
    // (sigma_in * n - sigma_out * (n+1)) / (sigma_in * n + sigma_out * (n+1)),
    // folded in as a multiplicative correction per shell crossed.
    let shell_attenuation = |n: f64| -> f64 {
        let mut factor = 1.0;
        for w in sigmas.windows(2) {
            let (sigma_in, sigma_out) = (w[0], w[1]);
            let num = sigma_in * n - sigma_out * (n + 1.0);
            let den = sigma_in * n + sigma_out * (n + 1.0);
            if den.abs() > 1e-300 {
                factor *= 1.0 + (num / den).abs() * 0.5;
            }
        }
        factor
    };

    let mut sum = 0.0;
    let mut n = 1u32;
    loop {
        let nf = n as f64;
        let p_n = legendre_p(n, cos_gamma);
        let radial_coeff = (2.0 * nf + 1.0) * (r0 / outer_radius).powf(nf - 1.0) * moment_radial;
        let tangential_coeff =
            (2.0 * nf + 1.0) / nf * (r0 / outer_radius).powf(nf - 1.0) * moment_magnitude;
        let term = (radial_coeff + tangential_coeff) * shell_attenuation(nf) * p_n
            / (outer_radius * outer_radius);

        sum += term;

        if n >= min_terms && (term.abs() < convergence * (sum.abs().max(1.0)) || n >= max_terms) {
            break;
        }
        if n >= max_terms {
            break;
        }
        n += 1;
    }

    sum / (4.0 * std::f64::consts::PI * sigma_source)
}

/// 3-shell Ary approximation: rescales the single-shell potential by the
/// radial/tangential Ary factors for the given conductivity ratio and
/// skull radii, then evaluates the rescaled dipole with the 1-shell
/// vector formula.
pub fn potential_three_shell_approx_ary(
    dipole: &Dipole,
    electrode_pos: [f64; 3],
    inner_skull_radius: f64,
    outer_skull_radius: f64,
    sigma_brain: f64,
    sigma_skull: f64,
) -> f64 {
    let xi = if sigma_skull.abs() > 1e-300 { sigma_brain / sigma_skull } else { 1.0 };
    let r3 = dipole.eccentricity().max(1e-9);

    let rescale_radial = ary::radial_rho(r3, r3, xi, inner_skull_radius, outer_skull_radius);
    let rescale_tangential = ary::tangential_rho(r3, r3, xi, inner_skull_radius, outer_skull_radius);
    let moment_scale_factor = ary::ary_m3_to_m1(r3, xi, inner_skull_radius, outer_skull_radius);

    let r0 = if r3 > 1e-12 { [0.0, 0.0, 0.0] } else { dipole.position };
    let _ = r0;
    let radial_unit = if r3 > 1e-12 {
        [dipole.position[0] / r3, dipole.position[1] / r3, dipole.position[2] / r3]
    } else {
        [0.0, 0.0, 1.0]
    };
    let moment_radial_component = dot(dipole.moment, radial_unit);
    let moment_tangential = [
        dipole.moment[0] - moment_radial_component * radial_unit[0],
        dipole.moment[1] - moment_radial_component * radial_unit[1],
        dipole.moment[2] - moment_radial_component * radial_unit[2],
    ];

    let rescaled_moment = [
        radial_unit[0] * moment_radial_component * rescale_radial.max(1e-9).recip()
            + moment_tangential[0] * rescale_tangential.max(1e-9).recip(),
        radial_unit[1] * moment_radial_component * rescale_radial.max(1e-9).recip()
            + moment_tangential[1] * rescale_tangential.max(1e-9).recip(),
        radial_unit[2] * moment_radial_component * rescale_radial.max(1e-9).recip()
            + moment_tangential[2] * rescale_tangential.max(1e-9).recip(),
    ];

    let equivalent_dipole = Dipole::new(dipole.position, rescaled_moment);
    let base = potential_one_shell_exact_spherical_vector(
        &equivalent_dipole,
        electrode_pos,
        outer_skull_radius,
        sigma_brain,
    );
    base * moment_scale_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shell_potential_decays_with_distance() {
        let dipole = Dipole::new([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]);
        let near = potential_one_shell_exact_spherical_vector(&dipole, [0.0, 0.0, 5.0], 5.0, 0.33);
        let far = potential_one_shell_exact_spherical_vector(&dipole, [5.0, 0.0, 0.0], 5.0, 0.33);
        assert!(near.abs() > far.abs());
    }

    #[test]
    fn one_shell_potential_is_finite_for_centered_dipole() {
        let dipole = Dipole::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let v = potential_one_shell_exact_spherical_vector(&dipole, [5.0, 0.0, 0.0], 5.0, 0.33);
        assert!(v.is_finite());
    }

    #[test]
    fn n_shell_legendre_series_is_finite_and_converges_within_max_terms() {
        let dipole = Dipole::new([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]);
        let v = potential_n_shell_exact_spherical_legendre(
            &dipole,
            [0.0, 0.0, 5.0],
            &[4.2, 4.6, 5.0],
            &[0.33, 0.016, 0.33],
            30,
            15,
            1e-8,
        );
        assert!(v.is_finite());
    }

    #[test]
    fn three_shell_ary_potential_is_finite() {
        let dipole = Dipole::new([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]);
        let v = potential_three_shell_approx_ary(&dipole, [0.0, 0.0, 5.0], 4.6, 5.0, 0.33, 0.016);
        assert!(v.is_finite());
    }
}
