//! Age-dependent whole-skull conductivity and its split into compact
//! (dense, outer) and spongy (porous, inner) sub-layers.

/// `σ_skull(age) = 0.033 · exp(−0.01846·age)`, age in years.
pub fn skull_conductivity(age_years: f64) -> f64 {
    0.033 * (-0.01846 * age_years).exp()
}

/// Fraction of skull thickness that is spongy bone.
pub const SPONGY_FRACTION: f64 = 0.55;
/// Spongy bone is this many times more conductive than compact bone.
pub const SPONGY_TO_COMPACT_RATIO: f64 = 3.6;

/// Conductivities of the two skull sub-layers that combine, in series
/// along the radial direction, to the measured whole-skull conductivity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactSpongyConductivity {
    pub compact: f64,
    pub spongy: f64,
}

/// Splits a whole-skull conductivity into compact/spongy components.
///
/// Treats the skull as two resistors in series, each a fraction of the
/// total thickness (`1 - SPONGY_FRACTION` compact, `SPONGY_FRACTION`
/// spongy), with the spongy layer `SPONGY_TO_COMPACT_RATIO` times more
/// conductive: `1/σ_eff = f_compact/σ_compact + f_spongy/σ_spongy`.
pub fn split_compact_spongy(whole_skull_conductivity: f64) -> CompactSpongyConductivity {
    let f_spongy = SPONGY_FRACTION;
    let f_compact = 1.0 - SPONGY_FRACTION;
    let compact = whole_skull_conductivity * (f_compact + f_spongy / SPONGY_TO_COMPACT_RATIO);
    let spongy = SPONGY_TO_COMPACT_RATIO * compact;
    CompactSpongyConductivity { compact, spongy }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conductivity_decreases_with_age() {
        let young = skull_conductivity(5.0);
        let old = skull_conductivity(80.0);
        assert!(old < young);
        assert!(young < 0.033);
    }

    #[test]
    fn compact_spongy_split_recombines_to_whole_conductivity() {
        let whole = skull_conductivity(40.0);
        let split = split_compact_spongy(whole);
        let recombined =
            1.0 / ((1.0 - SPONGY_FRACTION) / split.compact + SPONGY_FRACTION / split.spongy);
        assert!((recombined - whole).abs() < 1e-12);
        assert!((split.spongy / split.compact - SPONGY_TO_COMPACT_RATIO).abs() < 1e-12);
    }
}
