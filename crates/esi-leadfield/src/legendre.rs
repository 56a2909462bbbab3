//! Legendre polynomials, evaluated by Bonnet's three-term recurrence.
//! Used by the N-shell exact spherical series and by the 1-shell exact
//! Legendre formula (its `NumLayers == 1` special case).

/// `P_n(x)` for `n >= 0`, `x` in `[-1, 1]`.
pub fn legendre_p(n: u32, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => {
            let (mut p0, mut p1) = (1.0, x);
            for k in 1..n {
                let k = k as f64;
                let p2 = ((2.0 * k + 1.0) * x * p1 - k * p0) / (k + 1.0);
                p0 = p1;
                p1 = p2;
            }
            p1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_low_order_polynomials() {
        assert!((legendre_p(0, 0.7) - 1.0).abs() < 1e-12);
        assert!((legendre_p(1, 0.7) - 0.7).abs() < 1e-12);
        let p2 = 0.5 * (3.0 * 0.7f64.powi(2) - 1.0);
        assert!((legendre_p(2, 0.7) - p2).abs() < 1e-12);
    }

    #[test]
    fn is_bounded_by_one_on_the_unit_interval() {
        for n in 0..20 {
            for i in -10..=10 {
                let x = i as f64 / 10.0;
                assert!(legendre_p(n, x).abs() <= 1.0 + 1e-9);
            }
        }
    }
}
