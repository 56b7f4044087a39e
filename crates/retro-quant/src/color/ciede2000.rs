//! CIEDE2000 color difference
//!
//! Implements the formula as published by Sharma, Wu and Dalal, "The CIEDE2000
//! Color-Difference Formula: Implementation Notes, Supplementary Test Data, and
//! Mathematical Observations" (2005), with kL = kC = kH = 1.

use std::f64::consts::{PI, TAU};

use super::lab::Lab;

/// 25^7, the chroma normalization constant shared by G and RC.
const POW25_7: f64 = 6_103_515_625.0;

/// Hue angle in radians, normalized to [0, 2π). Zero for achromatic input.
#[inline]
fn hue_angle(b: f64, a_prime: f64) -> f64 {
    if a_prime == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_prime);
    if h < 0.0 {
        h + TAU
    } else {
        h
    }
}

/// CIEDE2000 perceptual distance between two Lab colors.
///
/// Symmetric, zero for identical inputs, and finite for any finite input.
/// Near-zero chroma and hue pairs straddling 0/2π are handled by the branch
/// logic from the reference paper rather than naive subtraction.
///
/// # Example
///
/// ```
/// use retro_quant::{delta_e_2000, Lab};
///
/// // Pair 1 of the Sharma et al. test data
/// let a = Lab::new(50.0, 2.6772, -79.7751);
/// let b = Lab::new(50.0, 0.0, -82.7485);
/// assert!((delta_e_2000(a, b) - 2.0425).abs() < 1e-4);
/// ```
pub fn delta_e_2000(lab1: Lab, lab2: Lab) -> f64 {
    let c1 = lab1.chroma();
    let c2 = lab2.chroma();
    let c_bar = (c1 + c2) / 2.0;

    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = (1.0 + g) * lab1.a;
    let a2p = (1.0 + g) * lab2.a;

    let c1p = (a1p * a1p + lab1.b * lab1.b).sqrt();
    let c2p = (a2p * a2p + lab2.b * lab2.b).sqrt();

    let h1p = hue_angle(lab1.b, a1p);
    let h2p = hue_angle(lab2.b, a2p);

    let chroma_product = c1p * c2p;

    let delta_lp = lab2.l - lab1.l;
    let delta_cp = c2p - c1p;

    let delta_hp = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff.abs() <= PI {
            diff
        } else if diff > PI {
            diff - TAU
        } else {
            diff + TAU
        }
    };
    let delta_big_hp = 2.0 * chroma_product.sqrt() * (delta_hp / 2.0).sin();

    let l_bar_p = (lab1.l + lab2.l) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;

    let h_bar_p = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= PI {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < TAU {
        (h1p + h2p + TAU) / 2.0
    } else {
        (h1p + h2p - TAU) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30f64.to_radians()).cos()
        + 0.24 * (2.0 * h_bar_p).cos()
        + 0.32 * (3.0 * h_bar_p + 6f64.to_radians()).cos()
        - 0.20 * (4.0 * h_bar_p - 63f64.to_radians()).cos();

    let h_bar_deg = h_bar_p.to_degrees();
    let delta_theta = (30.0 * (-((h_bar_deg - 275.0) / 25.0).powi(2)).exp()).to_radians();

    let c_bar_p7 = c_bar_p.powi(7);
    let r_c = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();

    let l_offset = (l_bar_p - 50.0).powi(2);
    let s_l = 1.0 + (0.015 * l_offset) / (20.0 + l_offset).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_p;
    let s_h = 1.0 + 0.015 * c_bar_p * t;

    let r_t = -(2.0 * delta_theta).sin() * r_c;

    let dl = delta_lp / s_l;
    let dc = delta_cp / s_c;
    let dh = delta_big_hp / s_h;

    (dl * dl + dc * dc + dh * dh + r_t * dc * dh).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    /// Selected pairs from the Sharma et al. supplementary test data:
    /// (L1, a1, b1, L2, a2, b2, expected ΔE00)
    const SHARMA_PAIRS: &[(f64, f64, f64, f64, f64, f64, f64)] = &[
        (50.0, 2.6772, -79.7751, 50.0, 0.0, -82.7485, 2.0425),
        (50.0, 3.1571, -77.2803, 50.0, 0.0, -82.7485, 2.8615),
        (50.0, 2.8361, -74.0200, 50.0, 0.0, -82.7485, 3.4412),
        (50.0, 0.0, 0.0, 50.0, -1.0, 2.0, 2.3669),
        (50.0, -1.0, 2.0, 50.0, 0.0, 0.0, 2.3669),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0009, 7.1792),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0010, 7.1792),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0011, 7.2195),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0012, 7.2195),
        (50.0, -0.0010, 2.4900, 50.0, 0.0009, -2.4900, 4.8045),
        (50.0, 2.5, 0.0, 56.0, -27.0, -3.0, 31.9030),
        (50.0, 2.5, 0.0, 58.0, 24.0, 15.0, 19.4535),
        (50.0, 2.5, 0.0, 50.0, 3.1736, 0.5854, 1.0000),
        (50.0, 2.5, 0.0, 50.0, 3.2972, 0.0, 1.0000),
        (60.2574, -34.0099, 36.2677, 60.4626, -34.1751, 39.4387, 1.2644),
        (63.0109, -31.0961, -5.8663, 62.8187, -29.7946, -4.0864, 1.2630),
        (61.2901, 3.7196, -5.3901, 61.4292, 2.2480, -4.9620, 1.8731),
        (35.0831, -44.1164, 3.7933, 35.0232, -40.0716, 1.5901, 1.8645),
        (22.7233, 20.0904, -46.6940, 23.0331, 14.9730, -42.5619, 2.0373),
        (90.8027, -2.0831, 1.4410, 91.1528, -1.6435, 0.0447, 1.4441),
        (90.9257, -0.5406, -0.9208, 88.6381, -0.8985, -0.7239, 1.5381),
        (6.7747, -0.2908, -2.4247, 5.8714, -0.0985, -2.2286, 0.6377),
        (2.0776, 0.0795, -1.1350, 0.9033, -0.0636, -0.5514, 0.9082),
    ];

    #[test]
    fn test_sharma_reference_pairs() {
        for (i, &(l1, a1, b1, l2, a2, b2, expected)) in SHARMA_PAIRS.iter().enumerate() {
            let actual = delta_e_2000(Lab::new(l1, a1, b1), Lab::new(l2, a2, b2));
            assert!(
                (actual - expected).abs() < 1e-4,
                "pair {i}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn test_symmetry() {
        for &(l1, a1, b1, l2, a2, b2, _) in SHARMA_PAIRS {
            let x = Lab::new(l1, a1, b1);
            let y = Lab::new(l2, a2, b2);
            assert!((delta_e_2000(x, y) - delta_e_2000(y, x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identity_is_zero() {
        for v in [0u8, 1, 37, 128, 255] {
            for color in [Color::new(v, 0, 0), Color::new(0, v, v), Color::new(v, v, v)] {
                let lab = Lab::from(color);
                assert_eq!(delta_e_2000(lab, lab), 0.0, "identity failed for {color}");
            }
        }
    }

    #[test]
    fn test_achromatic_pairs_are_finite() {
        let black = Lab::from(Color::new(0, 0, 0));
        let white = Lab::from(Color::new(255, 255, 255));
        let gray = Lab::new(50.0, 0.0, 0.0);
        for (x, y) in [(black, white), (gray, black), (gray, gray)] {
            let d = delta_e_2000(x, y);
            assert!(d.is_finite(), "non-finite distance {d}");
        }
        assert!(delta_e_2000(black, white) > 90.0);
    }

    #[test]
    fn test_hue_wraparound_is_small_distance() {
        // Hues at ~359° and ~1° are perceptually close
        let x = Lab::new(50.0, 20.0, -0.3);
        let y = Lab::new(50.0, 20.0, 0.3);
        assert!(delta_e_2000(x, y) < 1.0);
    }
}
