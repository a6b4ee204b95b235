//! D2Q9 lattice constants and local equilibrium
//!
//! Nine discrete velocities on a square lattice. Rows grow downward, so direction 2
//! points to the previous row and direction 4 to the next one:
//!
//! ```text
//!   6   2   5
//!    \  |  /
//!   3 - 0 - 1
//!    /  |  \
//!   7   4   8
//! ```

use crate::core_types::Vec2;

/// Number of discrete velocities
pub const Q: usize = 9;

/// Populations of one cell
pub type Populations = [f32; Q];

/// Lattice weights, summing to one
pub const WEIGHTS: Populations = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// x component of each discrete velocity
pub const EX: [i32; Q] = [0, 1, 0, -1, 0, 1, -1, -1, 1];

/// y component of each discrete velocity
pub const EY: [i32; Q] = [0, 0, -1, 0, 1, -1, -1, 1, 1];

/// Index of the antipodal direction, used by bounce-back
pub const OPPOSITE: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

const fn opposites_are_antipodal() -> bool {
    let mut k = 0;
    while k < Q {
        let inv = OPPOSITE[k];
        if EX[inv] != -EX[k] || EY[inv] != -EY[k] || OPPOSITE[inv] != k {
            return false;
        }
        k += 1;
    }
    true
}

const _: () = assert!(opposites_are_antipodal(), "OPPOSITE table is not antipodal");

/// BGK relaxation frequency for a kinematic viscosity in lattice units
///
/// `ω = 1 / (3ν + 0.5)`; any ν > 0 gives 0 < ω < 2.
#[inline]
#[must_use]
pub fn relaxation_frequency(viscosity: f32) -> f32 {
    1.0 / (3.0 * viscosity + 0.5)
}

/// Equilibrium populations for density `rho` and velocity `u`
///
/// `f_eq_k = w_k ρ (1 + 3 e_k·u + 4.5 (e_k·u)² − 1.5 |u|²)`
#[inline]
#[must_use]
pub fn equilibrium(rho: f32, u: Vec2) -> Populations {
    let u_sq = u.norm_squared();
    let mut feq = [0.0; Q];
    for k in 0..Q {
        let eu = EX[k] as f32 * u.x + EY[k] as f32 * u.y;
        feq[k] = WEIGHTS[k] * rho * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * u_sq);
    }
    feq
}

/// Density and velocity moments of a population vector
///
/// Zero density yields zero velocity rather than a non-finite value.
#[inline]
#[must_use]
pub fn moments(f: &Populations) -> (f32, Vec2) {
    let mut rho = 0.0;
    let mut momentum = Vec2::zeros();
    for k in 0..Q {
        rho += f[k];
        momentum.x += EX[k] as f32 * f[k];
        momentum.y += EY[k] as f32 * f[k];
    }
    let u = if rho > 0.0 { momentum / rho } else { Vec2::zeros() };
    (rho, u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f32 = WEIGHTS.iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_opposite_is_antipodal() {
        for k in 0..Q {
            let inv = OPPOSITE[k];
            assert_eq!(EX[inv], -EX[k], "ex mismatch for direction {k}");
            assert_eq!(EY[inv], -EY[k], "ey mismatch for direction {k}");
            assert_eq!(OPPOSITE[inv], k);
        }
    }

    #[test]
    fn test_directions_unique() {
        for a in 0..Q {
            for b in (a + 1)..Q {
                assert!((EX[a], EY[a]) != (EX[b], EY[b]));
            }
        }
    }

    #[test]
    fn test_omega_range() {
        for nu in [1e-4, 0.015, 0.1, 1.0, 100.0] {
            let omega = relaxation_frequency(nu);
            assert!(omega > 0.0 && omega < 2.0, "nu={nu} gave omega={omega}");
        }
        assert_abs_diff_eq!(relaxation_frequency(0.5), 0.5);
    }

    #[test]
    fn test_equilibrium_moments() {
        let rho = 1.2;
        let u = Vec2::new(0.05, -0.03);
        let feq = equilibrium(rho, u);
        let (rho_out, u_out) = moments(&feq);
        assert_abs_diff_eq!(rho_out, rho, epsilon = 1e-6);
        assert_abs_diff_eq!(u_out.x, u.x, epsilon = 1e-6);
        assert_abs_diff_eq!(u_out.y, u.y, epsilon = 1e-6);
    }

    #[test]
    fn test_rest_equilibrium_is_weights() {
        assert_eq!(equilibrium(1.0, Vec2::zeros()), WEIGHTS);
    }

    #[test]
    fn test_zero_density_gives_zero_velocity() {
        let (rho, u) = moments(&[0.0; Q]);
        assert_eq!(rho, 0.0);
        assert_eq!(u, Vec2::zeros());
    }
}
