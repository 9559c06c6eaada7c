const MIN_DISTANCE: f64 = 1e-6;
const CLAMPED_ENERGY: f64 = 1e10;

#[inline]
pub fn harmonic_bond(dist: f64, r0: f64, k: f64) -> f64 {
    let dr = dist - r0;
    k * dr * dr
}

/// dE/dr of [`harmonic_bond`].
#[inline]
pub fn harmonic_bond_derivative(dist: f64, r0: f64, k: f64) -> f64 {
    2.0 * k * (dist - r0)
}

#[inline]
pub fn lennard_jones_12_6(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return CLAMPED_ENERGY;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    well_depth * (rho12 - 2.0 * rho6)
}

/// dE/dr of [`lennard_jones_12_6`]. Zero inside the clamped core.
#[inline]
pub fn lennard_jones_12_6_derivative(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return 0.0;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    12.0 * well_depth * (rho6 - rho12) / dist
}
