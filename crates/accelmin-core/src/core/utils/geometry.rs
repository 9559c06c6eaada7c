use nalgebra::{Point3, Vector3};

/// Root-mean-square deviation between two equally sized, non-empty coordinate sets.
pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// RMS over all scalar components of a per-particle vector field.
pub fn rms_component(vectors: &[Vector3<f64>]) -> f64 {
    if vectors.is_empty() {
        return 0.0;
    }
    let sum: f64 = vectors.iter().map(|v| v.norm_squared()).sum();
    (sum / (3 * vectors.len()) as f64).sqrt()
}

/// Largest per-particle Euclidean norm in a vector field.
pub fn max_norm(vectors: &[Vector3<f64>]) -> f64 {
    vectors.iter().map(|v| v.norm()).fold(0.0, f64::max)
}

/// Dot product of two per-particle vector fields, treated as flat 3N vectors.
pub fn dot(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> f64 {
    a.iter().zip(b.iter()).map(|(u, v)| u.dot(v)).sum()
}
