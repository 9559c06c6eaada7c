use nalgebra::{Point3, Vector3};
use std::ops::{Index, IndexMut};

/// An ordered set of particle positions at one point of an optimization trajectory.
///
/// The particle order is significant: force vectors returned by an energy model are
/// matched to positions by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    positions: Vec<Point3<f64>>,
}

impl Configuration {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    pub fn from_coordinates(coordinates: &[[f64; 3]]) -> Self {
        Self {
            positions: coordinates
                .iter()
                .map(|c| Point3::new(c[0], c[1], c[2]))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.positions.iter()
    }

    /// Overwrites every position with the matching one from `other`.
    ///
    /// Both configurations must hold the same number of particles.
    pub fn copy_from(&mut self, other: &Configuration) {
        debug_assert_eq!(self.len(), other.len());
        self.positions.copy_from_slice(&other.positions);
    }

    /// Sets `self = base + scale * direction`, particle by particle.
    pub fn assign_displaced(
        &mut self,
        base: &Configuration,
        direction: &[Vector3<f64>],
        scale: f64,
    ) {
        debug_assert_eq!(self.len(), base.len());
        debug_assert_eq!(self.len(), direction.len());
        for ((out, origin), dir) in self
            .positions
            .iter_mut()
            .zip(base.positions.iter())
            .zip(direction.iter())
        {
            *out = *origin + *dir * scale;
        }
    }

    /// Index of the first particle with a NaN or infinite coordinate.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.positions
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    }

    pub fn into_inner(self) -> Vec<Point3<f64>> {
        self.positions
    }
}

impl From<Vec<Point3<f64>>> for Configuration {
    fn from(positions: Vec<Point3<f64>>) -> Self {
        Self::new(positions)
    }
}

impl Index<usize> for Configuration {
    type Output = Point3<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.positions[index]
    }
}

impl IndexMut<usize> for Configuration {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.positions[index]
    }
}
