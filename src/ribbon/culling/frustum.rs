// ============================================
// Frustum - 6 плоскостей камеры
// ============================================

use ultraviolet::{Mat4, Vec3};

use super::plane::{Aabb, Plane, Ray};
use super::intersect::frustum_ray_interval;

/// Frustum камеры, нормали плоскостей смотрят внутрь
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Извлекает 6 плоскостей из view-projection матрицы (clip z в [-w, w])
    pub fn from_view_projection(view_proj: Mat4) -> Self {
        // m[col][row]
        let m: [[f32; 4]; 4] = view_proj.cols.map(|c| [c.x, c.y, c.z, c.w]);
        let row = |r: usize| [m[0][r], m[1][r], m[2][r], m[3][r]];
        let add = |a: [f32; 4], b: [f32; 4]| [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]];
        let sub = |a: [f32; 4], b: [f32; 4]| [a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]];

        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        Self {
            planes: [
                // Left:   row3 + row0
                Plane::from_coefficients(add(r3, r0)),
                // Right:  row3 - row0
                Plane::from_coefficients(sub(r3, r0)),
                // Bottom: row3 + row1
                Plane::from_coefficients(add(r3, r1)),
                // Top:    row3 - row1
                Plane::from_coefficients(sub(r3, r1)),
                // Near:   row3 + row2
                Plane::from_coefficients(add(r3, r2)),
                // Far:    row3 - row2
                Plane::from_coefficients(sub(r3, r2)),
            ],
        }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.signed_distance(point) >= 0.0)
    }

    /// AABB не отсекается ни одной плоскостью
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        !self.planes.iter().any(|p| p.is_aabb_outside(aabb))
    }

    /// Видимый интервал расстояний вдоль "толстого" луча
    pub fn ray_interval(&self, ray: &Ray, tolerance: Vec3) -> Option<(f32, f32)> {
        frustum_ray_interval(&self.planes, ray, tolerance)
    }
}
