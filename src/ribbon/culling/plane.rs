// ============================================
// Plane / Ray / AABB - Геометрические примитивы
// ============================================

use ultraviolet::Vec3;

/// Плоскость: dot(normal, p) + distance >= 0 означает "внутри"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Из коэффициентов (nx, ny, nz, d), нормаль приводится к единичной длине
    pub fn from_coefficients(c: [f32; 4]) -> Self {
        let normal = Vec3::new(c[0], c[1], c[2]);
        let len = normal.mag();
        if len > 0.0 {
            Self { normal: normal / len, distance: c[3] / len }
        } else {
            Self { normal, distance: c[3] }
        }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalized();
        Self { normal, distance: -normal.dot(point) }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Расстояние вдоль луча до пересечения (может быть отрицательным)
    /// None если луч параллелен плоскости
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom == 0.0 {
            return None;
        }
        Some(-self.signed_distance(ray.origin) / denom)
    }

    /// AABB целиком снаружи (проверка по p-вершине)
    pub fn is_aabb_outside(&self, aabb: &Aabb) -> bool {
        let px = if self.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x };
        let py = if self.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y };
        let pz = if self.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z };

        self.signed_distance(Vec3::new(px, py, pz)) < 0.0
    }
}

/// Луч с нормализованным направлением
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalized() }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Наименьший бокс, содержащий обе точки
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min_by_component(b),
            max: a.max_by_component(b),
        }
    }

    /// Расширить на величину по каждой оси
    pub fn expanded(&self, margin: Vec3) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }
}
