// ============================================
// Path Frame - Позиция + ориентация на кривой
// ============================================

use ultraviolet::{Mat3, Vec3};

/// Порог вырожденности cross(up, tangent)
const DEGENERATE_EPSILON: f32 = 1e-8;

/// Сэмпл кривой: позиция и ортонормированный базис
///
/// Базис хранится столбцами: x = бинормаль, y = нормаль, z = касательная.
/// Это тот же поворот, что даёт look-rotation(forward = tangent, up = normal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFrame {
    pub position: Vec3,
    pub basis: Mat3,
}

impl PathFrame {
    /// Строит кадр по позиции и касательной
    ///
    /// Если касательная параллельна мировому up (Y), бинормаль берётся
    /// от вторичной оси (мировой Z), чтобы не получить NaN.
    pub fn new(position: Vec3, tangent: Vec3) -> Self {
        let tangent = tangent.normalized();

        let mut binormal = Vec3::unit_y().cross(tangent);
        if binormal.mag_sq() < DEGENERATE_EPSILON {
            log::warn!("path tangent is parallel to world up, using Z as secondary up axis");
            binormal = Vec3::unit_z().cross(tangent);
        }
        let binormal = binormal.normalized();
        let normal = tangent.cross(binormal);

        Self {
            position,
            basis: Mat3::new(binormal, normal, tangent),
        }
    }

    pub fn binormal(&self) -> Vec3 {
        self.basis.cols[0]
    }

    pub fn normal(&self) -> Vec3 {
        self.basis.cols[1]
    }

    pub fn tangent(&self) -> Vec3 {
        self.basis.cols[2]
    }

    /// Точка из локального пространства кадра в мировое
    pub fn local_to_world(&self, point: Vec3) -> Vec3 {
        self.position + self.basis * point
    }

    /// Точка из мирового пространства в локальное (базис ортонормирован, inverse = transpose)
    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        self.basis.transposed() * (point - self.position)
    }

    /// Направление из локального пространства кадра в мировое
    pub fn local_to_world_direction(&self, direction: Vec3) -> Vec3 {
        self.basis * direction
    }
}
