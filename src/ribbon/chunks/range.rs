// ============================================
// Visible Range - Диапазон индексов видимых чанков
// ============================================
//
// Центральный луч ленты (origin = начало пути, dir = +Z пути)
// переводится в мир, пересекается с frustum как "толстый" луч,
// интервал расстояний делится на глубину чанка.

use std::ops::Range;

use ultraviolet::{Isometry3, Vec2, Vec3};

use crate::ribbon::culling::{Aabb, CameraView, Ray};
use crate::ribbon::profile::ProfileBounds;

/// Запас в долях чанка против дрожания границ
pub const RANGE_MARGIN: f32 = 0.1;

/// Полуоткрытый диапазон индексов [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRange {
    pub start: i32,
    pub end: i32,
}

impl ChunkRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Из интервала расстояний вдоль центрального луча
    pub fn from_distances(d1: f32, d2: f32, chunk_depth: f32) -> Self {
        let inv = 1.0 / chunk_depth;
        let mut start = (d1 * inv - RANGE_MARGIN).floor() as i32;
        let mut end = (d2 * inv + RANGE_MARGIN).ceil() as i32;
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }
        Self { start, end }
    }

    /// Обрезать до бюджета со стороны, дальней от камеры.
    /// `toward_increasing` - камера смотрит в сторону роста индексов.
    pub fn clamp_to_budget(self, budget: usize, toward_increasing: bool) -> Self {
        let budget = budget.min(i32::MAX as usize) as i32;
        if self.len() <= budget as usize {
            return self;
        }
        if toward_increasing {
            Self { start: self.start, end: self.start + budget }
        } else {
            Self { start: self.end - budget, end: self.end }
        }
    }

    pub fn len(&self) -> usize {
        (self.end as i64 - self.start as i64).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, index: i32) -> bool {
        index >= self.start && index < self.end
    }

    pub fn iter(&self) -> Range<i32> {
        self.start..self.end
    }
}

fn rotate(world: &Isometry3, mut v: Vec3) -> Vec3 {
    world.rotation.rotate_vec(&mut v);
    v
}

/// Полуразмеры "толстого" луча в локальных осях пути:
/// амплитуда отклонения кривой + радиус сечения
pub fn ray_tolerance(bounds: &ProfileBounds, amplitudes: Vec2) -> Vec3 {
    let radius = bounds.radius();
    let rx = amplitudes.x.abs() + radius;
    let ry = amplitudes.y.abs() + radius;
    Vec3::new(rx, ry, rx.max(ry))
}

/// Бокс чанка в локальном пространстве пути
pub fn chunk_bounds(index: i32, chunk_depth: f32, bounds: &ProfileBounds, amplitudes: Vec2) -> Aabb {
    let tolerance = ray_tolerance(bounds, amplitudes);
    let z0 = index as f32 * chunk_depth;
    let z1 = (index + 1) as f32 * chunk_depth;
    Aabb::new(
        Vec3::new(-tolerance.x, -tolerance.y, z0 - bounds.radius()),
        Vec3::new(tolerance.x, tolerance.y, z1 + bounds.radius()),
    )
}

/// Центральный луч пути в мировом пространстве
pub fn world_central_ray(world: &Isometry3) -> Ray {
    Ray::new(world.translation, rotate(world, Vec3::unit_z()))
}

/// Допуск в мировых осях: полуразмеры повёрнутого бокса
fn world_tolerance(world: &Isometry3, local: Vec3) -> Vec3 {
    let m = world.rotation.into_matrix();
    let mut out = Vec3::zero();
    for (axis, r) in m.cols.iter().zip([local.x, local.y, local.z]) {
        out += Vec3::new(axis.x.abs(), axis.y.abs(), axis.z.abs()) * r;
    }
    out
}

/// Видимый диапазон чанков или None, если лента не видна
pub fn visible_range(
    world: &Isometry3,
    camera: &CameraView,
    chunk_depth: f32,
    tolerance: Vec3,
    budget: usize,
) -> Option<ChunkRange> {
    let ray = world_central_ray(world);
    let (d1, d2) = camera.frustum.ray_interval(&ray, world_tolerance(world, tolerance))?;

    let range = ChunkRange::from_distances(d1, d2, chunk_depth);
    if range.is_empty() {
        return Some(range);
    }

    let toward_increasing = camera.forward.direction.dot(ray.direction) > 0.0;
    Some(range.clamp_to_budget(budget, toward_increasing))
}
