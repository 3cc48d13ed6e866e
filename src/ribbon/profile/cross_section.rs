// ============================================
// Cross Section - 2D полилиния, протягиваемая вдоль кривой
// ============================================
// Вершины лежат в плоскости z = 0 локального кадра.
// Полилиния открытая: рёбра (0,1), (1,2) ... (n-2, n-1), без замыкания.

use ultraviolet::{Vec2, Vec3};

use crate::ribbon::error::{Result, RibbonError};

/// 2D габариты сечения
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl ProfileBounds {
    /// Радиус окружности с центром в начале координат, содержащей все углы
    pub fn radius(&self) -> f32 {
        let x = self.min.x.abs().max(self.max.x.abs());
        let y = self.min.y.abs().max(self.max.y.abs());
        (x * x + y * y).sqrt()
    }
}

/// Сечение ленты (иммутабельно после построения)
#[derive(Debug, Clone)]
pub struct CrossSectionProfile {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    u_coords: Vec<f32>,
    /// Пары индексов вершин, длина всегда чётная
    lines: Vec<u32>,
    bounds: ProfileBounds,
}

impl CrossSectionProfile {
    pub fn new(vertices: &[Vec2], normals: &[Vec2], u_coords: &[f32]) -> Result<Self> {
        if vertices.is_empty() {
            return Err(RibbonError::EmptyProfile);
        }
        if normals.len() != vertices.len() || u_coords.len() != vertices.len() {
            return Err(RibbonError::ProfileLengthMismatch {
                vertices: vertices.len(),
                normals: normals.len(),
                u_coords: u_coords.len(),
            });
        }

        let finite = |v: Vec2| v.x.is_finite() && v.y.is_finite();
        for i in 0..vertices.len() {
            if !finite(vertices[i]) || !finite(normals[i]) || !u_coords[i].is_finite() {
                return Err(RibbonError::NonFiniteProfile { index: i });
            }
        }

        Ok(Self::from_parts(vertices, normals, u_coords))
    }

    /// Сборка без проверок (вход уже валиден и не пуст)
    fn from_parts(vertices: &[Vec2], normals: &[Vec2], u_coords: &[f32]) -> Self {
        let lines = (0..vertices.len() as u32 - 1)
            .flat_map(|i| [i, i + 1])
            .collect();

        let mut min = vertices[0];
        let mut max = vertices[0];
        for v in &vertices[1..] {
            min = min.min_by_component(*v);
            max = max.max_by_component(*v);
        }

        Self {
            vertices: vertices.iter().map(|v| Vec3::new(v.x, v.y, 0.0)).collect(),
            normals: normals.iter().map(|n| Vec3::new(n.x, n.y, 0.0)).collect(),
            u_coords: u_coords.to_vec(),
            lines,
            bounds: ProfileBounds { min, max },
        }
    }

    /// Сечение 10x2 по умолчанию (дубли вершин в углах дают жёсткие нормали)
    pub fn default_ribbon() -> Self {
        let vertices = [
            Vec2::new(-5.0, 1.0),
            Vec2::new(5.0, 1.0),
            Vec2::new(5.0, 1.0),
            Vec2::new(5.0, -1.0),
            Vec2::new(-5.0, -1.0),
            Vec2::new(-5.0, 1.0),
        ];
        let normals = [
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, -1.0),
        ];
        let u_coords = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];

        Self::from_parts(&vertices, &normals, &u_coords)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn u_coords(&self) -> &[f32] {
        &self.u_coords
    }

    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Количество рёбер (пар в lines)
    pub fn edge_count(&self) -> usize {
        self.lines.len() / 2
    }

    pub fn bounds(&self) -> ProfileBounds {
        self.bounds
    }
}

impl Default for CrossSectionProfile {
    fn default() -> Self {
        Self::default_ribbon()
    }
}
