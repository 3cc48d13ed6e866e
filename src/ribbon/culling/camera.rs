// ============================================
// Camera - Перспективная камера для отсечения
// ============================================
// Хост передаёт в тик только frustum и луч взгляда (CameraView).
// PerspectiveCamera - удобный способ получить их из позиции/направления.

use ultraviolet::{Mat4, Vec3};

use super::frustum::Frustum;
use super::plane::Ray;

/// Что стриминг знает о камере за один тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub frustum: Frustum,
    /// Луч взгляда (нужен только для выбора обрезаемого конца диапазона)
    pub forward: Ray,
}

/// Камера с перспективной проекцией (clip z в [-w, w])
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Направление взгляда (не обязано быть единичным)
    pub forward: Vec3,
    /// Вертикальный угол обзора в радианах
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(position: Vec3, forward: Vec3, aspect: f32) -> Self {
        Self {
            position,
            forward,
            fov_y: 70.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 2000.0,
        }
    }

    /// Вектор "вверх" для look_at, при взгляде вдоль Y берём Z
    fn up(&self) -> Vec3 {
        if self.forward.normalized().dot(Vec3::unit_y()).abs() > 0.999 {
            Vec3::unit_z()
        } else {
            Vec3::unit_y()
        }
    }

    /// Матрица вида (View Matrix)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.forward, self.up())
    }

    /// Матрица проекции (Perspective)
    pub fn projection_matrix(&self) -> Mat4 {
        ultraviolet::projection::perspective_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Комбинированная матрица View-Projection
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.view_projection())
    }

    /// Снимок для тика: frustum + луч взгляда от near плоскости
    pub fn view(&self) -> CameraView {
        let direction = self.forward.normalized();
        CameraView {
            frustum: self.frustum(),
            forward: Ray::new(self.position + direction * self.near, direction),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }
}
