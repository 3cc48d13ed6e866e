// ============================================
// Intersect - Луч против frustum, луч против луча
// ============================================
//
// Интервал видимости считается без сэмплирования чанков:
// 1. Для каждой плоскости - расстояние пересечения и тип (вход/выход)
// 2. Максимум входов = нижняя граница, минимум выходов = верхняя
// 3. Бокс вокруг отрезка + допуск перепроверяется всеми плоскостями
//
// Шаг 3 лишь смягчает ложные срабатывания: луч может пройти каждую
// плоскость по отдельности, а отрезок выйдет через ребро/угол frustum.

use ultraviolet::Vec3;

use super::plane::{Aabb, Plane, Ray};

/// Луч почти параллелен плоскости, если угол с ней меньше этого
const PARALLEL_ANGLE_DEGREES: f32 = 2.0;

/// Интервал (d_near, d_far) вдоль луча, лежащий внутри всех плоскостей
///
/// `tolerance` - полуразмеры бокса, которым "утолщается" найденный отрезок
/// при финальной проверке. None - луч не виден.
pub fn frustum_ray_interval(planes: &[Plane], ray: &Ray, tolerance: Vec3) -> Option<(f32, f32)> {
    let min_sin = PARALLEL_ANGLE_DEGREES.to_radians().sin();

    let mut d1: Option<f32> = None;
    let mut d2: Option<f32> = None;

    for plane in planes {
        // |cos(normal, dir)| = sin(угол между лучом и плоскостью)
        let cos = plane.normal.dot(ray.direction).abs() / plane.normal.mag().max(f32::MIN_POSITIVE);
        if cos < min_sin {
            continue;
        }

        let Some(d) = plane.raycast(ray) else { continue };

        // Тип пересечения не зависит от того, с какой стороны стартует луч
        let entering = (d > 0.0) ^ (plane.signed_distance(ray.origin) >= 0.0);

        if entering {
            d1 = Some(d1.map_or(d, |v| v.max(d)));
        } else {
            d2 = Some(d2.map_or(d, |v| v.min(d)));
        }
    }

    let (mut d1, mut d2) = (d1?, d2?);
    if d1 > d2 {
        std::mem::swap(&mut d1, &mut d2);
    }

    let bounds = Aabb::from_points(ray.point_at(d1), ray.point_at(d2)).expanded(tolerance);
    if planes.iter().any(|p| p.is_aabb_outside(&bounds)) {
        return None;
    }

    Some((d1, d2))
}

/// Параметры (s, u) ближайших точек r1(s) и r2(u)
///
/// None если определитель системы ровно 0 (лучи параллельны)
pub fn closest_points_between_rays(r1: &Ray, r2: &Ray) -> Option<(f32, f32)> {
    let w0 = r1.origin - r2.origin;
    let a = r1.direction.dot(r1.direction);
    let b = r1.direction.dot(r2.direction);
    let e = r2.direction.dot(r2.direction);
    let d = r1.direction.dot(w0);
    let f = r2.direction.dot(w0);

    let det = a * e - b * b;
    if det == 0.0 {
        return None;
    }

    let s = (b * f - e * d) / det;
    let u = (a * f - b * d) / det;
    if !(s.is_finite() && u.is_finite()) {
        return None;
    }
    Some((s, u))
}
