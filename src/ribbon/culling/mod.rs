// ============================================
// Culling Module - Видимость ленты в frustum
// ============================================

mod plane;
mod frustum;
mod intersect;
mod camera;

pub use plane::{Aabb, Plane, Ray};
pub use frustum::Frustum;
pub use intersect::{frustum_ray_interval, closest_points_between_rays};
pub use camera::{CameraView, PerspectiveCamera};
