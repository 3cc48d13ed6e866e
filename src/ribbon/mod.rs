// ============================================
// Ribbon Module - Потоковая генерация ленты
// ============================================
// Кривая, сечение, видимость, меши и жизненный цикл чанков

pub mod error;
pub mod path;
pub mod profile;
pub mod culling;
pub mod mesh;
pub mod chunks;
pub mod core;

// Re-exports
pub use error::{RibbonError, Result};
pub use path::{PathCurve, PathFrame, CurveParams};
pub use profile::{CrossSectionProfile, ProfileBounds};
pub use culling::{Aabb, CameraView, Frustum, PerspectiveCamera, Plane, Ray};
pub use mesh::{ChunkMesh, RibbonVertex};
pub use chunks::{ChunkRange, ChunkStreamingManager, DrawableHost, StreamingParams, TickReport};
pub use self::core::{Ribbon, RibbonConfig, ProfileDef};
