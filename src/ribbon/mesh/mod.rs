// ============================================
// Mesh Module - Экструзия сечения вдоль кривой
// ============================================

mod vertex;
mod extrude;

pub use vertex::RibbonVertex;
pub use extrude::{extrude, ChunkMesh};
