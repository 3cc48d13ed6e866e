// ============================================
// Chunks Module - Жизненный цикл чанков ленты
// ============================================
// Видимый диапазон -> создание недостающих -> вытеснение лишних

mod params;
mod range;
mod drawable;
mod chunk;
mod manager;

pub use params::StreamingParams;
pub use range::{chunk_bounds, ray_tolerance, visible_range, world_central_ray, ChunkRange, RANGE_MARGIN};
pub use drawable::{DrawableHost, InMemoryHost, StoredDrawable};
pub use chunk::Chunk;
pub use manager::{ChunkStreamingManager, TickReport, EVICTION_GRACE_SECS, EVICTION_SLACK};
