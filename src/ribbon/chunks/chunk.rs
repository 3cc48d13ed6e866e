// ============================================
// Chunk - Один живой отрезок ленты
// ============================================

use std::sync::Arc;

use crate::ribbon::culling::Aabb;
use crate::ribbon::mesh::ChunkMesh;

/// Живой чанк: меш строится один раз при создании и не меняется
#[derive(Debug)]
pub struct Chunk<H> {
    pub(super) index: i32,
    pub(super) mesh: Arc<ChunkMesh>,
    pub(super) bounds: Aabb,
    pub(super) handle: H,
    /// Порядковый номер создания (новый при каждом пересоздании индекса)
    pub(super) generation: u64,
    pub(super) last_seen_frame: u64,
    pub(super) last_seen_time: f64,
}

impl<H> Chunk<H> {
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn mesh(&self) -> &Arc<ChunkMesh> {
        &self.mesh
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_seen_frame(&self) -> u64 {
        self.last_seen_frame
    }

    pub fn last_seen_time(&self) -> f64 {
        self.last_seen_time
    }

    pub(super) fn touch(&mut self, frame: u64, time: f64) {
        self.last_seen_frame = frame;
        self.last_seen_time = time;
    }
}
