// ============================================
// Streaming Params - Настройки стриминга чанков
// ============================================

use serde::{Deserialize, Serialize};

use crate::ribbon::error::{Result, RibbonError};

/// Параметры нарезки и бюджета чанков
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingParams {
    /// Длина чанка в единицах параметра кривой
    pub chunk_length: f32,
    /// Колец (кадров) на чанк, включая оба края
    pub vertices_per_chunk: usize,
    /// Максимум одновременно видимых чанков
    pub max_chunks: usize,
    /// Ячеек на чанк (для cell_frame / cell_at_ray)
    pub cells_per_chunk: u32,
    /// Строить пачку новых чанков через rayon
    pub parallel_meshing: bool,
}

impl Default for StreamingParams {
    fn default() -> Self {
        Self {
            chunk_length: 100.0,
            vertices_per_chunk: 80,
            max_chunks: 18,
            cells_per_chunk: 32,
            parallel_meshing: true,
        }
    }
}

impl StreamingParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.chunk_length.is_finite() && self.chunk_length > 0.0) {
            return Err(RibbonError::InvalidStreaming(format!(
                "chunk_length must be positive, got {}",
                self.chunk_length
            )));
        }
        if self.vertices_per_chunk < 2 {
            return Err(RibbonError::InvalidStreaming(format!(
                "vertices_per_chunk must be at least 2, got {}",
                self.vertices_per_chunk
            )));
        }
        if self.max_chunks == 0 {
            return Err(RibbonError::InvalidStreaming("max_chunks must be at least 1".into()));
        }
        if self.cells_per_chunk == 0 {
            return Err(RibbonError::InvalidStreaming("cells_per_chunk must be at least 1".into()));
        }
        Ok(())
    }

    /// Глубина чанка D в мировых единицах
    pub fn chunk_depth(&self, longitudinal_scale: f32) -> f32 {
        self.chunk_length * longitudinal_scale
    }
}
