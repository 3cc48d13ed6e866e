// ============================================
// Ribbon Stream - Бесконечная лента из чанков
// ============================================
// Процедурная кривая + сечение = лента, которая строится
// только в пределах видимости камеры.

pub mod ribbon;

pub use ribbon::{
    CameraView, ChunkMesh, ChunkRange, ChunkStreamingManager, CrossSectionProfile,
    CurveParams, DrawableHost, PathCurve, PathFrame, PerspectiveCamera, Ribbon,
    RibbonConfig, RibbonError, StreamingParams, TickReport,
};
