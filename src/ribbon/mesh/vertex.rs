// ============================================
// Ribbon Vertex - Структура вершины ленты
// ============================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// x - U из сечения, y - положение внутри чанка (0..1)
    pub uv: [f32; 2],
}

impl RibbonVertex {
    /// Шаг вершины в буфере (байт)
    pub const STRIDE: usize = std::mem::size_of::<RibbonVertex>();

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}
