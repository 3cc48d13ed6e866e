// ============================================
// Extrude - Генерация меша одного чанка
// ============================================
//
// Чанк i покрывает параметр t в [i*L, (i+1)*L] (L = chunk_length).
// Вдоль него ставится `rings` кадров, в каждом - полная копия сечения.
// Кольца на границе соседних чанков вычисляются из одного и того же t,
// поэтому совпадают бит в бит.

use crate::ribbon::path::PathCurve;
use crate::ribbon::profile::CrossSectionProfile;

use super::vertex::RibbonVertex;

/// Готовая геометрия чанка, неизменна после построения
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMesh {
    pub index: i32,
    pub vertices: Vec<RibbonVertex>,
    pub indices: Vec<u32>,
    /// Вершин в одном кольце (= вершин сечения)
    pub ring_size: usize,
}

impl ChunkMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn ring_count(&self) -> usize {
        if self.ring_size == 0 { 0 } else { self.vertices.len() / self.ring_size }
    }

    /// Вершины кольца `ring`
    pub fn ring(&self, ring: usize) -> &[RibbonVertex] {
        let start = ring * self.ring_size;
        &self.vertices[start..start + self.ring_size]
    }

    /// Вершинный буфер как байты (для загрузки на GPU)
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Экструзия сечения вдоль чанка `index` (thread-safe, для параллельной обработки)
pub fn extrude(
    curve: &PathCurve,
    profile: &CrossSectionProfile,
    index: i32,
    chunk_length: f32,
    rings: usize,
) -> ChunkMesh {
    let ring_size = profile.vertex_count();
    let segments = rings.saturating_sub(1);
    let length = chunk_length as f64;
    let start = index as f64;

    let mut vertices = Vec::with_capacity(ring_size * rings);
    let mut indices = Vec::with_capacity(profile.lines().len() * segments * 3);

    for ring in 0..rings {
        let relative = if segments == 0 { 0.0 } else { ring as f64 / segments as f64 };
        let frame = curve.frame((start + relative) * length);
        let v = relative as f32;

        for ((p, n), u) in profile.vertices().iter().zip(profile.normals()).zip(profile.u_coords()) {
            vertices.push(RibbonVertex {
                position: frame.local_to_world(*p).into(),
                normal: frame.local_to_world_direction(*n).into(),
                uv: [*u, v],
            });
        }
    }

    // Квад между ребром (b, c) кольца i и (a, d) кольца i+1
    let stride = ring_size as u32;
    for segment in 0..segments as u32 {
        let offset = segment * stride;
        for edge in profile.lines().chunks_exact(2) {
            let b = offset + edge[0];
            let c = offset + edge[1];
            let a = b + stride;
            let d = c + stride;
            indices.extend_from_slice(&[c, b, a, a, d, c]);
        }
    }

    ChunkMesh { index, vertices, indices, ring_size }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ribbon::path::CurveParams;
    use ultraviolet::{Vec2, Vec3};

    fn curve() -> PathCurve {
        PathCurve::new(CurveParams::default()).unwrap()
    }

    #[test]
    fn test_buffer_sizes() {
        let profile = CrossSectionProfile::default_ribbon();
        let mesh = extrude(&curve(), &profile, 3, 100.0, 80);

        assert_eq!(mesh.vertex_count(), 6 * 80);
        assert_eq!(mesh.triangle_count(), 5 * 79 * 2);
        assert_eq!(mesh.ring_count(), 80);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertex_count() * RibbonVertex::STRIDE);
        assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
    }

    #[test]
    fn test_quad_winding() {
        let profile = CrossSectionProfile::default_ribbon();
        let mesh = extrude(&curve(), &profile, 0, 100.0, 4);
        // Первое ребро (0, 1) первого сегмента: b=0, c=1, a=6, d=7
        assert_eq!(&mesh.indices[..6], &[1, 0, 6, 6, 7, 1]);
        // Второе ребро (1, 2)
        assert_eq!(&mesh.indices[6..12], &[2, 1, 7, 7, 8, 2]);
        // Первое ребро второго сегмента смещено на кольцо
        let second = 5 * 6;
        assert_eq!(&mesh.indices[second..second + 6], &[7, 6, 12, 12, 13, 7]);
    }

    #[test]
    fn test_neighbour_chunks_share_boundary_ring() {
        let curve = curve();
        let profile = CrossSectionProfile::default_ribbon();
        for index in [-7, -1, 0, 1, 41] {
            let current = extrude(&curve, &profile, index, 100.0, 80);
            let next = extrude(&curve, &profile, index + 1, 100.0, 80);
            let last = current.ring(current.ring_count() - 1);
            let first = next.ring(0);
            for (a, b) in last.iter().zip(first) {
                assert_eq!(a.position, b.position);
                assert_eq!(a.normal, b.normal);
            }
        }
    }

    #[test]
    fn test_vertices_follow_frames() {
        let curve = curve();
        let profile = CrossSectionProfile::default_ribbon();
        let mesh = extrude(&curve, &profile, 2, 50.0, 11);

        let frame = curve.frame(2.0 * 50.0);
        for (j, vertex) in mesh.ring(0).iter().enumerate() {
            let expected: [f32; 3] = frame.local_to_world(profile.vertices()[j]).into();
            assert_eq!(vertex.position, expected);
        }

        // Середина чанка: t = (2 + 0.5) * 50
        let frame = curve.frame(125.0);
        let expected: [f32; 3] = frame.local_to_world(profile.vertices()[3]).into();
        assert_eq!(mesh.ring(5)[3].position, expected);
    }

    #[test]
    fn test_uv_layout() {
        let profile = CrossSectionProfile::default_ribbon();
        let mesh = extrude(&curve(), &profile, 0, 100.0, 5);
        for ring in 0..5 {
            for (j, vertex) in mesh.ring(ring).iter().enumerate() {
                assert_eq!(vertex.uv[0], profile.u_coords()[j]);
                assert_eq!(vertex.uv[1], ring as f32 / 4.0);
            }
        }
    }

    #[test]
    fn test_normals_stay_unit_length() {
        let profile = CrossSectionProfile::default_ribbon();
        let mesh = extrude(&curve(), &profile, -3, 100.0, 20);
        for vertex in &mesh.vertices {
            let n = Vec3::from(vertex.normal);
            assert!((n.mag() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_single_vertex_profile_has_no_triangles() {
        let profile = CrossSectionProfile::new(&[Vec2::zero()], &[Vec2::unit_y()], &[0.5]).unwrap();
        let mesh = extrude(&curve(), &profile, 0, 100.0, 10);
        assert_eq!(mesh.vertex_count(), 10);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
