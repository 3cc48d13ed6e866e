// ============================================
// Chunk Streaming Manager - Создание и вытеснение чанков
// ============================================
//
// Протокол тика:
// 1. Видимый диапазон [i1, i2) через frustum и "толстый" луч
// 2. Недостающие чанки строятся сразу (пачкой, опционально rayon)
// 3. Видимые помечаются кадром и временем
// 4. Невидимые вытесняются, если объект умер, превышен бюджет
//    или прошло больше EVICTION_GRACE_SECS с последней видимости
//
// Кандидаты на вытеснение собираются до удаления из карты.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use ultraviolet::{Isometry3, Vec2, Vec3};

use crate::ribbon::culling::{Aabb, CameraView};
use crate::ribbon::error::Result;
use crate::ribbon::mesh::{extrude, ChunkMesh};
use crate::ribbon::path::PathCurve;
use crate::ribbon::profile::CrossSectionProfile;

use super::chunk::Chunk;
use super::drawable::DrawableHost;
use super::params::StreamingParams;
use super::range::{chunk_bounds, ray_tolerance, visible_range, ChunkRange};

/// Сколько невидимых чанков можно держать сверх бюджета
pub const EVICTION_SLACK: usize = 2;

/// Сколько секунд невидимый чанк живёт без вытеснения
pub const EVICTION_GRACE_SECS: f64 = 1.0;

/// Что изменилось за тик (для синхронизации с рендером хоста)
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Номер кадра (не растёт, если тик пропущен без камеры)
    pub frame: u64,
    /// Видимый диапазон после обрезки бюджетом
    pub range: Option<ChunkRange>,
    /// Новые чанки в порядке возрастания индекса
    pub created: Vec<(i32, Arc<ChunkMesh>)>,
    /// Уничтоженные индексы
    pub destroyed: Vec<i32>,
    /// Живых чанков после тика
    pub live: usize,
}

impl TickReport {
    pub fn created_indices(&self) -> Vec<i32> {
        self.created.iter().map(|(i, _)| *i).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

/// Владелец карты index -> чанк. Мутирует её только внутри тика
/// и при переконфигурации.
pub struct ChunkStreamingManager<H: DrawableHost> {
    curve: PathCurve,
    profile: CrossSectionProfile,
    params: StreamingParams,
    host: H,
    chunks: BTreeMap<i32, Chunk<H::Handle>>,
    /// Полуразмеры "толстого" луча в осях пути
    tolerance: Vec3,
    frame: u64,
    next_generation: u64,
}

impl<H: DrawableHost> ChunkStreamingManager<H> {
    pub fn new(curve: PathCurve, profile: CrossSectionProfile, params: StreamingParams, host: H) -> Result<Self> {
        params.validate()?;
        let mut manager = Self {
            curve,
            profile,
            params,
            host,
            chunks: BTreeMap::new(),
            tolerance: Vec3::zero(),
            frame: 0,
            next_generation: 0,
        };
        manager.update_tolerance();
        Ok(manager)
    }

    fn amplitudes(&self) -> Vec2 {
        let [ax, ay] = self.curve.params().axis_amplitudes;
        Vec2::new(ax, ay)
    }

    fn update_tolerance(&mut self) {
        self.tolerance = ray_tolerance(&self.profile.bounds(), self.amplitudes());
    }

    // ============================================
    // Accessors
    // ============================================

    pub fn curve(&self) -> &PathCurve {
        &self.curve
    }

    pub fn profile(&self) -> &CrossSectionProfile {
        &self.profile
    }

    pub fn params(&self) -> &StreamingParams {
        &self.params
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tolerance(&self) -> Vec3 {
        self.tolerance
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Глубина чанка D в мировых единицах
    pub fn chunk_depth(&self) -> f32 {
        self.params.chunk_depth(self.curve.params().longitudinal_scale)
    }

    pub fn live_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, index: i32) -> Option<&Chunk<H::Handle>> {
        self.chunks.get(&index)
    }

    /// Индексы живых чанков по возрастанию
    pub fn live_indices(&self) -> Vec<i32> {
        self.chunks.keys().copied().collect()
    }

    /// Бокс чанка в пространстве пути
    pub fn chunk_bounds(&self, index: i32) -> Aabb {
        chunk_bounds(index, self.chunk_depth(), &self.profile.bounds(), self.amplitudes())
    }

    // ============================================
    // Reconfiguration
    // ============================================

    /// Новая кривая: все чанки инвалидируются
    pub fn set_curve(&mut self, curve: PathCurve) -> Vec<i32> {
        let destroyed = self.destroy_all();
        self.curve = curve;
        self.update_tolerance();
        destroyed
    }

    /// Новое сечение: все чанки инвалидируются
    pub fn set_profile(&mut self, profile: CrossSectionProfile) -> Vec<i32> {
        let destroyed = self.destroy_all();
        self.profile = profile;
        self.update_tolerance();
        destroyed
    }

    pub fn set_params(&mut self, params: StreamingParams) -> Result<Vec<i32>> {
        params.validate()?;
        let destroyed = self.destroy_all();
        self.params = params;
        Ok(destroyed)
    }

    /// Уничтожить все живые чанки, вернуть их индексы
    pub fn destroy_all(&mut self) -> Vec<i32> {
        let chunks = std::mem::take(&mut self.chunks);
        let mut destroyed = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks {
            self.host.destroy_drawable(chunk.handle);
            destroyed.push(index);
        }
        destroyed
    }

    // ============================================
    // Tick
    // ============================================

    /// Видимый диапазон без изменения состояния
    pub fn visible_range(&self, world: &Isometry3, camera: &CameraView) -> Option<ChunkRange> {
        visible_range(world, camera, self.chunk_depth(), self.tolerance, self.params.max_chunks)
    }

    /// Один кадр стриминга. `time` - монотонные секунды хоста.
    /// Без камеры тик пропускается целиком.
    pub fn tick(&mut self, time: f64, world: &Isometry3, camera: Option<&CameraView>) -> TickReport {
        let Some(camera) = camera else {
            return TickReport {
                frame: self.frame,
                live: self.chunks.len(),
                ..Default::default()
            };
        };

        self.frame += 1;
        let range = self.visible_range(world, camera);
        let mut report = TickReport { frame: self.frame, range, ..Default::default() };

        if let Some(range) = range {
            self.refresh_range(range, time, &mut report);
        }
        self.evict(time, &mut report);

        report.live = self.chunks.len();
        if !report.is_idle() {
            log::debug!(
                "frame {}: range {:?}, created {:?}, destroyed {:?}, live {}",
                report.frame,
                report.range,
                report.created_indices(),
                report.destroyed,
                report.live
            );
        }
        report
    }

    /// Создать недостающие чанки диапазона и пометить все видимыми
    fn refresh_range(&mut self, range: ChunkRange, time: f64, report: &mut TickReport) {
        let mut missing = Vec::new();
        for index in range.iter() {
            let alive = match self.chunks.get(&index) {
                Some(chunk) => self.host.is_alive(&chunk.handle),
                None => {
                    missing.push(index);
                    continue;
                }
            };
            if !alive {
                log::warn!("chunk {} drawable destroyed externally, rebuilding", index);
                if let Some(chunk) = self.chunks.remove(&index) {
                    self.host.destroy_drawable(chunk.handle);
                }
                report.destroyed.push(index);
                missing.push(index);
            }
        }

        for mesh in self.build_meshes(&missing) {
            let index = mesh.index;
            let mesh = Arc::new(mesh);
            let bounds = self.chunk_bounds(index);
            let handle = self.host.create_drawable(index, &mesh, &bounds);
            let generation = self.next_generation;
            self.next_generation += 1;

            self.chunks.insert(index, Chunk {
                index,
                mesh: Arc::clone(&mesh),
                bounds,
                handle,
                generation,
                last_seen_frame: self.frame,
                last_seen_time: time,
            });
            report.created.push((index, mesh));
        }

        for index in range.iter() {
            if let Some(chunk) = self.chunks.get_mut(&index) {
                chunk.touch(self.frame, time);
            }
        }
    }

    /// Экструзия пачки чанков, результат в порядке `indices`
    fn build_meshes(&self, indices: &[i32]) -> Vec<ChunkMesh> {
        let curve = &self.curve;
        let profile = &self.profile;
        let length = self.params.chunk_length;
        let rings = self.params.vertices_per_chunk;

        if self.params.parallel_meshing && indices.len() > 1 {
            indices.par_iter()
                .map(|&index| extrude(curve, profile, index, length, rings))
                .collect()
        } else {
            indices.iter()
                .map(|&index| extrude(curve, profile, index, length, rings))
                .collect()
        }
    }

    /// Вытеснение невидимых в этом кадре чанков
    fn evict(&mut self, time: f64, report: &mut TickReport) {
        let limit = self.params.max_chunks + EVICTION_SLACK;

        // Сначала самые давно видимые
        let mut stale: Vec<(i32, &Chunk<H::Handle>)> = self.chunks.iter()
            .filter(|(_, chunk)| chunk.last_seen_frame != self.frame)
            .map(|(index, chunk)| (*index, chunk))
            .collect();
        stale.sort_by_key(|(index, chunk)| (chunk.last_seen_frame, *index));

        let mut candidates = Vec::new();
        for (index, chunk) in stale {
            let remaining = self.chunks.len() - candidates.len();
            let dead = !self.host.is_alive(&chunk.handle);
            if dead
                || remaining > limit
                || time - chunk.last_seen_time > EVICTION_GRACE_SECS
            {
                if dead {
                    log::warn!("chunk {} drawable destroyed externally, evicting", index);
                }
                candidates.push(index);
            }
        }

        for index in candidates {
            if let Some(chunk) = self.chunks.remove(&index) {
                self.host.destroy_drawable(chunk.handle);
                report.destroyed.push(index);
            }
        }
    }
}

impl<H: DrawableHost> Drop for ChunkStreamingManager<H> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ribbon::chunks::InMemoryHost;
    use crate::ribbon::culling::PerspectiveCamera;
    use crate::ribbon::path::CurveParams;

    fn manager(max_chunks: usize, parallel: bool) -> ChunkStreamingManager<InMemoryHost> {
        let params = StreamingParams {
            chunk_length: 10.0,
            vertices_per_chunk: 6,
            max_chunks,
            cells_per_chunk: 4,
            parallel_meshing: parallel,
        };
        ChunkStreamingManager::new(
            PathCurve::new(CurveParams::default()).unwrap(),
            CrossSectionProfile::default_ribbon(),
            params,
            InMemoryHost::new(),
        )
        .unwrap()
    }

    /// Камера на оси пути, смотрит вдоль +Z. Глубина чанка 40.
    /// Позиция не должна совпадать с началом луча (z = 0).
    fn camera_at(z: f32, far: f32) -> CameraView {
        PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, z),
            forward: Vec3::unit_z(),
            fov_y: 60f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far,
        }
        .view()
    }

    fn looking_away() -> CameraView {
        PerspectiveCamera {
            position: Vec3::new(500.0, 0.0, 0.0),
            forward: Vec3::unit_x(),
            fov_y: 60f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
        .view()
    }

    #[test]
    fn test_first_tick_creates_visible_range() {
        let mut manager = manager(18, false);
        let world = Isometry3::identity();
        let report = manager.tick(0.0, &world, Some(&camera_at(-20.0, 200.0)));

        let range = report.range.unwrap();
        assert_eq!(report.created_indices(), range.iter().collect::<Vec<_>>());
        assert!(report.destroyed.is_empty());
        assert_eq!(report.live, range.len());
        assert_eq!(manager.host().live_count(), range.len());

        // Повторный тик ничего не меняет
        let again = manager.tick(0.016, &world, Some(&camera_at(-20.0, 200.0)));
        assert!(again.is_idle());
        assert_eq!(again.frame, 2);
    }

    #[test]
    fn test_missing_camera_skips_tick() {
        let mut manager = manager(18, false);
        let world = Isometry3::identity();
        manager.tick(0.0, &world, Some(&camera_at(-20.0, 200.0)));
        let live = manager.live_count();

        // Даже спустя долгое время без камеры ничего не вытесняется
        let report = manager.tick(100.0, &world, None);
        assert!(report.is_idle());
        assert_eq!(report.range, None);
        assert_eq!(report.frame, 1);
        assert_eq!(manager.live_count(), live);
    }

    #[test]
    fn test_budget_is_respected() {
        let mut manager = manager(4, false);
        let world = Isometry3::identity();
        for step in 0..40 {
            let time = step as f64 * 0.1;
            let report = manager.tick(time, &world, Some(&camera_at(-25.0 + step as f32 * 30.0, 2000.0)));
            assert!(report.range.unwrap().len() <= 4);
            assert!(report.live <= 4 + EVICTION_SLACK);
            assert_eq!(manager.host().live_count(), report.live);
        }
    }

    #[test]
    fn test_grace_period_eviction() {
        let mut manager = manager(18, false);
        let world = Isometry3::identity();
        let first = manager.tick(0.0, &world, Some(&camera_at(-20.0, 200.0)));
        assert!(!first.created.is_empty());

        let report = manager.tick(0.5, &world, Some(&looking_away()));
        assert_eq!(report.range, None);
        assert!(report.created.is_empty());
        assert!(report.destroyed.is_empty());

        let report = manager.tick(1.01, &world, Some(&looking_away()));
        assert_eq!(report.destroyed, first.created_indices());
        assert_eq!(report.live, 0);
        assert_eq!(manager.host().live_count(), 0);
    }

    #[test]
    fn test_reentering_chunk_is_rebuilt() {
        let mut manager = manager(18, false);
        let world = Isometry3::identity();
        let first = manager.tick(0.0, &world, Some(&camera_at(-20.0, 200.0)));
        let (index, old_mesh) = first.created[1].clone();
        let old_generation = manager.chunk(index).unwrap().generation();

        manager.tick(2.0, &world, Some(&looking_away()));
        assert!(manager.chunk(index).is_none());

        let again = manager.tick(3.0, &world, Some(&camera_at(-20.0, 200.0)));
        let (_, new_mesh) = again.created.iter().find(|(i, _)| *i == index).unwrap();
        assert!(!Arc::ptr_eq(&old_mesh, new_mesh));
        assert_eq!(*old_mesh, **new_mesh);
        assert!(manager.chunk(index).unwrap().generation() > old_generation);
    }

    #[test]
    fn test_externally_destroyed_drawable() {
        let mut manager = manager(18, false);
        let world = Isometry3::identity();
        let first = manager.tick(0.0, &world, Some(&camera_at(-20.0, 200.0)));
        let visible = first.created[0].0;

        // Видимый чанк пересоздаётся в том же тике
        assert!(manager.host_mut().kill(visible));
        let report = manager.tick(0.1, &world, Some(&camera_at(-20.0, 200.0)));
        assert_eq!(report.destroyed, vec![visible]);
        assert_eq!(report.created_indices(), vec![visible]);
        assert!(manager.host().find(visible).is_some());

        // Невидимый - вытесняется без ожидания
        manager.tick(0.2, &world, Some(&looking_away()));
        assert!(manager.host_mut().kill(visible));
        let report = manager.tick(0.3, &world, Some(&looking_away()));
        assert_eq!(report.destroyed, vec![visible]);
        assert!(manager.chunk(visible).is_none());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut serial = manager(18, false);
        let mut parallel = manager(18, true);
        let world = Isometry3::identity();
        let a = serial.tick(0.0, &world, Some(&camera_at(-20.0, 400.0)));
        let b = parallel.tick(0.0, &world, Some(&camera_at(-20.0, 400.0)));

        assert_eq!(a.created_indices(), b.created_indices());
        for ((_, ma), (_, mb)) in a.created.iter().zip(&b.created) {
            assert_eq!(**ma, **mb);
        }
    }

    #[test]
    fn test_reconfigure_destroys_everything() {
        let mut manager = manager(18, false);
        let world = Isometry3::identity();
        let first = manager.tick(0.0, &world, Some(&camera_at(-20.0, 200.0)));

        let curve = PathCurve::new(CurveParams { seed: 7, ..Default::default() }).unwrap();
        let destroyed = manager.set_curve(curve);
        assert_eq!(destroyed, first.created_indices());
        assert_eq!(manager.live_count(), 0);
        assert_eq!(manager.host().live_count(), 0);
        assert_eq!(manager.curve().params().seed, 7);
    }

    #[test]
    fn test_created_bounds_contain_mesh() {
        let mut manager = manager(18, false);
        let report = manager.tick(0.0, &Isometry3::identity(), Some(&camera_at(-20.0, 200.0)));
        for (index, mesh) in &report.created {
            let bounds = manager.chunk_bounds(*index);
            for vertex in &mesh.vertices {
                assert!(bounds.contains(Vec3::from(vertex.position)), "chunk {index}");
            }
        }
    }
}
