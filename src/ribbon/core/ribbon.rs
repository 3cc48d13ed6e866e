// ============================================
// Ribbon - Фасад для хост-приложения
// ============================================
// Хост один раз создаёт Ribbon, затем каждый кадр вызывает tick
// с трансформом пути и камерой, и синхронизирует свой рендер
// по TickReport. Переконфигурация уничтожает все чанки.

use std::time::Instant;

use ultraviolet::{Isometry3, Vec2};

use crate::ribbon::chunks::{world_central_ray, ChunkStreamingManager, DrawableHost, StreamingParams, TickReport};
use crate::ribbon::culling::{closest_points_between_rays, CameraView, Ray};
use crate::ribbon::error::Result;
use crate::ribbon::path::{CurveParams, PathCurve, PathFrame};
use crate::ribbon::profile::CrossSectionProfile;

use super::config::{ProfileDef, RibbonConfig};

/// Бесконечная лента: кривая + сечение + стриминг чанков
pub struct Ribbon<H: DrawableHost> {
    config: RibbonConfig,
    manager: ChunkStreamingManager<H>,
    clock: Instant,
}

impl<H: DrawableHost> Ribbon<H> {
    pub fn new(config: RibbonConfig, host: H) -> Result<Self> {
        config.validate()?;
        let curve = PathCurve::new(config.curve)?;
        let profile = config.build_profile()?;
        let manager = ChunkStreamingManager::new(curve, profile, config.streaming, host)?;

        log::info!(
            "ribbon ready: seed {}, {} terms, chunk depth {}, budget {}",
            config.curve.seed,
            config.curve.term_count,
            manager.chunk_depth(),
            config.streaming.max_chunks
        );

        Ok(Self { config, manager, clock: Instant::now() })
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    pub fn manager(&self) -> &ChunkStreamingManager<H> {
        &self.manager
    }

    pub fn curve(&self) -> &PathCurve {
        self.manager.curve()
    }

    pub fn profile(&self) -> &CrossSectionProfile {
        self.manager.profile()
    }

    pub fn host(&self) -> &H {
        self.manager.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.manager.host_mut()
    }

    // ============================================
    // Configuration
    // ============================================

    /// Пересобрать кривую. Возвращает уничтоженные индексы.
    /// При ошибке состояние не меняется.
    pub fn configure_curve(&mut self, params: CurveParams) -> Result<Vec<i32>> {
        let curve = PathCurve::new(params)?;
        let destroyed = self.manager.set_curve(curve);
        self.config.curve = params;
        log::info!("curve reconfigured (seed {}), {} chunks dropped", params.seed, destroyed.len());
        Ok(destroyed)
    }

    /// Пересобрать сечение из параллельных массивов
    pub fn configure_profile(&mut self, vertices: &[Vec2], normals: &[Vec2], u_coords: &[f32]) -> Result<Vec<i32>> {
        let profile = CrossSectionProfile::new(vertices, normals, u_coords)?;
        self.config.profile = Some(ProfileDef::from(&profile));
        let destroyed = self.manager.set_profile(profile);
        log::info!("profile reconfigured ({} vertices), {} chunks dropped", vertices.len(), destroyed.len());
        Ok(destroyed)
    }

    pub fn configure_streaming(&mut self, params: StreamingParams) -> Result<Vec<i32>> {
        let destroyed = self.manager.set_params(params)?;
        self.config.streaming = params;
        log::info!("streaming reconfigured, {} chunks dropped", destroyed.len());
        Ok(destroyed)
    }

    // ============================================
    // Frame loop
    // ============================================

    /// Кадр по монотонным часам с момента создания
    pub fn tick(&mut self, world: Isometry3, camera: Option<&CameraView>) -> TickReport {
        let time = self.clock.elapsed().as_secs_f64();
        self.tick_at(time, world, camera)
    }

    /// Кадр с явным временем хоста (секунды, не убывают)
    pub fn tick_at(&mut self, time: f64, world: Isometry3, camera: Option<&CameraView>) -> TickReport {
        self.manager.tick(time, &world, camera)
    }

    /// Уничтожить все чанки
    pub fn shutdown(&mut self) -> Vec<i32> {
        let destroyed = self.manager.destroy_all();
        log::info!("ribbon shutdown, {} chunks destroyed", destroyed.len());
        destroyed
    }

    // ============================================
    // Cells
    // ============================================

    /// Длина ячейки в единицах параметра t
    fn cell_length(&self) -> f64 {
        self.config.streaming.chunk_length as f64 / self.config.streaming.cells_per_chunk as f64
    }

    /// Кадр в центре ячейки `address` (в пространстве пути)
    pub fn cell_frame(&self, address: i64) -> PathFrame {
        self.curve().frame((address as f64 + 0.5) * self.cell_length())
    }

    /// Ячейка, мимо которой ближе всего проходит луч (например, луч мыши).
    /// None для лучей, параллельных пути.
    pub fn cell_at_ray(&self, world: &Isometry3, ray: &Ray) -> Option<i64> {
        let central = world_central_ray(world);
        let (s, _) = closest_points_between_rays(&central, ray)?;
        let cell_depth = self.cell_length() * self.config.curve.longitudinal_scale as f64;
        Some((s as f64 / cell_depth).floor() as i64)
    }
}
