// ============================================
// Ribbon Demo - Полёт камеры вдоль ленты без окна
// ============================================
// Запуск: ribbon-demo [config.json]
// Логи: RUST_LOG=debug ribbon-demo

use std::sync::Arc;

use ultraviolet::{Isometry3, Vec3};

use ribbon_stream::ribbon::chunks::InMemoryHost;
use ribbon_stream::ribbon::{Aabb, ChunkMesh, DrawableHost, PerspectiveCamera, Ribbon, RibbonConfig};

/// Шаг симуляции (секунды)
const FRAME_TIME: f64 = 1.0 / 60.0;
/// Кадров полёта вдоль ленты
const FLIGHT_FRAMES: u32 = 600;
/// Скорость полёта в единицах параметра t за секунду
const FLIGHT_SPEED: f64 = 60.0;
/// Размер виртуального окна (для aspect камеры)
const VIEWPORT: (u32, u32) = (1280, 720);

/// Хост, который пишет каждое создание/удаление в лог
struct LoggingHost {
    inner: InMemoryHost,
    vertices: usize,
}

impl DrawableHost for LoggingHost {
    type Handle = u64;

    fn create_drawable(&mut self, index: i32, mesh: &Arc<ChunkMesh>, bounds: &Aabb) -> u64 {
        self.vertices += mesh.vertex_count();
        log::debug!(
            "create chunk {} ({} vertices, {} triangles, z {:.1}..{:.1})",
            index,
            mesh.vertex_count(),
            mesh.triangle_count(),
            bounds.min.z,
            bounds.max.z
        );
        self.inner.create_drawable(index, mesh, bounds)
    }

    fn destroy_drawable(&mut self, handle: u64) {
        if let Some(drawable) = self.inner.get(handle) {
            self.vertices -= drawable.mesh.vertex_count();
            log::debug!("destroy chunk {}", drawable.index);
        }
        self.inner.destroy_drawable(handle);
    }

    fn is_alive(&self, handle: &u64) -> bool {
        self.inner.is_alive(handle)
    }
}

fn load_config() -> Result<RibbonConfig, ribbon_stream::RibbonError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {}", path);
            RibbonConfig::load(path)
        }
        None => Ok(RibbonConfig::default()),
    }
}

fn main() {
    env_logger::init();

    println!("=== Ribbon Demo ===");
    println!("Usage: ribbon-demo [config.json]");
    println!("RUST_LOG=debug - per-frame chunk log");
    println!("===================");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    let host = LoggingHost { inner: InMemoryHost::new(), vertices: 0 };
    let mut ribbon = match Ribbon::new(config, host) {
        Ok(ribbon) => ribbon,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    let world = Isometry3::identity();
    let mut time = 0.0;
    let mut camera = PerspectiveCamera::new(Vec3::zero(), Vec3::unit_z(), 1.0);
    camera.resize(VIEWPORT.0, VIEWPORT.1);
    let mut peak_live = 0;

    // Полёт: камера над кривой, смотрит вдоль касательной
    for frame in 0..FLIGHT_FRAMES {
        let t = frame as f64 * FRAME_TIME * FLIGHT_SPEED;
        let curve = ribbon.curve();
        camera.position = curve.position(t) + Vec3::new(0.0, 15.0, 0.0);
        camera.forward = curve.tangent(t);

        let report = ribbon.tick_at(time, world, Some(&camera.view()));
        peak_live = peak_live.max(report.live);
        if frame % 60 == 0 {
            log::info!(
                "t={:.0} range {:?} live {} (+{} -{})",
                t,
                report.range,
                report.live,
                report.created.len(),
                report.destroyed.len()
            );
        }
        time += FRAME_TIME;
    }

    // Камера отворачивается: чанки уходят после периода ожидания
    camera.position += Vec3::new(2000.0, 0.0, 0.0);
    camera.forward = Vec3::unit_x();
    let look_away_frames = (2.0 / FRAME_TIME) as u32;
    for _ in 0..look_away_frames {
        let report = ribbon.tick_at(time, world, Some(&camera.view()));
        if !report.destroyed.is_empty() {
            log::info!("looked away: {} chunks evicted at {:.2}s", report.destroyed.len(), time);
        }
        time += FRAME_TIME;
    }

    let live_after = ribbon.manager().live_count();
    let destroyed = ribbon.shutdown();

    let host = ribbon.host();
    println!("Frames:           {}", FLIGHT_FRAMES + look_away_frames);
    println!("Peak live chunks: {}", peak_live);
    println!("Live after look-away: {}", live_after);
    println!("Chunks created:   {}", host.inner.created_total());
    println!("Chunks destroyed: {}", host.inner.destroyed_total());
    println!("Destroyed on shutdown: {}", destroyed.len());
    println!("Vertices held:    {}", host.vertices);
}
