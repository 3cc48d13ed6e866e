// ============================================
// Drawable Host - Интерфейс рендера хоста
// ============================================
// Ядро не знает про GPU ресурсы: оно только просит хост
// создать объект для меша чанка и позже уничтожить его.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ribbon::culling::Aabb;
use crate::ribbon::mesh::ChunkMesh;

/// Коллаборатор, владеющий отрисовываемыми объектами
pub trait DrawableHost {
    type Handle;

    /// Создать объект для меша чанка `index` (bounds в пространстве пути)
    fn create_drawable(&mut self, index: i32, mesh: &Arc<ChunkMesh>, bounds: &Aabb) -> Self::Handle;

    /// Уничтожить объект. Вызывается ровно один раз на handle
    fn destroy_drawable(&mut self, handle: Self::Handle);

    /// false - объект уничтожен снаружи (чанк будет пересоздан или вытеснен)
    fn is_alive(&self, _handle: &Self::Handle) -> bool {
        true
    }
}

/// Живой объект в памяти хоста
#[derive(Debug, Clone)]
pub struct StoredDrawable {
    pub index: i32,
    pub mesh: Arc<ChunkMesh>,
    pub bounds: Aabb,
}

/// Хост без рендера: держит меши в памяти и считает операции
#[derive(Debug, Default)]
pub struct InMemoryHost {
    live: HashMap<u64, StoredDrawable>,
    next_id: u64,
    created: u64,
    destroyed: u64,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created_total(&self) -> u64 {
        self.created
    }

    pub fn destroyed_total(&self) -> u64 {
        self.destroyed
    }

    pub fn get(&self, handle: u64) -> Option<&StoredDrawable> {
        self.live.get(&handle)
    }

    /// Объект чанка `index`, если он жив
    pub fn find(&self, index: i32) -> Option<&StoredDrawable> {
        self.live.values().find(|d| d.index == index)
    }

    /// Уничтожить объект чанка "снаружи" (как если бы сцена удалила его сама)
    pub fn kill(&mut self, index: i32) -> bool {
        let before = self.live.len();
        self.live.retain(|_, d| d.index != index);
        before != self.live.len()
    }
}

impl DrawableHost for InMemoryHost {
    type Handle = u64;

    fn create_drawable(&mut self, index: i32, mesh: &Arc<ChunkMesh>, bounds: &Aabb) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        self.live.insert(id, StoredDrawable { index, mesh: Arc::clone(mesh), bounds: *bounds });
        id
    }

    fn destroy_drawable(&mut self, handle: u64) {
        self.destroyed += 1;
        self.live.remove(&handle);
    }

    fn is_alive(&self, handle: &u64) -> bool {
        self.live.contains_key(handle)
    }
}
