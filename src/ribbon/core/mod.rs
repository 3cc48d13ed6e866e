// ============================================
// Core Module - Конфигурация и фасад для хоста
// ============================================

mod config;
mod ribbon;

pub use config::{ProfileDef, RibbonConfig};
pub use ribbon::Ribbon;
