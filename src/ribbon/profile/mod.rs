// ============================================
// Profile Module - Сечение ленты
// ============================================

mod cross_section;

pub use cross_section::{CrossSectionProfile, ProfileBounds};
