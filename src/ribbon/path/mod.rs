// ============================================
// Path Module - Процедурная кривая ленты
// ============================================

mod curve;
mod frame;

pub use curve::{PathCurve, CurveParams};
pub use frame::PathFrame;
