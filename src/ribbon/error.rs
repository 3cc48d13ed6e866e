// ============================================
// Errors - Ошибки конфигурации ленты
// ============================================
// Ошибки возникают только при (пере)конфигурации.
// Tick никогда не возвращает ошибку: вырожденная геометрия
// обрабатывается локально, отсутствие камеры = пустой кадр.

use thiserror::Error;

/// Ошибки конфигурации кривой, сечения и стриминга
#[derive(Debug, Error)]
pub enum RibbonError {
    /// Сечение без вершин
    #[error("profile has no vertices")]
    EmptyProfile,

    /// Длины параллельных массивов сечения не совпадают
    #[error("profile arrays differ in length: {vertices} vertices, {normals} normals, {u_coords} u coords")]
    ProfileLengthMismatch {
        vertices: usize,
        normals: usize,
        u_coords: usize,
    },

    /// NaN или бесконечность в данных сечения
    #[error("profile entry {index} is not finite")]
    NonFiniteProfile { index: usize },

    /// Некорректные параметры кривой
    #[error("invalid curve parameters: {0}")]
    InvalidCurve(String),

    /// Некорректные параметры стриминга
    #[error("invalid streaming parameters: {0}")]
    InvalidStreaming(String),

    /// Ошибка разбора JSON конфигурации
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    /// Ошибка чтения файла конфигурации
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RibbonError>;
