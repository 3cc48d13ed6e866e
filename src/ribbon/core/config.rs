// ============================================
// Ribbon Config - Data-Driven из JSON
// ============================================
// Кривая + стриминг + (опционально) сечение.
// Отсутствующие поля берутся из Default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::ribbon::chunks::StreamingParams;
use crate::ribbon::error::Result;
use crate::ribbon::path::CurveParams;
use crate::ribbon::profile::CrossSectionProfile;

/// Сечение в виде параллельных массивов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDef {
    pub vertices: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 2]>,
    pub u_coords: Vec<f32>,
}

impl ProfileDef {
    pub fn build(&self) -> Result<CrossSectionProfile> {
        let vertices: Vec<Vec2> = self.vertices.iter().map(|&v| Vec2::from(v)).collect();
        let normals: Vec<Vec2> = self.normals.iter().map(|&n| Vec2::from(n)).collect();
        CrossSectionProfile::new(&vertices, &normals, &self.u_coords)
    }
}

impl From<&CrossSectionProfile> for ProfileDef {
    fn from(profile: &CrossSectionProfile) -> Self {
        Self {
            vertices: profile.vertices().iter().map(|v| [v.x, v.y]).collect(),
            normals: profile.normals().iter().map(|n| [n.x, n.y]).collect(),
            u_coords: profile.u_coords().to_vec(),
        }
    }
}

/// Полная конфигурация ленты
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonConfig {
    pub curve: CurveParams,
    pub streaming: StreamingParams,
    /// None - стандартное сечение ленты
    pub profile: Option<ProfileDef>,
}

impl RibbonConfig {
    /// Загрузить из JSON строки (без валидации значений)
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Загрузить из файла и проверить
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.curve.validate()?;
        self.streaming.validate()?;
        if let Some(profile) = &self.profile {
            profile.build()?;
        }
        Ok(())
    }

    /// Сечение из конфига или стандартное
    pub fn build_profile(&self) -> Result<CrossSectionProfile> {
        match &self.profile {
            Some(def) => def.build(),
            None => Ok(CrossSectionProfile::default_ribbon()),
        }
    }
}
