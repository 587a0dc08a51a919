use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub vsync: bool,
    pub high_performance_adapter: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            high_performance_adapter: true,
        }
    }
}

/// Asset locations, relative to the working directory.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub model: PathBuf,
    pub font: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("assets/models/heart.obj"),
            font: PathBuf::from("assets/fonts/helvetiker_regular.typeface.json"),
        }
    }
}
