use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub locations_path: PathBuf,
    pub details_path: PathBuf,
    /// Fail the whole content load on the first batch of issues instead of
    /// excluding the offending records.
    pub content_strict: bool,
    /// Viewport widths at or above this value use the desktop layout.
    pub desktop_min_width_px: u32,
    pub overlay_dismiss_offset_px: f64,
    /// Release velocity in px/s above which an overlay drag dismisses.
    pub overlay_dismiss_velocity: f64,
    pub state_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("locations_path", &self.locations_path)
            .field("details_path", &self.details_path)
            .field("content_strict", &self.content_strict)
            .field("desktop_min_width_px", &self.desktop_min_width_px)
            .field("overlay_dismiss_offset_px", &self.overlay_dismiss_offset_px)
            .field("overlay_dismiss_velocity", &self.overlay_dismiss_velocity)
            .field("state_path", &self.state_path)
            .finish()
    }
}
