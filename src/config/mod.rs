pub mod settings;

// Re-export commonly used types
pub use settings::{
    HeightMapFormat, HeightMapSettings, LoggingSettings, ViewerSettings,
    save_viewer_settings, save_viewer_settings_to, load_viewer_settings,
    load_viewer_settings_from,
};
