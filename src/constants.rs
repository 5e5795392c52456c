//! Inspector-wide constants and default values
//!
//! Centralized location for all hard-coded values to improve maintainability

/// Layout defaults used when no configuration file overrides them
pub mod layout {
    /// Height of a single line of controls
    pub const SINGLE_LINE_HEIGHT: f32 = 18.0;

    /// Width of the label column
    pub const LABEL_WIDTH: f32 = 150.0;

    /// Width reserved for the expand/collapse toggle
    pub const FOLDOUT_WIDTH: f32 = 14.0;

    /// Horizontal step for one indent level
    pub const INDENT_WIDTH: f32 = 15.0;

    /// Width used by index prefixes on list elements
    pub const LABEL_PREFIX_WIDTH: f32 = 28.0;

    /// Gap between stacked member rows
    pub const VERTICAL_SPACING: f32 = 2.0;
}

/// Demo application constants
pub mod app {
    /// Default window size
    pub const DEFAULT_WINDOW_SIZE: [f32; 2] = [520.0, 640.0];

    /// Environment variable pointing at an inspector configuration file
    pub const CONFIG_ENV_VAR: &str = "PROPDECK_CONFIG";

    /// Directory name under the platform config dir
    pub const CONFIG_DIR_NAME: &str = "propdeck";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "inspector.json";
}
