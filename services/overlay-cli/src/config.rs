//! Configuration loading for the overlay CLI.
//!
//! Precedence, lowest to highest: built-in defaults, environment
//! (`OVERLAY_*`) or a YAML file, then command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use compositor::CompositorConfig;
use overlay_common::ResampleMode;
use tracing::{debug, info};

/// Flag values that override the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub max_dimension: Option<u32>,
    pub opacity: Option<f64>,
    pub resample_mode: Option<String>,
}

/// Parse a YAML configuration document.
pub fn parse_config(text: &str) -> Result<CompositorConfig> {
    serde_yaml::from_str(text).context("Failed to parse overlay config YAML")
}

/// Load configuration from `path` if given, else from the environment, then
/// apply `overrides` and validate.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<CompositorConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            info!(path = %path.display(), "Loaded overlay config");
            parse_config(&text)?
        }
        None => CompositorConfig::from_env(),
    };

    if let Some(dim) = overrides.max_dimension {
        config.max_output_dimension = dim;
    }
    if let Some(opacity) = overrides.opacity {
        config.default_opacity = opacity;
    }
    if let Some(mode) = &overrides.resample_mode {
        config.resample_mode = ResampleMode::from_str(mode);
    }

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid overlay configuration")?;

    debug!(?config, "Effective configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_common::Color;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
max_output_dimension: 800
default_opacity: 0.3
resample_mode: geometric
highlight: { r: 255, g: 255, b: 0 }
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.max_output_dimension, 800);
        assert_eq!(config.default_opacity, 0.3);
        assert_eq!(config.resample_mode, ResampleMode::Geometric);
        assert_eq!(config.highlight, Color::new(255, 255, 0));
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = parse_config("max_output_dimension: 256\n").unwrap();
        assert_eq!(config.max_output_dimension, 256);
        assert_eq!(config.default_opacity, 0.45);
        assert_eq!(config.highlight, Color::HIGHLIGHT);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.yaml");
        std::fs::write(&path, "max_output_dimension: 256\ndefault_opacity: 0.2\n").unwrap();

        let overrides = Overrides {
            max_dimension: Some(1024),
            opacity: None,
            resample_mode: Some("geometric".to_string()),
        };
        let config = load_config(Some(&path), &overrides).unwrap();

        assert_eq!(config.max_output_dimension, 1024);
        assert_eq!(config.default_opacity, 0.2);
        assert_eq!(config.resample_mode, ResampleMode::Geometric);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.yaml");
        std::fs::write(&path, "max_output_dimension: 0\n").unwrap();

        assert!(load_config(Some(&path), &Overrides::default()).is_err());
    }
}
