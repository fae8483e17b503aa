//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::descriptor::TileFormat;

/// Parse an `Ini` into a `ConfigFile`, starting from defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [pyramid] section
    if let Some(section) = ini.section(Some("pyramid")) {
        if let Some(v) = section.get("tile_size") {
            config.pyramid.tile_size = parse_number("pyramid", "tile_size", v)?;
            if config.pyramid.tile_size == 0 {
                return Err(invalid("pyramid", "tile_size", v, "must be greater than 0"));
            }
        }
        if let Some(v) = section.get("overlap") {
            config.pyramid.overlap = parse_number("pyramid", "overlap", v)?;
        }
        if let Some(v) = section.get("format") {
            config.pyramid.format = TileFormat::from_str(v)
                .map_err(|_| invalid("pyramid", "format", v, "must be 'png' or 'jpg'"))?;
        }
        if let Some(v) = section.get("min_level") {
            config.pyramid.min_level = parse_number("pyramid", "min_level", v)?;
        }
    }

    // [generation] section
    if let Some(section) = ini.section(Some("generation")) {
        if let Some(v) = section.get("threads") {
            config.generation.threads = parse_number("generation", "threads", v)?;
            if config.generation.threads == 0 {
                return Err(invalid("generation", "threads", v, "must be at least 1"));
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_pyramid_section() {
        let config = load(
            r#"
[pyramid]
tile_size = 512
overlap = 0
format = PNG
min_level = 0
"#,
        )
        .unwrap();

        assert_eq!(config.pyramid.tile_size, 512);
        assert_eq!(config.pyramid.overlap, 0);
        assert_eq!(config.pyramid.format, TileFormat::Png);
        assert_eq!(config.pyramid.min_level, 0);
    }

    #[test]
    fn test_missing_sections_keep_defaults() {
        let config = load("[generation]\nthreads = 3\n").unwrap();

        assert_eq!(config.generation.threads, 3);
        assert_eq!(config.pyramid.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(config.pyramid.min_level, DEFAULT_MIN_LEVEL);
    }

    #[test]
    fn test_invalid_format() {
        let err = load("[pyramid]\nformat = webp\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pyramid.format"));
        assert!(msg.contains("webp"));
    }

    #[test]
    fn test_invalid_tile_size() {
        assert!(load("[pyramid]\ntile_size = big\n").is_err());
        assert!(load("[pyramid]\ntile_size = 0\n").is_err());
        assert!(load("[pyramid]\ntile_size = -4\n").is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = load("[generation]\nthreads = 0\n").unwrap_err();
        assert!(err.to_string().contains("generation.threads"));
    }

    #[test]
    fn test_logging_file_expands_tilde() {
        let config = load("[logging]\nfile = ~/logs/pyramid.log\n").unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.logging.file, home.join("logs/pyramid.log"));
        }
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/log/x.log"), PathBuf::from("/var/log/x.log"));
    }
}
