//! INI serialization: `ConfigFile` → commented config.ini text.

use std::path::Path;

use super::settings::ConfigFile;

/// Render `config` as a commented INI document.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[pyramid]
; Tile edge length in pixels (default: 254)
tile_size = {}
; Overlap between neighbouring tiles in pixels, written to the descriptor (default: 1)
overlap = {}
; Tile encoding: png or jpg (default: jpg)
format = {}
; Coarsest level to generate. Levels below it are tiny and skipped (default: 3)
min_level = {}

[generation]
; Threads generating tiles within a level (default: number of CPU cores)
threads = {}

[logging]
; Log file, truncated at the start of every run
file = {}
"#,
        config.pyramid.tile_size,
        config.pyramid.overlap,
        config.pyramid.format,
        config.pyramid.min_level,
        config.generation.threads,
        path_to_string(&config.logging.file),
    )
}

/// Display a path, abbreviating the home directory as `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
