//! Engine-facing generation settings.

use super::defaults::{num_cpus, DEFAULT_MIN_LEVEL};
use super::settings::ConfigFile;

/// How a version is traversed.
///
/// # Example
///
/// ```
/// use fastpyramid::config::GenerationConfig;
///
/// let config = GenerationConfig::default();
/// assert_eq!(config.min_level(), 3);
/// assert!(config.threads() >= 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Coarsest level generated; levels below it are skipped
    min_level: u32,
    /// Worker threads for tiles within one level
    threads: usize,
}

impl GenerationConfig {
    pub fn new(min_level: u32, threads: usize) -> Self {
        Self {
            min_level,
            threads: threads.max(1),
        }
    }

    pub fn with_min_level(mut self, min_level: u32) -> Self {
        self.min_level = min_level;
        self
    }

    /// Set the worker count. Zero is raised to one.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn min_level(&self) -> u32 {
        self.min_level
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LEVEL, num_cpus())
    }
}

impl From<&ConfigFile> for GenerationConfig {
    fn from(config: &ConfigFile) -> Self {
        Self::new(config.pyramid.min_level, config.generation.threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threads_becomes_one() {
        assert_eq!(GenerationConfig::new(3, 0).threads(), 1);
        assert_eq!(GenerationConfig::default().with_threads(0).threads(), 1);
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.pyramid.min_level = 5;
        file.generation.threads = 7;

        let config = GenerationConfig::from(&file);
        assert_eq!(config.min_level(), 5);
        assert_eq!(config.threads(), 7);
    }
}
