//! Configuration for readers and writers
//!
//! File formats are chosen from the file name and configured by their own
//! headers; the knobs here only cover what a header cannot express.

/// Default number of progress updates over one full read
pub const DEFAULT_PROGRESS_STEPS: usize = 100;

/// Configuration shared by the factories in [`crate::factory`]
#[derive(Debug, Clone, PartialEq)]
pub struct IoConfig {
    /// How many times the progress cursor is advanced over a full read
    pub progress_steps: usize,

    /// Whether SNAP writers emit a directed edge list.
    ///
    /// Undirected writers emit each unordered pair once and reject graphs
    /// whose edges are not stored in both directions.
    pub snap_directed: bool,

    /// Whether MatrixMarket writers emit the comment banner after the header
    pub write_banner: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            progress_steps: DEFAULT_PROGRESS_STEPS,
            snap_directed: false,
            write_banner: true,
        }
    }
}

impl IoConfig {
    /// Configuration that never touches a progress cursor more than once
    pub fn quiet() -> Self {
        Self {
            progress_steps: 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IoConfig::default();
        assert_eq!(config.progress_steps, 100);
        assert!(!config.snap_directed);
        assert!(config.write_banner);
    }

    #[test]
    fn test_quiet_config() {
        let config = IoConfig::quiet();
        assert_eq!(config.progress_steps, 1);
        assert!(config.write_banner);
    }
}
