//! Text formats for sparse matrices and graphs
//!
//! | Format | Extensions | Holds |
//! |---|---|---|
//! | [`CsrTextFile`] | `.csr` | matrix, rows in order |
//! | [`MetisFile`] | `.graph`, `.metis`, `.chaco` | undirected graph, vertices in order |
//! | [`SnapFile`] | `.snap` | edge list, any order |
//! | [`MatrixMarketFile`] | `.mtx`, `.mm` | coordinate triplets, any order |

pub mod csr_text;
pub mod matrix_market;
pub mod metis;
pub mod snap;

pub use csr_text::CsrTextFile;
pub use matrix_market::MatrixMarketFile;
pub use metis::MetisFile;
pub use snap::SnapFile;

use std::path::Path;

use crate::error::{FormatError, Result};

/// The file formats this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    CsrText,
    Metis,
    Snap,
    MatrixMarket,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::CsrText,
        Format::Metis,
        Format::Snap,
        Format::MatrixMarket,
    ];

    /// File name suffixes that select this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::CsrText => &[".csr"],
            Format::Metis => &[".graph", ".metis", ".chaco"],
            Format::Snap => &[".snap"],
            Format::MatrixMarket => &[".mtx", ".mm"],
        }
    }

    /// Whether the format natively stores graphs rather than matrices
    pub fn is_graph(&self) -> bool {
        matches!(self, Format::Metis | Format::Snap)
    }

    /// Returns true if `path` ends with one of this format's suffixes
    pub fn matches(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.extensions().iter().any(|ext| name.ends_with(ext))
    }

    /// Picks the format from the file name suffix
    pub fn from_path(path: impl AsRef<Path>) -> Result<Format> {
        let path = path.as_ref();
        Format::ALL
            .into_iter()
            .find(|format| format.matches(path))
            .ok_or_else(|| FormatError::UnknownExtension(path.display().to_string()))
    }
}
