// Radiative Forcing Infographic - Core Library
// Exposes the dataset, chart and layout logic for the server binary and tests

pub mod error;
pub mod dataset;
pub mod selection;
pub mod chart;
pub mod layout;
pub mod config;
pub mod logging;

// HTTP surface only builds with the server feature
#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use error::{DatasetError, DatasetResult};
pub use dataset::{ContributionRecord, Dataset, Measure};
pub use selection::{SelectionSet, DEFAULT_SOURCES};
pub use chart::{build_chart, format_contribution, Bar, ChartSpec, Figure};
pub use layout::{build_layout, render_html, render_page, Node};
pub use config::Config;
pub use logging::init_logging;
#[cfg(feature = "server")]
pub use server::{router, AppState, SelectionChanged};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
