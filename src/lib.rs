pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod istat;
pub mod output;
pub mod pod;
pub mod progress;
pub mod resolver;

pub use api::{ClientConfig, FeatureService, GseClient, PodResult};
pub use error::{PodError, Result};
pub use pod::{is_valid_pod, PodCode};
pub use resolver::PodResolver;
