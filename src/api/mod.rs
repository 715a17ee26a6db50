pub mod client;
pub mod deserializers;
pub mod gse;
pub mod http_client;
pub mod types;

pub use client::{ClientConfig, FeatureService, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use gse::GseClient;
pub use types::{
    Municipality, PodResult, PolygonGeometry, SpatialReference, SubstationDetail, SubstationId,
};
