use async_trait::async_trait;

use super::types::*;
use crate::error::Result;
use crate::pod::PodCode;

/// Default GSE ArcGIS REST root
pub const DEFAULT_BASE_URL: &str = "https://mappe.gse.it/srvf/rest/services";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The three feature queries a POD resolution is built from
#[async_trait]
pub trait FeatureService: Send + Sync {
    /// Look up the primary substation serving a POD
    async fn find_substation(&self, pod: &PodCode) -> Result<Option<SubstationId>>;

    /// Fetch the polygon and supplier of a primary substation
    async fn fetch_substation(&self, id: &SubstationId) -> Result<Option<SubstationDetail>>;

    /// All municipalities whose boundary intersects the polygon
    async fn query_municipalities(&self, geometry: &PolygonGeometry) -> Result<Vec<Municipality>>;

    /// Release the underlying HTTP session; later queries fail
    fn close(&mut self);

    /// Whether `close` has been called
    fn is_closed(&self) -> bool;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds, applied to every request
    pub timeout: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("gse-pod/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}
