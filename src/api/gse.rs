use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::client::{ClientConfig, FeatureService};
use super::http_client::build_session;
use super::types::*;
use crate::error::{PodError, Result};
use crate::pod::PodCode;

const POD_LAYER: &str = "TIAD2/POD_AC/FeatureServer/12/query";
const SUBSTATION_LAYER: &str = "TIAD2/Aree_Convenzionali/FeatureServer/0/query";
const MUNICIPALITY_LAYER: &str = "TIAD2/Comuni/FeatureServer/10/query";

const POD_FIELDS: &str = "COD_POD,COD_AC";
const SUBSTATION_FIELDS: &str = "COD_AC,RAG_SOC";
const MUNICIPALITY_FIELDS: &str = "COMUNE,COD_REG,COD_PROV";

/// Quote a value for an ArcGIS `where` clause, doubling embedded single quotes
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Client for the GSE ArcGIS feature layers
pub struct GseClient {
    config: ClientConfig,
    session: Option<Client>,
}

impl GseClient {
    /// Open a client; the HTTP session lives until [`FeatureService::close`] or drop
    pub fn new(config: ClientConfig) -> Result<Self> {
        let session = build_session(&config)?;
        debug!(
            "Opened HTTP session for {} (timeout {}s)",
            config.base_url, config.timeout
        );

        Ok(Self {
            config,
            session: Some(session),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn session(&self) -> Result<&Client> {
        self.session.as_ref().ok_or(PodError::SessionClosed)
    }

    fn layer_url(&self, layer: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), layer)
    }

    /// Map a transport error, keeping timeouts distinct
    fn transport_error(&self, e: reqwest::Error) -> PodError {
        if e.is_timeout() {
            PodError::Timeout(self.config.timeout)
        } else {
            PodError::Network(e)
        }
    }

    /// GET a feature layer with query parameters
    async fn get_features<A: DeserializeOwned>(
        &self,
        layer: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Feature<A>>> {
        let url = Url::parse_with_params(&self.layer_url(layer), params)
            .map_err(|e| PodError::Parse(e.to_string()))?;
        debug!("GET {}", url);

        let response = self
            .session()?
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_feature_set(response).await
    }

    /// POST a feature layer with a form-encoded body
    async fn post_features<A: DeserializeOwned>(
        &self,
        layer: &str,
        form: &[(&str, &str)],
    ) -> Result<Vec<Feature<A>>> {
        let url = self.layer_url(layer);
        debug!("POST {}", url);

        let response = self
            .session()?
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_feature_set(response).await
    }

    async fn read_feature_set<A: DeserializeOwned>(&self, response: Response) -> Result<Vec<Feature<A>>> {
        let status = response.status();
        if !status.is_success() {
            return Err(PodError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let response_text = response.text().await.map_err(|e| self.transport_error(e))?;

        if response_text.trim_start().starts_with('<') {
            return Err(PodError::api_error(
                "INVALID_RESPONSE",
                "Service returned HTML instead of JSON.",
                Some("The GSE map service may be under maintenance. Try again later.".to_string()),
            ));
        }

        if response_text.trim().is_empty() {
            return Err(PodError::api_error(
                "EMPTY_RESPONSE",
                "Service returned an empty response.",
                None,
            ));
        }

        let mut set: FeatureSet<A> = serde_json::from_str(&response_text).map_err(|e| {
            PodError::Parse(format!(
                "Failed to parse feature set: {}. Response starts with: {}",
                e,
                response_text.chars().take(100).collect::<String>()
            ))
        })?;

        if let Some(error) = set.error.take() {
            let message = if error.details.is_empty() {
                error.message
            } else {
                format!("{} ({})", error.message, error.details.join("; "))
            };
            return Err(PodError::api_error(
                error.code.map(|c| c.to_string()).unwrap_or_else(|| "ARCGIS".to_string()),
                message,
                None,
            ));
        }

        Ok(set.into_features())
    }
}

#[async_trait]
impl FeatureService for GseClient {
    async fn find_substation(&self, pod: &PodCode) -> Result<Option<SubstationId>> {
        let filter = format!("COD_POD={}", sql_literal(pod.as_str()));
        let features: Vec<Feature<PodAttributes>> = self
            .get_features(
                POD_LAYER,
                &[("where", filter.as_str()), ("outFields", POD_FIELDS), ("f", "json")],
            )
            .await?;

        let id = features
            .into_iter()
            .next()
            .and_then(|feature| feature.attributes.substation)
            .map(|code| SubstationId::new(code.to_string()));

        match &id {
            Some(id) => debug!("POD {} is served by substation {}", pod, id),
            None => debug!("No substation feature for POD {}", pod),
        }
        Ok(id)
    }

    async fn fetch_substation(&self, id: &SubstationId) -> Result<Option<SubstationDetail>> {
        let filter = format!("COD_AC={}", sql_literal(id.as_str()));
        let features: Vec<Feature<SubstationAttributes>> = self
            .get_features(
                SUBSTATION_LAYER,
                &[
                    ("where", filter.as_str()),
                    ("outFields", SUBSTATION_FIELDS),
                    ("returnGeometry", "true"),
                    ("f", "json"),
                ],
            )
            .await?;

        let Some(feature) = features.into_iter().next() else {
            debug!("No feature for substation {}", id);
            return Ok(None);
        };

        let supplier = feature
            .attributes
            .supplier
            .unwrap_or_else(|| UNSPECIFIED_SUPPLIER.to_string());
        let geometry = feature.geometry.unwrap_or_default();
        debug!(
            "Substation {}: supplier '{}', {} ring(s)",
            id,
            supplier,
            geometry.rings.len()
        );

        Ok(Some(SubstationDetail {
            id: id.clone(),
            geometry,
            supplier,
        }))
    }

    async fn query_municipalities(&self, geometry: &PolygonGeometry) -> Result<Vec<Municipality>> {
        if !geometry.has_rings() {
            warn!("Substation geometry has no rings, skipping spatial query");
            return Ok(vec![]);
        }

        // Sent as a form body: serialized rings routinely exceed URL length limits
        let payload = serde_json::to_string(&geometry.simplified())?;
        let features: Vec<Feature<Municipality>> = self
            .post_features(
                MUNICIPALITY_LAYER,
                &[
                    ("geometry", payload.as_str()),
                    ("geometryType", "esriGeometryPolygon"),
                    ("spatialRel", "esriSpatialRelIntersects"),
                    ("outFields", MUNICIPALITY_FIELDS),
                    ("returnGeometry", "false"),
                    ("f", "json"),
                ],
            )
            .await?;

        let municipalities: Vec<Municipality> =
            features.into_iter().map(|feature| feature.attributes).collect();
        debug!("{} municipality feature(s) intersect the substation", municipalities.len());
        Ok(municipalities)
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            info!("HTTP session closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.session.is_none()
    }
}

impl Drop for GseClient {
    fn drop(&mut self) {
        if self.session.take().is_some() {
            debug!("HTTP session released on drop");
        }
    }
}
