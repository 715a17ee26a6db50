use serde::{Deserialize, Serialize};
use std::fmt;

use super::deserializers::{blank_as_none, null_as_default};
use crate::istat::AdminCode;

/// Spatial reference used when a substation geometry does not carry one
pub const DEFAULT_WKID: u32 = 4326;

/// Supplier placeholder when `RAG_SOC` is missing or blank
pub const UNSPECIFIED_SUPPLIER: &str = "Non specificato";

/// Primary substation (cabina primaria) code, `COD_AC`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubstationId(String);

impl SubstationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubstationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Esri spatial reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<u32>,
    #[serde(rename = "latestWkid", default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}

impl SpatialReference {
    pub fn wgs84() -> Self {
        Self {
            wkid: Some(DEFAULT_WKID),
            latest_wkid: None,
            wkt: None,
        }
    }
}

/// Esri polygon geometry, passed through from the substation layer to the
/// municipality query without interpretation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rings: Vec<Vec<Vec<f64>>>,
    #[serde(rename = "spatialReference", default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

impl PolygonGeometry {
    pub fn has_rings(&self) -> bool {
        !self.rings.is_empty()
    }

    /// Rings plus spatial reference only, defaulting to WGS84
    pub fn simplified(&self) -> PolygonGeometry {
        PolygonGeometry {
            rings: self.rings.clone(),
            spatial_reference: Some(
                self.spatial_reference
                    .clone()
                    .unwrap_or_else(SpatialReference::wgs84),
            ),
        }
    }
}

/// Geometry and supplier of a primary substation
#[derive(Debug, Clone, PartialEq)]
pub struct SubstationDetail {
    pub id: SubstationId,
    pub geometry: PolygonGeometry,
    pub supplier: String,
}

/// A municipality intersecting a substation area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    #[serde(rename = "COMUNE", default)]
    pub name: String,
    #[serde(rename = "COD_REG", default)]
    pub region_code: AdminCode,
    #[serde(rename = "COD_PROV", default)]
    pub province_code: AdminCode,
}

/// Final answer for one POD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodResult {
    pub pod: String,
    #[serde(rename = "cabina_primaria")]
    pub substation: String,
    #[serde(rename = "fornitore")]
    pub supplier: String,
    #[serde(rename = "regioni")]
    pub regions: String,
    #[serde(rename = "province")]
    pub provinces: String,
    #[serde(rename = "comuni")]
    pub municipalities: String,
}

// ArcGIS REST wire format

/// `query` response envelope; errors come back with HTTP 200
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureSet<A> {
    pub features: Option<Vec<Feature<A>>>,
    #[serde(default)]
    pub error: Option<ArcGisError>,
}

impl<A> FeatureSet<A> {
    pub fn into_features(self) -> Vec<Feature<A>> {
        self.features.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature<A> {
    pub attributes: A,
    #[serde(default)]
    pub geometry: Option<PolygonGeometry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArcGisError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PodAttributes {
    #[serde(rename = "COD_AC", default)]
    pub substation: Option<AdminCode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubstationAttributes {
    #[serde(rename = "RAG_SOC", default, deserialize_with = "blank_as_none")]
    pub supplier: Option<String>,
}
