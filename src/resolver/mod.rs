//! POD resolution: validate, locate the substation, fetch its area, intersect
//! it with municipalities, translate codes.
//!
//! Each step feeds the next one and nothing runs concurrently. Failures after
//! validation are wrapped into [`PodError::Resolution`], tagged with the stage
//! that failed.

pub mod aggregate;
pub mod stage;

pub use aggregate::{aggregate, unique_names};
pub use stage::{LogObserver, Stage, StageObserver};

use log::info;
use std::sync::Arc;

use crate::api::{ClientConfig, FeatureService, GseClient, PodResult};
use crate::error::{PodError, Result};
use crate::istat::CodeTranslator;
use crate::pod::PodCode;

type StageResult<T> = std::result::Result<T, (Stage, PodError)>;

/// Resolves POD codes against a [`FeatureService`].
///
/// The service's HTTP session is released by [`PodResolver::close`] or when
/// the resolver is dropped, whichever comes first.
pub struct PodResolver {
    service: Box<dyn FeatureService>,
    translator: CodeTranslator,
    observer: Arc<dyn StageObserver>,
}

impl PodResolver {
    /// Resolver backed by the GSE ArcGIS services
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = GseClient::new(config)?;
        Ok(Self::with_service(Box::new(client)))
    }

    pub fn with_service(service: Box<dyn FeatureService>) -> Self {
        Self {
            service,
            translator: CodeTranslator::new(),
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn translator(&self) -> &CodeTranslator {
        &self.translator
    }

    /// Resolve a POD code.
    ///
    /// Returns [`PodError::InvalidInput`] without any I/O when the code is
    /// malformed, and [`PodError::Resolution`] for everything else.
    pub async fn resolve(&self, code: &str) -> Result<PodResult> {
        self.observer.stage_started(code, Stage::Validating);
        let pod = PodCode::parse(code).inspect_err(|e| {
            self.observer.stage_started(code, Stage::Failed);
            self.observer.resolution_failed(code, Stage::Validating, e);
        })?;

        match self.run(&pod).await {
            Ok(result) => {
                self.observer.stage_started(pod.as_str(), Stage::Done);
                self.observer.resolution_finished(&result);
                Ok(result)
            }
            Err((stage, error)) => {
                self.observer.stage_started(pod.as_str(), Stage::Failed);
                self.observer.resolution_failed(pod.as_str(), stage, &error);
                Err(PodError::resolution(stage, error))
            }
        }
    }

    async fn run(&self, pod: &PodCode) -> StageResult<PodResult> {
        let stage = self.enter(pod, Stage::LocatingSubstation);
        let substation = self
            .service
            .find_substation(pod)
            .await
            .and_then(|id| {
                id.ok_or_else(|| PodError::NotFound(format!("no primary substation for POD {}", pod)))
            })
            .map_err(|e| (stage, e))?;

        let stage = self.enter(pod, Stage::FetchingDetail);
        let detail = self
            .service
            .fetch_substation(&substation)
            .await
            .and_then(|detail| {
                detail.ok_or_else(|| {
                    PodError::NotFound(format!("no data for primary substation {}", substation))
                })
            })
            .map_err(|e| (stage, e))?;

        let stage = self.enter(pod, Stage::IntersectingGeometry);
        let municipalities = self
            .service
            .query_municipalities(&detail.geometry)
            .await
            .map_err(|e| (stage, e))?;
        if municipalities.is_empty() {
            return Err((
                stage,
                PodError::NotFound(format!(
                    "no municipalities intersect primary substation {}",
                    substation
                )),
            ));
        }

        self.enter(pod, Stage::Aggregating);
        let result = aggregate(pod, &detail, &municipalities, &self.translator);
        info!(
            "POD {} spans {} municipality record(s)",
            pod,
            municipalities.len()
        );
        Ok(result)
    }

    fn enter(&self, pod: &PodCode, stage: Stage) -> Stage {
        self.observer.stage_started(pod.as_str(), stage);
        stage
    }

    /// Release the HTTP session. Later calls to [`PodResolver::resolve`]
    /// fail with [`PodError::SessionClosed`] as the cause.
    pub fn close(&mut self) {
        self.service.close();
    }

    pub fn is_closed(&self) -> bool {
        self.service.is_closed()
    }
}
