use log::{error, info};
use std::fmt;

use crate::api::PodResult;
use crate::error::PodError;

/// Steps of a POD resolution, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validating,
    LocatingSubstation,
    FetchingDetail,
    IntersectingGeometry,
    Aggregating,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::LocatingSubstation => "locating_substation",
            Self::FetchingDetail => "fetching_detail",
            Self::IntersectingGeometry => "intersecting_geometry",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// `Done` and `Failed` end a resolution
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Human-readable description, used in progress messages and errors
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validating => "validating the POD code",
            Self::LocatingSubstation => "locating the primary substation",
            Self::FetchingDetail => "fetching the substation area and supplier",
            Self::IntersectingGeometry => "finding intersecting municipalities",
            Self::Aggregating => "translating ISTAT codes",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Receives stage transitions from a resolver.
///
/// Injected into [`super::PodResolver`]; the library never configures a
/// logger itself.
pub trait StageObserver: Send + Sync {
    fn stage_started(&self, pod: &str, stage: Stage);

    fn resolution_failed(&self, pod: &str, stage: Stage, error: &PodError);

    fn resolution_finished(&self, result: &PodResult);
}

/// Reports stages through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StageObserver for LogObserver {
    fn stage_started(&self, pod: &str, stage: Stage) {
        info!("[{}] {}", pod, stage.description());
    }

    fn resolution_failed(&self, pod: &str, stage: Stage, error: &PodError) {
        error!("[{}] failed while {}: {}", pod, stage, error);
    }

    fn resolution_finished(&self, result: &PodResult) {
        info!(
            "[{}] resolved: substation {}, supplier {}",
            result.pod, result.substation, result.supplier
        );
    }
}
