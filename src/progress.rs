use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use crate::api::PodResult;
use crate::error::PodError;
use crate::resolver::{Stage, StageObserver};

/// Progress indicator manager
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    enabled: bool,
    verbose: bool,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(quiet: bool, verbose: bool) -> Self {
        // Spinners only on an interactive stderr, and never over verbose logs
        let enabled = !quiet && !verbose && io::stderr().is_terminal();

        Self {
            multi: Arc::new(MultiProgress::new()),
            enabled,
            verbose,
        }
    }

    /// Create a spinner for a resolution
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    /// Show a simple message (for verbose mode)
    pub fn show_message(&self, message: &str) {
        if self.verbose {
            eprintln!("🔍 {}", message);
        }
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Spinner that follows the stages of one POD resolution
pub struct ResolveProgress {
    spinner: Option<ProgressBar>,
    manager: Arc<ProgressManager>,
}

impl ResolveProgress {
    pub fn new(manager: Arc<ProgressManager>, pod: &str) -> Self {
        let spinner = manager.create_spinner(&messages::resolving(pod));
        Self { spinner, manager }
    }

    /// Update the progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.spinner {
            pb.set_message(message.to_string());
        }
        self.manager.show_message(message);
    }

    /// Finish and clear the progress
    pub fn finish_and_clear(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

impl StageObserver for ResolveProgress {
    fn stage_started(&self, pod: &str, stage: Stage) {
        debug!("[{}] stage {}", pod, stage.as_str());
        if !stage.is_terminal() {
            self.set_message(&messages::stage(pod, stage));
        }
    }

    fn resolution_failed(&self, pod: &str, stage: Stage, error: &PodError) {
        debug!("[{}] failed at {}: {}", pod, stage.as_str(), error);
        self.finish_and_clear();
    }

    fn resolution_finished(&self, result: &PodResult) {
        info!("[{}] resolved to substation {}", result.pod, result.substation);
        self.finish_and_clear();
    }
}

impl Drop for ResolveProgress {
    fn drop(&mut self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

/// Progress messages
pub mod messages {
    use crate::resolver::Stage;

    pub fn resolving(pod: &str) -> String {
        format!("Resolving {}...", pod)
    }

    pub fn stage(pod: &str, stage: Stage) -> String {
        let mut description = stage.description().to_string();
        if let Some(first) = description.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{} ({})...", description, pod)
    }
}
