use log::warn;
use std::sync::Arc;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::progress::{ProgressManager, ResolveProgress};
use crate::resolver::PodResolver;

/// Execute resolve command
pub async fn execute(pod: &str, options: &GlobalOptions) -> Result<()> {
    // A broken config file should not block a lookup
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring configuration file: {}", e);
        Config::default()
    });
    let client_config = config.client_config(options.base_url.as_deref(), options.timeout);

    let progress_manager = Arc::new(ProgressManager::new(options.quiet, options.verbose));
    let progress = Arc::new(ResolveProgress::new(progress_manager, pod));

    let mut resolver = PodResolver::new(client_config)?.with_observer(progress.clone());
    let outcome = resolver.resolve(pod).await;
    resolver.close();
    progress.finish_and_clear();

    let result = outcome?;
    let output = output::format_result(&result, options.format)?;
    println!("{}", output);

    Ok(())
}
