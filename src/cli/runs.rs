//! CLI entry-point for inspecting the run log.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::config::Settings;

/// Args for the `runs` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Number of rows to print, newest first.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let store = super::open_store(&settings).await?;
    for run in store.recent_runs(args.limit).await? {
        println!(
            "{id:>5}  {at}  {source:<14} {status:<8} processed={p} added={a} updated={u} failed={f} skipped={s} {ms}ms{err}",
            id = run.id,
            at = run.recorded_at.to_rfc3339(),
            source = run.source.as_str(),
            status = format!("{:?}", run.status).to_lowercase(),
            p = run.items_processed,
            a = run.items_added,
            u = run.items_updated,
            f = run.items_failed,
            s = run.items_skipped,
            ms = run.duration_ms,
            err = run
                .error_message
                .as_deref()
                .map(|e| format!("  error: {e}"))
                .unwrap_or_default(),
        );
    }
    Ok(())
}
