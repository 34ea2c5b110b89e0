//! Four-channel fan-out: one packing thread per material channel, joined at
//! a single completion barrier.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::classify::classify_materials;
use crate::config::{AtlasSpec, ModulePackConfig};
use crate::error::{GridPackerError, Result};
use crate::model::{Channel, ChannelSet, PackSummary, SourceImage};
use crate::packer::pack_to_file;

/// Outcome of one channel job, with the instants it started and finished.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: Channel,
    pub output_path: PathBuf,
    pub started: Instant,
    pub finished: Instant,
    pub result: Result<PackSummary>,
}

impl ChannelOutcome {
    pub fn elapsed(&self) -> Duration {
        self.finished.saturating_duration_since(self.started)
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate of all four channel outcomes, in fan-out order.
#[derive(Debug)]
pub struct ModulePackReport {
    pub outcomes: Vec<ChannelOutcome>,
    /// Time from fan-out until the barrier released.
    pub wall_time: Duration,
}

impl ModulePackReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ChannelOutcome::is_ok)
    }

    pub fn outcome(&self, channel: Channel) -> Option<&ChannelOutcome> {
        self.outcomes.iter().find(|o| o.channel == channel)
    }

    /// Failed channels with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (Channel, &GridPackerError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.channel, e)))
    }

    /// Sum of per-job durations; compare with `wall_time` to see the overlap.
    pub fn busy_time(&self) -> Duration {
        self.outcomes.iter().map(ChannelOutcome::elapsed).sum()
    }

    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        let ok = self.outcomes.iter().filter(|o| o.is_ok()).count();
        format!(
            "Channels: {}/{} ok, Wall: {:.1}ms, Busy: {:.1}ms",
            ok,
            self.outcomes.len(),
            self.wall_time.as_secs_f64() * 1000.0,
            self.busy_time().as_secs_f64() * 1000.0,
        )
    }
}

/// Classifies `root` and packs the four channel atlases concurrently.
///
/// Classification errors abort before any job starts. Packing errors are
/// reported per channel in the returned report.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn run_module_pack(root: &Path, cfg: &ModulePackConfig) -> Result<ModulePackReport> {
    cfg.validate()?;
    let channels = classify_materials(root, cfg.sort_order)?;
    info!(images = channels.total(), "classified module textures");
    for (channel, images) in channels.iter() {
        debug!(%channel, images = images.len(), "channel input");
    }
    Ok(pack_channels(channels, cfg, root))
}

/// Fans out one [`pack_to_file`] job per channel and waits for all four.
pub fn pack_channels(channels: ChannelSet, cfg: &ModulePackConfig, root: &Path) -> ModulePackReport {
    pack_channels_with(channels, cfg, root, pack_to_file)
}

/// Like [`pack_channels`] but runs `job` for each channel.
///
/// Every job runs on its own named thread; the call returns only after all
/// four have finished, successfully, with an error, or by panicking. The
/// channel buffers are dropped after the barrier.
pub fn pack_channels_with<F>(
    channels: ChannelSet,
    cfg: &ModulePackConfig,
    root: &Path,
    job: F,
) -> ModulePackReport
where
    F: Fn(&[SourceImage], &AtlasSpec) -> Result<PackSummary> + Sync,
{
    let fan_out = Instant::now();
    let job = &job;
    let channel_set = &channels;
    let outcomes: Vec<ChannelOutcome> = thread::scope(|s| {
        let pending: Vec<_> = Channel::ALL
            .into_iter()
            .map(move |channel| {
                let spec = cfg.atlas_spec(channel, root);
                let output_path = spec.output_path.clone();
                let images = channel_set.get(channel);
                let handle = thread::Builder::new()
                    .name(format!("pack-{channel}"))
                    .spawn_scoped(s, move || {
                        let started = Instant::now();
                        let result = job(images, &spec);
                        (started, Instant::now(), result)
                    });
                (channel, output_path, handle)
            })
            .collect();

        // barrier: join every worker before leaving the scope
        pending
            .into_iter()
            .map(|(channel, output_path, handle)| {
                let (started, finished, result) = match handle {
                    Ok(h) => h.join().unwrap_or_else(|_| {
                        let now = Instant::now();
                        (now, now, Err(GridPackerError::WorkerPanicked { channel }))
                    }),
                    Err(e) => {
                        let now = Instant::now();
                        (now, now, Err(GridPackerError::Io(e)))
                    }
                };
                ChannelOutcome {
                    channel,
                    output_path,
                    started,
                    finished,
                    result,
                }
            })
            .collect()
    });
    let wall_time = fan_out.elapsed();
    drop(channels);

    for o in &outcomes {
        match &o.result {
            Ok(_) => info!(channel = %o.channel, out = %o.output_path.display(), "channel packed"),
            Err(e) => warn!(channel = %o.channel, error = %e, "channel failed"),
        }
    }
    ModulePackReport {
        outcomes,
        wall_time,
    }
}
