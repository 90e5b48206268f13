//! Scheduled publication sweeper.
//!
//! Wakes on a fixed interval, finds `Scheduled` posts whose publish time has
//! arrived and moves each one to `Published` through the same lifecycle
//! rules the status endpoint uses. Every post is persisted with its own
//! update, so one failure never blocks the rest of the batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use crate::config::{flag, parse_or};

/// Publisher configuration.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub enabled: bool,
    pub interval: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60),
        }
    }
}

impl PublisherConfig {
    pub fn from_env() -> Self {
        let secs: u64 = parse_or("PUBLISH_SWEEP_INTERVAL_SECS", 60);
        Self {
            enabled: flag("SCHEDULER_ENABLED", true),
            interval: Duration::from_secs(secs.max(1)),
        }
    }
}

/// Outcome of a single sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub published: usize,
    pub failed: usize,
}

pub struct ScheduledPublisher {
    posts: Arc<dyn PostRepository>,
    config: PublisherConfig,
}

impl ScheduledPublisher {
    pub fn new(posts: Arc<dyn PostRepository>, config: PublisherConfig) -> Self {
        Self { posts, config }
    }

    /// Publish every post due at `now`.
    ///
    /// Only the initial scan can fail the sweep. Per-post failures are
    /// logged and counted; those posts stay `Scheduled` for the next cycle.
    /// Once `shutdown` fires no further post is started.
    pub async fn sweep(
        &self,
        now: DateTime<Utc>,
        shutdown: &CancellationToken,
    ) -> Result<SweepReport, RepoError> {
        let due = self.posts.find_due_scheduled(now).await?;
        let mut report = SweepReport {
            due: due.len(),
            ..Default::default()
        };

        for mut post in due {
            if shutdown.is_cancelled() {
                tracing::debug!(
                    remaining = report.due - report.published - report.failed,
                    "Sweep interrupted by shutdown"
                );
                break;
            }

            let post_id = post.id;
            let scheduled_for = post.published_at;

            if let Err(e) = post.publish_scheduled(now) {
                report.failed += 1;
                tracing::warn!(
                    post_id = %post_id,
                    error = %e,
                    "Scheduled post rejected by lifecycle rules"
                );
                continue;
            }

            match self.posts.update(post).await {
                Ok(_) => {
                    report.published += 1;
                    tracing::info!(
                        post_id = %post_id,
                        scheduled_for = ?scheduled_for,
                        "Scheduled post published"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        post_id = %post_id,
                        error = %e,
                        "Failed to publish scheduled post"
                    );
                }
            }
        }

        Ok(report)
    }

    /// Sweep on every tick until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            "Scheduled publisher started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    match self.sweep(Utc::now(), &shutdown).await {
                        Ok(report) if report.due > 0 => tracing::info!(
                            due = report.due,
                            published = report.published,
                            failed = report.failed,
                            "Publish sweep finished"
                        ),
                        Ok(_) => tracing::debug!("No scheduled posts due"),
                        Err(e) => {
                            tracing::error!(error = %e, "Publish sweep failed; retrying next tick")
                        }
                    }
                }
            }
        }

        tracing::info!("Scheduled publisher stopped");
    }

    /// Spawn [`run`](Self::run) onto the runtime. Returns `None` when the
    /// publisher is disabled.
    pub fn spawn(self, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            tracing::info!("Scheduled publisher disabled");
            return None;
        }
        Some(tokio::spawn(self.run(shutdown)))
    }
}
