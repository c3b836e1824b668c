//! Reconciliation loop: fetch the feed, deliver unseen entries, record
//! what was delivered.

use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::feed::{FeedEntry, FeedFetcher};
use crate::ledger::{LedgerRepository, PostedArticle};
use crate::webhook::WebhookClient;
use crate::Result;

/// What happened to a single feed entry during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Delivered to the webhook this cycle.
    Delivered,
    /// Already in the ledger, skipped.
    AlreadySeen,
    /// Delivery failed; the entry stays unrecorded for the next cycle.
    Failed,
}

/// Tally of entry outcomes for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Entries delivered to the webhook this cycle.
    pub delivered: usize,
    /// Entries skipped as already recorded.
    pub already_seen: usize,
    /// Entries whose delivery failed.
    pub failed: usize,
}

/// Drives fetch, deliver and record for one feed.
pub struct Relay {
    db: Database,
    fetcher: FeedFetcher,
    webhook: WebhookClient,
    feed_url: String,
    interval: Duration,
}

impl Relay {
    pub fn new(db: Database, config: &Config) -> Result<Self> {
        let fetcher = FeedFetcher::new(&config.feed)?;
        let webhook = WebhookClient::new(&config.webhook)?;

        Ok(Self {
            db,
            fetcher,
            webhook,
            feed_url: config.feed.url.clone(),
            interval: Duration::from_secs(config.relay.interval_secs),
        })
    }

    /// Run one reconciliation cycle. Faults are logged, never
    /// propagated: a fetch failure yields an empty cycle and a failed
    /// entry does not stop the remaining entries.
    pub async fn run_once(&self) -> CycleSummary {
        let entries = match self.fetcher.fetch(&self.feed_url).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Feed fetch failed: {}", e);
                return CycleSummary::default();
            }
        };

        debug!("Feed {} returned {} entries", self.feed_url, entries.len());

        let repo = LedgerRepository::new(self.db.pool());
        let mut summary = CycleSummary::default();

        for entry in &entries {
            match self.process_entry(&repo, entry).await {
                EntryOutcome::Delivered => summary.delivered += 1,
                EntryOutcome::AlreadySeen => summary.already_seen += 1,
                EntryOutcome::Failed => summary.failed += 1,
            }
        }

        if summary.delivered > 0 || summary.failed > 0 {
            info!(
                "Cycle complete: {} delivered, {} already seen, {} failed",
                summary.delivered, summary.already_seen, summary.failed
            );
        } else {
            debug!("Cycle complete: no new articles");
        }

        summary
    }

    async fn process_entry(
        &self,
        repo: &LedgerRepository<'_>,
        entry: &FeedEntry,
    ) -> EntryOutcome {
        match repo.contains(&entry.id).await {
            Ok(true) => return EntryOutcome::AlreadySeen,
            Ok(false) => {}
            // A lookup fault must not kill the cycle. Treat the entry
            // as unseen; the ledger insert is what guards against
            // double-recording.
            Err(e) => warn!("Ledger lookup failed for {}: {}", entry.id, e),
        }

        if let Err(e) = self
            .webhook
            .deliver(&entry.title, &entry.link, &entry.summary)
            .await
        {
            warn!("Delivery failed for \"{}\": {}", entry.title, e);
            return EntryOutcome::Failed;
        }

        let article = PostedArticle::new(
            entry.id.clone(),
            entry.title.clone(),
            entry.link.clone(),
            entry.published_or_now(),
        );

        match repo.record(&article).await {
            Ok(true) => info!("Delivered \"{}\"", entry.title),
            Ok(false) => debug!("Article {} was already recorded", entry.id),
            // The notification went out but the ledger write failed,
            // so the same entry may go out again next cycle.
            Err(e) => error!("Failed to record delivered article {}: {}", entry.id, e),
        }

        EntryOutcome::Delivered
    }

    /// Run cycles forever on the configured interval. Returns after an
    /// interrupt; an in-flight cycle always completes first.
    pub async fn run(&self) {
        info!(
            "Relay started for {} (cycle interval: {} seconds)",
            self.feed_url,
            self.interval.as_secs()
        );

        let mut timer = interval(self.interval);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.run_once().await;
                }
                _ = &mut shutdown => {
                    info!("Interrupt received, shutting down");
                    break;
                }
            }
        }
    }
}
