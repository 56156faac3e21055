//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires the crawl pipeline together:
//! - Seeding the crawl by fetching the seed URL
//! - Dispatching fetches and extractions to bounded worker pools
//! - Recording every observed link and scheduling first-seen in-scope links
//! - Watching pending work and deciding when the crawl is done

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchedPage};
use crate::crawler::parser::{LinkExtractor, ParsedDocument};
use crate::crawler::pending::{PendingWork, WorkKind, WorkTicket};
use crate::crawler::scheduler::Scheduler;
use crate::output::{CrawlStatistics, CrawlSummary, LinkLog};
use crate::state::CrawlPhase;
use crate::url::{normalize, origin_of, NormalizedUrl};
use crate::CrawlError;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// A URL waiting for a fetch worker
struct FetchJob {
    url: NormalizedUrl,
    _ticket: WorkTicket,
}

/// A fetched page waiting for an extraction worker
struct ExtractionJob {
    page: FetchedPage,
    _ticket: WorkTicket,
}

/// State shared by every worker of one run
struct CrawlContext {
    client: Client,
    origin: String,
    extractor: LinkExtractor,
    scheduler: Scheduler,
    pending: Arc<PendingWork>,
    link_log: LinkLog,
    stats: CrawlStatistics,
    fetch_queue: UnboundedSender<FetchJob>,
}

impl CrawlContext {
    /// Fetches one scheduled URL and queues the page for extraction
    ///
    /// The job's fetch ticket is dropped only after the extraction ticket exists.
    async fn run_fetch(&self, job: FetchJob, extraction_queue: &UnboundedSender<ExtractionJob>) {
        match fetch_page(&self.client, &job.url).await {
            Ok(page) => {
                let ticket = self.pending.begin(WorkKind::Extraction);
                if extraction_queue
                    .send(ExtractionJob {
                        page,
                        _ticket: ticket,
                    })
                    .is_err()
                {
                    tracing::warn!("Extraction queue closed, dropping {}", job.url);
                    return;
                }
                self.stats.record_page_fetched();
                tracing::info!("Fetched: {}", job.url);
            }
            Err(e) => {
                tracing::warn!("Dropping {} ({}): {}", job.url, e.kind(), e);
                self.stats.record_fetch_failure(&e);
            }
        }
    }

    /// Parses a fetched page, records its links, and schedules unseen in-scope ones
    ///
    /// Runs on a blocking worker; nothing here suspends.
    fn run_extraction(&self, job: ExtractionJob) {
        let document = ParsedDocument::parse(job.page);
        tracing::debug!("Extracting links from {}", document.url());

        for link in self.extractor.extract(&document) {
            if !link.scope.is_fetchable() {
                self.stats.record_out_of_scope_link();
                self.record(&link.href);
                continue;
            }

            let normalized = match normalize(&link.href, &self.origin) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping link on {}: {}", document.url(), e);
                    self.stats.record_malformed_link();
                    continue;
                }
            };

            self.stats.record_in_scope_link();
            self.record(normalized.as_str());

            if self.scheduler.offer(&normalized) {
                self.schedule_fetch(normalized);
            }
        }
    }

    /// Appends one link record; a failed write is reported and the crawl continues
    fn record(&self, href: &str) {
        if let Err(e) = self.link_log.append(href) {
            tracing::warn!("{}", e);
            self.stats.record_log_write_failure();
        }
    }

    fn schedule_fetch(&self, url: NormalizedUrl) {
        tracing::debug!("Scheduling fetch: {}", url);
        let ticket = self.pending.begin(WorkKind::Fetch);
        if self
            .fetch_queue
            .send(FetchJob {
                url,
                _ticket: ticket,
            })
            .is_err()
        {
            tracing::warn!("Fetch queue closed, link not scheduled");
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<CrawlContext>,
    fetch_jobs: UnboundedReceiver<FetchJob>,
    seed_url: String,
    seed: NormalizedUrl,
    fetch_workers: usize,
    extraction_workers: usize,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and resolves the crawl origin. Nothing is fetched and
    /// the link log is not opened until [`Coordinator::run`].
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - The configuration is invalid, or the seed URL or the HTTP
    ///   client could not be set up
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;

        let origin = origin_of(&config.crawler.seed_url)?;
        let seed = normalize(&config.crawler.seed_url, &origin)?;
        let client = build_http_client(&config.crawler)?;
        let link_log = LinkLog::new(&config.output.link_log_path);
        let (fetch_queue, fetch_jobs) = unbounded_channel();

        tracing::debug!("Crawl origin: {}", origin);
        tracing::debug!("Link log: {}", link_log.path().display());

        let context = CrawlContext {
            client,
            origin,
            extractor: LinkExtractor::new()?,
            scheduler: Scheduler::new(),
            pending: PendingWork::new(),
            link_log,
            stats: CrawlStatistics::new(),
            fetch_queue,
        };

        Ok(Self {
            context: Arc::new(context),
            fetch_jobs,
            seed_url: config.crawler.seed_url,
            seed,
            fetch_workers: config.crawler.fetch_workers as usize,
            extraction_workers: config.crawler.extraction_workers as usize,
            phase: CrawlPhase::Seeding,
        })
    }

    /// Returns the current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the crawl to quiescence
    ///
    /// 1. Marks the seed visited and fetches it; failure here ends the run
    /// 2. Starts the fetch and extraction dispatchers
    /// 3. Waits until no fetch and no extraction is outstanding
    /// 4. Stops the dispatchers and returns the run summary
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The crawl reached quiescence
    /// * `Err(CrawlError::SeedUnreachable)` - The seed could not be fetched; nothing was processed
    pub async fn run(mut self) -> Result<CrawlSummary, CrawlError> {
        let started_at = Utc::now();
        let context = Arc::clone(&self.context);

        tracing::info!("Starting crawl at {}", self.seed);

        context.scheduler.offer(&self.seed);
        let seed_ticket = context.pending.begin(WorkKind::Fetch);

        let seed_page = match fetch_page(&context.client, &self.seed).await {
            Ok(page) => page,
            Err(source) => {
                context.stats.record_fetch_failure(&source);
                drop(seed_ticket);
                self.transition(CrawlPhase::Done);
                tracing::error!("Seed fetch failed: {}", source);
                return Err(CrawlError::SeedUnreachable {
                    url: self.seed.to_string(),
                    source,
                });
            }
        };

        context.stats.record_page_fetched();
        tracing::info!("Fetched: {}", self.seed);

        let (extraction_queue, extraction_jobs) = unbounded_channel();
        let seed_job = ExtractionJob {
            page: seed_page,
            _ticket: context.pending.begin(WorkKind::Extraction),
        };
        if extraction_queue.send(seed_job).is_err() {
            tracing::warn!("Extraction queue closed before the crawl started");
        }
        drop(seed_ticket);

        let fetch_jobs = std::mem::replace(&mut self.fetch_jobs, unbounded_channel().1);
        let dispatchers = [
            tokio::spawn(dispatch_fetches(
                Arc::clone(&context),
                fetch_jobs,
                extraction_queue,
                Arc::new(Semaphore::new(self.fetch_workers)),
            )),
            tokio::spawn(dispatch_extractions(
                Arc::clone(&context),
                extraction_jobs,
                Arc::new(Semaphore::new(self.extraction_workers)),
            )),
        ];

        self.transition(CrawlPhase::Running);
        self.await_quiescence().await;
        shutdown(dispatchers).await;

        let summary = context.stats.summarize(
            &self.seed_url,
            context.scheduler.visited_count(),
            started_at,
            Utc::now(),
        );

        tracing::info!(
            "Crawl completed: {} pages fetched, {} fetches failed, {} links recorded in {:.2}s",
            summary.pages_fetched,
            summary.fetch_failures(),
            summary.links_observed(),
            summary.duration_seconds()
        );

        Ok(summary)
    }

    /// Follows pending-work updates until both counters are zero
    async fn await_quiescence(&mut self) {
        let mut updates = self.context.pending.subscribe();
        let mut last_scheduled = updates.borrow().scheduled;

        loop {
            let snapshot = *updates.borrow_and_update();
            let newly_scheduled = snapshot.scheduled != last_scheduled;
            last_scheduled = snapshot.scheduled;

            let next = CrawlPhase::observe(snapshot.fetches, snapshot.extractions, newly_scheduled);
            self.transition(next);

            if next.is_terminal() {
                break;
            }

            if updates.changed().await.is_err() {
                tracing::warn!("Pending work tracker closed before the crawl finished");
                self.transition(CrawlPhase::Done);
                break;
            }
        }
    }

    fn transition(&mut self, next: CrawlPhase) {
        if self.phase == next {
            return;
        }

        if !self.phase.can_transition_to(next) {
            tracing::warn!("Unexpected crawl phase change {} -> {}", self.phase, next);
        }

        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// Takes scheduled URLs off the fetch queue and runs each under a worker permit
async fn dispatch_fetches(
    context: Arc<CrawlContext>,
    mut jobs: UnboundedReceiver<FetchJob>,
    extraction_queue: UnboundedSender<ExtractionJob>,
    permits: Arc<Semaphore>,
) {
    while let Some(job) = jobs.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let context = Arc::clone(&context);
        let extraction_queue = extraction_queue.clone();
        tokio::spawn(async move {
            let _permit = permit;
            context.run_fetch(job, &extraction_queue).await;
        });
    }
}

/// Takes fetched pages off the extraction queue and parses each on the blocking pool
async fn dispatch_extractions(
    context: Arc<CrawlContext>,
    mut jobs: UnboundedReceiver<ExtractionJob>,
    permits: Arc<Semaphore>,
) {
    while let Some(job) = jobs.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let context = Arc::clone(&context);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            context.run_extraction(job);
        });
    }
}

/// Stops idle dispatchers once the crawl is quiescent
async fn shutdown(dispatchers: [JoinHandle<()>; 2]) {
    for handle in dispatchers {
        handle.abort();
        match handle.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => tracing::error!("Dispatcher failed: {}", e),
        }
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use linktrawl::config::default_config;
/// use linktrawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(default_config()?).await?;
/// println!("{} pages fetched", summary.pages_fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    Coordinator::new(config)?.run().await
}
