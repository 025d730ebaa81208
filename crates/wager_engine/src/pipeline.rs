//! Executes the core state machine's effects against a live page.

use std::collections::VecDeque;

use async_trait::async_trait;
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn, next_run_id};
use scraper::{Html, Selector};
use wager_core::{update, Effect, HarvestState, Msg, Phase, Record, RunFailure, RunState};

use crate::export::Exporter;
use crate::extract::{Rendering, SiteExtractor, SiteRegistry};
use crate::harvest::IncrementalHarvester;
use crate::page::PageHost;
use crate::scroll::{Completion, ScrollDriver, ScrollReport, ScrollSettings, StepHook};
use crate::{EngineEvent, ProgressSink, RunOutcome, RunReport};

const DOM_EXCERPT_CHARS: usize = 5_000;

/// Runs one scrape: detect the site, scroll, extract, optionally export.
#[derive(Default)]
pub struct Orchestrator {
    registry: SiteRegistry,
    driver: ScrollDriver,
}

impl Orchestrator {
    pub fn new(registry: SiteRegistry, settings: ScrollSettings) -> Self {
        Self {
            registry,
            driver: ScrollDriver::new(settings),
        }
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub async fn run(&self, host: &dyn PageHost, sink: &dyn ProgressSink) -> RunOutcome {
        self.execute(host, sink, None).await
    }

    /// Like [`Orchestrator::run`], and serializes the records before
    /// reporting completion. Exporter errors fail the run.
    pub async fn run_and_export(
        &self,
        host: &dyn PageHost,
        sink: &dyn ProgressSink,
        exporter: &dyn Exporter,
    ) -> RunOutcome {
        self.execute(host, sink, Some(exporter)).await
    }

    async fn execute(
        &self,
        host: &dyn PageHost,
        sink: &dyn ProgressSink,
        exporter: Option<&dyn Exporter>,
    ) -> RunOutcome {
        let run_id = next_run_id();
        let url = host.url();
        engine_info!("[run {}] Starting on {}", run_id, url);

        let mut run = Run {
            run_id,
            host,
            sink,
            exporter,
            driver: &self.driver,
            site: None,
            state: RunState::new(),
            harvest: HarvestState::new(),
            records: Vec::new(),
            scroll: None,
            export: None,
        };

        let first = match self.registry.detect(&url).into_result(&url) {
            Ok(site) => {
                engine_info!("[run {}] Detected {}", run_id, site.name());
                run.site = Some(site);
                Msg::SiteDetected {
                    site: site.key().to_string(),
                    incremental: site.rendering() == Rendering::Virtualized,
                }
            }
            Err(failure) => {
                engine_info!("[run {}] Rejected: {}", run_id, failure);
                Msg::DetectionFailed(failure)
            }
        };

        let mut queue = VecDeque::from([first]);
        while let Some(msg) = queue.pop_front() {
            let (next, effects) = update(std::mem::take(&mut run.state), msg);
            run.state = next;
            if run.state.consume_dirty() {
                let view = run.state.view();
                engine_debug!(
                    "[run {}] {:?} after {} steps, {} harvested",
                    run_id,
                    view.phase,
                    view.steps,
                    view.harvested
                );
            }
            for effect in effects {
                if let Some(msg) = run.apply(effect).await {
                    queue.push_back(msg);
                }
            }
        }

        run.into_outcome()
    }
}

struct Run<'r> {
    run_id: u64,
    host: &'r dyn PageHost,
    sink: &'r dyn ProgressSink,
    exporter: Option<&'r dyn Exporter>,
    driver: &'r ScrollDriver,
    site: Option<&'r dyn SiteExtractor>,
    state: RunState,
    harvest: HarvestState,
    records: Vec<Record>,
    scroll: Option<ScrollReport>,
    export: Option<String>,
}

impl<'r> Run<'r> {
    async fn apply(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::ResetHarvester => {
                self.harvest.clear();
                None
            }
            Effect::StartScroll { harvest } => {
                let site = self.site?;
                let mut tracker = StepTracker {
                    state: &mut self.state,
                    sink: self.sink,
                    harvester: harvest
                        .then(|| IncrementalHarvester::new(self.host, site, &mut self.harvest)),
                };
                if let Some(harvester) = tracker.harvester.as_mut() {
                    // The first frame may be recycled by the first scroll.
                    harvester.harvest_visible().await;
                }
                let report = self.driver.run(self.host, self.sink, Some(&mut tracker)).await;
                engine_info!("[run {}] {:?}", self.run_id, report);
                self.scroll = Some(report);
                Some(Msg::ScrollFinished {
                    forced: report.completion == Completion::Forced,
                })
            }
            Effect::RunFinalExtraction { incremental } => {
                let site = self.site?;
                self.records = if incremental {
                    IncrementalHarvester::new(self.host, site, &mut self.harvest)
                        .finalize()
                        .await
                } else {
                    let html = self.host.snapshot().await;
                    site.parse_all(&Html::parse_document(&html))
                };
                let dom_excerpt = if self.records.is_empty() {
                    let excerpt = body_excerpt(&self.host.snapshot().await);
                    engine_warn!(
                        "[run {}] No records found; page body starts with: {}",
                        self.run_id,
                        excerpt
                    );
                    excerpt
                } else {
                    String::new()
                };
                Some(Msg::ExtractionFinished {
                    count: self.records.len(),
                    dom_excerpt,
                })
            }
            Effect::EmitProgress(message) => {
                self.sink.emit(EngineEvent::Progress(message));
                None
            }
            Effect::EmitComplete { count } => {
                if let Some(exporter) = self.exporter {
                    match exporter.export(&self.records) {
                        Ok(serialized) => self.export = Some(serialized),
                        Err(err) => {
                            engine_error!("[run {}] Export failed: {}", self.run_id, err);
                            return Some(Msg::ExportFailed {
                                message: err.to_string(),
                            });
                        }
                    }
                }
                self.sink.emit(EngineEvent::Complete {
                    records: self.records.clone(),
                    site: self.state.site().unwrap_or_default().to_string(),
                    count,
                });
                None
            }
            Effect::EmitError(failure) => {
                self.sink.emit(EngineEvent::error(failure));
                None
            }
        }
    }

    fn into_outcome(self) -> RunOutcome {
        match self.state.phase() {
            Phase::Completed => Ok(RunReport {
                site: self.state.site().unwrap_or_default().to_string(),
                records: self.records,
                scroll: self.scroll.unwrap_or(ScrollReport {
                    steps: 0,
                    completion: Completion::Settled,
                }),
                export: self.export,
            }),
            Phase::Failed(failure) => Err(failure.clone()),
            phase => {
                engine_error!("[run {}] Stopped in {:?}", self.run_id, phase);
                Err(RunFailure::NoRecordsFound {
                    dom_excerpt: String::new(),
                })
            }
        }
    }
}

/// Feeds scroll steps back into the state machine, harvesting when asked.
struct StepTracker<'s, 'h> {
    state: &'s mut RunState,
    sink: &'s dyn ProgressSink,
    harvester: Option<IncrementalHarvester<'h>>,
}

impl StepTracker<'_, '_> {
    fn dispatch(&mut self, msg: Msg) {
        let (next, effects) = update(std::mem::take(self.state), msg);
        *self.state = next;
        for effect in effects {
            if let Effect::EmitProgress(message) = effect {
                self.sink.emit(EngineEvent::Progress(message));
            }
        }
    }
}

#[async_trait(?Send)]
impl StepHook for StepTracker<'_, '_> {
    async fn on_step(&mut self, _step: u32) {
        self.dispatch(Msg::ScrollStepStarted);
        let (new_records, total_harvested) = match self.harvester.as_mut() {
            Some(harvester) => (harvester.harvest_visible().await, harvester.len()),
            None => (0, 0),
        };
        self.dispatch(Msg::ScrollStepFinished {
            new_records,
            total_harvested,
        });
    }
}

/// Leading characters of the `<body>` markup, for diagnosing layout changes.
fn body_excerpt(html: &str) -> String {
    let doc = Html::parse_document(html);
    let inner = Selector::parse("body")
        .ok()
        .and_then(|body| doc.select(&body).next().map(|el| el.inner_html()))
        .unwrap_or_default();
    inner.chars().take(DOM_EXCERPT_CHARS).collect()
}
