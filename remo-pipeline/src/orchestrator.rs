use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use remo_core::models::{GeneSet, StageSelection};
use remo_core::selector::{select_stage, stage_label};
use remo_core::utils::color_for;
use remo_motif::Motif;
use remo_scan::DistributionConfig;

use crate::errors::PipelineError;
use crate::series::AnalysisSeries;

/// Cap on concurrently running motif x stage pairs. Independent of the
/// scan engine's own per-record worker pool.
pub const MAX_CONCURRENT_PAIRS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Cooperative cancellation flag, checked between pair dispatches.
/// In-flight pairs run to completion. The flag is cleared when a new
/// run enters `Running`, so a stale cancel never poisons the next run.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Observable completion fraction of a running analysis.
///
/// `fraction` is `None` before a run starts and after a cancelled run
/// resets it; otherwise it increases monotonically to 1.0.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl ProgressHandle {
    fn start(&self, total: usize) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn tick(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.start(0);
    }

    pub fn fraction(&self) -> Option<f64> {
        let total = self.total.load(Ordering::SeqCst);
        if total == 0 {
            return None;
        }
        Some(self.completed.load(Ordering::SeqCst) as f64 / total as f64)
    }
}

///
/// Runs the cross product of motifs x selected stages over a loaded
/// gene set.
///
/// Each pair resolves its stage subset, scans it and bins the matches
/// on a blocking worker; at most [`MAX_CONCURRENT_PAIRS`] pairs run at
/// once. The state machine is `Idle -> Running -> {Completed,
/// Cancelled, Failed}`; the first pair failure cancels dispatch and
/// fails the run, keeping already-completed series retrievable.
///
pub struct Analyzer {
    motifs: Vec<Motif>,
    selection: StageSelection,
    gene_set: Option<Arc<GeneSet>>,
    options: DistributionConfig,
    state: AnalyzerState,
    results: Vec<AnalysisSeries>,
    progress: ProgressHandle,
    cancel: CancelHandle,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer {
            motifs: Vec::new(),
            selection: StageSelection::default(),
            gene_set: None,
            options: DistributionConfig::default(),
            state: AnalyzerState::Idle,
            results: Vec::new(),
            progress: ProgressHandle::default(),
            cancel: CancelHandle::default(),
        }
    }

    pub fn set_motifs(&mut self, motifs: Vec<Motif>) {
        self.motifs = motifs;
    }

    pub fn set_selection(&mut self, selection: StageSelection) {
        self.selection = selection;
    }

    pub fn set_gene_set(&mut self, gene_set: Arc<GeneSet>) {
        self.gene_set = Some(gene_set);
    }

    pub fn set_options(&mut self, options: DistributionConfig) {
        self.options = options;
    }

    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    pub fn results(&self) -> &[AnalysisSeries] {
        &self.results
    }

    pub fn into_results(self) -> Vec<AnalysisSeries> {
        self.results
    }

    pub fn progress_handle(&self) -> ProgressHandle {
        self.progress.clone()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn check_preconditions(&self) -> Result<Arc<GeneSet>, PipelineError> {
        let gene_set = self
            .gene_set
            .clone()
            .ok_or_else(|| PipelineError::Precondition("no gene set loaded".to_string()))?;
        if self.motifs.is_empty() {
            return Err(PipelineError::Precondition("no motifs selected".to_string()));
        }
        if self.selection.selected_stages.is_empty() {
            return Err(PipelineError::Precondition("no stages selected".to_string()));
        }
        self.options
            .validate()
            .map_err(|e| PipelineError::Precondition(e.to_string()))?;
        Ok(gene_set)
    }

    ///
    /// Run all pairs to completion.
    ///
    /// Fails fast with [`PipelineError::Precondition`] without entering
    /// `Running` if configuration is incomplete. A pair whose stage
    /// subset resolves to zero genes is skipped with a progress tick
    /// and no result.
    ///
    pub async fn analyze(&mut self) -> Result<(), PipelineError> {
        let gene_set = self.check_preconditions()?;

        self.state = AnalyzerState::Running;
        self.results.clear();
        self.cancel.reset();

        let stages = self.selection.selected_stages.clone();
        let total = self.motifs.len() * stages.len();
        self.progress.start(total);

        let colors = gene_set.colors();
        let strokes = gene_set.strokes();

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_PAIRS));
        let mut tasks: JoinSet<(usize, Result<Option<AnalysisSeries>, PipelineError>)> =
            JoinSet::new();

        let mut indexed: Vec<(usize, AnalysisSeries)> = Vec::new();
        let mut first_error: Option<PipelineError> = None;

        let pairs = self
            .motifs
            .iter()
            .flat_map(|motif| stages.iter().map(move |stage| (motif.clone(), stage.clone())))
            .enumerate();

        for (index, (motif, stage)) in pairs {
            // harvest finished pairs so a failure stops dispatch early
            while let Some(joined) = tasks.try_join_next() {
                Self::collect(joined, &mut indexed, &mut first_error, &self.progress, &self.cancel);
            }
            if self.cancel.is_cancelled() {
                break;
            }

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(PipelineError::Task(e.to_string()));
                        self.cancel.cancel();
                    }
                    break;
                }
            };
            let gene_set = Arc::clone(&gene_set);
            let selection = self.selection.clone();
            let options = self.options.clone();
            let colors = colors.clone();
            let strokes = strokes.clone();

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let result = run_pair(gene_set, motif, stage, selection, options, colors, strokes);
                (index, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            Self::collect(joined, &mut indexed, &mut first_error, &self.progress, &self.cancel);
        }

        indexed.sort_by_key(|(index, _)| *index);
        self.results = indexed.into_iter().map(|(_, series)| series).collect();

        if let Some(err) = first_error {
            self.state = AnalyzerState::Failed;
            self.progress.reset();
            log::error!("analysis failed after {} completed series: {err}", self.results.len());
            return Err(err);
        }
        if self.cancel.is_cancelled() {
            self.state = AnalyzerState::Cancelled;
            self.progress.reset();
            log::info!("analysis cancelled after {} completed series", self.results.len());
            return Ok(());
        }

        self.state = AnalyzerState::Completed;
        log::info!("analysis completed with {} series", self.results.len());
        Ok(())
    }

    fn collect(
        joined: Result<(usize, Result<Option<AnalysisSeries>, PipelineError>), tokio::task::JoinError>,
        indexed: &mut Vec<(usize, AnalysisSeries)>,
        first_error: &mut Option<PipelineError>,
        progress: &ProgressHandle,
        cancel: &CancelHandle,
    ) {
        progress.tick();
        let failure = match joined {
            Ok((index, Ok(Some(series)))) => {
                indexed.push((index, series));
                return;
            }
            Ok((_, Ok(None))) => return,
            Ok((_, Err(e))) => e,
            Err(join_error) => PipelineError::Task(join_error.to_string()),
        };
        if first_error.is_none() {
            *first_error = Some(failure);
            cancel.cancel();
        }
    }
}

fn run_pair(
    gene_set: Arc<GeneSet>,
    motif: Motif,
    stage: String,
    selection: StageSelection,
    options: DistributionConfig,
    colors: HashMap<String, String>,
    strokes: HashMap<String, u32>,
) -> Result<Option<AnalysisSeries>, PipelineError> {
    let subset = select_stage(&gene_set, &stage, &selection)?;
    if subset.is_empty() {
        log::debug!("skipping `{stage} - {}`: empty gene subset", motif.name);
        return Ok(None);
    }

    let name = format!("{} - {}", stage_label(&stage), motif.name);
    let color = colors
        .get(&stage)
        .cloned()
        .unwrap_or_else(|| color_for(&name));
    let stroke = strokes.get(&stage).copied().unwrap_or(4);

    AnalysisSeries::run(
        Arc::new(subset),
        motif,
        stage,
        name,
        color,
        stroke,
        options,
        true,
    )
    .map(Some)
}
