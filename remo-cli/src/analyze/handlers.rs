use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use remo_core::models::{Organism, RankMode, RankStrategy, StageSelection};
use remo_core::registry::OrganismRegistry;
use remo_export::{BucketRow, GeneTable, SeriesView, bucket_table};
use remo_motif::{Motif, MotifRegistry};
use remo_pipeline::{Analyzer, FsSource, GeneSetCache, load_for_organism};
use remo_scan::DistributionConfig;

#[derive(Serialize)]
struct AnalyzeOutput {
    results: Vec<SeriesView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gene_tables: Option<Vec<GeneTable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket_tables: Option<Vec<Vec<BucketRow>>>,
}

pub fn run_analyze(matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .expect("A sequence file is required.");

    let motifs = resolve_motifs(matches)?;
    let selection = resolve_selection(matches)?;
    let options = resolve_options(matches)?;
    let organism = resolve_organism(matches)?;

    let path = Path::new(file);
    let data_dir = path.parent().unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("not a file path: {file}"))?;

    let runtime = tokio::runtime::Runtime::new()?;
    let results = runtime.block_on(async {
        let cache = GeneSetCache::new(Arc::new(FsSource::new(data_dir)));
        let gene_set = load_for_organism(&cache, &file_name, organism).await?;

        for error in &gene_set.parse_errors {
            log::warn!("parse error: {error}");
        }

        let mut analyzer = Analyzer::new();
        analyzer.set_gene_set(gene_set);
        analyzer.set_motifs(motifs);
        analyzer.set_selection(selection);
        analyzer.set_options(options);

        let bar = ProgressBar::new(100).with_style(
            ProgressStyle::with_template("{bar:40} {percent}% {msg}")
                .expect("valid progress template"),
        );
        let progress = analyzer.progress_handle();
        let poll_bar = bar.clone();
        let poller = tokio::spawn(async move {
            loop {
                if let Some(fraction) = progress.fraction() {
                    poll_bar.set_position((fraction * 100.0) as u64);
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        });

        let outcome = analyzer.analyze().await;
        poller.abort();
        bar.finish_and_clear();
        outcome?;

        anyhow::Ok(analyzer.into_results())
    })?;

    let output = AnalyzeOutput {
        gene_tables: matches
            .get_flag("tables")
            .then(|| results.iter().map(GeneTable::from_series).collect()),
        bucket_tables: matches
            .get_flag("tables")
            .then(|| results.iter().map(|s| bucket_table(&s.distribution)).collect()),
        results: results.iter().map(SeriesView::from_series).collect(),
    };

    match matches.get_one::<String>("output") {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("cannot create output file {path}"))?;
            serde_json::to_writer_pretty(file, &output)?;
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &output)?;
            println!();
        }
    }

    Ok(())
}

fn resolve_motifs(matches: &ArgMatches) -> Result<Vec<Motif>> {
    let registry = MotifRegistry::builtin();
    let mut motifs = Vec::new();

    if let Some(names) = matches.get_many::<String>("motif") {
        for name in names {
            let motif = registry
                .get(name)
                .with_context(|| format!("unknown motif preset `{name}`"))?;
            motifs.push(motif.clone());
        }
    }

    if let Some(definitions) = matches.get_many::<String>("definition") {
        for definition in definitions {
            let definition = definition.to_uppercase();
            remo_motif::validate(&[definition.as_str()])?;
            let mut motif = Motif::new(definition.clone(), vec![definition]);
            motif.is_custom = true;
            motifs.push(motif);
        }
    }

    if motifs.is_empty() {
        bail!("no motifs selected: pass --motif and/or --definition");
    }
    Ok(motifs)
}

fn resolve_selection(matches: &ArgMatches) -> Result<StageSelection> {
    let Some(stages) = matches.get_many::<String>("stage") else {
        bail!("no stages selected: pass --stage at least once");
    };

    let mut selection = StageSelection {
        selected_stages: stages.cloned().collect(),
        ..Default::default()
    };

    if let Some(strategy) = matches.get_one::<String>("strategy") {
        selection.strategy = match strategy.as_str() {
            "bottom" => RankStrategy::Bottom,
            _ => RankStrategy::Top,
        };
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        selection.mode = match mode.as_str() {
            "count" => RankMode::FixedCount,
            _ => RankMode::Percentile,
        };
    }
    if let Some(percentile) = matches.get_one::<String>("percentile") {
        selection.percentile = percentile
            .parse()
            .with_context(|| format!("bad percentile `{percentile}`"))?;
        if !(selection.percentile > 0.0 && selection.percentile <= 1.0) {
            bail!("percentile must be in (0, 1], got {}", selection.percentile);
        }
    }
    if let Some(count) = matches.get_one::<String>("count") {
        selection.count = count.parse().with_context(|| format!("bad count `{count}`"))?;
    }

    Ok(selection)
}

fn resolve_options(matches: &ArgMatches) -> Result<DistributionConfig> {
    let mut options = DistributionConfig::default();

    if let Some(min) = matches.get_one::<String>("min") {
        options.min = min.parse().with_context(|| format!("bad min `{min}`"))?;
    }
    if let Some(max) = matches.get_one::<String>("max") {
        options.max = max.parse().with_context(|| format!("bad max `{max}`"))?;
    }
    if let Some(size) = matches.get_one::<String>("bucket-size") {
        options.bucket_size = size
            .parse()
            .with_context(|| format!("bad bucket size `{size}`"))?;
    }
    options.align_marker = matches.get_one::<String>("align-marker").cloned();

    Ok(options)
}

fn resolve_organism(matches: &ArgMatches) -> Result<Option<Organism>> {
    let Some(name) = matches.get_one::<String>("organism") else {
        return Ok(None);
    };
    let Some(presets_path) = matches.get_one::<String>("organisms") else {
        bail!("--organism requires --organisms <path> with the preset catalog");
    };

    let json = std::fs::read_to_string(presets_path)
        .with_context(|| format!("cannot read organism presets from {presets_path}"))?;
    let registry = OrganismRegistry::from_json(&json)?;
    let organism = registry
        .get(name)
        .with_context(|| format!("unknown organism `{name}`"))?;
    Ok(Some(organism.clone()))
}
