use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::core::coordinator::{Outcome, RunCoordinator, RunManifest, RunReport, Step};
use crate::core::corpus::CorpusReader;
use crate::core::state::{OutputLayout, PackSettings};
use crate::core::version;

#[derive(Parser, Debug)]
#[command(
    name = "renovation-pack",
    version,
    about = "Backport current Chinese translations to legacy Minecraft versions"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute per-version language files from the corpus.
    Map(TargetArgs),
    /// Build resource packs from mapped language files. Buckets left out of
    /// a partial run keep their entry in output/manifest.json.
    Pack(TargetArgs),
    /// Map, then pack.
    All(TargetArgs),
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Only process the buckets containing these versions (e.g. 1.12.2).
    #[arg(value_name = "VERSION")]
    versions: Vec<String>,
}

pub async fn execute(cli: Cli) -> Result<ExitCode> {
    let (step, args) = match cli.command {
        Command::Map(args) => (Step::Map, args),
        Command::Pack(args) => (Step::Pack, args),
        Command::All(args) => (Step::All, args),
    };

    let work_dir = std::env::current_dir().context("cannot determine working directory")?;
    let mut settings = PackSettings::load(&work_dir)?;
    if !args.versions.is_empty() {
        settings.versions = args.versions;
    }

    let buckets = version::select(&settings.versions)?;
    info!(
        "Corpus: {:?}, output: {:?}",
        settings.corpus_dir, settings.output_dir
    );

    let coordinator = RunCoordinator::new(
        CorpusReader::new(settings.corpus_dir.clone()),
        OutputLayout::new(settings.output_dir.clone()),
    )
    .with_concurrency(settings.concurrency)
    .with_key_aliases(settings.key_aliases);

    let report = coordinator.run(&buckets, step).await?;

    if step != Step::Map {
        let layout = coordinator.layout();
        RunManifest::from_report(&report, layout)
            .merge_previous(RunManifest::load(layout).await)
            .write(layout)
            .await
            .context("cannot write run manifest")?;
        info!("Wrote {:?}", layout.manifest_path());
    }

    print_summary(&report);

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_summary(report: &RunReport) {
    println!("\n--- {:?} Summary ---", report.step);
    if let Some(version) = &report.source_version {
        println!("Source version: {}", version);
    }

    for (bucket, outcome) in &report.outcomes {
        match outcome {
            Outcome::Success(artifact) => {
                println!("\nVersion {}: {}", bucket.id, artifact.path.display());
                for (language, stats) in &artifact.stats {
                    println!(
                        "    - {}: {} strings updated, {} kept, {} dropped",
                        language.file_stem(bucket.lang_case),
                        stats.overridden + stats.aliased,
                        stats.fallback + stats.unchanged,
                        stats.dropped
                    );
                }
            }
            Outcome::Failed(errors) => {
                println!("\nVersion {}: FAILED", bucket.id);
                for e in errors {
                    match e.language() {
                        Some(language) => println!("    ! {}: {}", language, e),
                        None => println!("    ! {}", e),
                    }
                }
            }
        }
    }
}
