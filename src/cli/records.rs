use std::sync::Arc;

use anyhow::{bail, Result};
use console::style;

use pagedex_core::{ExtractorConfig, OutputFormat, PagePipeline, PageTree, PipelineConfig};

use super::{FormatArg, RecordsArgs};

pub async fn run(args: RecordsArgs) -> Result<()> {
    if !args.input.is_dir() {
        bail!("input directory not found: {}", args.input.display());
    }

    let config = PipelineConfig {
        extractor: args.extractor.into(),
        ner: ExtractorConfig {
            endpoint: args.endpoint,
            timeout_secs: args.timeout,
        },
        output: match args.format {
            FormatArg::Records => OutputFormat::Records,
            FormatArg::Bulk => OutputFormat::Bulk {
                path: args.bulk_file,
                index: args.index,
            },
        },
        jobs: args.jobs,
        strict_spans: args.strict_spans,
        date_rules: args.date_rules,
    };

    tracing::debug!(?config, input = %args.input.display(), "building records");

    let tree = PageTree::discover(&args.input)?;
    if tree.is_empty() {
        eprintln!(
            "{} No page files found under {}",
            style("!").yellow(),
            args.input.display()
        );
    }

    let pipeline = Arc::new(PagePipeline::from_config(&config, &args.output).await?);
    let result = pipeline.run(&tree).await?;

    for (path, error) in &result.failed {
        eprintln!("{} {}: {error}", style("✗").red(), path.display());
    }

    let stats = &result.stats;
    eprintln!(
        "{} {} pages, {} dates, {} entities ({} failed) in {}ms",
        style("✓").green(),
        stats.pages_processed,
        stats.dates,
        stats.entities,
        stats.pages_failed,
        stats.duration_ms
    );

    if stats.pages_failed > 0 {
        bail!("{} page(s) failed", stats.pages_failed);
    }

    Ok(())
}
