use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::path::PathBuf;
use watermarker::{
    format_file_size, open_in_file_manager, BatchProcessor, Cli, Commands, ImageProcessor,
    WatermarkArgs,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Batch {
            input,
            output,
            open,
            watermark,
        } => process_batch(input, output, open, watermark)?,
        Commands::Apply {
            input,
            output,
            watermark,
        } => process_apply(input, output, watermark)?,
    }

    Ok(())
}

fn process_batch(
    input: PathBuf,
    output: PathBuf,
    open: bool,
    watermark: WatermarkArgs,
) -> anyhow::Result<()> {
    let config = watermark.into_config()?;
    let processor = BatchProcessor::new(config).context("Failed to prepare watermark")?;

    let pb = create_progress_bar();
    let report = processor
        .run(&input, &output, |current, total, filename| {
            pb.set_length(total as u64);
            pb.set_position(current as u64);
            pb.set_message(format!("Processing {} ({}/{})", filename, current, total));
        })
        .with_context(|| format!("Batch failed for {}", input.display()))?;

    pb.finish_with_message(format!(
        "Done: {} of {} images",
        report.processed, report.total
    ));

    for (file, reason) in &report.skipped {
        println!("Skipped {}: {}", file, reason);
    }

    println!(
        "Batch processing complete. Watermarked {} images to: {}",
        report.processed,
        output.display()
    );

    if open {
        open_in_file_manager(&output)?;
    }

    Ok(())
}

fn process_apply(input: PathBuf, output: PathBuf, watermark: WatermarkArgs) -> anyhow::Result<()> {
    let config = watermark.into_config()?;
    let processor = ImageProcessor::new(config).context("Failed to prepare watermark")?;

    processor
        .process(&input, &output)
        .with_context(|| format!("Failed to watermark {}", input.display()))?;

    let size = std::fs::metadata(&output)?.len();
    println!(
        "Watermarked image saved to: {} ({})",
        output.display(),
        format_file_size(size)
    );

    Ok(())
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
