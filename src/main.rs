use clap::Parser;
use gbdatasets::{
    Cli, ExtractError, GbDatasets, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::path::Path;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let archive = match cli.archive.as_deref() {
        Some(archive) => archive,
        None => {
            eprintln!("error: a GenBank archive path is required");
            return 2;
        }
    };

    // Create pipeline instance
    let gbdatasets = match GbDatasets::from_cli(&cli) {
        Ok(gbdatasets) => gbdatasets,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    // Handle dry run mode
    if cli.dry_run {
        return handle_dry_run(&cli, archive, &gbdatasets);
    }

    // Execute main extraction workflow
    match gbdatasets.extract_datasets(archive, cli.approach) {
        Ok(reports) => {
            gbdatasets.output_formatter().print_run_reports(&reports);

            if reports.iter().any(|r| r.scan.malformed > 0) {
                2 // Success with skipped malformed entries
            } else {
                0 // Success
            }
        }
        Err(e) => {
            gbdatasets.handle_error(&e);

            // Map error types to appropriate exit codes
            match e {
                ExtractError::Config { .. } => 2,
                ExtractError::InvalidPath { .. } => 3,
                ExtractError::ArchiveOpen { .. } => 4,
                ExtractError::ArchiveParse { .. } => 5,
                ExtractError::DatasetWrite { .. } => 6,
                ExtractError::Cache { .. } => 7,
                _ => 1, // General error
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "gbdatasets.toml".to_string());

    match GbDatasets::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  gbdatasets <archive.gb> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, archive: &Path, gbdatasets: &GbDatasets) -> i32 {
    let formatter = gbdatasets.output_formatter();

    formatter.info("DRY RUN MODE - No datasets will be written");
    formatter.print_separator();

    if archive.is_file() {
        formatter.success(&format!("Archive found: {}", archive.display()));
    } else {
        formatter.error(&format!("Archive not found: {}", archive.display()));
        return 1;
    }

    // Display configuration that would be used
    formatter.info("Configuration that would be used:");
    let config = gbdatasets.config();

    println!(
        "  Output directory: {}",
        config.output.base_directory.display()
    );
    println!("  Progress cache:   {}", config.cache.path.display());

    formatter.info("Extraction plan:");
    for approach in cli.approach.expand() {
        let params = match approach {
            gbdatasets::Approach::Sites => &config.extraction.sites,
            gbdatasets::Approach::Rebuild => &config.extraction.rebuild,
            gbdatasets::Approach::SlidingWindow => &config.extraction.sliding_window,
            gbdatasets::Approach::Protein => &config.extraction.protein,
            gbdatasets::Approach::All => continue,
        };
        println!(
            "  {} -> {} (max length {}, flanks {}/{})",
            approach.file_stem(),
            config.dataset_path(approach.file_stem()).display(),
            params.sequence_max_length,
            params.flank_small,
            params.flank_default
        );
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform actual extraction");

    0
}

fn print_startup_error(error: &ExtractError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
