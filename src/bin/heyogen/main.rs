//! CLI tool to generate a project from a parsed prompt JSON file.
//!
//! Usage:
//!   heyogen --input prompt.json [--output project.json] [--document project.automerge]
//!           [--config heyogen.toml] [--report] [--stats]

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use heyogen::{ComponentGenerator, GeneratorConfig, ParsedPrompt, ProjectDocument};

#[derive(Parser, Debug)]
#[command(
    name = "heyogen",
    about = "Generate story, dialogue, shot and music plans from a parsed prompt",
    version
)]
struct Args {
    /// Input JSON file path (parsed prompt)
    #[arg(short, long, env = "HEYOGEN_INPUT")]
    input: PathBuf,

    /// Output JSON path (defaults to the input path with a .project.json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the project as an Automerge document to this path
    #[arg(short, long)]
    document: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "HEYOGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Print the coherence report
    #[arg(long, default_value = "false")]
    report: bool,

    /// Print statistics about the generated project
    #[arg(long, default_value = "false")]
    stats: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let input_path = &args.input;
    if !input_path.exists() {
        anyhow::bail!("Input file does not exist: {}", input_path.display());
    }

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path).context("Failed to load config")?,
        None => GeneratorConfig::default(),
    };

    let json_content =
        std::fs::read_to_string(input_path).context("Failed to read input file")?;
    let prompt: ParsedPrompt =
        serde_json::from_str(&json_content).context("Failed to parse prompt JSON")?;

    let components = ComponentGenerator::with_config(config)
        .generate(&prompt)
        .context("Failed to generate project")?;

    let output_path = args.output.unwrap_or_else(|| {
        let mut path = input_path.clone();
        path.set_extension("project.json");
        path
    });
    let output =
        serde_json::to_string_pretty(&components).context("Failed to serialize project")?;
    std::fs::write(&output_path, &output).context("Failed to write output file")?;

    let document_size = match &args.document {
        Some(path) => {
            let mut doc = ProjectDocument::from_components(&components)
                .context("Failed to build Automerge document")?;
            let binary = doc.save();
            std::fs::write(path, &binary).context("Failed to write document file")?;
            Some((path, binary.len()))
        }
        None => None,
    };

    if args.report {
        report::print_coherence(&components.coherence);
    }

    if args.stats {
        report::print_stats(&components, output.len(), document_size.map(|(_, size)| size));
    }

    println!();
    println!(
        "Successfully generated {} → {}",
        input_path.display(),
        output_path.display()
    );
    if let Some((path, _)) = document_size {
        println!("Automerge document → {}", path.display());
    }
    if !components.coherence.is_coherent {
        println!(
            "Warning: {} unresolved coherence issue(s), run with --report for details",
            components.coherence.total_issues
        );
    }

    Ok(())
}
