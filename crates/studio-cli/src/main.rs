use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use studio_agents::{MockCritic, MockEditor, MockProducer, MockQAVerifier, MockScriptWriter, MockVideoGenerator};
use studio_observability::{init_process_logging, ProcessKind};
use studio_orchestrator::{Orchestrator, PilotRunner};
use studio_wire::{export, ExportFormat};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "studio")]
#[command(about = "Budget-governed multi-agent video production engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full competitive pilot pipeline for a concept and print the result.
    Produce {
        /// The user's video concept, e.g. "a 60 second explainer about bees".
        concept: String,
        /// Total dollar budget for the entire run, split across competing pilots.
        #[arg(long, default_value_t = 50.0)]
        budget: f64,
        /// Max pilots tested and critiqued concurrently.
        #[arg(long, default_value_t = 3)]
        max_concurrent_pilots: usize,
        /// Video variations generated per scene.
        #[arg(long, default_value_t = 2)]
        num_variations: u32,
        /// Export the winning candidate's EDL in this format instead of the JSON summary.
        #[arg(long)]
        export: Option<ExportFormatArg>,
        /// Directory for rotated JSONL logs.
        #[arg(long, default_value = ".studio/logs")]
        logs_dir: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ExportFormatArg {
    Json,
    Fcpxml,
    Cmx3600,
    Davinci,
    Premiere,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(value: ExportFormatArg) -> Self {
        match value {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Fcpxml => ExportFormat::Fcpxml,
            ExportFormatArg::Cmx3600 => ExportFormat::EdlCmx3600,
            ExportFormatArg::Davinci => ExportFormat::Davinci,
            ExportFormatArg::Premiere => ExportFormat::Premiere,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Produce {
            concept,
            budget,
            max_concurrent_pilots,
            num_variations,
            export: export_format,
            logs_dir,
        } => {
            let (_guard, log_info) = init_process_logging(ProcessKind::Cli, &logs_dir, 14)?;
            info!(logs_dir = %log_info.logs_dir, "studio-cli starting production run");

            let pilot_runner = Arc::new(
                PilotRunner::new(Arc::new(MockScriptWriter::new()), Arc::new(MockVideoGenerator::new()), Arc::new(MockQAVerifier::new()))
                    .with_num_variations(num_variations),
            );
            let orchestrator = Orchestrator::new(Arc::new(MockProducer::new()), pilot_runner, Arc::new(MockCritic::new()), Arc::new(MockEditor::new()))
                .with_max_concurrent_pilots(max_concurrent_pilots);

            let result = orchestrator.run(&concept, budget).await?;

            match export_format {
                Some(format) => {
                    let Some(winner) = &result.best_pilot else {
                        println!("{}", serde_json::to_string_pretty(&result.status)?);
                        return Ok(());
                    };
                    let Some(candidate) = result.edit_candidates.iter().find(|c| c.style == "balanced").or_else(|| result.edit_candidates.first()) else {
                        println!("pilot {} won but produced no edit candidates", winner.pilot_id);
                        return Ok(());
                    };
                    println!("{}", export(candidate, format.into()));
                }
                None => {
                    print_summary(&result);
                }
            }
        }
    }

    Ok(())
}

fn print_summary(result: &studio_orchestrator::ProductionResult) {
    println!("status: {}", result.status);
    println!("budget used: {:.2} / remaining: {:.2}", result.budget_used, result.budget_used + result.budget_remaining);
    println!("scenes generated: {}", result.total_scenes);
    println!("pilots evaluated: {}", result.all_pilots.len());

    for pilot in &result.all_pilots {
        println!(
            "  pilot {}: approved={} critic_score={:.1} avg_qa={:.1} cost={:.2}",
            pilot.pilot_id, pilot.approved, pilot.critic_score, pilot.avg_qa_score, pilot.total_cost
        );
    }

    if let Some(winner) = &result.best_pilot {
        println!("winner: {} ({} edit candidates)", winner.pilot_id, result.edit_candidates.len());
        for candidate in &result.edit_candidates {
            println!("  candidate {}: {} ({:.1}s, quality {:.1})", candidate.candidate_id, candidate.style, candidate.total_duration, candidate.estimated_quality);
        }
    } else {
        println!("no pilot was approved");
    }
}
