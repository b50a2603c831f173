use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rps_ecology_core::{SimConfig, World};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rps-ecology")]
#[command(about = "Rock/Paper/Scissors ecology simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and report the population time series
    Run {
        /// Path to config file (JSON); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of ticks to run
        #[arg(long, default_value_t = 10_000)]
        steps: usize,

        /// Sample the population counts every N ticks
        #[arg(long, default_value_t = 100)]
        sample_every: usize,

        /// Output directory for the run summary (optional)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let file = File::open(path).with_context(|| format!("failed to open config file {path:?}"))?;
    let reader = BufReader::new(file);
    let config: SimConfig = serde_json::from_reader(reader).context("failed to parse config")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            config,
            steps,
            sample_every,
            out,
        } => {
            let sim_config = load_config(config.as_ref())?;
            sim_config.validate().context("config validation error")?;

            let mut world = World::new(sim_config).context("failed to initialize world")?;
            println!("Simulating for {steps} ticks...");

            let summary = world
                .try_run(steps, sample_every)
                .context("failed to run simulation")?;

            for sample in &summary.samples {
                let c = sample.counts;
                println!(
                    "tick {:>8}: rock={:<6} paper={:<6} scissors={:<6} total={}",
                    sample.tick,
                    c.rock,
                    c.paper,
                    c.scissors,
                    c.total()
                );
            }
            match summary.extinct_at {
                Some(tick) => println!("Population extinct at tick {tick}."),
                None => {
                    let c = summary.final_counts;
                    println!(
                        "Run complete after {} ticks. Final: rock={} paper={} scissors={} (births={}, deaths={})",
                        summary.steps_run,
                        c.rock,
                        c.paper,
                        c.scissors,
                        summary.total_births,
                        summary.total_deaths
                    );
                }
            }

            if let Some(out_dir) = out {
                std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
                let summary_path = out_dir.join("summary.json");
                let file = File::create(&summary_path).context("failed to create summary file")?;
                serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
                println!("Results saved to {:?}", out_dir);
            }
        }
    }
    Ok(())
}
