use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use facemill::init_logging;
use facemill_core::{MachineSettings, Parameters, ProgramGenerator, ProgramWriter};
use facemill_settings::FacemillConfig;

#[derive(Parser, Debug)]
#[command(
    name = "facemill",
    version,
    about = "Generate face-milling G-code programs (rectangular spiral strategy)"
)]
struct Cli {
    /// Configuration file (.json or .toml); created with defaults when absent
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Read a complete parameter set from a JSON file instead of the
    /// configured defaults (run flags below are ignored)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Enable a coolant option from the catalog; repeat for several, the
    /// order given is the emission order
    #[arg(long = "coolant", value_name = "NAME")]
    coolant: Vec<String>,

    /// Skip roughing and run a single finishing pass to the final height
    #[arg(long)]
    only_finish: bool,

    /// Output program name (any extension is stripped)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the program to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let config = FacemillConfig::load_or_create(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    let parameters: Parameters = match &cli.params {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading parameter file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing parameter file {}", path.display()))?
        }
        None => config.build_parameters(cli.only_finish, &cli.coolant)?,
    };

    let program = ProgramGenerator::new()
        .generate_program(&parameters)
        .context("generating program")?;

    if cli.stdout {
        print!("{program}");
        return Ok(());
    }

    let name = cli
        .output
        .clone()
        .unwrap_or_else(|| output_name(&parameters.machine));
    let writer = ProgramWriter::new(&parameters.machine.output_path);
    let path = writer
        .save_program(&program, &name)
        .context("writing program")?;

    println!("Program written to {}", path.display());
    Ok(())
}

/// Default output name from the machine settings, with an optional
/// timestamp suffix so successive runs do not overwrite each other.
fn output_name(machine: &MachineSettings) -> String {
    if machine.append_timestamp {
        format!(
            "{}_{}",
            machine.program_name,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )
    } else {
        machine.program_name.clone()
    }
}
