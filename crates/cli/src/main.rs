use buildenv_core::{DATACENTER_VAR, ENVIRONMENT_VAR, VARIABLES_FILE_VAR};
use clap::Parser;
use std::path::PathBuf;

mod execute;

#[derive(Parser, Debug)]
#[command(name = "buildenv")]
#[command(about = "Resolve build environment variables from a YAML file and Vault", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Environment to resolve on top of the global scope
    #[arg(short, long, env = ENVIRONMENT_VAR)]
    pub environment: Option<String>,

    /// Datacenter within the environment
    #[arg(short, long, env = DATACENTER_VAR)]
    pub datacenter: Option<String>,

    /// Variables file [default: variables.yml]
    #[arg(short = 'f', long, env = VARIABLES_FILE_VAR, value_name = "FILE")]
    pub variables_file: Option<PathBuf>,

    /// Print scope and source comments
    #[arg(short, long)]
    pub comments: bool,

    /// Resolve literal variables only; never contact Vault
    #[arg(short, long)]
    pub skip_vault: bool,

    /// Print the variables as one base64-encoded JSON object
    #[arg(short, long, conflicts_with = "run")]
    pub base64_json: bool,

    /// Run a shell command with the variables set and exit with its code
    #[arg(short, long, value_name = "CMD")]
    pub run: Option<String>,

    /// Lock process memory so secrets are never swapped to disk
    #[arg(short, long)]
    pub mlock: bool,

    /// Settings file [default: ~/.buildenv.yaml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = buildenv_utils::tracing::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let code = match execute::execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}
