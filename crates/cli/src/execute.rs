use crate::Cli;
use buildenv_config::{load_variables, OutputMode, RunConfig, RuntimeOptions, Settings};
use buildenv_core::{Error, Result};
use buildenv_env::EnvReader;
use buildenv_shell::{write_encoded, ExecSink, ExportPrinter};
use buildenv_vault::VaultClient;
use std::sync::Arc;

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        RuntimeOptions {
            variables_file: cli.variables_file,
            environment: cli.environment,
            datacenter: cli.datacenter,
            comments: cli.comments,
            skip_vault: cli.skip_vault,
            mlock: cli.mlock,
            base64_json: cli.base64_json,
            run: cli.run,
        }
    }
}

/// Resolve and emit variables; returns the process exit code
pub async fn execute(cli: Cli) -> Result<i32> {
    let settings = Settings::discover(cli.config.as_deref())?;
    let config = RunConfig::resolve(cli.into(), settings)?;

    if config.mlock {
        buildenv_utils::lock_all()?;
    }

    let variables = load_variables(&config.variables_file)?;
    if !config.environment.is_empty() && variables.environment(&config.environment).is_none() {
        tracing::warn!(
            environment = %config.environment,
            file = %config.variables_file.display(),
            "Environment is not declared in the variables file"
        );
    }

    let reader = if config.skip_vault {
        EnvReader::literals_only()
    } else {
        let client = VaultClient::from_env().map_err(|e| Error::configuration(e.to_string()))?;
        EnvReader::new(Arc::new(client))
    };

    let outputs = reader
        .resolve(&variables, &config.environment, &config.datacenter)
        .await?;

    match config.output {
        OutputMode::Export => {
            let stdout = std::io::stdout();
            ExportPrinter::new(config.comments).write(&outputs, &mut stdout.lock())?;
            Ok(0)
        }
        OutputMode::Base64Json => {
            let stdout = std::io::stdout();
            write_encoded(&outputs, &mut stdout.lock())?;
            Ok(0)
        }
        OutputMode::Exec(command) => Ok(ExecSink::from_env().run(&command, &outputs)),
    }
}
