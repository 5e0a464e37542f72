use clap::Parser;
use page_actions::cli::commands::{cmd_analyze, cmd_exec, cmd_prefs, cmd_show};
use page_actions::cli::config::{Cli, Commands, load_config};
use page_actions::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());
    let executor_endpoint = cli.executor_endpoint.as_deref();

    match &cli.command {
        Commands::Show {
            actions,
            actions_file,
            format,
        } => {
            cmd_show(
                &config,
                actions.as_deref(),
                actions_file.as_deref(),
                format,
                executor_endpoint,
            )?;
        }
        Commands::Exec {
            actions,
            actions_file,
            element,
            value,
            fields,
            toggle,
            format,
        } => {
            let succeeded = cmd_exec(
                &config,
                actions.as_deref(),
                actions_file.as_deref(),
                element,
                value.as_deref(),
                fields,
                *toggle,
                format,
                executor_endpoint,
            )
            .await?;
            if !succeeded {
                std::process::exit(1);
            }
        }
        Commands::Analyze { url } => {
            cmd_analyze(&config, url).await?;
        }
        Commands::Prefs { command } => {
            cmd_prefs(&config, command)?;
        }
    }

    Ok(())
}
