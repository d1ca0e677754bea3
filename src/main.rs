use clap::Parser;
use docsearch::cli::{Cli, run};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    docsearch::tracing::init(cli.log_level());
    tracing::debug!("Running {:?}", cli.command);

    let output = run(&cli).inspect_err(|e| {
        tracing::error!("docsearch failed: {:#}", e);
    })?;
    print!("{}", output.text);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
