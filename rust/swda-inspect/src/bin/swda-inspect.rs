use anyhow::Result;
use clap::Parser;
use swda_inspect::{InspectCli, run};
use tracing_subscriber::EnvFilter;

pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("swda_corpus=info,swda_inspect=info")
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = InspectCli::parse();
    run(cli, &mut std::io::stdout().lock())
}
