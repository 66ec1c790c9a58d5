use clap::Parser;
use tally::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse().with_ci_env(|key| std::env::var_os(key));

    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(tally::execute(&cli, &mut std::io::stdout().lock()))?;
    std::process::exit(code);
}
