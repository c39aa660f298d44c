use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typegen::cli::CommandLineInterface;

fn main() {
    let command_line_interface = CommandLineInterface::load();

    let default_filter = if command_line_interface.verbose() { "typegen=debug" } else { "typegen=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(error) = command_line_interface.run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
