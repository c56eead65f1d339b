use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = csvplot_app::cli::Cli::parse();
    csvplot_app::platform::run_app(cli)
}
