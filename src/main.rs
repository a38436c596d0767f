use clap::Parser;
use console::style;
use objkopy::config::{Cli, LogFormat};
use objkopy::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;
    setup_logging(&config)?;

    let sections = objkopy::commands::demo::run(&config)?;

    println!("{}", style(format!("objkopy v{}", objkopy::VERSION)).bold());
    for section in sections {
        println!();
        println!("{}", style(&section.title).cyan().bold());
        println!("{}", section.body);
    }

    Ok(())
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    Ok(())
}
