use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use taglex_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let rust_log = std::env::var("RUST_LOG").ok();

    // Initialize logging before the config is read; the configured level is
    // swapped in once it is known.
    let initial = cli.filter_directives("info", rust_log.as_deref());
    let (filter, filter_handle) = reload::Layer::new(EnvFilter::new(initial));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::load(cli.config.as_deref(), cli.db_path.clone(), cli.strict_case).await?;
    let directives = cli.filter_directives(&config.logging.level, rust_log.as_deref());
    filter_handle.reload(EnvFilter::new(&directives))?;

    debug!(
        path = %config.storage.path.display(),
        strict = config.tagging.strict_case_match,
        %directives,
        "Configuration loaded"
    );

    let resolver = commands::open(&config)?;

    let lines = match cli.command {
        Commands::Resolve { tenant, names } => {
            commands::resolve::execute(&resolver, tenant, &names).await?
        }
        Commands::Search { tenant, text } => commands::search::execute(&resolver, tenant, &text).await?,
        Commands::Top {
            tenant,
            least,
            limit,
        } => commands::top::execute(&resolver, tenant, least, limit).await?,
        Commands::Context { tenant, context } => {
            commands::context::execute(&resolver, tenant, &context).await?
        }
        Commands::Delete { tenant, id } => commands::delete::execute(&resolver, tenant, id).await?,
    };

    for line in lines {
        println!("{}", line);
    }

    Ok(())
}
