extern crate env_logger;
#[macro_use]
extern crate log;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

mod cli;
mod group;
mod lca;
mod merge;
mod record;
mod summary;

use cli::Cli;

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    println!("taxmerge v{}", cli::VERSION);

    let opts = merge::MergeOpts {
        strict_groups: cli.strict_groups,
    };

    let stats = merge::merge(Path::new(&cli.directory), &opts)?;
    summary::report(&stats)?;

    info!("Completed successfully.");
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
