use super::args::{Cli, Commands};
use super::handlers;
use crate::context::ExecutionContext;
use crate::logging;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let ctx = ExecutionContext::new(cli.config, cli.format);

    match cli.command {
        Commands::Dump { apkg, output_dir } => handlers::dump::handle(&ctx, &apkg, output_dir),

        Commands::Build {
            text,
            output,
            deck_name,
            media,
            no_verify,
        } => handlers::build::handle(
            &ctx,
            &text,
            handlers::build::BuildOptions {
                output,
                deck_name,
                media,
                no_verify,
            },
        ),

        Commands::Verify {
            text,
            apkg,
            verbose,
        } => handlers::verify::handle(&ctx, &text, &apkg, verbose),

        Commands::Migrate { text, apkg } => handlers::migrate::handle(&ctx, &text, &apkg),

        Commands::Inspect { apkg, limit } => handlers::inspect::handle(&ctx, &apkg, limit),
    }
}
