use anyhow::Result;
use clap::Parser;

use ct_cli::cli::commands::{configure, line, serve};
use ct_cli::cli::{Args, Command};
use ct_cli::config::ResolveOptions;
use ct_cli::output::{self, OutputConfig};
use ct_cli::translation::print_languages;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        verbose: args.verbose,
        no_color: args.no_color || std::env::var("NO_COLOR").is_ok(),
    });

    let resolve = ResolveOptions {
        provider: args.provider,
        from: args.from,
        to: args.to,
    };

    match args.command {
        Command::Line { text, no_cache } => {
            line::run_line(line::LineOptions {
                text,
                resolve,
                config: args.config,
                no_cache,
            })
            .await?;
        }
        Command::File {
            file,
            line,
            write,
            no_cache,
        } => {
            line::run_file(line::FileOptions {
                file,
                line,
                write,
                resolve,
                config: args.config,
                no_cache,
            })
            .await?;
        }
        Command::Serve => {
            serve::run_serve(serve::ServeOptions {
                resolve,
                config: args.config,
            })
            .await?;
        }
        Command::Configure { show } => {
            if show {
                configure::show_config(args.config.as_deref(), &resolve)?;
            } else {
                configure::run_configure(args.config.as_deref())?;
            }
        }
        Command::Languages => {
            print_languages();
        }
    }

    Ok(())
}
