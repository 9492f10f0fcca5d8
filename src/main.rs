use clap::Parser;
use miette::Result;
use turnplan::cli::Cli;

fn main() -> Result<()> {
    // Install miette's fancy error handler for source-annotated diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    turnplan::cli::init_logging(cli.global.verbose)?;
    turnplan::cli::run(cli)
}
