use anyhow::Result;

use crate::args::{Cli, Commands, TemplatesCommand};
use crate::config::Config;
use crate::handlers;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze(args) => handlers::analyze::handle(&config, args),

        Commands::Templates { command } => match command {
            TemplatesCommand::List { template_file } => {
                handlers::templates::list(&config, template_file)
            }
            TemplatesCommand::Validate { template_file } => {
                handlers::templates::validate(&template_file)
            }
            TemplatesCommand::Diagram {
                template_file,
                output,
            } => handlers::templates::diagram(&config, template_file, output),
        },
    }
}
