mod bootstrap;
mod cli;
mod commands;
mod paths;
mod run;
mod state;

use anyhow::Result;
use cli::Command;
use commands::Clock;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();
    let clock = Clock::new(cli.now);

    match cli.command {
        Some(Command::Theme { action }) => commands::theme(action.unwrap_or_default(), clock),
        Some(Command::Lang { action }) => commands::lang(action.unwrap_or_default()),
        Some(Command::Events { action }) => commands::events(action, clock),
        Some(Command::Countdown(args)) => commands::countdown(args, clock),
        Some(Command::Join { name, email }) => commands::join(name, email),
        Some(Command::Newsletter { email }) => commands::newsletter(email),
        Some(Command::Where) => commands::show_paths(clock),
        None => run::run(cli.run, clock),
    }
}
