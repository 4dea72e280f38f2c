use clap::Parser;

mod app;
mod cli;
mod picking;
mod platform;
mod search;
mod ui;

fn main() -> Result<(), app::AppError> {
    cli::Cli::parse().run()
}
