mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    css_vars, init, render, validate, CssVarsArgs, InitArgs, RenderArgs, ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Mailcraft CLI - email templates to email-safe HTML
#[derive(Parser, Debug)]
#[command(name = "mailcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter template and config
    Init(InitArgs),

    /// Render a template to HTML
    Render(RenderArgs),

    /// Check a template's structure, uids and variables
    Validate(ValidateArgs),

    /// Print the CSS custom properties of a template's global styles
    CssVars(CssVarsArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Render(args) => render(args, &cwd).await,
            Command::Validate(args) => validate(args, &cwd),
            Command::CssVars(args) => css_vars(args, &cwd),
        },
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
