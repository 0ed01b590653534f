mod assemble;
mod commands;
mod config;
mod diagnostics;
mod error;
mod extract;
mod imgpath;
mod page;
mod render;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mdbind",
    about = "Bind an index markdown document and its linked siblings into one printable page"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge, render, and write a standalone HTML page
    Export {
        /// Input markdown document (an `index.md` is merged with its links)
        input: PathBuf,
        /// Output HTML file
        output: PathBuf,
        /// Assemble in table-of-contents mode instead of inline anchors
        #[arg(long)]
        toc: bool,
    },
    /// Print the links extracted from a document
    Links {
        /// Input markdown document
        input: PathBuf,
    },
    /// Print the merged markdown without rendering
    Merge {
        /// Input markdown document
        input: PathBuf,
        /// Assemble in table-of-contents mode instead of inline anchors
        #[arg(long)]
        toc: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export { input, output, toc } => commands::export(&input, &output, toc),
        Commands::Links { input } => commands::links(&input),
        Commands::Merge { input, toc } => commands::merge(&input, toc),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}
