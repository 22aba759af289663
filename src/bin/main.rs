//! pipeql CLI - render project definitions to artifact text
//!
//! Usage:
//!   pipeql render [project.toml] [--only <name>]
//!   pipeql list [project.toml]
//!
//! Without a path, the project is loaded from `$PIPEQL_CONFIG` or
//! `./pipeql.toml`. Artifacts are printed to stdout.

use clap::{Parser, Subcommand};
use pipeql::config::Project;
use pipeql::generate::{project_artifact, project_artifacts, Artifact};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pipeql")]
#[command(about = "pipeql - render datasource and pipe definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render artifacts to stdout
    Render {
        /// Path to the project file
        file: Option<PathBuf>,

        /// Render only the named datasource or pipe
        #[arg(short, long)]
        only: Option<String>,
    },

    /// List datasources and pipes in a project
    List {
        /// Path to the project file
        file: Option<PathBuf>,
    },
}

fn load_project(file: Option<PathBuf>) -> Result<Project, ExitCode> {
    let result = match file {
        Some(path) => Project::from_file(path),
        None => Project::load(),
    };
    result.map_err(|e| {
        eprintln!("Error loading project: {}", e);
        ExitCode::FAILURE
    })
}

fn print_artifact(artifact: &Artifact) {
    println!("-- {}", artifact.file_name());
    print!("{}", artifact.contents);
}

fn run_render(file: Option<PathBuf>, only: Option<String>) -> ExitCode {
    let project = match load_project(file) {
        Ok(project) => project,
        Err(code) => return code,
    };

    let artifacts = match only {
        Some(name) => project_artifact(&project, &name).map(|a| vec![a]),
        None => project_artifacts(&project),
    };

    match artifacts {
        Ok(artifacts) => {
            for (i, artifact) in artifacts.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_artifact(artifact);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Generation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_list(file: Option<PathBuf>) -> ExitCode {
    let project = match load_project(file) {
        Ok(project) => project,
        Err(code) => return code,
    };

    if project.is_empty() {
        println!("No definitions found.");
        return ExitCode::SUCCESS;
    }

    for (name, def) in &project.datasources {
        match def.version {
            Some(v) => println!("datasource  {} (v{})", name, v),
            None => println!("datasource  {}", name),
        }
    }
    for (name, def) in &project.pipes {
        match def.version {
            Some(v) => println!("pipe        {} (v{})", name, v),
            None => println!("pipe        {}", name),
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { file, only } => run_render(file, only),
        Commands::List { file } => run_list(file),
    }
}
