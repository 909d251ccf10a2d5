//! shorthand command line interface
//!
//! Reads shorthand text from files, `-e` expressions or standard input and
//! writes the expanded text to standard output.
//!
//! # Usage
//!
//! ```bash
//! # Expand a template
//! shorthand page.shorthand > page.html
//!
//! # Seed a label before reading stdin
//! echo "Hello @who" | shorthand -e "@who :=: World"
//!
//! # Interactive session
//! shorthand
//! ```

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shorthand::config::{DEFAULT_MAX_IMPORT_DEPTH, DEFAULT_SHELL};
use shorthand::help::{self, WELCOME};
use shorthand::settings::DEFAULT_PROMPT;
use shorthand::{repl, Settings, VirtualMachine};

#[derive(Parser)]
#[command(name = "shorthand")]
#[command(version)]
#[command(about = "A simple label expander and markdown processor")]
#[command(long_about = None)]
struct Cli {
    /// Evaluate an expression before reading input (repeatable)
    #[arg(short, long = "expression", value_name = "EXPR")]
    expressions: Vec<String>,

    /// Prompt shown before each line in interactive use
    #[arg(short, long, env = "SHORTHAND_PROMPT", default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Never show a prompt
    #[arg(short, long)]
    no_prompt: bool,

    /// Program used to run shell operators as `<shell> -c <command>`
    #[arg(long, env = "SHORTHAND_SHELL", default_value = DEFAULT_SHELL)]
    shell: String,

    /// Kill shell commands running longer than this many seconds
    #[arg(long, env = "SHORTHAND_SHELL_TIMEOUT", value_name = "SECS")]
    shell_timeout: Option<u64>,

    /// Maximum nesting of import operators
    #[arg(long, default_value_t = DEFAULT_MAX_IMPORT_DEPTH)]
    max_import_depth: usize,

    /// List the supported operators and exit
    #[arg(long)]
    operators: bool,

    /// Files to process in order (reads stdin if none given)
    files: Vec<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            prompt: self.prompt.clone(),
            no_prompt: self.no_prompt,
            shell: self.shell.clone(),
            shell_timeout_secs: self.shell_timeout,
            max_import_depth: self.max_import_depth,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr, stdout carries the expanded text
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shorthand=warn,shorthand_vm=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = cli.settings();
    settings.validate()?;

    let interactive = cli.files.is_empty() && io::stdin().is_terminal();
    let mut vm = VirtualMachine::with_config(settings.vm_config(interactive));

    if cli.operators {
        help::write_operators(&vm, io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    }

    for (i, expression) in cli.expressions.iter().enumerate() {
        let line_no = (i + 1) as i64;
        match vm.eval(expression, line_no) {
            Ok(text) if !text.is_empty() => {
                print!("{}", text);
                if !text.ends_with('\n') {
                    println!();
                }
            }
            Ok(_) => {}
            Err(e) => eprintln!("ERROR ({}): {}", line_no, e),
        }
        if vm.halt().is_some() {
            return Ok(halt_code(&vm));
        }
    }

    let mut failed = false;
    if !cli.files.is_empty() {
        vm.set_prompt("");
        for path in &cli.files {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!(
                        "{}: cannot open {}: {}",
                        "error".red().bold(),
                        path.display(),
                        e
                    );
                    failed = true;
                    continue;
                }
            };
            info!(path = %path.display(), "processing file");
            vm.run(BufReader::new(file), io::stdout().lock(), io::stderr().lock())
                .with_context(|| format!("failed while processing {}", path.display()))?;
            if vm.halt().is_some() {
                break;
            }
        }
    } else if interactive {
        println!("{}", WELCOME);
        let prompt = settings.effective_prompt(true).to_string();
        let lines = repl::run(&mut vm, &prompt)?;
        debug!(lines, "interactive session ended");
    } else {
        vm.run_stdio().context("failed while processing stdin")?;
    }

    if vm.halt().is_some() {
        return Ok(halt_code(&vm));
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// An exit operator with a message is fatal; a bare one is a clean stop.
fn halt_code(vm: &VirtualMachine) -> ExitCode {
    match vm.halt().and_then(|h| h.message.as_deref().map(|m| (h.line_no, m))) {
        Some((line_no, message)) => {
            eprintln!("{} ({}): {}", "error".red().bold(), line_no, message);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
