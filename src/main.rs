//! stackc command line driver

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process,
    rc::Rc,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};
use stackc::{
    ast::dump::dump_program,
    compiler::compiler::{CompileOptions, Compiler},
    display_error,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

#[derive(Parser)]
#[command(name = "stackc")]
#[command(author, version, about = "Compiles a small C dialect to stack-machine IR", long_about = None)]
struct Cli {
    /// Print the token stream and stop
    #[arg(short, long, group = "mode")]
    lex: bool,

    /// Print the syntax tree and stop
    #[arg(short, long, group = "mode")]
    parse: bool,

    /// Type check and stop
    #[arg(short = 't', long = "check", group = "mode")]
    check: bool,

    /// Log compiler passes at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source files to compile
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

enum Mode {
    Lex,
    Parse,
    Check,
    Compile,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.lex {
            Mode::Lex
        } else if self.parse {
            Mode::Parse
        } else if self.check {
            Mode::Check
        } else {
            Mode::Compile
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut out = String::new();
    for file in &cli.files {
        let source = fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;

        match run(&cli, file, &source) {
            Ok(text) => out.push_str(&text),
            Err(error) => {
                eprint!("{}", display_error(&error, &source));
                eprintln!("{}", error);
                process::exit(1);
            }
        }
    }

    match &cli.output {
        Some(path) => fs::write(path, out)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => std::io::stdout()
            .write_all(out.as_bytes())
            .context("Failed to write output")?,
    }

    Ok(())
}

/// Runs the passes the selected mode needs on one file.
fn run(cli: &Cli, file: &Path, source: &str) -> Result<String, Error> {
    let start = Instant::now();
    let file_name = file.to_string_lossy().to_string();

    let tokens = tokenize(source.to_string(), Some(file_name.clone()))?;
    debug!("tokenized {} in {:?}", file_name, start.elapsed());

    if let Mode::Lex = cli.mode() {
        let mut text = String::new();
        for token in &tokens {
            text.push_str(&token.describe());
            text.push('\n');
        }
        return Ok(text);
    }

    let program = parse(tokens, Rc::new(file_name.clone()))?;
    debug!("parsed {} in {:?}", file_name, start.elapsed());

    let options = CompileOptions {
        verbose: cli.verbose,
        ..CompileOptions::default()
    };
    let mut compiler = Compiler::new(program, options);

    match cli.mode() {
        Mode::Parse => Ok(dump_program(&compiler.program)),
        Mode::Check => {
            compiler.check_types(cli.verbose)?;
            debug!("type checked {} in {:?}", file_name, start.elapsed());
            Ok(String::new())
        }
        Mode::Lex | Mode::Compile => {
            compiler.check_types(cli.verbose)?;
            let ir = compiler.generate_ir()?;
            debug!("compiled {} in {:?}", file_name, start.elapsed());
            Ok(ir)
        }
    }
}
