use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use whilelang_core::codegen_asm::generate_asm;
use whilelang_core::codegen_python::generate_python;
use whilelang_core::codegen_wat::generate_wat;
use whilelang_core::interpreter::{InterpreterOptions, parse_step_limit, run_observed};
use whilelang_core::{ArtifactKind, Dialect, Workspace, front_end};

mod report;

/// Lex, parse, trace and transpile whilelang programs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file name inside `<root>/origin`.
    #[arg(default_value = "program.txt")]
    file: String,

    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        help = "Workspace root holding origin/, ast/, trace/ and dist/"
    )]
    root: PathBuf,

    #[arg(long, help = "Process every file under origin/")]
    all: bool,

    #[arg(long, value_enum, default_value_t = DialectArg::Full)]
    dialect: DialectArg,

    #[arg(long, overrides_with = "no_tokens", help = "Print the token stream")]
    tokens: bool,
    #[arg(long, overrides_with = "tokens")]
    no_tokens: bool,

    #[arg(long, overrides_with = "no_ast", help = "Print the AST as JSON")]
    ast: bool,
    #[arg(long, overrides_with = "ast")]
    no_ast: bool,

    #[arg(long, overrides_with = "no_python", help = "Print the Python translation")]
    python: bool,
    #[arg(long, overrides_with = "python")]
    no_python: bool,

    #[arg(long, overrides_with = "no_wat", help = "Print the WebAssembly text translation")]
    wat: bool,
    #[arg(long, overrides_with = "wat")]
    no_wat: bool,

    #[arg(long, help = "Also generate toy-machine assembly")]
    asm: bool,

    #[arg(long, help = "Do not write artifacts to disk")]
    no_save: bool,

    #[arg(
        long,
        value_name = "N",
        value_parser = step_limit,
        help = "Interpreter step limit (finite positive number)"
    )]
    max_steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DialectArg {
    /// var, while, if/else
    Full,
    /// var and while only
    Loop,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Full => Dialect::Full,
            DialectArg::Loop => Dialect::Loop,
        }
    }
}

fn step_limit(text: &str) -> Result<usize, String> {
    parse_step_limit(text).map_err(|err| err.to_string())
}

/// Printing choices after `--x` / `--no-x` pairs are resolved.
#[derive(Debug, Clone, Copy)]
struct Printing {
    tokens: bool,
    ast: bool,
    python: bool,
    wat: bool,
}

impl Cli {
    fn printing(&self) -> Printing {
        Printing {
            tokens: self.tokens || !self.no_tokens,
            ast: self.ast || !self.no_ast,
            python: self.python || !self.no_python,
            wat: self.wat || !self.no_wat,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let workspace = Workspace::new(&cli.root);
    let options = match cli.max_steps {
        Some(limit) => InterpreterOptions::with_max_steps(limit)?,
        None => InterpreterOptions::default(),
    };

    let names = if cli.all {
        workspace
            .sources()
            .context("failed to list source files")?
    } else {
        vec![cli.file.clone()]
    };
    if names.is_empty() {
        eprintln!("no source files found in {}", workspace.origin_dir().display());
    }

    for name in &names {
        if names.len() > 1 {
            println!("==> {name}");
        }
        process(&cli, &workspace, name, &options)
            .with_context(|| format!("failed to process {name}"))?;
    }
    Ok(())
}

fn process(cli: &Cli, workspace: &Workspace, name: &str, options: &InterpreterOptions) -> Result<()> {
    let printing = cli.printing();
    let source = workspace.read_source(name)?;

    let front = front_end(&source, cli.dialect.into())?;
    if printing.tokens {
        println!("TOKENS:");
        for token in &front.tokens {
            println!("{}", report::format_token(token));
        }
    }
    if printing.ast {
        println!("AST:");
        println!("{}", serde_json::to_string_pretty(&front.program)?);
    }

    println!("\nEXEC TRACE:\n");
    let execution = run_observed(&front.program, options, |entry| {
        println!("{}", report::format_trace(entry))
    })?;
    println!("\nFINAL RESULT: {}", report::env_json(&execution.env));

    let python = generate_python(&front.program)?;
    if printing.python {
        println!("\nPYTHON:\n{python}");
    }

    let wat = generate_wat(&front.program)?;
    if printing.wat {
        println!("\nWAT:\n{wat}");
    }

    let assembly = if cli.asm {
        let assembly = generate_asm(&front.program)?;
        println!("\nASSEMBLY:\n{assembly}");
        Some(assembly)
    } else {
        None
    };

    // Nothing is written until every stage has succeeded.
    if cli.no_save {
        return Ok(());
    }
    let path = workspace.save_ast(name, &front.program)?;
    println!("AST saved to: {}", path.display());
    let path = workspace.save_trace(name, &execution.trace)?;
    println!("Trace saved to: {}", path.display());
    let path = workspace.save(ArtifactKind::Python, name, &python)?;
    println!("Python saved to: {}", path.display());
    let path = workspace.save(ArtifactKind::Wat, name, &wat)?;
    println!("WAT saved to: {}", path.display());
    if let Some(assembly) = assembly {
        let path = workspace.save(ArtifactKind::Assembly, name, &assembly)?;
        println!("Assembly saved to: {}", path.display());
    }

    Ok(())
}
