use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use phonetic_core::config::PhoneticConfig;
use phonetic_core::persistence::{load_dictionary_json, save_compiled_dictionary, ReferenceCorpus};
use phonetic_core::spectrum::GroupSet;
use phonetic_core::{logging, PhoneticEngine};
use serde::Serialize;
use std::error::Error;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ruphonetic", about = "Russian phonemic transcription and sound spectra")]
struct Args {
    /// JSON configuration file.
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    #[command(flatten)]
    Analyze(AnalyzeCmd),
    /// Compiles the JSON dictionary tables into a binary cache.
    CompileDict {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Commands that need a loaded engine.
#[derive(Subcommand, Debug)]
enum AnalyzeCmd {
    /// Prints the phonemic transcription.
    Transcribe {
        input: Option<PathBuf>,
        /// Keep only phonemes, softness marks, spaces and newlines.
        #[arg(short, long)]
        simplify: bool,
        /// Log the output of every pipeline stage.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Prints the stress-marked text.
    Accentuate { input: Option<PathBuf> },
    /// Prints the phoneme frequency spectrum as JSON.
    Spectrum {
        input: Option<PathBuf>,
        #[arg(short, long)]
        grouped: bool,
        /// The input is already a transcription.
        #[arg(short, long)]
        transcribed: bool,
    },
    /// Asks for phoneme groups interactively, then prints their shares.
    Groups {
        input: PathBuf,
        #[arg(short, long)]
        transcribed: bool,
    },
    /// Sliding-window spectra: fixed width with --size, growing prefixes otherwise.
    Window {
        input: Option<PathBuf>,
        #[arg(short, long)]
        size: Option<usize>,
        #[arg(short, long)]
        transcribed: bool,
    },
    /// Ranks reference authors by spectrum similarity.
    Identify {
        input: Option<PathBuf>,
        #[arg(short, long)]
        grouped: bool,
    },
    /// Stores reference spectra of a text for an author.
    Reference {
        #[arg(short, long)]
        author: String,
        input: Option<PathBuf>,
    },
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_groups() -> io::Result<GroupSet> {
    let mut groups = GroupSet::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!(
        "{}",
        "Enter sound groups, labels separated by | without spaces. Type /s when done.".bold()
    );
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", format!("Group {}:", groups.groups().len() + 1).cyan());
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.contains("/s") {
            break;
        }
        match groups.declare(&line) {
            Ok(()) => {}
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
    Ok(groups)
}

fn compile_dictionary(config: &PhoneticConfig, out: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let dictionary = load_dictionary_json(&config.dictionary_dir)?;
    let out = out
        .or_else(|| config.compiled_dictionary.clone())
        .ok_or("no output path for the compiled dictionary")?;
    save_compiled_dictionary(&dictionary, &out)?;
    eprintln!("Dictionary compiled to '{}'", out.display());
    Ok(())
}

fn run(command: AnalyzeCmd, config: &PhoneticConfig) -> Result<(), Box<dyn Error>> {
    let engine = PhoneticEngine::from_config(config)?;
    let corpus = ReferenceCorpus::new(&config.references_dir);

    match command {
        AnalyzeCmd::Transcribe { input, simplify, verbose } => {
            let text = read_input(input.as_deref())?;
            println!("{}", engine.transcribe(&text, simplify, verbose)?);
        }
        AnalyzeCmd::Accentuate { input } => {
            let text = read_input(input.as_deref())?;
            println!("{}", engine.accentuate(&text)?);
        }
        AnalyzeCmd::Spectrum { input, grouped, transcribed } => {
            let text = read_input(input.as_deref())?;
            let spectrum = if grouped {
                engine.grouped_spectrum(&text, transcribed)?
            } else {
                engine.sound_spectrum(&text, transcribed)?
            };
            print_json(&spectrum)?;
        }
        AnalyzeCmd::Groups { input, transcribed } => {
            let text = read_input(Some(input.as_path()))?;
            let groups = read_groups()?;
            print_json(&engine.custom_grouped_spectrum(&text, transcribed, groups.groups())?)?;
        }
        AnalyzeCmd::Window { input, size, transcribed } => {
            let text = read_input(input.as_deref())?;
            let windows = match size {
                Some(size) => engine.sliding_window_by_position(&text, size, transcribed)?,
                None => engine.sliding_window_by_length(&text, transcribed)?,
            };
            print_json(&windows)?;
        }
        AnalyzeCmd::Identify { input, grouped } => {
            let text = read_input(input.as_deref())?;
            for (author, score) in engine.identify_author(&text, grouped, &corpus)? {
                println!("{author}\t{score:.4}");
            }
        }
        AnalyzeCmd::Reference { author, input } => {
            let text = read_input(input.as_deref())?;
            engine.build_reference(&author, &text, &corpus)?;
            eprintln!("Reference spectra saved for '{author}'");
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let config = match PhoneticConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] Could not load configuration: {e}");
            std::process::exit(2);
        }
    };
    logging::init_tracing(&config.log_level);

    let result = match args.command {
        // Compiling must not require an already-loadable dictionary.
        Cmd::CompileDict { out } => compile_dictionary(&config, out),
        Cmd::Analyze(command) => run(command, &config),
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "ruphonetic failed");
        std::process::exit(1);
    }
}
