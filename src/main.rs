// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;

use anyhow::{anyhow, Result};
use modeshift::config::ConverterConfig;
use modeshift::music::{ConversionPreset, NoteName};
use modeshift::pipeline::{analyze_file, convert_file};

fn print_usage() {
    println!("modeshift - Convert MIDI files between musical modes");
    println!();
    println!("Usage: modeshift <INPUT.mid> <OUTPUT[.mid]> [OPTIONS]");
    println!("       modeshift --analyze <INPUT.mid>");
    println!("       modeshift --list-modes [--config <FILE>]");
    println!();
    println!("Options:");
    println!("  --mode <MODE>      Target mode identifier or preset number (default from config)");
    println!("  --config <FILE>    Load settings from a TOML or YAML file");
    println!("  --analyze <FILE>   Print the detected tonic and pitch-class counts");
    println!("  --list-modes       List conversion presets and available modes");
    println!("  --help             Show this help message");
}

fn list_modes(config: &ConverterConfig) -> Result<()> {
    let registry = config.registry()?;

    println!("Presets:");
    for preset in ConversionPreset::ALL.iter() {
        println!("  {}", preset);
    }
    println!();
    println!("Modes:");
    for id in registry.identifiers() {
        let def = registry.lookup(id)?;
        println!("  {:<16} lower {:<14} raise {}", id, def.lower().to_string(), def.raise());
    }
    Ok(())
}

fn print_analysis(input: &str) -> Result<()> {
    let analysis = analyze_file(input)?;
    println!("Tonic: {} ({} notes)", analysis.display_name(), analysis.tonic_count());
    if analysis.is_ambiguous() {
        let names: Vec<String> = analysis
            .candidates
            .iter()
            .map(|&pc| NoteName::from_pitch_class(pc).to_string())
            .collect();
        println!("Ambiguous between: {}", names.join(", "));
    }
    println!();
    for (pc, count) in analysis.histogram.iter().enumerate() {
        let name = NoteName::from_pitch_class(pc as u8);
        println!("  {:<3} {}", name.to_string(), count);
    }
    Ok(())
}

/// Value following a flag, e.g. the path after `--config`
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{} requires a value", flag)),
        None => Ok(None),
    }
}

fn load_config(args: &[String]) -> Result<ConverterConfig> {
    match flag_value(args, "--config")? {
        Some(path) => ConverterConfig::load(path),
        None => Ok(ConverterConfig::default()),
    }
}

fn run(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        println!("modeshift - Convert MIDI files between musical modes");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--help" | "-h" => print_usage(),
        "--list-modes" => list_modes(&load_config(args)?)?,
        "--analyze" => {
            let input = args
                .get(2)
                .ok_or_else(|| anyhow!("--analyze requires an input file"))?;
            print_analysis(input)?;
        }
        flag if flag.starts_with("--") => {
            print_usage();
            return Err(anyhow!("Unknown option: {}", flag));
        }
        input => {
            let output = args
                .get(2)
                .filter(|a| !a.starts_with("--"))
                .ok_or_else(|| anyhow!("Missing output file"))?;
            let config = load_config(args)?;
            let mode = flag_value(args, "--mode")?;

            // Fail on an unknown mode before touching any file
            if let Some(mode) = mode {
                config.registry()?.resolve_choice(mode)?;
            }

            let report = convert_file(input, output, mode, &config)?;
            println!("{} saved as {}", report.summary(), report.output.display());
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
