use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use log::info;

use stmap::input::read_file;
use stmap::output::write_graph;
use stmap::output::write_json;
use stmap::output::write_st;
use stmap::structure::StructureMap;

#[derive(Parser, Debug)]
#[command(name = "stmap", version, about = "Annotate stems, loops and pseudoknots of an RNA secondary structure")]
struct Cli {
    /// Input file in BPSEQ or dot-bracket format.
    input: PathBuf,

    /// Output file (default: <input stem>.st, or .json with --json).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write to stdout instead of a file.
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Write a JSON report instead of the .st format.
    #[arg(long)]
    json: bool,

    /// Also print the segment adjacency graph to stdout.
    #[arg(long)]
    graph: bool,

    /// Increase logging verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => (),
        1 => { builder.filter_level(log::LevelFilter::Info); }
        _ => { builder.filter_level(log::LevelFilter::Debug); }
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let record = read_file(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let stem = cli.input.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "structure".to_string());
    let name = record.name.clone().unwrap_or_else(|| stem.clone());

    let sm = StructureMap::try_from((record.sequence.as_str(), &record.pairs))
        .with_context(|| format!("failed to annotate {}", cli.input.display()))?;
    info!("{}: {} stems, {} pseudoknots, {} pages.", name, sm.stems().len(), sm.knots().len(), sm.pages());

    let mut out: Box<dyn Write> = if cli.stdout {
        Box::new(std::io::stdout().lock())
    } else {
        let path = cli.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{stem}.{}", if cli.json { "json" } else { "st" }))
        });
        info!("Writing {}.", path.display());
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Box::new(BufWriter::new(file))
    };

    if cli.json {
        write_json(&mut out, &name, &sm).context("failed to write JSON report")?;
    } else {
        write_st(&mut out, &name, &sm).context("failed to write .st report")?;
    }
    out.flush()?;
    drop(out);

    if cli.graph {
        let stdout = std::io::stdout();
        write_graph(&mut stdout.lock(), &sm).context("failed to write segment graph")?;
    }
    Ok(())
}
