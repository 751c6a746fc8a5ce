//! Song table to JSON converter

use clap::Parser;
use romck::music::report::SongTableReport;
use romck::music::Layout;
use romck::Image;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rom2json")]
#[command(version = "0.1.0")]
#[command(about = "Dump a ROM's song table as JSON", long_about = None)]
struct Args {
    /// Input ROM image
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let image = Image::load(&args.input)?;
    let report = SongTableReport::decode(&image, &Layout::smb())?;

    let json_string = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
