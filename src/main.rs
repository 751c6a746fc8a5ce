use clap::Parser;
use romck::music::Layout;
use romck::{text, Image, Patcher};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Stock image the patch was written against
const DEFAULT_INPUT: &str = "Super Mario Bros. (JU) (PRG0) [!].nes";

#[derive(Parser, Debug)]
#[command(name = "romck")]
#[command(version = "0.1.0")]
#[command(about = "Tracker notation to NES ROM music patcher", long_about = None)]
struct Args {
    /// Output ROM image
    output: PathBuf,

    /// Input ROM image
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Notation source file
    #[arg(short, long, default_value = "music.txt")]
    notation: PathBuf,

    /// Credits text to write into the fixed credits field
    #[arg(long)]
    credits: Option<String>,
}

fn main() -> Result<(), romck::Error> {
    let args = Args::parse();

    let mut image = Image::load(&args.input)?;
    let notation = BufReader::new(File::open(&args.notation)?);

    let patcher = Patcher::new(Layout::smb());
    patcher.patch(&mut image, notation)?;

    if let Some(credits) = &args.credits {
        text::write_credits(&mut image, credits)?;
    }

    // Only persisted once the whole patch sequence has succeeded.
    image.save(&args.output)?;
    Ok(())
}
