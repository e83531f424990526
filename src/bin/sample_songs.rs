use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use songtopics::corpus::RECORD_LINES;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 4 {
        eprintln!("Usage: {} <songs.txt> <sample.txt> <sample_percentage>", args[0]);
        eprintln!("Example: sample_songs songs_lyrics.txt sample.txt 10");
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let output_path = PathBuf::from(&args[2]);
    let sample_percentage: f32 = args[3]
        .parse()
        .context("Sample percentage must be a number")?;

    if sample_percentage <= 0.0 || sample_percentage > 100.0 {
        bail!("Sample percentage must be between 0 and 100");
    }

    println!(
        "Sampling {}% of songs from {} to {}",
        sample_percentage,
        input_path.display(),
        output_path.display()
    );

    let raw = fs::read_to_string(&input_path)
        .with_context(|| format!("reading {}", input_path.display()))?;
    let lines: Vec<&str> = raw.lines().collect();
    let records: Vec<&[&str]> = lines
        .chunks(RECORD_LINES)
        .filter(|record| record.len() == RECORD_LINES)
        .collect();

    let total_songs = records.len();
    println!("Total songs in source: {}", total_songs);

    let sample_size = ((total_songs as f32) * (sample_percentage / 100.0)) as usize;
    let step = if sample_size > 0 { total_songs / sample_size } else { 1 };
    let step = step.max(1);
    println!("Taking every {}th song", step);

    let mut writer = BufWriter::new(File::create(&output_path)?);
    let mut sampled_count = 0;

    for record in records.iter().step_by(step) {
        for line in record.iter() {
            writeln!(writer, "{}", line)?;
        }
        sampled_count += 1;
    }

    writer.flush()?;

    println!("✅ Wrote {} songs to {}", sampled_count, output_path.display());
    Ok(())
}
