use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{ModelError, Result};

/// Lines per song in the lyrics database. Within a record:
/// 0 separator, 1 title, 2 artist, 3 length in seconds, 4 featured
/// artists, 5 lyrics, 6 separator.
pub const RECORD_LINES: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub length_secs: f64,
    pub featuring: String,
    pub lyrics: String,
}

pub fn load_songs(path: &Path) -> Result<Vec<Song>> {
    let raw = fs::read_to_string(path)?;
    let songs = parse_songs(&raw)?;
    info!(path = %path.display(), songs = songs.len(), "Loaded songs");
    Ok(songs)
}

/// Parses every complete record; a trailing record cut off before its
/// lyrics line is ignored.
pub fn parse_songs(raw: &str) -> Result<Vec<Song>> {
    let lines: Vec<&str> = raw.lines().collect();

    lines
        .chunks(RECORD_LINES)
        .enumerate()
        .filter(|(_, record)| record.len() > 5)
        .map(|(i, record)| {
            let length_secs = record[3].trim().parse::<f64>().map_err(|_| {
                ModelError::MalformedCorpus(format!(
                    "record {}: length '{}' is not a number",
                    i,
                    record[3].trim()
                ))
            })?;

            Ok(Song {
                title: record[1].trim().to_string(),
                artist: record[2].trim().to_string(),
                length_secs,
                featuring: record[4].trim().to_string(),
                lyrics: record[5].to_string(),
            })
        })
        .collect()
}

/// The lyrics of every song, in file order.
pub fn lyrics(songs: &[Song]) -> Vec<String> {
    songs.iter().map(|song| song.lyrics.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SONGS: &str = "\
---
Jingle Bells
James Pierpont
125.5

dashing through the snow santa christmas
---
---
Money
Pink Floyd
382
David Gilmour
money it's a gas grab that cash
---
";

    #[test]
    fn parses_seven_line_records() {
        let songs = parse_songs(TWO_SONGS).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Jingle Bells");
        assert_eq!(songs[0].length_secs, 125.5);
        assert_eq!(songs[0].featuring, "");
        assert_eq!(songs[1].artist, "Pink Floyd");
        assert_eq!(songs[1].featuring, "David Gilmour");
        assert_eq!(lyrics(&songs)[1], "money it's a gas grab that cash");
    }

    #[test]
    fn trailing_partial_record_is_ignored() {
        let raw = format!("{}---\nHalf A Song\nNobody\n", TWO_SONGS);
        assert_eq!(parse_songs(&raw).unwrap().len(), 2);
    }

    #[test]
    fn bad_length_names_the_record() {
        let raw = TWO_SONGS.replace("382", "six minutes");
        let err = parse_songs(&raw).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs_lyrics.txt");
        fs::write(&path, TWO_SONGS).unwrap();
        assert_eq!(load_songs(&path).unwrap().len(), 2);
    }
}
