//! MIDI corpus extraction.
//!
//! Parses Standard MIDI Files with the `midly` crate and flattens note
//! onsets into the token stream the sequence model trains on. Notes that
//! share an onset tick become one chord token; a lone note becomes a
//! pitch-name token.

use crate::error::{Error, Result};
use crate::pitch::pitch_name;
use cadenza_seq::Token;
use midly::{MidiMessage, Smf, Timing, TrackEventKind};
use std::path::Path;
use tracing::{debug, warn};

/// A note onset with absolute tick time.
#[derive(Debug, Clone, Copy)]
struct NoteOn {
    tick: u64,
    key: u8,
}

/// Extract a token corpus from every `.mid`/`.midi` file in a directory.
///
/// Files are visited in sorted path order so the corpus, and with it the
/// vocabulary, is reproducible. A file that fails to parse contributes
/// nothing and is skipped with a warning; it never injects partial or
/// ambiguous tokens. An empty result is an error.
pub fn corpus_from_dir(dir: impl AsRef<Path>) -> Result<Vec<Token>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
                    .as_deref(),
                Some("mid") | Some("midi")
            )
        })
        .collect();
    paths.sort();

    let mut corpus = Vec::new();
    for path in &paths {
        debug!("parsing {}", path.display());
        match tokens_from_file(path) {
            Ok(mut tokens) => corpus.append(&mut tokens),
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }

    if corpus.is_empty() {
        return Err(cadenza_seq::Error::EmptyCorpus.into());
    }
    debug!(
        "extracted {} tokens from {} files",
        corpus.len(),
        paths.len()
    );
    Ok(corpus)
}

/// Extract the token stream from a single MIDI file.
pub fn tokens_from_file(path: impl AsRef<Path>) -> Result<Vec<Token>> {
    let data = std::fs::read(path.as_ref())?;
    tokens_from_bytes(&data)
}

/// Extract tokens from SMF bytes: merge all tracks, group note-ons by
/// onset tick, encode each group.
pub fn tokens_from_bytes(data: &[u8]) -> Result<Vec<Token>> {
    let smf = Smf::parse(data)?;
    match smf.header.timing {
        Timing::Metrical(_) => {}
        Timing::Timecode(_, _) => return Err(Error::UnsupportedTiming),
    }

    let mut onsets = Vec::new();
    for track in smf.tracks.iter() {
        let mut current_tick = 0u64;
        for event in track.iter() {
            current_tick += u64::from(event.delta.as_int());
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                // velocity 0 is a note-off in disguise
                if vel.as_int() > 0 {
                    onsets.push(NoteOn {
                        tick: current_tick,
                        key: key.as_int(),
                    });
                }
            }
        }
    }
    onsets.sort_by_key(|n| (n.tick, n.key));

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < onsets.len() {
        let tick = onsets[i].tick;
        let mut j = i;
        while j < onsets.len() && onsets[j].tick == tick {
            j += 1;
        }
        tokens.push(encode_group(&onsets[i..j]));
        i = j;
    }
    Ok(tokens)
}

/// One onset group to one token: a single note keeps its pitch name, two
/// or more become a chord of pitch classes in normal order.
fn encode_group(group: &[NoteOn]) -> Token {
    if group.len() == 1 {
        return Token::new(pitch_name(group[0].key));
    }

    let mut classes: Vec<u8> = group.iter().map(|n| n.key % 12).collect();
    classes.sort_unstable();
    classes.dedup();

    let ordered = normal_order(&classes);
    Token::new(
        ordered
            .iter()
            .map(|pc| pc.to_string())
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// Normal order of a sorted, deduplicated pitch-class set: the rotation
/// with the smallest outer span, ties broken by successively smaller
/// spans to the inner notes, then by the earliest rotation.
fn normal_order(classes: &[u8]) -> Vec<u8> {
    if classes.len() <= 1 {
        return classes.to_vec();
    }

    let n = classes.len();
    let mut best_rotation = 0;
    let mut best_spans: Option<Vec<u8>> = None;
    for r in 0..n {
        // spans from the bottom note, outermost interval first
        let spans: Vec<u8> = (1..n)
            .rev()
            .map(|k| (classes[(r + k) % n] + 12 - classes[r]) % 12)
            .collect();
        if best_spans.as_ref().map_or(true, |b| spans < *b) {
            best_spans = Some(spans);
            best_rotation = r;
        }
    }

    (0..n).map(|k| classes[(best_rotation + k) % n]).collect()
}
