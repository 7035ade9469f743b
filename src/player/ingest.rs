// Local file ingestion
// Reads audio files into the blob store and builds playlist tracks for them

use std::path::{Path, PathBuf};

use super::blob::BlobStore;
use super::playlist::Track;
use crate::error::IngestError;

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "webm" => "audio/webm",
        _ => return None,
    };
    Some(mime)
}

pub fn is_audio(path: &Path) -> bool {
    mime_for_path(path).is_some_and(|mime| mime.starts_with("audio/"))
}

// "song.final.mp3" -> "song.final"
pub fn track_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name[..dot].to_string(),
        _ => file_name,
    }
}

pub fn ingest_path(path: &Path, store: &mut BlobStore) -> Result<Track, IngestError> {
    let mime = mime_for_path(path).ok_or_else(|| IngestError::NotAudio(path.to_path_buf()))?;
    let data = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let url = store.create(data, mime);
    tracing::debug!(path = %path.display(), %url, "ingested local file");
    Ok(Track::local(track_name(path), url))
}

// Files are ingested as given; directories contribute their audio files
// (one level deep, sorted by name). Non-audio directory entries are skipped
// silently, explicitly named non-audio files are reported.
pub fn ingest_paths(
    paths: &[PathBuf],
    store: &mut BlobStore,
) -> (Vec<Track>, Vec<IngestError>) {
    let mut tracks = Vec::new();
    let mut errors = Vec::new();

    for path in paths {
        if path.is_dir() {
            match audio_files_in(path) {
                Ok(files) => {
                    for file in files {
                        match ingest_path(&file, store) {
                            Ok(track) => tracks.push(track),
                            Err(e) => errors.push(e),
                        }
                    }
                }
                Err(source) => errors.push(IngestError::Io {
                    path: path.clone(),
                    source,
                }),
            }
        } else {
            match ingest_path(path, store) {
                Ok(track) => tracks.push(track),
                Err(e) => errors.push(e),
            }
        }
    }

    (tracks, errors)
}

fn audio_files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_audio(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
