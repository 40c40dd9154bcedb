//! Speaker metadata sidecars and their resolution chain.
//!
//! Recordings are accompanied by optional `<stem>_metadata.json` sidecars
//! written by a separate authoring step. The resolver searches an ordered
//! list of candidate locations and the first parseable sidecar with a usable
//! `speaker_count` wins; everything else (missing files, broken JSON, files
//! without a count) is logged and skipped, never fatal.

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::naming;

/// One attendee entry from a metadata sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    pub id: u32,
}

/// Speaker metadata for one recording, as authored in the sidecar.
///
/// `speaker_count` is the only required field and is authoritative for
/// diarization; the attendee list may be shorter or longer than the count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerMetadata {
    pub speaker_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_version: Option<String>,
}

/// Finds the metadata sidecar for a recording, if any.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    workspace_root: PathBuf,
    output_base: PathBuf,
}

impl MetadataResolver {
    /// `workspace_root` is the batch scan root; `output_base` is the directory
    /// under which per-recording output directories are created.
    pub fn new(workspace_root: impl Into<PathBuf>, output_base: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            output_base: output_base.into(),
        }
    }

    /// Candidate sidecar locations for a recording, in precedence order.
    fn candidates(&self, recording: &Path) -> Vec<(PathBuf, &'static str)> {
        let stem = recording
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let sidecar = format!("{}{}", stem, defaults::METADATA_SUFFIX);

        let mut candidates = Vec::with_capacity(3);
        if let Some(parent) = recording.parent() {
            candidates.push((parent.join(&sidecar), "parent directory"));
        }
        candidates.push((self.workspace_root.join(&sidecar), "workspace root"));
        candidates.push((
            self.output_base
                .join(naming::output_directory_name(&stem))
                .join(&sidecar),
            "output directory",
        ));
        candidates
    }

    /// Search the candidate chain and return the first valid sidecar together
    /// with its path. Returns `(None, None)` when every candidate misses; the
    /// caller is then responsible for applying (and surfacing) the default
    /// speaker count.
    pub fn resolve(&self, recording: &Path) -> (Option<SpeakerMetadata>, Option<PathBuf>) {
        for (candidate, description) in self.candidates(recording) {
            debug!("Checking metadata candidate {} ({})", candidate.display(), description);
            match try_load(&candidate) {
                Some(metadata) => {
                    info!(
                        "Found metadata at {} ({}) with {} speakers",
                        candidate.display(),
                        description,
                        metadata.speaker_count
                    );
                    return (Some(metadata), Some(candidate));
                }
                None => continue,
            }
        }

        warn!(
            "No valid metadata found for {}",
            recording.file_name().unwrap_or_default().to_string_lossy()
        );
        (None, None)
    }
}

/// Load a single candidate. Any miss (absent file, I/O error, broken JSON,
/// missing or zero `speaker_count`) returns `None` so the search continues.
fn try_load(path: &Path) -> Option<SpeakerMetadata> {
    if !path.exists() {
        return None;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read metadata candidate {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<SpeakerMetadata>(&contents) {
        Ok(metadata) if metadata.speaker_count >= 1 => Some(metadata),
        Ok(metadata) => {
            warn!(
                "Metadata at {} has unusable speaker_count {}",
                path.display(),
                metadata.speaker_count
            );
            None
        }
        Err(e) => {
            warn!("Failed to parse metadata at {}: {}", path.display(), e);
            None
        }
    }
}
