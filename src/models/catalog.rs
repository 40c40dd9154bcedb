//! Catalog of model assets the pipeline can fetch.
//!
//! Two families: Whisper GGML models for ASR, and the pyannote ONNX pair
//! (segmentation + speaker embedding) for diarization.

/// What a catalog entry is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Asr,
    Diarization,
}

/// Metadata for a downloadable model asset.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    /// Model identifier (e.g. "large-v3", "segmentation-3.0")
    pub name: &'static str,
    /// File name in the local model cache
    pub file_name: &'static str,
    /// Approximate size in megabytes
    pub size_mb: u32,
    /// SHA-1 checksum; empty skips verification
    // TODO: pin the checksums published in whisper.cpp's download script
    pub sha1: &'static str,
    /// Download URL
    pub url: &'static str,
    pub kind: ModelKind,
}

/// Catalog of supported models.
///
/// ASR models range from tiny (fast, lower accuracy) to large-v3 (the batch
/// default). The diarization pair is fixed: pyannote segmentation-3.0 plus
/// the WeSpeaker CAM++ embedding model.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "tiny",
        file_name: "ggml-tiny.bin",
        size_mb: 75,
        sha1: "",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.bin",
        kind: ModelKind::Asr,
    },
    ModelInfo {
        name: "base",
        file_name: "ggml-base.bin",
        size_mb: 142,
        sha1: "",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin",
        kind: ModelKind::Asr,
    },
    ModelInfo {
        name: "small",
        file_name: "ggml-small.bin",
        size_mb: 466,
        sha1: "",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-small.bin",
        kind: ModelKind::Asr,
    },
    ModelInfo {
        name: "medium",
        file_name: "ggml-medium.bin",
        size_mb: 1533,
        sha1: "",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-medium.bin",
        kind: ModelKind::Asr,
    },
    ModelInfo {
        name: "large-v2",
        file_name: "ggml-large-v2.bin",
        size_mb: 3094,
        sha1: "",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-large-v2.bin",
        kind: ModelKind::Asr,
    },
    ModelInfo {
        name: "large-v3",
        file_name: "ggml-large-v3.bin",
        size_mb: 3095,
        sha1: "",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-large-v3.bin",
        kind: ModelKind::Asr,
    },
    ModelInfo {
        name: "segmentation-3.0",
        file_name: "segmentation-3.0.onnx",
        size_mb: 6,
        sha1: "",
        url: "https://github.com/thewh1teagle/pyannote-rs/releases/download/v0.1.0/segmentation-3.0.onnx",
        kind: ModelKind::Diarization,
    },
    ModelInfo {
        name: "wespeaker",
        file_name: "wespeaker_en_voxceleb_CAM++.onnx",
        size_mb: 28,
        sha1: "",
        url: "https://github.com/thewh1teagle/pyannote-rs/releases/download/v0.1.0/wespeaker_en_voxceleb_CAM++.onnx",
        kind: ModelKind::Diarization,
    },
];

/// Resolve user-friendly aliases to catalog names.
pub fn resolve_name(name: &str) -> &str {
    match name {
        "large" => "large-v3",
        "segmentation" => "segmentation-3.0",
        "embedding" => "wespeaker",
        other => other,
    }
}

/// Look up a model by (resolved) name.
pub fn get_model(name: &str) -> Option<&'static ModelInfo> {
    let resolved = resolve_name(name);
    MODELS.iter().find(|m| m.name == resolved)
}

/// All ASR models, in size order.
pub fn asr_models() -> impl Iterator<Item = &'static ModelInfo> {
    MODELS.iter().filter(|m| m.kind == ModelKind::Asr)
}

/// The diarization model pair (segmentation, embedding).
pub fn diarization_models() -> impl Iterator<Item = &'static ModelInfo> {
    MODELS.iter().filter(|m| m.kind == ModelKind::Diarization)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_contains_default_model() {
        let model = get_model(crate::defaults::DEFAULT_MODEL).unwrap();
        assert_eq!(model.kind, ModelKind::Asr);
        assert_eq!(model.file_name, "ggml-large-v3.bin");
    }

    #[test]
    fn alias_resolution() {
        assert_eq!(resolve_name("large"), "large-v3");
        assert_eq!(resolve_name("segmentation"), "segmentation-3.0");
        assert_eq!(resolve_name("base"), "base");
    }

    #[test]
    fn get_model_resolves_aliases() {
        assert_eq!(get_model("large").unwrap().name, "large-v3");
    }

    #[test]
    fn unknown_model_is_none() {
        assert!(get_model("colossal-v9").is_none());
    }

    #[test]
    fn diarization_pair_is_complete() {
        let names: Vec<_> = diarization_models().map(|m| m.name).collect();
        assert_eq!(names, vec!["segmentation-3.0", "wespeaker"]);
    }

    #[test]
    fn all_urls_are_https() {
        for model in MODELS {
            assert!(model.url.starts_with("https://"), "{}", model.name);
        }
    }

    #[test]
    fn file_names_are_unique() {
        let mut names: Vec<_> = MODELS.iter().map(|m| m.file_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MODELS.len());
    }
}
