//! Model download and installation management.
//!
//! Fetches catalog models into the local cache directory, with a progress
//! bar and optional SHA-1 verification. Downloads are synchronous — they
//! happen once, up front, before the batch starts.

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use sha1::{Digest, Sha1};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{MeetscribeError, Result};
use crate::models::catalog::{ModelInfo, get_model};

/// Get the directory where models are stored.
///
/// Uses `~/.cache/meetscribe/models/` on Linux/Unix.
pub fn models_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("meetscribe")
        .join("models")
}

/// Get the full path for a catalog model file.
pub fn model_path(info: &ModelInfo) -> PathBuf {
    models_dir().join(info.file_name)
}

/// Check if a model is installed.
pub fn is_model_installed(name: &str) -> bool {
    get_model(name).is_some_and(|info| model_path(info).exists())
}

/// Download a model by name unless it is already installed.
///
/// Returns the on-disk path. Fails for unknown names, failed downloads, and
/// checksum mismatches (when the catalog carries a checksum).
pub fn download_model(name: &str, progress: bool) -> Result<PathBuf> {
    let info = get_model(name).ok_or_else(|| {
        MeetscribeError::Other(format!(
            "Unknown model '{name}'. Run 'meetscribe models list' to see available models."
        ))
    })?;

    let path = model_path(info);
    if path.exists() {
        info!("Model '{}' already installed at {}", name, path.display());
        return Ok(path);
    }

    download_to_path(info, &path, progress)?;
    Ok(path)
}

/// Ensure a model exists locally, downloading it when allowed.
pub fn ensure_model(name: &str, no_download: bool, progress: bool) -> Result<PathBuf> {
    if let Some(info) = get_model(name) {
        let path = model_path(info);
        if path.exists() {
            return Ok(path);
        }
        if no_download {
            return Err(MeetscribeError::ModelNotFound {
                path: path.display().to_string(),
            });
        }
        return download_model(name, progress);
    }
    Err(MeetscribeError::Other(format!("Unknown model '{name}'")))
}

/// Core download: fetch url, save to path, verify sha1 if non-empty.
fn download_to_path(info: &ModelInfo, output_path: &Path, progress: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| MeetscribeError::Other(format!("Failed to create models directory: {e}")))?;
    }

    if progress {
        eprintln!("Downloading {} ({} MB)...", info.name, info.size_mb);
    }

    let mut response = reqwest::blocking::get(info.url)
        .map_err(|e| MeetscribeError::Other(format!("Failed to start download: {e}")))?;

    if !response.status().is_success() {
        return Err(MeetscribeError::Other(format!(
            "Download failed with status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = progress.then(|| {
        let pb = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    });

    let mut hasher = Sha1::new();
    let mut file = fs::File::create(output_path)
        .map_err(|e| MeetscribeError::Other(format!("Failed to create output file: {e}")))?;

    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = response
            .read(&mut buf)
            .map_err(|e| MeetscribeError::Other(format!("Failed to read download chunk: {e}")))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .map_err(|e| MeetscribeError::Other(format!("Failed to write to file: {e}")))?;
        hasher.update(&buf[..n]);
        if let Some(pb) = &pb {
            pb.inc(n as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Downloaded");
    }

    if !info.sha1.is_empty() {
        let calculated = format!("{:x}", hasher.finalize());
        if calculated != info.sha1 {
            if let Err(e) = fs::remove_file(output_path) {
                eprintln!("meetscribe: failed to remove corrupted download: {e}");
            }
            return Err(MeetscribeError::Other(format!(
                "SHA-1 checksum mismatch for {}. Expected: {}, got: {}",
                info.name, info.sha1, calculated
            )));
        }
        if progress {
            eprintln!("Checksum verified");
        }
    }

    if progress {
        eprintln!("Model installed to: {}", output_path.display());
    }

    Ok(())
}

/// One-line description for `models list` output.
pub fn format_model_info(info: &ModelInfo) -> String {
    let status = if model_path(info).exists() {
        "installed"
    } else {
        "not installed"
    };
    format!("{} ({} MB, {})", info.name, info.size_mb, status)
}
