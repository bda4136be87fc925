//! File classification and name normalization.

use crate::types::{FileItem, Item};
use serde::{Deserialize, Serialize};

/// Extensions treated as 3D models, without the leading dot.
pub const MODEL_EXTENSIONS: &[&str] = &[
    "stl", "slt", "obj", "fbx", "gltf", "glb", "3mf", "ply", "step", "stp", "iges", "igs", "x_t",
    "sldprt",
];

/// MIME substrings that mark a model file.
const MODEL_MIME_HINTS: &[&str] = &[
    "stl", "obj", "fbx", "gltf", "glb", "3mf", "ply", "step", "stp", "iges", "igs",
];

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mkv"];

/// Coarse file category used by the type filter and by icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Model,
    Archive,
    Audio,
    Video,
    Other,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Model => "model",
            FileKind::Archive => "archive",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Other => "other",
        }
    }
}

/// Folder identity derived from a display name: trimmed and lowercased.
///
/// Also the dedup key for folders, so "Acme" and " acme " collapse to one.
pub fn normalize_folder_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lowercased extension without the dot, if the name has a usable one.
fn extension_of(name: &str) -> Option<String> {
    let name = name.trim();
    let idx = name.rfind('.')?;
    if idx == 0 || idx == name.len() - 1 {
        return None;
    }
    Some(name[idx + 1..].to_lowercase())
}

/// Extension badge shown next to file names: `"model.STL"` -> `"STL"`.
///
/// Empty for names without an extension, with a trailing dot, or dotfiles.
pub fn extension_badge(name: &str) -> String {
    extension_of(name)
        .map(|ext| ext.to_uppercase())
        .unwrap_or_default()
}

fn is_generic_mime(mime: &str) -> bool {
    mime.is_empty() || mime == "application/octet-stream" || mime == "binary/octet-stream"
}

fn classify_mime(mime: &str) -> Option<FileKind> {
    if is_generic_mime(mime) {
        return None;
    }
    if mime.starts_with("image/") {
        Some(FileKind::Image)
    } else if mime.contains("pdf") {
        Some(FileKind::Pdf)
    } else if MODEL_MIME_HINTS.iter().any(|hint| mime.contains(hint)) || mime.starts_with("model/") {
        Some(FileKind::Model)
    } else if mime.contains("zip") || mime.contains("rar") {
        Some(FileKind::Archive)
    } else if mime.starts_with("audio/") {
        Some(FileKind::Audio)
    } else if mime.starts_with("video/") {
        Some(FileKind::Video)
    } else {
        None
    }
}

fn classify_extension(ext: &str) -> FileKind {
    if ext == "pdf" {
        FileKind::Pdf
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        FileKind::Image
    } else if MODEL_EXTENSIONS.contains(&ext) {
        FileKind::Model
    } else if ARCHIVE_EXTENSIONS.contains(&ext) {
        FileKind::Archive
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        FileKind::Audio
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        FileKind::Video
    } else {
        FileKind::Other
    }
}

/// Classify a file from its declared MIME hint, falling back to the extension
/// when the hint is absent, generic, or unrecognized.
pub fn classify_file(file: &FileItem) -> FileKind {
    let mime = file.file_type.trim().to_lowercase();
    if let Some(kind) = classify_mime(&mime) {
        return kind;
    }
    extension_of(&file.name)
        .map(|ext| classify_extension(&ext))
        .unwrap_or(FileKind::Other)
}

/// MIME hint assigned to listed files; only a handful of types are recognized.
pub fn infer_file_type(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("png" | "jpg" | "jpeg" | "gif" | "webp") => "image/*",
        Some("stl" | "slt" | "obj" | "gltf" | "glb") => "model/3d",
        _ => "",
    }
}

/// Whether the inline 3D viewer can open this item (STL meshes only).
pub fn supports_3d_preview(item: &Item) -> bool {
    let Some(file) = item.as_file() else {
        return false;
    };
    if file.file_path.is_empty() {
        return false;
    }
    let name = file.name.to_lowercase();
    name.ends_with(".stl") || name.ends_with(".slt") || file.file_type.to_lowercase().contains("stl")
}
