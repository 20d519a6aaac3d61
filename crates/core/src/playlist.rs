//! `.m3u8` playlist maintenance.
//!
//! Per-playlist files hold one line per playlist position, so items can be
//! placed in any order and a rerun rewrites the same line. The aggregate
//! batch playlist lists every placed file in batch order.

use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::placer::PlacerError;

/// Path of `media` as written in a playlist stored at `playlist`.
///
/// Entries are relative to the playlist's folder. When no relative path
/// exists (one path absolute and the other not, or a different drive) the
/// media path is written as given.
pub fn playlist_entry(playlist: &Path, media: &Path) -> String {
    let parent = playlist.parent().unwrap_or(Path::new(""));
    match relative_to(parent, media) {
        Some(relative) => to_posix(&relative),
        None => to_posix(media),
    }
}

fn relative_to(base: &Path, path: &Path) -> Option<PathBuf> {
    if base.has_root() != path.has_root() {
        return None;
    }
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let path: Vec<Component> = path.components().filter(|c| *c != Component::CurDir).collect();
    let shared = base
        .iter()
        .zip(&path)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for component in &base[shared..] {
        match component {
            Component::Normal(_) => relative.push(".."),
            // Unknown directory names behind `..` or a drive switch.
            _ => return None,
        }
    }
    for component in &path[shared..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}

fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Writes `media` at 1-based `position` of the playlist file, padding with
/// blank lines as needed. Returns the written entry.
pub async fn update_playlist(
    playlist: &Path,
    media: &Path,
    position: u32,
) -> Result<String, PlacerError> {
    if let Some(parent) = playlist.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| PlacerError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    let entry = playlist_entry(playlist, media);
    let mut lines: Vec<String> = match fs::read_to_string(playlist).await {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let index = position.max(1) as usize - 1;
    if lines.len() <= index {
        lines.resize(index + 1, String::new());
    }
    lines[index] = entry.clone();

    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(playlist, content).await?;

    debug!(playlist = %playlist.display(), position, entry = %entry, "Playlist updated");
    Ok(entry)
}

/// Writes the aggregate playlist of a batch.
pub async fn write_aggregate_playlist(
    playlist: &Path,
    media: &[PathBuf],
) -> Result<(), PlacerError> {
    if let Some(parent) = playlist.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut content = String::from("#EXTM3U\n");
    for path in media {
        content.push_str(&playlist_entry(playlist, path));
        content.push('\n');
    }
    fs::write(playlist, content).await?;

    debug!(playlist = %playlist.display(), entries = media.len(), "Aggregate playlist written");
    Ok(())
}
