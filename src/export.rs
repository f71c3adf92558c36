use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::renderer::SceneRenderer;
use crate::scene::Scene;

/// Receives the encoded PNG under the user-chosen filename
pub trait DownloadSink {
    fn deliver(&mut self, filename: &str, png: Vec<u8>) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Empty filename or no live renderer; nothing was encoded
    Skipped,
    Delivered { bytes: usize },
}

/// Rasterize the scene once and hand it to `sink`.
///
/// `live` is `None` until a renderer has been acquired, in which case the
/// export is skipped like an empty filename.
pub fn export_png<R: SceneRenderer + ?Sized>(
    filename: &str,
    live: Option<(&Scene, &mut R)>,
    sink: &mut dyn DownloadSink,
) -> Result<ExportOutcome, ExportError> {
    let filename = filename.trim();
    if filename.is_empty() {
        log::debug!("Export skipped: empty filename");
        return Ok(ExportOutcome::Skipped);
    }
    let Some((scene, renderer)) = live else {
        log::debug!("Export of {} skipped: no renderer", filename);
        return Ok(ExportOutcome::Skipped);
    };

    let png = renderer.encode_png(scene)?;
    let bytes = png.len();
    sink.deliver(filename, png)?;
    log::info!("💾 Exported {} ({} bytes)", filename, bytes);
    Ok(ExportOutcome::Delivered { bytes })
}

/// Writes exports into a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where `filename` ends up; `.png` is appended when it has no extension
    pub fn target_path(&self, filename: &str) -> PathBuf {
        let mut path = self.dir.join(filename);
        if Path::new(filename).extension().is_none() {
            path.set_extension("png");
        }
        path
    }
}

impl DownloadSink for FileSink {
    fn deliver(&mut self, filename: &str, png: Vec<u8>) -> Result<(), ExportError> {
        let path = self.target_path(filename);
        fs::write(&path, png).map_err(|source| ExportError::Delivery {
            filename: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path_adds_extension() {
        let sink = FileSink::new("/tmp/exports");
        assert_eq!(sink.target_path("out"), PathBuf::from("/tmp/exports/out.png"));
        assert_eq!(sink.target_path("out.png"), PathBuf::from("/tmp/exports/out.png"));
        assert_eq!(sink.target_path("photo.jpeg"), PathBuf::from("/tmp/exports/photo.jpeg"));
    }

    #[test]
    fn test_file_sink_writes_bytes() {
        let dir = std::env::temp_dir().join(format!("sketchboard-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mut sink = FileSink::new(&dir);

        sink.deliver("drawing", vec![1, 2, 3]).unwrap();
        assert_eq!(fs::read(dir.join("drawing.png")).unwrap(), vec![1, 2, 3]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir_is_delivery_error() {
        let mut sink = FileSink::new("/nonexistent/sketchboard/dir");
        let err = sink.deliver("x", Vec::new()).unwrap_err();
        assert!(matches!(err, ExportError::Delivery { .. }));
    }
}
