// ImageRef - platform/camera.rs
//
// Camera capture channel.
//
// Two backends:
//   - The capture dialog: a native single-file picker opened in the user's
//     Pictures directory, where desktop camera apps save their shots. Runs on
//     the UI thread like every other rfd dialog.
//   - `CommandCapture`: an external program from `[camera] capture_command`
//     (e.g. `fswebcam --no-banner {output}`) run on a worker thread.
//
// Either way, backing out produces no image and no error.

use crate::app::ingest::{CaptureDevice, CapturedFile};
use crate::util::constants;
use crate::util::error::CaptureError;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

/// Open the capture dialog. Returns `None` if the user cancels.
pub fn pick_capture_file() -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Take Photo")
        .add_filter("Images", constants::SUPPORTED_EXTENSIONS);

    let user_dirs = directories::UserDirs::new();
    if let Some(pictures) = user_dirs.as_ref().and_then(|dirs| dirs.picture_dir()) {
        dialog = dialog.set_directory(pictures);
    }

    let picked = dialog.pick_file();
    if picked.is_none() {
        tracing::debug!("Capture dialog cancelled");
    }
    picked
}

/// Takes a photo by running an external capture program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
}

impl CommandCapture {
    /// Split a whitespace-separated command line.
    ///
    /// `{output}` anywhere in the arguments is replaced with the path the
    /// photo should be written to. Quoting is not supported.
    pub fn parse(command: &str) -> Result<Self, CaptureError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(CaptureError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments with `{output}` substituted.
    fn args_for(&self, output: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(constants::CAPTURE_OUTPUT_PLACEHOLDER, output))
            .collect()
    }
}

impl CaptureDevice for CommandCapture {
    fn capture(&self) -> Result<Option<CapturedFile>, CaptureError> {
        let output = capture_output_path();
        let output_str = output.to_string_lossy().into_owned();

        tracing::debug!(program = %self.program, output = %output.display(), "Running capture command");

        let status = Command::new(&self.program)
            .args(self.args_for(&output_str))
            .status()
            .map_err(|source| CaptureError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            let _ = std::fs::remove_file(&output);
            return Err(CaptureError::Failed {
                program: self.program.clone(),
                code: status.code(),
            });
        }

        // A program that exits cleanly without writing anything was backed out of.
        let written = std::fs::metadata(&output)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false);
        if !written {
            let _ = std::fs::remove_file(&output);
            return Ok(None);
        }

        Ok(Some(CapturedFile {
            path: output,
            temporary: true,
        }))
    }
}

/// A fresh temporary path for one capture.
fn capture_output_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!(
        "imageref-capture-{}-{nanos}.{}",
        std::process::id(),
        constants::CAPTURE_OUTPUT_EXTENSION
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_program_and_args() {
        let cap = CommandCapture::parse("  fswebcam --no-banner {output} ").unwrap();
        assert_eq!(cap.program(), "fswebcam");
        assert_eq!(
            cap.args_for("/tmp/x.jpg"),
            vec!["--no-banner".to_string(), "/tmp/x.jpg".to_string()]
        );
    }

    #[test]
    fn test_parse_empty_command() {
        assert!(matches!(
            CommandCapture::parse("   "),
            Err(CaptureError::EmptyCommand)
        ));
    }

    #[test]
    fn test_placeholder_inside_argument_is_substituted() {
        let cap = CommandCapture::parse("snap --out={output}").unwrap();
        assert_eq!(cap.args_for("a.jpg"), vec!["--out=a.jpg".to_string()]);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let cap = CommandCapture::parse("imageref-no-such-capture-program {output}").unwrap();
        assert!(matches!(cap.capture(), Err(CaptureError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_program_writing_nothing_is_a_cancel() {
        let cap = CommandCapture::parse("true {output}").unwrap();
        assert!(matches!(cap.capture(), Ok(None)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_reported() {
        let cap = CommandCapture::parse("false {output}").unwrap();
        assert!(matches!(
            cap.capture(),
            Err(CaptureError::Failed { code: Some(1), .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_program_output_is_returned_as_temporary() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("shot.jpg");
        std::fs::write(&src, b"not really a jpeg").unwrap();

        let cap = CommandCapture::parse(&format!("cp {} {{output}}", src.display())).unwrap();
        let file = cap.capture().unwrap().expect("capture should produce a file");
        assert!(file.temporary);
        assert_eq!(std::fs::read(&file.path).unwrap(), b"not really a jpeg");
        std::fs::remove_file(&file.path).unwrap();
    }
}
