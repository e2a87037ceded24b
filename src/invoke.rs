use std::{
    fmt,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::core::FrameIndex;

/// The external renderer binary, invoked once per frame as `<exe> <ini-path>`.
#[derive(Clone, Debug)]
pub struct Renderer {
    exe: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    Ok,
    /// Non-zero exit; code is `None` when the process was killed by a signal.
    Failed(Option<i32>),
    SpawnFailed(String),
}

impl RenderStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, RenderStatus::Ok)
    }
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStatus::Ok => write!(f, "ok"),
            RenderStatus::Failed(Some(code)) => write!(f, "exit code {code}"),
            RenderStatus::Failed(None) => write!(f, "terminated by signal"),
            RenderStatus::SpawnFailed(msg) => write!(f, "spawn failed: {msg}"),
        }
    }
}

/// One frame's invocation record. Failures are recorded, never propagated,
/// so a bad frame does not abort the rest of the batch.
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    pub frame: FrameIndex,
    pub status: RenderStatus,
    pub stderr: String,
}

impl Renderer {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    pub fn is_available(&self) -> bool {
        self.exe.is_file()
    }

    /// Synchronous, blocking invocation with captured stdout/stderr.
    pub fn render(&self, frame: FrameIndex, ini_path: &Path) -> FrameOutcome {
        match Command::new(&self.exe)
            .arg(ini_path)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                let status = if output.status.success() {
                    RenderStatus::Ok
                } else {
                    tracing::warn!(
                        frame = frame.0,
                        status = %output.status,
                        stderr = stderr.trim(),
                        "renderer exited with failure"
                    );
                    RenderStatus::Failed(output.status.code())
                };
                FrameOutcome {
                    frame,
                    status,
                    stderr,
                }
            }
            Err(e) => {
                tracing::warn!(frame = frame.0, error = %e, "failed to spawn renderer");
                FrameOutcome {
                    frame,
                    status: RenderStatus::SpawnFailed(e.to_string()),
                    stderr: String::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn spawn_failure_is_recorded_not_propagated() {
        let r = Renderer::new("/no/such/renderer/binary");
        assert!(!r.is_available());

        let outcome = r.render(FrameIndex(3), &PathBuf::from("frame3.ini"));
        assert_eq!(outcome.frame, FrameIndex(3));
        assert!(!outcome.status.is_ok());
        assert!(matches!(outcome.status, RenderStatus::SpawnFailed(_)));
    }

    #[test]
    fn status_display_is_readable() {
        assert_eq!(RenderStatus::Ok.to_string(), "ok");
        assert_eq!(RenderStatus::Failed(Some(2)).to_string(), "exit code 2");
        assert_eq!(
            RenderStatus::Failed(None).to_string(),
            "terminated by signal"
        );
        assert!(
            RenderStatus::SpawnFailed("nope".into())
                .to_string()
                .contains("nope")
        );
    }
}
