use crate::config::ToolsConfig;
use crate::error::{AppError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Availability of one external tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Status of the tools the adapter needs
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub ffmpeg: ToolInfo,
    pub ffprobe: ToolInfo,
}

impl DependencyStatus {
    /// Check all dependencies
    pub fn check(tools: &ToolsConfig) -> Self {
        Self {
            ffmpeg: check_tool("ffmpeg", tools.ffmpeg_path.as_deref()),
            ffprobe: check_tool("ffprobe", tools.ffprobe_path.as_deref()),
        }
    }

    pub fn all_available(&self) -> bool {
        self.ffmpeg.available && self.ffprobe.available
    }
}

/// Resolve a tool to an executable path.
///
/// A configured path wins when it exists; otherwise the tool is looked up on PATH.
pub fn resolve_tool(name: &str, configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "Configured {} path {} does not exist, searching PATH",
            name,
            path.display()
        );
    }

    which::which(name).map_err(|e| AppError::dependency(name, e.to_string()))
}

/// Check if a tool resolves and answers `-version`
pub fn check_tool(name: &str, configured: Option<&Path>) -> ToolInfo {
    let Ok(path) = resolve_tool(name, configured) else {
        return ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    let output = Command::new(&path)
        .arg("-version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) if output.status.success() => ToolInfo {
            name: name.to_string(),
            available: true,
            version: String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string()),
            path: Some(path),
        },
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: Some(path),
        },
    }
}
