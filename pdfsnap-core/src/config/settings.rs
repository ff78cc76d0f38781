//! Tool settings: folder layout, viewer location and snapshot command

use std::path::PathBuf;

pub const DEFAULT_PROJECTS_DIR: &str = "projects";
pub const DEFAULT_SERVER_PROJECTS_DIR: &str = "pdfjs-3.4.120-dist/web/projects";
pub const DEFAULT_OUTPUT_DIR: &str = ".dist";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_VIEWER_PATH: &str = "/web/viewer.html?file=/web/projects";
pub const DEFAULT_BRANCH_PREFIX: &str = "DOC";
pub const DEFAULT_CONFIG_FILE_PREFIX: &str = "snapshots_";
pub const CONFIG_FILE_EXTENSION: &str = ".yml";
pub const DEFAULT_SNAPSHOT_COMMAND: &str = "npx percy snapshot";

/// Settings shared by every document of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// User projects, one sub-folder per project
    pub projects_dir: PathBuf,
    /// Folder served by the PDF viewer; receives a copy of `projects_dir`
    pub server_projects_dir: PathBuf,
    /// Folder receiving the generated snapshot configs
    pub output_dir: PathBuf,
    /// Viewer host
    pub host: String,
    /// Viewer port
    pub port: u16,
    /// Viewer page, relative to the base URL, up to the projects folder
    pub viewer_path: String,
    /// Prefix of document ids and branch names
    pub branch_prefix: String,
    /// File name prefix of generated snapshot configs
    pub config_file_prefix: String,
    /// Command invoked with the path of each generated config appended
    pub snapshot_command: String,
    /// Number of documents processed concurrently
    pub parallelism: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from(DEFAULT_PROJECTS_DIR),
            server_projects_dir: PathBuf::from(DEFAULT_SERVER_PROJECTS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            viewer_path: DEFAULT_VIEWER_PATH.to_string(),
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            config_file_prefix: DEFAULT_CONFIG_FILE_PREFIX.to_string(),
            snapshot_command: DEFAULT_SNAPSHOT_COMMAND.to_string(),
            parallelism: num_cpus::get().clamp(1, 8),
        }
    }
}

impl Settings {
    /// Base URL of the viewer server
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn with_projects_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.projects_dir = dir.into();
        self
    }

    pub fn with_server_projects_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.server_projects_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_branch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.branch_prefix = prefix.into();
        self
    }

    pub fn with_snapshot_command(mut self, command: impl Into<String>) -> Self {
        self.snapshot_command = command.into();
        self
    }

    /// Set the number of documents processed concurrently
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_url(), "http://localhost:8080");
        assert_eq!(settings.projects_dir, PathBuf::from("projects"));
        assert_eq!(settings.output_dir, PathBuf::from(".dist"));
        assert_eq!(settings.snapshot_command, "npx percy snapshot");
        assert!((1..=8).contains(&settings.parallelism));
    }

    #[test]
    fn test_builders() {
        let settings = Settings::default()
            .with_server("127.0.0.1", 9000)
            .with_branch_prefix("PDF")
            .with_parallelism(0);

        assert_eq!(settings.base_url(), "http://127.0.0.1:9000");
        assert_eq!(settings.branch_prefix, "PDF");
        assert_eq!(settings.parallelism, 1);
    }
}
