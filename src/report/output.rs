//! Report file output with path resolution and fallbacks.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};

use super::error::ReportError;

/// File name used when no output path is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "markdown-result.md";

/// Environment variable naming the report path.
pub const OUTPUT_PATH_ENV: &str = "MARKDOWN_OUTPUT_PATH";

/// Marker printed before a report that could not be written.
pub const OUTPUT_START_MARKER: &str = "--- MARKDOWN_OUTPUT_START ---";

/// Marker printed after a report that could not be written.
pub const OUTPUT_END_MARKER: &str = "--- MARKDOWN_OUTPUT_END ---";

/// Environment facts that influence where the report goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputEnvironment {
    /// Value of `MARKDOWN_OUTPUT_PATH`.
    pub output_path: Option<String>,
    /// Whether `GITHUB_ACTIONS` is `true`.
    pub github_actions: bool,
    /// Value of `GITHUB_WORKSPACE`.
    pub workspace: Option<String>,
    /// System temporary directory.
    pub temp_dir: Utf8PathBuf,
}

impl OutputEnvironment {
    /// Reads the environment of the current process.
    #[must_use]
    pub fn from_process() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());
        Self {
            output_path: non_empty(OUTPUT_PATH_ENV),
            github_actions: env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true"),
            workspace: non_empty("GITHUB_WORKSPACE"),
            temp_dir: Utf8PathBuf::from_path_buf(env::temp_dir())
                .unwrap_or_else(|_| Utf8PathBuf::from("/tmp")),
        }
    }
}

/// Chooses the report path.
///
/// Precedence: the configured path, `MARKDOWN_OUTPUT_PATH`, the workspace
/// inside GitHub Actions, the temporary directory inside GitHub Actions
/// without a workspace, and finally [`DEFAULT_OUTPUT_FILE`].
#[must_use]
pub fn resolve_output_path(
    configured: Option<&Utf8Path>,
    environment: &OutputEnvironment,
) -> Utf8PathBuf {
    if let Some(path) = configured.filter(|path| !path.as_str().is_empty()) {
        tracing::info!("Using output path from configuration: {path}");
        return path.to_owned();
    }

    if let Some(path) = environment.output_path.as_deref() {
        tracing::info!("Using output path from {OUTPUT_PATH_ENV}: {path}");
        return Utf8PathBuf::from(path);
    }

    if environment.github_actions {
        if let Some(workspace) = environment.workspace.as_deref() {
            let path = Utf8Path::new(workspace).join(DEFAULT_OUTPUT_FILE);
            tracing::info!("In GitHub Actions, using workspace path: {path}");
            return path;
        }
        let path = environment.temp_dir.join(DEFAULT_OUTPUT_FILE);
        tracing::info!("In GitHub Actions but no workspace, using temp dir: {path}");
        return path;
    }

    tracing::info!("Using default output path: {DEFAULT_OUTPUT_FILE}");
    Utf8PathBuf::from(DEFAULT_OUTPUT_FILE)
}

/// Where a report ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrittenReport {
    /// Written to the requested path.
    Primary(Utf8PathBuf),
    /// Written to the file name inside the fallback directory.
    Fallback(Utf8PathBuf),
}

impl WrittenReport {
    /// Path of the written file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Primary(path) | Self::Fallback(path) => path,
        }
    }
}

/// Writes `content` to `path`, falling back to the bare file name in the
/// current directory.
///
/// # Errors
///
/// Returns [`ReportError::Write`] when neither location can be written.
pub fn write_report(path: &Utf8Path, content: &str) -> Result<WrittenReport, ReportError> {
    write_report_with_fallback(path, content, Utf8Path::new("."))
}

/// Writes `content` to `path`, falling back to the bare file name inside
/// `fallback_dir`.
///
/// Missing parent directories are created. Files are created with mode
/// `0600` on Unix.
///
/// # Errors
///
/// Returns [`ReportError::Write`] when neither location can be written.
pub fn write_report_with_fallback(
    path: &Utf8Path,
    content: &str,
    fallback_dir: &Utf8Path,
) -> Result<WrittenReport, ReportError> {
    tracing::info!("Writing markdown results to {path}");
    let Err(primary_error) = write_private_file(path, content) else {
        return Ok(WrittenReport::Primary(path.to_owned()));
    };
    tracing::warn!("Error writing markdown results to file {path}: {primary_error}");

    let file_name = path.file_name().unwrap_or(DEFAULT_OUTPUT_FILE);
    let fallback = fallback_dir.join(file_name);
    tracing::info!("Attempting to write to fallback location: {fallback}");
    write_private_file(&fallback, content).map_err(|error| ReportError::Write {
        path: fallback.to_string(),
        message: error.to_string(),
    })?;
    Ok(WrittenReport::Fallback(fallback))
}

/// Wraps `content` in the start and end markers.
#[must_use]
pub fn marked_output(content: &str) -> String {
    format!("\n{OUTPUT_START_MARKER}\n{content}\n{OUTPUT_END_MARKER}\n")
}

fn write_private_file(path: &Utf8Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path
        .parent()
        .filter(|parent| !matches!(parent.as_str(), "" | "." | "/"))
    {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::rstest;
    use tempfile::TempDir;

    use super::{
        OutputEnvironment, WrittenReport, marked_output, resolve_output_path,
        write_report_with_fallback,
    };

    fn environment(
        output_path: Option<&str>,
        github_actions: bool,
        workspace: Option<&str>,
    ) -> OutputEnvironment {
        OutputEnvironment {
            output_path: output_path.map(str::to_owned),
            github_actions,
            workspace: workspace.map(str::to_owned),
            temp_dir: Utf8PathBuf::from("/tmp"),
        }
    }

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir is UTF-8")
    }

    #[rstest]
    #[case::configured_wins(Some("flag.md"), environment(Some("env.md"), true, Some("/ws")), "flag.md")]
    #[case::environment_variable(None, environment(Some("env.md"), true, Some("/ws")), "env.md")]
    #[case::actions_workspace(None, environment(None, true, Some("/ws")), "/ws/markdown-result.md")]
    #[case::actions_without_workspace(None, environment(None, true, None), "/tmp/markdown-result.md")]
    #[case::workspace_outside_actions(None, environment(None, false, Some("/ws")), "markdown-result.md")]
    #[case::default(None, environment(None, false, None), "markdown-result.md")]
    fn output_path_precedence(
        #[case] configured: Option<&str>,
        #[case] env: OutputEnvironment,
        #[case] expected: &str,
    ) {
        let path = resolve_output_path(configured.map(Utf8Path::new), &env);
        assert_eq!(path.as_str(), expected);
    }

    #[test]
    fn writes_to_the_requested_path_creating_directories() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8_dir(&dir);
        let target = root.join("reports/nested/out.md");

        let written = write_report_with_fallback(&target, "# report\n", &root)
            .expect("write succeeds");

        assert_eq!(written, WrittenReport::Primary(target.clone()));
        let content = std::fs::read_to_string(&target).expect("file readable");
        assert_eq!(content, "# report\n");
    }

    #[cfg(unix)]
    #[test]
    fn report_files_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("temp dir");
        let root = utf8_dir(&dir);
        let target = root.join("out.md");

        write_report_with_fallback(&target, "content", &root).expect("write succeeds");

        let mode = std::fs::metadata(&target)
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn falls_back_to_the_file_name_when_the_path_is_unusable() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8_dir(&dir);
        let blocker = root.join("blocker");
        std::fs::write(&blocker, "not a directory").expect("blocker written");
        let target = blocker.join("out.md");
        let fallback_dir = root.join("fallback");
        std::fs::create_dir(&fallback_dir).expect("fallback dir");

        let written = write_report_with_fallback(&target, "content", &fallback_dir)
            .expect("fallback succeeds");

        assert_eq!(written, WrittenReport::Fallback(fallback_dir.join("out.md")));
        assert_eq!(written.path(), fallback_dir.join("out.md").as_path());
    }

    #[test]
    fn fails_when_both_locations_are_unusable() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8_dir(&dir);
        let blocker = root.join("blocker");
        std::fs::write(&blocker, "not a directory").expect("blocker written");

        let result =
            write_report_with_fallback(&blocker.join("out.md"), "content", &blocker);

        assert!(result.is_err(), "expected failure, got {result:?}");
    }

    #[test]
    fn marked_output_wraps_the_content() {
        assert_eq!(
            marked_output("body"),
            "\n--- MARKDOWN_OUTPUT_START ---\nbody\n--- MARKDOWN_OUTPUT_END ---\n"
        );
    }
}
