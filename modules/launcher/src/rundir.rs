use std::fs;
use std::path::PathBuf;

use tracing::info;
use webscan_core::{timefmt, ScanConfig, ScanError};

/// Create the report and scanner-config directories. Idempotent.
pub fn setup_directories(config: &ScanConfig) -> Result<(), ScanError> {
    fs::create_dir_all(&config.report_dir)?;
    world_writable(&config.report_dir)?;
    fs::create_dir_all(config.config_dir())?;
    info!(
        report_dir = %config.report_dir.display(),
        config_dir = %config.config_dir().display(),
        "directories ready"
    );
    Ok(())
}

/// Create the timestamped run directory `<prefix>-<YYYYMMDD_HHMMSS>` for one
/// launch. World-writable because the scan runs as an unprivileged identity
/// inside the container.
pub fn create_run_dir(config: &ScanConfig) -> Result<PathBuf, ScanError> {
    let name = format!("{}-{}", config.run_prefix(), timefmt::timestamp_string());
    let dir = config.report_dir.join(name);
    fs::create_dir_all(&dir)?;
    world_writable(&dir)?;
    info!(run_dir = %dir.display(), "run directory created");
    Ok(dir)
}

#[cfg(unix)]
fn world_writable(path: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o777))
}

#[cfg(not(unix))]
fn world_writable(_path: &std::path::Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use webscan_core::ScanMode;

    fn cfg(dir: &std::path::Path, mode: ScanMode) -> ScanConfig {
        ScanConfig::new(mode, "http://app:8080", dir.join("report"))
    }

    #[test]
    fn run_dir_name_matches_pattern() {
        let tmp = tempfile::tempdir().unwrap();
        let config = cfg(tmp.path(), ScanMode::Pipeline);
        setup_directories(&config).unwrap();
        let dir = create_run_dir(&config).unwrap();
        let name = dir.file_name().unwrap().to_str().unwrap();
        let (prefix, stamp) = name.split_once('-').unwrap();
        assert_eq!(prefix, "fast");
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
        assert!(stamp[..8].bytes().all(|b| b.is_ascii_digit()));
        assert!(stamp[9..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn preset_stem_becomes_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = cfg(tmp.path(), ScanMode::Quick);
        config.preset_file = Some(PathBuf::from("/etc/presets/deep-sqli.json"));
        setup_directories(&config).unwrap();
        let dir = create_run_dir(&config).unwrap();
        let name = dir.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("deep-sqli-"));
    }

    #[cfg(unix)]
    #[test]
    fn run_dir_is_world_writable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let config = cfg(tmp.path(), ScanMode::Quick);
        setup_directories(&config).unwrap();
        let dir = create_run_dir(&config).unwrap();
        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o777);
    }

    #[test]
    fn setup_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let config = cfg(tmp.path(), ScanMode::Quick);
        setup_directories(&config).unwrap();
        setup_directories(&config).unwrap();
        assert!(config.config_dir().exists());
    }
}
