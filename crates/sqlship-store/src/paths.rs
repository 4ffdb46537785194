//! Timestamped file names derived from the store prefix

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Format used for every timestamp embedded in a file name
pub const FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `<prefix>_<stamp>.sqlite`, the store file for a run started at `now`
pub fn store_path(prefix: &Path, now: DateTime<Local>) -> PathBuf {
    with_suffix(prefix, &format!("_{}.sqlite", now.format(FILE_STAMP_FORMAT)))
}

/// `<prefix>_backup_<stamp>.sqlite`, the temporary snapshot for a run
pub fn snapshot_path(prefix: &Path, now: DateTime<Local>) -> PathBuf {
    with_suffix(
        prefix,
        &format!("_backup_{}.sqlite", now.format(FILE_STAMP_FORMAT)),
    )
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_store_path() {
        let path = store_path(Path::new("data/people"), fixed_time());
        assert_eq!(path, PathBuf::from("data/people_2024-03-09_14-05-07.sqlite"));
    }

    #[test]
    fn test_snapshot_path() {
        let path = snapshot_path(Path::new("data/people"), fixed_time());
        assert_eq!(
            path,
            PathBuf::from("data/people_backup_2024-03-09_14-05-07.sqlite")
        );
    }
}
