use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Hidden sibling used while a replacement is being written.
fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("{:?} does not name a file", path))?;
    let mut staged = std::ffi::OsString::from(".");
    staged.push(name);
    staged.push(".partial");
    Ok(path.with_file_name(staged))
}

/// Writes `content` next to `path` and renames it into place, so readers
/// never see a half-written report. The directory must already exist.
pub fn replace_file<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let staged = staging_path(path)?;

    let written = fs::File::create(&staged).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&staged);
        return Err(e).with_context(|| format!("Cannot stage {:?}", staged));
    }

    fs::rename(&staged, path).or_else(|e| {
        let _ = fs::remove_file(&staged);
        Err(e).with_context(|| format!("Cannot move {:?} into place", staged))
    })
}

/// Non-empty, trimmed lines of a results file. A file that cannot be read
/// yields no results.
pub fn read_result_lines<P: AsRef<Path>>(path: P) -> Vec<String> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Cannot read {:?}: {}", path, e);
            }
            return Vec::new();
        }
    };

    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_result_lines(dir.path().join("nope.txt")).is_empty());
    }

    #[test]
    fn strips_blank_lines_and_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.txt");
        fs::write(&path, "a\n\n  b  \n\n").unwrap();

        assert_eq!(read_result_lines(&path), vec!["a", "b"]);
    }

    #[test]
    fn keeps_duplicates_and_crlf_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.txt");
        fs::write(&path, "a.example.com\r\nb.example.com\r\nb.example.com\r\n").unwrap();

        assert_eq!(
            read_result_lines(&path),
            vec!["a.example.com", "b.example.com", "b.example.com"]
        );
    }

    #[test]
    fn replace_file_swaps_content_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        replace_file(&path, b"first run with a longer body\n").unwrap();
        replace_file(&path, b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!dir.path().join(".summary.txt.partial").exists());
    }

    #[test]
    fn replace_file_needs_an_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("summary.txt");

        assert!(replace_file(&path, b"x\n").is_err());
        assert!(!dir.path().join("gone").exists());
    }

    #[test]
    fn failed_rename_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(replace_file(&path, b"report\n").is_err());
        assert!(path.join("keep").exists());
        assert!(!dir.path().join(".summary.txt.partial").exists());
    }

    proptest! {
        #[test]
        fn count_ignores_order_and_blank_lines(
            lines in prop::collection::vec("[a-z0-9.]{1,12}", 0..20),
            blanks in 0usize..5,
            seed in any::<u64>(),
        ) {
            let dir = tempfile::tempdir().unwrap();
            let mut shuffled: Vec<String> = lines.clone();
            shuffled.extend(std::iter::repeat_n(String::from("   "), blanks));
            let len = shuffled.len();
            if len > 1 {
                shuffled.rotate_left((seed as usize) % len);
            }

            let forward = dir.path().join("forward.txt");
            let rotated = dir.path().join("rotated.txt");
            fs::write(&forward, lines.join("\n")).unwrap();
            fs::write(&rotated, shuffled.join("\n")).unwrap();

            prop_assert_eq!(read_result_lines(&forward).len(), lines.len());
            prop_assert_eq!(read_result_lines(&rotated).len(), lines.len());
        }
    }
}
