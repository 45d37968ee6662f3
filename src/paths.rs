use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::constants::{FIXED_TOKEN_ATTEMPTS, FIXED_TOKEN_LEN};

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FIXED_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Derive a fresh path for a fixed copy of `path`.
///
/// The result is `path` followed by an 8-character random token and then the
/// original extension again, e.g. `tas.nc` -> `tas.ncQ3v9ZkT1.nc`. A candidate
/// that already exists on disk is discarded and a new token drawn.
pub fn fixed_filepath(path: &Path) -> PathBuf {
    let extension = dotted_extension(path);
    let mut candidate = with_token(path, &random_token(), &extension);
    for _ in 1..FIXED_TOKEN_ATTEMPTS {
        if !candidate.exists() {
            break;
        }
        candidate = with_token(path, &random_token(), &extension);
    }
    candidate
}

/// Like [`fixed_filepath`] but also creates the file, so the name is reserved
/// by the time it is returned. A token whose file already exists is redrawn.
pub fn create_fixed_file(path: &Path) -> io::Result<(PathBuf, File)> {
    let extension = dotted_extension(path);
    let mut last_err = None;
    for _ in 0..FIXED_TOKEN_ATTEMPTS {
        let candidate = with_token(path, &random_token(), &extension);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::from(ErrorKind::AlreadyExists)))
}

fn dotted_extension(path: &Path) -> OsString {
    path.extension()
        .map(|ext| {
            let mut dotted = OsString::from(".");
            dotted.push(ext);
            dotted
        })
        .unwrap_or_default()
}

fn with_token(path: &Path, token: &str, extension: &OsString) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(token);
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fixed_filepath_contract() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("file.nc");
        let original = filepath.to_str().unwrap();

        let fixed = fixed_filepath(&filepath);
        let fixed = fixed.to_str().unwrap();

        assert!(fixed.starts_with(original));
        assert!(fixed.ends_with(".nc"));
        assert_eq!(fixed.len(), original.len() + 11);
    }

    #[test]
    fn test_fixed_filepath_without_extension() {
        let fixed = fixed_filepath(Path::new("/data/sample_filepath"));
        let fixed = fixed.to_str().unwrap();
        assert!(fixed.starts_with("/data/sample_filepath"));
        assert_eq!(fixed.len(), "/data/sample_filepath".len() + FIXED_TOKEN_LEN);
    }

    #[test]
    fn test_create_fixed_file_reserves_fresh_names() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tas.json");
        std::fs::write(&source, "{}").unwrap();

        let created: HashSet<PathBuf> = (0..50)
            .map(|_| create_fixed_file(&source).unwrap().0)
            .collect();

        assert_eq!(created.len(), 50);
        assert!(created.iter().all(|p| p.exists() && p.starts_with(dir.path())));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 51);
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "{}");
    }

    #[test]
    fn test_repeated_derivations_do_not_collide() {
        let path = Path::new("/data/tas_Amon_BNU-ESM.json");
        let paths: HashSet<PathBuf> = (0..200).map(|_| fixed_filepath(path)).collect();
        assert_eq!(paths.len(), 200);
    }
}
