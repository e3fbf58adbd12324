//! Filesystem helpers built on `cap-std` and `camino`.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path using ambient authority.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Resolve an ambient directory for the given path and return the directory
/// with the file name.
fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file.
pub(crate) fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace")
    }

    #[rstest]
    fn distinguishes_files_from_directories() {
        let tmp = TempDir::new().expect("tempdir");
        let file = root(&tmp).join("request.json");
        std::fs::write(&file, b"{}").expect("write file");

        let dir = root(&tmp).join("nested");
        std::fs::create_dir(&dir).expect("create dir");

        assert!(file_is_file(&file).expect("inspect file"));
        assert!(!file_is_file(&dir).expect("inspect dir"));
        let err = file_is_file(&root(&tmp).join("missing.json")).expect_err("missing path");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn opens_existing_files() {
        let tmp = TempDir::new().expect("tempdir");
        let file = root(&tmp).join("plan.json");
        std::fs::write(&file, b"[]").expect("write file");

        assert!(open_utf8_file(&file).is_ok());
    }
}
