use std::path::Path;

pub fn assert_file_bytes(path: &Path, expected: &[u8]) {
    let actual = std::fs::read(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    assert_eq!(actual.len(), expected.len(), "Size mismatch for {}", path.display());
    assert!(actual == expected, "Content mismatch for {}", path.display());
}

/// Nothing but the given file names may be left in the folder
pub fn assert_folder_contains_only(folder: &Path, expected: &[&str]) {
    let mut names: Vec<String> = std::fs::read_dir(folder)
        .expect("Failed to list folder")
        .map(|entry| entry.expect("Bad dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let mut expected: Vec<String> = expected.iter().map(|name| name.to_string()).collect();
    expected.sort();

    assert_eq!(names, expected, "Unexpected files in {}", folder.display());
}
