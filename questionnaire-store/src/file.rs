use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Map a partition key to a file name stem.
///
/// `[A-Za-z0-9_-]` is kept as is; every other byte of the UTF-8 key is
/// written as `%XX`. The mapping is one-to-one, so distinct keys never share
/// a file and `table_name` recovers the key. The empty key becomes `%`.
pub(crate) fn file_stem(table: &str) -> String {
    if table.is_empty() {
        return "%".to_string();
    }
    let mut stem = String::with_capacity(table.len());
    for byte in table.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-') {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}

/// The partition key a file stem was written for, if it is one of ours.
pub(crate) fn table_name(stem: &str) -> Option<String> {
    if stem == "%" {
        return Some(String::new());
    }
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem.as_bytes();
    while let Some((&first, tail)) = rest.split_first() {
        if first == b'%' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else if first.is_ascii_alphanumeric() || matches!(first, b'_' | b'-') {
            bytes.push(first);
            rest = tail;
        } else {
            return None;
        }
    }
    String::from_utf8(bytes).ok()
}

/// The path of a table file inside `directory`.
pub(crate) fn table_path(directory: &Path, table: &str, extension: &str) -> PathBuf {
    directory.join(format!("{}.{extension}", file_stem(table)))
}

/// Read a file, treating a missing file as empty.
pub(crate) fn read_or_empty(path: &Path) -> io::Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

/// Replace `path` with `contents` in one step.
///
/// The contents go to a temporary file in the same directory first, which is
/// then renamed over the target. A failure leaves the old file untouched.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory)?;

    let mut temp = NamedTempFile::new_in(directory)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Partition keys of the table files in `directory` with the given
/// extension, sorted. Files whose names are not an encoded key are skipped.
pub(crate) fn list_tables(directory: &Path, extension: &str) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut tables = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(table) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(table_name)
        {
            tables.push(table);
        }
    }
    tables.sort();
    Ok(tables)
}
