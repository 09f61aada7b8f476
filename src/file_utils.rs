use anyhow::{Context, Result};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with a specific suffix under a directory, skipping anything
    /// that lives below one of the excluded paths or equals one of them.
    ///
    /// The suffix comparison covers the whole file name tail (".txt" matches
    /// "notes.txt"), not just the extension, because corpus inputs may use
    /// compound suffixes like ".src.txt". Results come back sorted so corpus
    /// iteration order is stable across platforms.
    pub fn find_files_with_suffix<P: AsRef<Path>>(
        dir: P,
        suffix: &str,
        excludes: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let name = match path.file_name() {
                Some(name) => name.to_string_lossy(),
                None => continue,
            };

            if !name.ends_with(suffix) {
                continue;
            }

            if excludes.iter().any(|ex| path == ex || path.starts_with(ex)) {
                continue;
            }

            result.push(path.to_path_buf());
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file as a list of lines, trimmed of line terminators
    pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let content = Self::read_to_string(&path)?;
        Ok(content.lines().map(|line| line.to_string()).collect())
    }

    /// Write a list of lines to a file, newline-joined with a trailing
    /// newline, creating parent directories as needed. Truncates any
    /// existing content; an empty list produces an empty file.
    pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let content = if lines.is_empty() {
            String::new()
        } else {
            let mut joined = lines.join("\n");
            joined.push('\n');
            joined
        };

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append a list of lines to a file, creating it if missing
    pub fn append_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open file for append: {:?}", path.as_ref()))?;

        for line in lines {
            writeln!(file, "{}", line)
                .with_context(|| format!("Failed to append to file: {:?}", path.as_ref()))?;
        }

        Ok(())
    }

    /// Delete a file if it exists; missing files are not an error
    pub fn remove_file_if_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {:?}", path))?;
        }
        Ok(())
    }
}
