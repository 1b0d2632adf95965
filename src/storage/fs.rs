//! Filesystem output sink
//!
//! Layout under the output directory:
//!
//! ```text
//! urls.txt        one "<id> <url>" line per fetched page
//! data/<id>.html  raw content of each page
//! tree.txt        site tree (or tree.json), only when requested
//! ```

use crate::config::TreeFormat;
use crate::storage::traits::{index_line, Storage, StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the index file
pub const INDEX_FILE: &str = "urls.txt";

/// Name of the per-page content directory
pub const DATA_DIR: &str = "data";

/// Writes crawl output to a directory
#[derive(Debug)]
pub struct FsStorage {
    root: PathBuf,
    index: File,
}

impl FsStorage {
    /// Opens the output directory, removing the output of any previous run
    ///
    /// The directory itself is created if missing. `data/` is recreated empty
    /// and `urls.txt` is truncated.
    pub fn create(root: &Path) -> StorageResult<Self> {
        let prepare_err = |source| StorageError::Prepare {
            path: root.to_path_buf(),
            source,
        };

        fs::create_dir_all(root).map_err(prepare_err)?;
        remove_previous_output(root).map_err(prepare_err)?;
        fs::create_dir_all(root.join(DATA_DIR)).map_err(prepare_err)?;

        let index_path = root.join(INDEX_FILE);
        let index = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&index_path)
            .map_err(|source| StorageError::Write {
                path: index_path.clone(),
                source,
            })?;

        tracing::debug!("Output directory ready: {}", root.display());

        Ok(Self {
            root: root.to_path_buf(),
            index,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the content file for page `id`
    pub fn content_path(&self, id: u32) -> PathBuf {
        self.root.join(DATA_DIR).join(format!("{}.html", id))
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn tree_path(&self, format: TreeFormat) -> PathBuf {
        self.root.join(format!("tree.{}", format.extension()))
    }
}

impl Storage for FsStorage {
    fn write_content(&mut self, id: u32, content: &str) -> StorageResult<()> {
        let path = self.content_path(id);
        fs::write(&path, content).map_err(|source| StorageError::Write { path, source })
    }

    fn append_index(&mut self, id: u32, url: &str) -> StorageResult<()> {
        writeln!(self.index, "{}", index_line(id, url)).map_err(|source| StorageError::Write {
            path: self.index_path(),
            source,
        })
    }

    fn write_tree(&mut self, report: &str, format: TreeFormat) -> StorageResult<()> {
        let path = self.tree_path(format);
        fs::write(&path, report).map_err(|source| StorageError::Write { path, source })
    }
}

fn remove_previous_output(root: &Path) -> io::Result<()> {
    let data_dir = root.join(DATA_DIR);
    if data_dir.is_dir() {
        fs::remove_dir_all(&data_dir)?;
    }

    for format in [TreeFormat::Text, TreeFormat::Json] {
        remove_if_exists(&root.join(format!("tree.{}", format.extension())))?;
    }
    remove_if_exists(&root.join(INDEX_FILE))
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
