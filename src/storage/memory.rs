use crate::config::TreeFormat;
use crate::storage::traits::{index_line, Storage, StorageResult};
use std::collections::BTreeMap;

/// Keeps crawl output in memory
///
/// Useful for embedding the crawler and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: BTreeMap<u32, String>,
    index: Vec<String>,
    tree: Option<(TreeFormat, String)>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content stored for page `id`
    pub fn content(&self, id: u32) -> Option<&str> {
        self.contents.get(&id).map(String::as_str)
    }

    /// Index lines in the order they were appended
    pub fn index_lines(&self) -> &[String] {
        &self.index
    }

    /// The last tree report written, if any
    pub fn tree(&self) -> Option<(TreeFormat, &str)> {
        self.tree
            .as_ref()
            .map(|(format, report)| (*format, report.as_str()))
    }
}

impl Storage for MemoryStorage {
    fn write_content(&mut self, id: u32, content: &str) -> StorageResult<()> {
        self.contents.insert(id, content.to_string());
        Ok(())
    }

    fn append_index(&mut self, id: u32, url: &str) -> StorageResult<()> {
        self.index.push(index_line(id, url));
        Ok(())
    }

    fn write_tree(&mut self, report: &str, format: TreeFormat) -> StorageResult<()> {
        self.tree = Some((format, report.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_records_everything() {
        let mut storage = MemoryStorage::new();
        storage.write_content(1, "body").unwrap();
        storage.append_index(1, "https://a.com/").unwrap();
        storage.write_tree("A", TreeFormat::Text).unwrap();

        assert_eq!(storage.content(1), Some("body"));
        assert_eq!(storage.content(2), None);
        assert_eq!(storage.index_lines(), ["1 https://a.com/"]);
        assert_eq!(storage.tree(), Some((TreeFormat::Text, "A")));
    }

    #[test]
    fn test_works_through_mutable_reference() {
        fn append<S: Storage>(mut sink: S) {
            sink.append_index(3, "https://a.com/c").unwrap();
        }

        let mut storage = MemoryStorage::new();
        append(&mut storage);
        assert_eq!(storage.index_lines(), ["3 https://a.com/c"]);
    }
}
