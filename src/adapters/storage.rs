use crate::domain::ports::SummarySink;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl SummarySink for LocalStorage {
    fn write_file(&self, name: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(name);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        Ok(full_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested").display().to_string());

        let path = storage.write_file("summary.csv", b"DATE,DAYS\n").unwrap();
        assert!(Path::new(&path).is_file());
        assert_eq!(fs::read(&path).unwrap(), b"DATE,DAYS\n");
    }
}
