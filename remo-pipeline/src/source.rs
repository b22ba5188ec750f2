use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

/// Blocking access to raw sequence text by path.
///
/// Implementations are called from blocking workers, never from the
/// async executor itself.
pub trait GeneSetSource: Send + Sync {
    fn load(&self, path: &str) -> io::Result<String>;
}

/// Filesystem source rooted at a data directory; `.gz` files are
/// decompressed transparently.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsSource { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl GeneSetSource for FsSource {
    fn load(&self, path: &str) -> io::Result<String> {
        let resolved = self.resolve(path);
        log::debug!("loading sequence file {}", resolved.display());

        if resolved.extension().is_some_and(|e| e == "gz") {
            let mut text = String::new();
            MultiGzDecoder::new(File::open(&resolved)?).read_to_string(&mut text)?;
            Ok(text)
        } else {
            std::fs::read_to_string(&resolved)
        }
    }
}

/// Pick the sequence file for an organism inside a data directory:
/// prefer the configured filename, fall back to its `.gz` sibling.
pub fn find_sequence_file(root: &Path, filename: &str) -> Option<String> {
    let plain = root.join(filename);
    if plain.is_file() {
        return Some(filename.to_string());
    }
    let gz = format!("{filename}.gz");
    if root.join(&gz).is_file() {
        return Some(gz);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fasta"), ">g1.1\nACGT\n").unwrap();

        let source = FsSource::new(dir.path());
        assert_eq!(source.load("a.fasta").unwrap(), ">g1.1\nACGT\n");
    }

    #[test]
    fn reads_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::create(dir.path().join("a.fasta.gz")).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(b">g1.1\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let source = FsSource::new(dir.path());
        assert_eq!(source.load("a.fasta.gz").unwrap(), ">g1.1\nACGT\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsSource::new(dir.path()).load("missing.fasta").is_err());
    }

    #[test]
    fn find_prefers_plain_over_gz() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fasta"), "x").unwrap();
        std::fs::write(dir.path().join("b.fasta.gz"), "x").unwrap();

        assert_eq!(
            find_sequence_file(dir.path(), "a.fasta"),
            Some("a.fasta".to_string())
        );
        assert_eq!(
            find_sequence_file(dir.path(), "b.fasta"),
            Some("b.fasta.gz".to_string())
        );
        assert_eq!(find_sequence_file(dir.path(), "c.fasta"), None);
    }
}
