/// File formats a partition can declare in the metastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Text,
    /// Text compressed with LZO; the only compressed text variant supported.
    LzoText,
    SequenceFile,
    Parquet,
}

impl FileFormat {
    /// The compression a format declares for its files, if any.
    pub fn declared_compression(&self) -> Option<Compression> {
        match self {
            FileFormat::LzoText => Some(Compression::Lzo),
            _ => None,
        }
    }
}

/// Compression classified from a file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Deflate,
    Gzip,
    Bzip2,
    Snappy,
    Lzo,
    /// The index side-channel of an LZO-compressed text file. Read by the
    /// scan reader directly, never scheduled as a scan range.
    LzoIndex,
}

impl Compression {
    pub fn from_path(path: &str) -> Compression {
        if path.ends_with(".lzo.index") {
            return Compression::LzoIndex;
        }
        match path.rsplit('.').next() {
            Some("deflate") => Compression::Deflate,
            Some("gz") => Compression::Gzip,
            Some("bz2") => Compression::Bzip2,
            Some("snappy") => Compression::Snappy,
            Some("lzo") => Compression::Lzo,
            _ => Compression::None,
        }
    }
}

/// Storage format declared for a partition: file format plus the compression
/// expectation it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageDescriptor {
    pub file_format: FileFormat,
}

impl StorageDescriptor {
    pub fn new(file_format: FileFormat) -> StorageDescriptor {
        StorageDescriptor { file_format }
    }
}
