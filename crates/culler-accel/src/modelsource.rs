use std::path::PathBuf;

/// Where the model bytes come from.
#[derive(Clone, Debug)]
pub enum ModelSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl ModelSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ModelSource::File(path.into())
    }
}
