//! JSONファイルストレージモジュール

use crate::entries::Entries;
use crate::error::StorageError;
use crate::storage::StorageProvider;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, trace};

const EXTENSION: &str = ".json";

/// 1日1ファイルのJSONストレージ
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// 新しいJsonStoreを作成
    ///
    /// パスに`.json`が含まれていなければ付与する。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: validate_path(path.into()),
        }
    }

    fn write_file(&self, bytes: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

/// 拡張子を補正
///
/// 部分一致で判定するため、`test.jsonold`のようなパスもそのまま通る。
fn validate_path(path: PathBuf) -> PathBuf {
    if path.to_string_lossy().contains(EXTENSION) {
        return path;
    }
    let mut raw = path.into_os_string();
    raw.push(EXTENSION);
    PathBuf::from(raw)
}

impl StorageProvider for JsonStore {
    fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        let json = serde_json::to_vec(entries).map_err(StorageError::Marshal)?;

        debug!("エントリを書き込みます: {}", self.path.display());
        trace!("書き込むエントリ: {}", String::from_utf8_lossy(&json));

        self.write_file(&json).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn read(&self, entries: &mut Entries) -> Result<(), StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("ファイルが存在しません: {}", self.path.display());
                return Ok(());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        *entries = serde_json::from_slice(&bytes).map_err(|source| StorageError::Unmarshal {
            path: self.path.clone(),
            source,
        })?;
        debug!("バージョン{}のファイルを読み込みました", entries.version());

        Ok(())
    }
}
