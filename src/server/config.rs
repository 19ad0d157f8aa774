use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::store::{DirectoryBackup, FileStore};

#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-server", version)]
#[command(about = "Serve the book catalog over a line-oriented TCP protocol")]
pub struct ServerConfig {
    /// Address to accept clients on
    #[arg(long, env = "CATALOG_LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// Catalog file, one pipe-delimited record per line
    #[arg(long, env = "CATALOG_DATA_FILE", default_value = "books")]
    pub data_file: PathBuf,

    /// Copy the catalog here before every change; no backups when unset
    #[arg(long, env = "CATALOG_BACKUP_DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Number of backups to keep
    #[arg(long, env = "CATALOG_BACKUP_RETAIN", default_value_t = DirectoryBackup::DEFAULT_RETAIN)]
    pub backup_retain: usize,

    /// Go ahead with a change even when its backup failed
    #[arg(long, env = "CATALOG_LENIENT_BACKUPS")]
    pub lenient_backups: bool,
}

impl ServerConfig {
    pub fn store(&self) -> FileStore {
        let store = FileStore::open(&self.data_file);
        match &self.backup_dir {
            Some(dir) => store.with_backup(
                DirectoryBackup::new(dir)
                    .retain(self.backup_retain)
                    .lenient(self.lenient_backups),
            ),
            None => store,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-client", version)]
#[command(about = "Talk to a catalog server from the terminal")]
pub struct ClientConfig {
    /// Server address
    #[arg(long, env = "CATALOG_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: String,
}
