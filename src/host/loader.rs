//! Loading of linked style sheets

use std::collections::HashMap;
use std::fs;

use log::debug;
use url::Url;

/// Fetches the text of a linked resource. `None` leaves the sheet unloaded.
pub trait ResourceLoader {
    fn load(&self, url: &Url) -> Option<String>;
}

/// Loads nothing, every linked sheet stays unloaded
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ResourceLoader for NoResources {
    fn load(&self, _url: &Url) -> Option<String> {
        None
    }
}

impl ResourceLoader for HashMap<Url, String> {
    fn load(&self, url: &Url) -> Option<String> {
        self.get(url).cloned()
    }
}

/// Reads `file:` URLs from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl ResourceLoader for FileLoader {
    fn load(&self, url: &Url) -> Option<String> {
        if url.scheme() != "file" {
            debug!("FileLoader cannot fetch {}", url);
            return None;
        }
        let path = url.to_file_path().ok()?;
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!("Failed to read style sheet {}: {}", path.display(), e);
                None
            }
        }
    }
}
