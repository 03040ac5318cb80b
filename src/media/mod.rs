//! Media resolution: finding, copying and converting attachments.
//!
//! - [`index`] - name variants of every extracted file
//! - [`transcode`] - the external audio converter
//! - [`resolver`] - ties the two together and fills the output media folder

pub mod index;
pub mod resolver;
pub mod transcode;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use index::{AvailableFileIndex, printable_ascii};
pub use resolver::{MediaResolver, ResolveReport};
pub use transcode::{Ffmpeg, Transcoder, needs_transcoding, transcoded_name};

/// Maps a transcript attachment reference to the file name written into the
/// output media folder.
///
/// A reference is absent when no source file was found for it. A present
/// entry does not guarantee the file exists on disk: copy and transcode
/// failures still record the intended name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaMap {
    entries: HashMap<String, String>,
}

impl MediaMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Output file name for `reference`.
    pub fn get(&self, reference: &str) -> Option<&str> {
        self.entries.get(reference).map(String::as_str)
    }

    /// Records the output name for a reference.
    pub fn insert(&mut self, reference: impl Into<String>, output_name: impl Into<String>) {
        self.entries.insert(reference.into(), output_name.into());
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(reference, output_name)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MediaMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
