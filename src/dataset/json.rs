//! JSON corpus reader.
//!
//! A corpus is a JSON array of sentences:
//!
//! ```json
//! [{"words": ["the", "dog", "ran"], "tags": ["DT", "NN", "VBD"], "heads": {"0": 1, "2": 1}}]
//! ```

use std::fs::File;
use std::io as std_io;
use std::path::Path;

use super::{Dataset, Example};
use crate::io::invalid_data;

pub fn from_reader<R: std_io::Read>(reader: R) -> std_io::Result<Dataset<Example>> {
    let items: Vec<Example> = serde_json::from_reader(reader).map_err(invalid_data)?;
    for (i, example) in items.iter().enumerate() {
        if !example.tags.is_empty() && example.tags.len() != example.words.len() {
            return Err(invalid_data(format!(
                "sentence {}: {} tags for {} words",
                i,
                example.tags.len(),
                example.words.len()
            )));
        }
    }
    Ok(Dataset::from_items(items))
}

pub fn from_str(s: &str) -> std_io::Result<Dataset<Example>> {
    from_reader(s.as_bytes())
}

pub fn load<P: AsRef<Path>>(path: P) -> std_io::Result<Dataset<Example>> {
    from_reader(std_io::BufReader::new(File::open(path)?))
}
