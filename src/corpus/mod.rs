// Corpus loading: transcript files, URL lists and outcome labels.

pub mod file;
pub mod labels;
pub mod traits;
