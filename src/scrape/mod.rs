// Scraping: fetch article pages and cut out the transcript text.

pub mod client;
pub mod transcript;
