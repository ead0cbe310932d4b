//! Text-extraction service seam. Turns uploaded documents into plain text;
//! failures are logged and come back as an empty string.

pub mod pdf;

pub use pdf::extract_text_from_pdf;
