// Shared parsing utilities

pub mod cursor;
pub mod encoding;
