// ID3 tag parsing

pub mod frames;
pub mod genre;
pub mod v1;
pub mod v2;

pub use v1::Id3v1Tag;
pub use v2::{Id3v2Header, Id3v2Tag};
