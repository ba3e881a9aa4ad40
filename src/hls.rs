pub mod attributes;
pub mod byterange;
pub mod key;
pub mod media;
pub mod segment;
pub mod stream_info;
pub mod uri;

pub use attributes::{AttributeList, AttributeValue, TagLine};
pub use byterange::{ByteRange, ByteRangeCursor, ByteSpan};
pub use key::{CipherContext, CipherInfo, KeyMethod};
pub use media::{MediaTag, Rendition, RenditionType};
pub use segment::SegmentFormat;
pub use stream_info::StreamInfo;
