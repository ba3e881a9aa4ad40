pub mod config;
pub mod error;
pub mod hls;
pub mod parser;
pub mod playlist;

pub use config::ParserConfig;
pub use error::{Error, ErrorCategory};
pub use playlist::Playlist;
pub type Result<T> = std::result::Result<T, Error>;
