//! Line-oriented M3U8 parsing.

pub mod builder;
pub mod classifier;
pub mod scanner;
pub mod state;

pub use builder::PlaylistBuilder;
pub use classifier::{LineClassifier, LineType};
pub use scanner::{Line, LineScanner};
pub use state::{ParsePhase, ParserState, PlaylistKind};
