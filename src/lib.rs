pub mod config;
pub mod error;
pub mod formats;
pub mod grouping;
pub mod locate;
pub mod model;
pub mod palette;
pub mod player;
pub mod session;

pub use error::{Error, Result};
pub use formats::{
    json::{normalize_tokens, parse_word_transcript},
    srt::parse_script,
    time::{format_seconds, parse_timestamp},
};
pub use grouping::{SpeakerGroup, group_by_speaker};
pub use locate::{Highlight, Timed, WordPosition, locate, locate_word};
pub use model::{Sentence, SourceFormat, SpeakerId, Timeline, Token, TokenKind};
pub use player::{PlaybackBridge, Player, ReplayClock, TickUpdate};
pub use session::{MediaSource, Session};
