//! Known model identifiers.
//!
//! The API accepts any string; these constants cover the published model
//! family at the time of writing.

pub const CLAUDE_3_OPUS: &str = "claude-3-opus-20240229";
pub const CLAUDE_3_SONNET: &str = "claude-3-sonnet-20240229";

pub const CLAUDE_2: &str = "claude-2";
pub const CLAUDE_2_1: &str = "claude-2.1";

pub const CLAUDE_INSTANT_1: &str = "claude-instant-1";
pub const CLAUDE_INSTANT_1_1: &str = "claude-instant-1.1";
pub const CLAUDE_INSTANT_1_2: &str = "claude-instant-1.2";
