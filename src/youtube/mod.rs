//! YouTube support: video id extraction and caption fetching.

mod transcript;
mod video_id;

pub use transcript::{
    extract_api_key, join_caption_text, parse_caption_tracks, parse_caption_xml, select_track,
    CaptionLine, CaptionTrack, TranscriptError, TranscriptSource, YouTubeTranscriptClient,
};
pub use video_id::extract_video_id;
