/// System message sent with every chat completion.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build the prompt asking for a short summary of a (possibly truncated) transcript.
pub fn build_summary_prompt(transcript: &str) -> String {
    format!(
        "Here is the transcript of a YouTube video:\n\
\n\
{transcript}\n\
\n\
Write a short summary of what this video is about in 3-5 sentences. \
Tell the user they can now ask questions about the video."
    )
}

/// Build a prompt that answers `question` from a stored video transcript.
pub fn build_grounded_prompt(transcript: &str, question: &str) -> String {
    format!(
        "You are answering questions about a YouTube video.\n\
\n\
Video transcript:\n\
{transcript}\n\
\n\
Using the transcript above, answer the following question. \
If the transcript does not contain the answer, say so.\n\
\n\
Question: {question}"
    )
}
