//! Chat and video processing flows

use tracing::{info, warn};

use crate::conversation::SharedContext;
use crate::llm::prompts::build_summary_prompt;
use crate::llm::CompletionClient;
use crate::youtube::{extract_video_id, join_caption_text, TranscriptSource};
use crate::{DeepvistaError, Result};

/// Answer one chat message, grounded in the stored transcript if there is one.
pub async fn chat_turn(
    message: &str,
    context: &SharedContext,
    completion: &CompletionClient,
) -> Result<String> {
    let prompt = {
        let ctx = context.read().await;
        if ctx.is_grounded() {
            info!("Answering chat message from video transcript");
        }
        ctx.build_prompt(message)
    };

    completion.generate(&prompt).await
}

/// Fetch a video's transcript, store it as context and summarize it.
///
/// A failed fetch clears the context. A failed summary does not: the
/// transcript is stored before the completion call.
pub async fn process_video(
    url: &str,
    transcripts: &dyn TranscriptSource,
    completion: &CompletionClient,
    context: &SharedContext,
    summary_char_limit: usize,
) -> Result<String> {
    let video_id = extract_video_id(url)
        .ok_or_else(|| DeepvistaError::InvalidInput("Invalid YouTube URL".to_string()))?;
    info!("Processing YouTube video {}", video_id);

    let lines = match transcripts.fetch(&video_id).await {
        Ok(lines) => lines,
        Err(e) => {
            warn!("Transcript fetch failed for {}: {}", video_id, e);
            context.write().await.clear_context();
            return Err(e.into());
        }
    };

    let transcript = join_caption_text(&lines);
    let excerpt = truncate_chars(&transcript, summary_char_limit).to_string();
    context.write().await.set_context(transcript);

    completion.generate(&build_summary_prompt(&excerpt)).await
}

/// First `limit` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::new_shared_context;
    use crate::llm::LlmProvider;
    use crate::youtube::{CaptionLine, TranscriptError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records prompts and answers with a fixed reply.
    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for Recorder {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                anyhow::bail!("model overloaded");
            }
            Ok("reply".to_string())
        }
    }

    struct Captions(std::result::Result<Vec<CaptionLine>, TranscriptError>);

    #[async_trait]
    impl TranscriptSource for Captions {
        async fn fetch(
            &self,
            _video_id: &str,
        ) -> std::result::Result<Vec<CaptionLine>, TranscriptError> {
            self.0.clone()
        }
    }

    fn lines(texts: &[&str]) -> Vec<CaptionLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| CaptionLine {
                text: t.to_string(),
                start: i as f64,
                duration: 1.0,
            })
            .collect()
    }

    fn client(recorder: &Arc<Recorder>) -> CompletionClient {
        CompletionClient::new("openai", Some(recorder.clone() as Arc<dyn LlmProvider>))
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[tokio::test]
    async fn successful_video_sets_context_and_summarizes() {
        let recorder = Arc::new(Recorder::default());
        let context = new_shared_context();
        let source = Captions(Ok(lines(&["hello", "world"])));

        let summary = process_video(
            "https://youtu.be/dQw4w9WgXcQ",
            &source,
            &client(&recorder),
            &context,
            4000,
        )
        .await
        .unwrap();

        assert_eq!(summary, "reply");
        assert_eq!(context.read().await.transcript(), Some("hello world"));
        assert!(recorder.prompts.lock().unwrap()[0].contains("hello world"));
    }

    #[tokio::test]
    async fn summary_prompt_uses_truncated_transcript() {
        let recorder = Arc::new(Recorder::default());
        let context = new_shared_context();
        let long = "x".repeat(50);
        let source = Captions(Ok(lines(&[&long])));

        process_video(
            "https://youtu.be/dQw4w9WgXcQ",
            &source,
            &client(&recorder),
            &context,
            10,
        )
        .await
        .unwrap();

        let prompt = recorder.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains(&"x".repeat(10)));
        assert!(!prompt.contains(&"x".repeat(11)));
        assert_eq!(context.read().await.transcript(), Some(long.as_str()));
    }

    #[tokio::test]
    async fn invalid_url_leaves_context_untouched() {
        let recorder = Arc::new(Recorder::default());
        let context = new_shared_context();
        context.write().await.set_context("previous");
        let source = Captions(Ok(lines(&["unused"])));

        let err = process_video("not a url", &source, &client(&recorder), &context, 4000)
            .await
            .unwrap_err();

        assert!(matches!(err, DeepvistaError::InvalidInput(_)));
        assert_eq!(context.read().await.transcript(), Some("previous"));
        assert!(recorder.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_clears_context() {
        let recorder = Arc::new(Recorder::default());
        let context = new_shared_context();
        context.write().await.set_context("previous");
        let source = Captions(Err(TranscriptError::NoTranscriptFound {
            video_id: "dQw4w9WgXcQ".to_string(),
            languages: vec!["en".to_string()],
        }));

        let err = process_video(
            "https://youtu.be/dQw4w9WgXcQ",
            &source,
            &client(&recorder),
            &context,
            4000,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("No Transcript Found"));
        assert!(!context.read().await.is_grounded());
        assert!(recorder.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_summary_keeps_transcript() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let context = new_shared_context();
        let source = Captions(Ok(lines(&["kept"])));

        let err = process_video(
            "https://youtu.be/dQw4w9WgXcQ",
            &source,
            &client(&recorder),
            &context,
            4000,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DeepvistaError::Provider(_)));
        assert_eq!(context.read().await.transcript(), Some("kept"));
    }

    #[tokio::test]
    async fn chat_turn_switches_on_context() {
        let recorder = Arc::new(Recorder::default());
        let completion = client(&recorder);
        let context = new_shared_context();

        chat_turn("plain question", &context, &completion).await.unwrap();
        context.write().await.set_context("video words");
        chat_turn("grounded question", &context, &completion)
            .await
            .unwrap();

        let prompts = recorder.prompts.lock().unwrap();
        assert_eq!(prompts[0], "plain question");
        assert!(prompts[1].contains("video words"));
        assert!(prompts[1].contains("grounded question"));
    }
}
