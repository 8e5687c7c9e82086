use std::sync::Arc;

use riposte_core::{CompletionService, FallbackCounters, SimilarText};
use tracing::warn;

use crate::style::Style;

/// Fixed user-visible reply when generation fails. A failed generation
/// still yields a postable comment; it never drops the turn.
pub const GENERATION_FAILURE_TEXT: &str = "Ошибка при генерации комментария";

/// How many similarity matches make it into the generation context.
const MAX_CONTEXT_MATCHES: usize = 5;

/// Builds the generation context and turns it into reply text.
pub struct ReplyComposer {
    completer: Arc<dyn CompletionService>,
    counters: Arc<FallbackCounters>,
}

impl ReplyComposer {
    pub fn new(completer: Arc<dyn CompletionService>, counters: Arc<FallbackCounters>) -> Self {
        Self {
            completer,
            counters,
        }
    }

    /// Concatenate the original content, the first matches in retrieval
    /// order, and the style instruction line.
    pub fn build_context(
        original_text: Option<&str>,
        matches: &[SimilarText],
        style: Style,
    ) -> String {
        let mut context = format!(
            "Оригинальный пост: \"{}\"\n\n",
            original_text.unwrap_or("Без текста")
        );

        if !matches.is_empty() {
            context.push_str("Похожие посты:\n");
            for (i, post) in matches.iter().take(MAX_CONTEXT_MATCHES).enumerate() {
                context.push_str(&format!("{}. \"{}\"\n", i + 1, post.content));
            }
        }

        context.push_str(&format!(
            "\nНапиши комментарий в {} стиле.",
            style.descriptor()
        ));

        context
    }

    /// Generate the reply text. Provider errors and empty completions
    /// degrade to [`GENERATION_FAILURE_TEXT`]; successes carry the persona
    /// label prefix.
    pub async fn generate(
        &self,
        original_text: Option<&str>,
        matches: &[SimilarText],
        style: Style,
    ) -> String {
        let context = Self::build_context(original_text, matches, style);
        let system_prompt = style.system_prompt();

        match self.completer.complete(&system_prompt, &context).await {
            Ok(text) if !text.trim().is_empty() => {
                format!("{}: \n{}", style.persona_label(), text)
            }
            Ok(_) => {
                warn!(style = style.as_str(), "Provider returned an empty completion");
                self.counters.record_generation_failure();
                GENERATION_FAILURE_TEXT.to_string()
            }
            Err(e) => {
                warn!(style = style.as_str(), error = %e, "Failed to generate comment");
                self.counters.record_generation_failure();
                GENERATION_FAILURE_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;

    struct ScriptedCompleter {
        response: Option<String>,
    }

    #[async_trait]
    impl CompletionService for ScriptedCompleter {
        async fn complete(&self, _system_prompt: &str, _user_text: &str) -> Result<String> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => bail!("no credentials configured"),
            }
        }
    }

    fn composer(response: Option<&str>) -> (ReplyComposer, Arc<FallbackCounters>) {
        let counters = Arc::new(FallbackCounters::new());
        let composer = ReplyComposer::new(
            Arc::new(ScriptedCompleter {
                response: response.map(String::from),
            }),
            counters.clone(),
        );
        (composer, counters)
    }

    fn match_row(content: &str) -> SimilarText {
        SimilarText {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            content: content.to_string(),
            distance: 0.1,
            channel_id: "-100".to_string(),
            message_id: 1,
            author_username: None,
        }
    }

    #[test]
    fn context_contains_original_and_instruction() {
        let context = ReplyComposer::build_context(Some("привет"), &[], Style::Funny);
        assert!(context.starts_with("Оригинальный пост: \"привет\""));
        assert!(!context.contains("Похожие посты"));
        assert!(context.ends_with("Напиши комментарий в смешном и юмористическом стиле."));
    }

    #[test]
    fn context_without_text_uses_placeholder() {
        let context = ReplyComposer::build_context(None, &[], Style::Pozdnyakov);
        assert!(context.starts_with("Оригинальный пост: \"Без текста\""));
    }

    #[test]
    fn context_truncates_to_five_matches_in_order() {
        let matches: Vec<SimilarText> = (0..8).map(|i| match_row(&format!("пост {i}"))).collect();
        let context = ReplyComposer::build_context(Some("x"), &matches, Style::Toxic);

        for i in 0..5 {
            assert!(context.contains(&format!("{}. \"пост {}\"", i + 1, i)));
        }
        assert!(!context.contains("пост 5"));
        assert!(!context.contains("6."));
    }

    #[tokio::test]
    async fn success_is_prefixed_with_persona_label() {
        let (composer, counters) = composer(Some("отличный пост"));
        let reply = composer.generate(Some("текст"), &[], Style::Funny).await;

        assert_eq!(reply, "Павел Дуров: \nотличный пост");
        assert_eq!(counters.generation_failures(), 0);
    }

    #[tokio::test]
    async fn provider_error_degrades_to_failure_text() {
        let (composer, counters) = composer(None);
        let reply = composer.generate(Some("текст"), &[], Style::Trump).await;

        assert_eq!(reply, GENERATION_FAILURE_TEXT);
        assert_eq!(counters.generation_failures(), 1);
    }

    #[tokio::test]
    async fn empty_completion_degrades_to_failure_text() {
        let (composer, counters) = composer(Some("   "));
        let reply = composer.generate(Some("текст"), &[], Style::Dima).await;

        assert_eq!(reply, GENERATION_FAILURE_TEXT);
        assert_eq!(counters.generation_failures(), 1);
    }
}
