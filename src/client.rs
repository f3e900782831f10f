use serde_json::Value;
use std::sync::Arc;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::{Result, WellnessError};
use crate::extract::extract_json;
use crate::ids::TipIdGenerator;
use crate::models::{GenerateContentRequest, TipDetail, UserProfile, WellnessTip};
use crate::prompts::{tip_detail_prompt, tip_list_prompt};
use crate::retry::RetryPolicy;
use crate::transport::{GeminiTransport, Transport};

pub const DEFAULT_TITLE: &str = "Wellness Tip";
pub const DEFAULT_SHORT: &str = "Improve your wellness";
pub const DEFAULT_ICON: &str = "💡";
pub const DEFAULT_EXPLANATION: &str = "No explanation available.";
pub const DEFAULT_STEP: &str = "Follow the tip as described.";

/// Turns profiles and tips into prompts, and model text back into typed records.
///
/// Cloning is cheap and clones share the id generator, so ids stay unique across
/// every clone. Nothing else is shared between calls.
#[derive(Clone)]
pub struct GenerationClient {
    tx: Arc<dyn Transport>,
    retry: RetryPolicy,
    ids: Arc<TipIdGenerator>,
}

impl GenerationClient {
    pub fn new(tx: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self {
            tx,
            retry,
            ids: Arc::new(TipIdGenerator::new()),
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(GeminiTransport::new(&cfg.gemini)?);
        Ok(Self::new(transport, RetryPolicy::from(&cfg.retry)))
    }

    pub fn with_id_generator(mut self, ids: Arc<TipIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Send a prompt and return the first text part of the reply.
    ///
    /// A failed status, a transport error and a reply without text all count as a failed
    /// attempt. After attempt `n` fails the caller sleeps `n * base_delay`.
    pub async fn request_completion(&self, prompt: &str) -> Result<String> {
        let req = GenerateContentRequest::from_prompt(prompt);
        let max_attempts = self.retry.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let cause = match self.tx.generate(&req).await {
                Ok(response) => match response.first_text() {
                    Some(text) => {
                        tracing::debug!("Gemini raw text on attempt {}: {}", attempt, text);
                        return Ok(text.to_string());
                    }
                    None => "No text in API response".to_string(),
                },
                Err(e) if e.is_retryable() => e.to_string(),
                Err(e) => return Err(e),
            };

            if attempt >= max_attempts {
                tracing::error!(
                    "Gemini request failed after {} attempts: {}",
                    attempt,
                    cause
                );
                return Err(WellnessError::GenerationFailure {
                    attempts: attempt,
                    cause,
                });
            }

            let delay = self.retry.delay_after(attempt);
            tracing::warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                "Gemini attempt failed: {}",
                cause
            );
            sleep(delay).await;
        }
    }

    pub async fn generate_tip_list(&self, profile: &UserProfile) -> Result<Vec<WellnessTip>> {
        tracing::info!("Generating wellness tips for goal: {}", profile.goal);

        let text = self.request_completion(&tip_list_prompt(profile)).await?;
        let parsed = extract_json(&text)?;

        let raw_tips = parsed
            .get("tips")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                WellnessError::InvalidShape(
                    "Invalid response format: missing tips array".to_string(),
                )
            })?;

        if raw_tips.len() != 5 {
            tracing::warn!("Expected 5 tips, model returned {}", raw_tips.len());
        }

        // upstream ids are ignored
        let tips = raw_tips
            .iter()
            .zip(self.ids.reserve(raw_tips.len()))
            .map(|(raw, id)| WellnessTip {
                id,
                title: text_or(raw, "title", DEFAULT_TITLE),
                short: text_or(raw, "short", DEFAULT_SHORT),
                icon: text_or(raw, "icon", DEFAULT_ICON),
            })
            .collect();

        Ok(tips)
    }

    /// Never fails on missing fields, only on transport and parse errors.
    pub async fn generate_tip_detail(
        &self,
        tip: &WellnessTip,
        profile: Option<&UserProfile>,
    ) -> Result<TipDetail> {
        tracing::info!("Generating detail for tip {}: {}", tip.id, tip.title);

        let text = self
            .request_completion(&tip_detail_prompt(tip, profile))
            .await?;
        let parsed = extract_json(&text)?;

        let steps = match parsed.get("steps") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect(),
            _ => vec![DEFAULT_STEP.to_string()],
        };

        Ok(TipDetail {
            explanation: text_or(&parsed, "explanation", DEFAULT_EXPLANATION),
            steps,
        })
    }
}

fn text_or(raw: &Value, key: &str, default: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerateContentResponse;
    use crate::transport::MockTransport;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    // Replays canned results in order
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<GenerateContentResponse>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(mut responses: Vec<Result<GenerateContentResponse>>) -> Self {
            responses.reverse();
            ScriptedTransport {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn texts(texts: &[&str]) -> Self {
            Self::new(
                texts
                    .iter()
                    .map(|t| Ok(GenerateContentResponse::with_text(*t)))
                    .collect(),
            )
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn generate(&self, req: &GenerateContentRequest) -> Result<GenerateContentResponse> {
            self.prompts
                .lock()
                .unwrap()
                .push(req.contents[0].parts[0].text.clone());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| {
                    Err(WellnessError::Transport("No more mock responses".to_string()))
                })
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    fn client(tx: Arc<dyn Transport>) -> GenerationClient {
        GenerationClient::new(tx, fast_policy())
    }

    fn profile() -> UserProfile {
        UserProfile::new("29", "Female", "Stress Reduction")
    }

    fn tip() -> WellnessTip {
        WellnessTip {
            id: 42,
            title: "Box breathing".to_string(),
            short: "Four counts in, hold, out, hold".to_string(),
            icon: "🫁".to_string(),
        }
    }

    #[tokio::test]
    async fn test_tip_list_from_wrapped_json() {
        let tx = Arc::new(ScriptedTransport::texts(&[
            "Here you go: {\"tips\":[{\"title\":\"Walk\",\"short\":\"Daily walk\",\"icon\":\"🚶\"}]} thanks",
        ]));
        let client =
            client(tx.clone()).with_id_generator(Arc::new(TipIdGenerator::starting_at(500)));

        let tips = client.generate_tip_list(&profile()).await.unwrap();

        assert_eq!(
            tips,
            vec![WellnessTip {
                id: 500,
                title: "Walk".to_string(),
                short: "Daily walk".to_string(),
                icon: "🚶".to_string(),
            }]
        );
        assert_eq!(tx.calls(), 1);
    }

    #[tokio::test]
    async fn test_tip_list_fills_defaults_and_ignores_upstream_ids() {
        let tx = Arc::new(ScriptedTransport::texts(&[r#"{"tips":[
            {"id": 1, "title": "Stretch"},
            {"id": 1, "title": "", "short": 12, "icon": null},
            "not an object",
            {"id": 1, "title": "Journal", "short": "Write it out", "icon": "📓"}
        ]}"#]));

        let tips = client(tx).generate_tip_list(&profile()).await.unwrap();

        assert_eq!(tips.len(), 4);
        assert_eq!(tips[0].title, "Stretch");
        assert_eq!(tips[0].short, DEFAULT_SHORT);
        assert_eq!(tips[1].title, DEFAULT_TITLE);
        assert_eq!(tips[1].short, DEFAULT_SHORT);
        assert_eq!(tips[1].icon, DEFAULT_ICON);
        assert_eq!(tips[2].title, DEFAULT_TITLE);
        assert_eq!(tips[3].icon, "📓");

        for t in &tips {
            assert!(!t.title.is_empty() && !t.short.is_empty() && !t.icon.is_empty());
        }
        let ids: HashSet<_> = tips.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), tips.len());
    }

    #[tokio::test]
    async fn test_regenerated_batches_get_fresh_ids() {
        let body = r#"{"tips":[{"id":1},{"id":2},{"id":3},{"id":4},{"id":5}]}"#;
        let tx = Arc::new(ScriptedTransport::texts(&[body, body]));
        let client = client(tx);

        let first = client.generate_tip_list(&profile()).await.unwrap();
        let second = client.generate_tip_list(&profile()).await.unwrap();

        let ids: HashSet<_> = first.iter().chain(&second).map(|t| t.id).collect();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_whitespace_fields_are_kept_verbatim() {
        let tx = Arc::new(ScriptedTransport::texts(&[
            r#"{"tips":[{"title":"  ","short":" ","icon":"🧘"}]}"#,
        ]));

        let tips = client(tx).generate_tip_list(&profile()).await.unwrap();
        assert_eq!(tips[0].title, "  ");
        assert_eq!(tips[0].short, " ");
        assert_eq!(tips[0].icon, "🧘");
    }

    #[tokio::test]
    async fn test_concurrent_calls_on_one_client_get_disjoint_ids() {
        let body = r#"{"tips":[{"title":"a"},{"title":"b"}]}"#;
        let tx = Arc::new(ScriptedTransport::texts(&[body, body]));
        let client = client(tx.clone());
        let p = profile();

        let (first, second) = tokio::join!(
            client.generate_tip_list(&p),
            client.generate_tip_list(&p)
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        let ids: HashSet<_> = first.iter().chain(&second).map(|t| t.id).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(tx.calls(), 2);
    }

    #[tokio::test]
    async fn test_tip_list_without_tips_array_is_invalid_shape() {
        for body in [r#"{"advice": []}"#, r#"{"tips": "five of them"}"#] {
            let tx = Arc::new(ScriptedTransport::texts(&[body]));
            let err = client(tx).generate_tip_list(&profile()).await.unwrap_err();
            assert!(matches!(err, WellnessError::InvalidShape(_)), "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_tip_list_prompt_is_sent() {
        let tx = Arc::new(ScriptedTransport::texts(&[r#"{"tips":[]}"#]));
        let tips = client(tx.clone())
            .generate_tip_list(&profile())
            .await
            .unwrap();
        assert!(tips.is_empty());
        let prompts = tx.prompts.lock().unwrap();
        assert!(prompts[0].contains("- Goal: Stress Reduction"));
    }

    #[tokio::test]
    async fn test_malformed_text_is_not_retried() {
        let mut mock = MockTransport::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok(GenerateContentResponse::with_text("I cannot comply.")));

        let err = client(Arc::new(mock))
            .generate_tip_list(&profile())
            .await
            .unwrap_err();
        assert!(matches!(err, WellnessError::MalformedResponse(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_failed_attempts_wait_linear_backoff() {
        let mut mock = MockTransport::new();
        mock.expect_generate()
            .withf(|req| req.contents[0].parts[0].text == "ping")
            .times(3)
            .returning(|_| {
                Err(WellnessError::Transport("API request failed: 500".to_string()))
            });

        let client = GenerationClient::new(Arc::new(mock), RetryPolicy::default());
        let started = tokio::time::Instant::now();
        let err = client.request_completion("ping").await.unwrap_err();

        assert!(started.elapsed() >= Duration::from_secs(3));
        match err {
            WellnessError::GenerationFailure { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(cause.contains("API request failed: 500"), "cause: {cause}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_text_is_retried_until_success() {
        let tx = Arc::new(ScriptedTransport::new(vec![
            Ok(GenerateContentResponse::default()),
            Err(WellnessError::Transport("connection reset".to_string())),
            Ok(GenerateContentResponse::with_text("third time lucky")),
        ]));

        let text = client(tx.clone()).request_completion("hi").await.unwrap();
        assert_eq!(text, "third time lucky");
        assert_eq!(tx.calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_text_on_final_attempt_is_generation_failure() {
        let tx = Arc::new(ScriptedTransport::new(vec![
            Ok(GenerateContentResponse::default()),
            Ok(GenerateContentResponse::default()),
            Ok(GenerateContentResponse::default()),
        ]));

        let err = client(tx).request_completion("hi").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed after 3 attempts: No text in API response"
        );
    }

    #[tokio::test]
    async fn test_non_retryable_transport_error_propagates_immediately() {
        let mut mock = MockTransport::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| {
                Err(WellnessError::Config("GEMINI_API_KEY must be set".to_string()))
            });

        let err = client(Arc::new(mock))
            .request_completion("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, WellnessError::Config(_)));
    }

    #[tokio::test]
    async fn test_detail_without_steps_uses_placeholder() {
        let tx = Arc::new(ScriptedTransport::texts(&[
            r#"{"explanation": "Slow breathing calms the nervous system."}"#,
        ]));

        let detail = client(tx).generate_tip_detail(&tip(), None).await.unwrap();
        assert_eq!(detail.explanation, "Slow breathing calms the nervous system.");
        assert_eq!(detail.steps, vec![DEFAULT_STEP.to_string()]);
    }

    #[tokio::test]
    async fn test_detail_with_empty_object_is_fully_populated() {
        let tx = Arc::new(ScriptedTransport::texts(&[r#"{"steps": "breathe"}"#]));

        let detail = client(tx)
            .generate_tip_detail(&tip(), Some(&profile()))
            .await
            .unwrap();
        assert_eq!(detail.explanation, DEFAULT_EXPLANATION);
        assert_eq!(detail.steps, vec![DEFAULT_STEP.to_string()]);
    }

    #[tokio::test]
    async fn test_detail_keeps_step_order() {
        let tx = Arc::new(ScriptedTransport::texts(&[r#"Sure!
{"explanation": "Para one.\n\nPara two.", "steps": ["Step 1: sit", 3, "Step 2: inhale", "Step 3: exhale"]}"#]));

        let detail = client(tx.clone())
            .generate_tip_detail(&tip(), Some(&profile()))
            .await
            .unwrap();
        assert_eq!(detail.explanation, "Para one.\n\nPara two.");
        assert_eq!(detail.steps, vec!["Step 1: sit", "Step 2: inhale", "Step 3: exhale"]);
        assert!(tx.prompts.lock().unwrap()[0].contains("Goal: Stress Reduction"));
    }

    #[tokio::test]
    async fn test_detail_transport_failure_propagates() {
        let tx = Arc::new(ScriptedTransport::new(vec![]));
        let err = client(tx)
            .generate_tip_detail(&tip(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WellnessError::GenerationFailure { attempts: 3, .. }));
    }
}
