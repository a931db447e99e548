//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client: every call is independent
///
/// One call makes exactly one provider request. Retrying is the caller's
/// business (see [`crate::retry`]).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the whole answer
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Provider name for logs
    fn provider(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Scripted LLM client: replays queued results in order
    pub struct MockLlmClient {
        results: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
        call_count: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockLlmClient {
        pub fn new(results: Vec<Result<CompletionResponse, LlmError>>) -> Self {
            debug!(result_count = %results.len(), "MockLlmClient::new: called");
            Self {
                results: Mutex::new(results.into()),
                call_count: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// A client that answers every call with the same text
        pub fn with_text(text: &str, times: usize) -> Self {
            Self::new((0..times).map(|_| Ok(CompletionResponse::text(text))).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Prompts received so far
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: called");
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(request.prompt);
            }
            let next = self.results.lock().ok().and_then(|mut r| r.pop_front());
            next.unwrap_or_else(|| {
                debug!("MockLlmClient::complete: no more mock results");
                Err(LlmError::InvalidResponse("No more mock responses".to_string()))
            })
        }

        fn provider(&self) -> &str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_replays_in_order() {
            let client = MockLlmClient::new(vec![
                Ok(CompletionResponse::text("Response 1")),
                Err(LlmError::Timeout(std::time::Duration::from_secs(1))),
            ]);

            let req = CompletionRequest::new("", "Hello", 100);

            let resp = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp.content.as_deref(), Some("Response 1"));

            assert!(matches!(client.complete(req.clone()).await, Err(LlmError::Timeout(_))));
            assert!(matches!(client.complete(req).await, Err(LlmError::InvalidResponse(_))));

            assert_eq!(client.call_count(), 3);
            assert_eq!(client.prompts(), vec!["Hello", "Hello", "Hello"]);
        }
    }
}
