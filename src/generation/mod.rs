//! Calling the generation engine and shaping what it returns.

pub mod candidates;
pub mod engine;
pub mod gemini;
pub mod retry;

pub use candidates::{
    CANDIDATE_DELIMITER, DEFAULT_CANDIDATE_COUNT, FALLBACK_CANDIDATE, parse_candidates,
};
pub use engine::{Attachment, EngineError, GenerationEngine};
pub use gemini::GeminiEngine;
pub use retry::{
    RetryPolicy, RetryState, invoke_with_retry, invoke_with_retry_using, is_transient_message,
};

use tracing::instrument;

/// One engine call through the retry wrapper.
pub async fn generate<G>(
    engine: &G,
    prompt: &str,
    attachment: Option<&Attachment>,
    policy: RetryPolicy,
) -> Result<String, EngineError>
where
    G: GenerationEngine + ?Sized,
{
    invoke_with_retry(move || engine.invoke(prompt, attachment), policy).await
}

/// [`generate`], then split the response into exactly `n` candidates.
#[instrument(skip(engine, prompt, attachment), fields(prompt_len = prompt.len()))]
pub async fn generate_candidates<G>(
    engine: &G,
    prompt: &str,
    attachment: Option<&Attachment>,
    policy: RetryPolicy,
    n: usize,
) -> Result<Vec<String>, EngineError>
where
    G: GenerationEngine + ?Sized,
{
    let raw = generate(engine, prompt, attachment, policy).await?;
    Ok(parse_candidates(&raw, n))
}
