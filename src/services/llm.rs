//! # LLM 게이트웨이
//!
//! 원격 완성(completion) 엔드포인트에 프롬프트를 보내고 텍스트 응답을 받아옵니다.
//! 파이프라인에서 지연과 실패가 예상되는 유일한 네트워크 경계입니다.
//!
//! ## 요청/응답 계약
//! ```text
//! POST <LLM_API_URL>
//! Authorization: Bearer <LLM_API_KEY>
//! { "prompt": "...", "model": "...", "max_tokens": 1024, "temperature": 0.3 }
//!
//! 200 OK
//! { "choices": [ { "text": "..." } ] }
//! ```
//!
//! ## 재시도 정책
//! - 최대 `max_attempts`회 시도, 시도마다 개별 타임아웃
//! - 전송 실패, 2xx가 아닌 상태, 응답 본문 파싱 실패, 빈 텍스트는 모두 실패한 시도로 봅니다.
//! - n번째 실패 후 `n × retry_base_delay`만큼 기다렸다가 다시 시도합니다.
//! - 모두 실패하면 `LlmError::Unavailable` (HTTP 502로 변환됨)
//!
//! 반환된 텍스트는 신뢰할 수 없는 자유 텍스트입니다. 구조화는 `extract` 모듈이 담당합니다.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LlmConfig;

#[derive(Debug, Error)]
pub enum LlmError {
    /// 모든 시도가 실패함
    #[error("LLM server unavailable after {attempts} attempt(s): {last_error}")]
    Unavailable { attempts: u32, last_error: String },
}

/// 한 번의 시도가 실패한 이유 (로그용, 외부로 노출하지 않음)
#[derive(Debug, Error)]
enum AttemptError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("empty completion")]
    EmptyCompletion,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

/// LLM 완성 엔드포인트 클라이언트
///
/// `reqwest::Client`는 내부적으로 Arc로 연결 풀을 공유하므로
/// clone해도 비용이 거의 없습니다. `AppState`에 넣어 모든 요청이 함께 씁니다.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// 엔드포인트 URL이 설정되어 있는지 여부 (헬스체크용)
    pub fn is_configured(&self) -> bool {
        !self.config.api_url.trim().is_empty()
    }

    /// 프롬프트를 보내 앞뒤 공백을 제거한 완성 텍스트를 받아옵니다.
    ///
    /// 실패하면 설정된 횟수만큼 점점 길게 기다리며 재시도합니다.
    /// 시도 간에 부분 결과를 저장해 두지 않습니다.
    pub async fn generate_summary(&self, prompt: &str) -> Result<String, LlmError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            tracing::info!("LLM call attempt {}/{}", attempt, max_attempts);

            match self.attempt(prompt).await {
                Ok(text) => {
                    tracing::info!("LLM responded with {} chars", text.chars().count());
                    return Ok(text);
                }
                Err(e) => {
                    tracing::warn!("LLM call failed ({}/{}): {}", attempt, max_attempts, e);
                    last_error = e.to_string();

                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry_delay(attempt)).await;
                    }
                }
            }
        }

        Err(LlmError::Unavailable {
            attempts: max_attempts,
            last_error,
        })
    }

    /// `attempt`번째 실패 후 다음 시도까지 기다리는 시간 (`attempt × base`)
    fn retry_delay(&self, attempt: u32) -> Duration {
        self.config.retry_base_delay * attempt
    }

    async fn attempt(&self, prompt: &str) -> Result<String, AttemptError> {
        let body = CompletionRequest {
            prompt: prompt.trim(),
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response: CompletionResponse = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.text)
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(AttemptError::EmptyCompletion);
        }
        Ok(text.to_string())
    }
}
