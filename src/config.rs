//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 로그인 토큰 서명에 사용할 비밀키 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 정적 파일 디렉토리
//! - `LLM_*`: LLM 게이트웨이 설정 (`LlmConfig` 참고)

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/planner.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 프론트엔드 빌드 결과물 경로 (기본값: "../frontend/dist")
    pub frontend_dist: String,
    /// LLM 완성(completion) 엔드포인트 설정
    pub llm: LlmConfig,
}

/// LLM 게이트웨이 설정
///
/// 엔드포인트 URL, 모델명, 인증 키를 코드에 상수로 박아두지 않고
/// 설정으로 주입받습니다. 테스트에서는 가짜 서버 주소를 넣어 사용합니다.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// 완성 엔드포인트 URL (예: "http://127.0.0.1:9241/v1/completions")
    pub api_url: String,
    /// Bearer 토큰으로 전송되는 API 키
    pub api_key: String,
    /// 요청에 실어 보낼 모델 식별자
    pub model: String,
    /// 응답 최대 토큰 수
    pub max_tokens: u32,
    /// 샘플링 온도
    pub temperature: f32,
    /// 시도 1회당 타임아웃
    pub timeout: Duration,
    /// 최대 시도 횟수 (1 이상)
    pub max_attempts: u32,
    /// 재시도 대기 기준값. n번째 재시도 전에는 `n × retry_base_delay`만큼 기다립니다.
    pub retry_base_delay: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:9241/v1/completions".to_string(),
            api_key: "dummy-key".to_string(),
            model: "meta-llama/Llama-3.3-70B-Instruct".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            timeout: Duration::from_secs(300),
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(2000),
        }
    }
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            jwt_secret: env::var("JWT_SECRET")?,     // 필수: 없으면 에러
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 3000),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            llm: LlmConfig::from_env(),
        })
    }
}

impl LlmConfig {
    /// `LLM_*` 환경변수를 읽습니다. 값이 없거나 숫자 파싱에 실패하면 기본값을 씁니다.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("LLM_API_URL").unwrap_or(defaults.api_url),
            api_key: env::var("LLM_API_KEY").unwrap_or(defaults.api_key),
            model: env::var("LLM_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_or("LLM_MAX_TOKENS", defaults.max_tokens),
            temperature: parse_or("LLM_TEMPERATURE", defaults.temperature),
            timeout: Duration::from_secs(parse_or("LLM_TIMEOUT_SECS", 300)),
            // 0회 시도는 의미가 없으므로 최소 1회로 보정합니다.
            max_attempts: parse_or("LLM_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            retry_base_delay: Duration::from_millis(parse_or("LLM_RETRY_DELAY_MS", 2000)),
        }
    }
}

/// 환경변수를 읽어 `T`로 파싱합니다.
///
/// 변수가 없거나 파싱에 실패하면 `default`를 반환합니다.
/// (예: `PORT=abc` → 3000)
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_missing_or_garbage() {
        // 테스트 간 충돌을 피하려고 이 테스트 전용 변수명을 사용합니다.
        env::remove_var("AUTO_PLANNER_TEST_MISSING");
        assert_eq!(parse_or("AUTO_PLANNER_TEST_MISSING", 42u32), 42);

        env::set_var("AUTO_PLANNER_TEST_GARBAGE", "not-a-number");
        assert_eq!(parse_or("AUTO_PLANNER_TEST_GARBAGE", 7u16), 7);

        env::set_var("AUTO_PLANNER_TEST_NUMBER", " 15 ");
        assert_eq!(parse_or("AUTO_PLANNER_TEST_NUMBER", 0u64), 15);
    }

    #[test]
    fn llm_defaults_match_gateway_contract() {
        let config = LlmConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.retry_base_delay, Duration::from_millis(2000));
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
    }
}
