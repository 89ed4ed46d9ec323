//! # Auto Planner 웹 서버 진입점
//!
//! 이 파일은 Auto Planner 백엔드의 **시작점(entry point)**입니다.
//! Rust 프로그램은 항상 `main()` 함수에서 실행이 시작됩니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. LLM 클라이언트 생성
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod` 키워드는 다른 파일을 모듈로 가져옵니다.
// 예: `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{
    routing::{delete, get, post}, // HTTP 메서드별 라우팅 함수들
    Router,                       // 라우터: URL 경로와 핸들러를 연결하는 구조체
};
use config::Config;
use routes::{ai_plan, auth, exams, health, preferences, users, AppState};
use services::llm::LlmClient;
use sqlx::sqlite::SqlitePoolOptions; // SQLite 연결 풀 설정 옵션
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},          // CORS(Cross-Origin Resource Sharing) 설정
    services::{ServeDir, ServeFile}, // 정적 파일 서빙 서비스
    trace::TraceLayer,               // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 auto_planner, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auto_planner=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    // DATABASE_URL, JWT_SECRET이 없으면 `?`로 즉시 종료합니다.
    let config = Config::from_env()?;
    tracing::info!("Starting Auto Planner server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시키는 매크로
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: LLM 클라이언트 생성 ──
    // 엔드포인트/모델/키는 코드 상수가 아니라 설정(LLM_*)으로 주입됩니다.
    tracing::info!(
        "LLM endpoint: {} (model: {}, attempts: {})",
        config.llm.api_url,
        config.llm.model,
        config.llm.max_attempts
    );
    let llm = LlmClient::new(config.llm.clone())?;

    // ── 7단계: 애플리케이션 상태(State) 생성 ──
    // AppState: 모든 라우트 핸들러가 공유하는 데이터를 담는 구조체
    let state = AppState {
        pool: pool.clone(),
        jwt_secret: config.jwt_secret.clone(),
        llm,
    };

    // ── 8단계: API 라우터 설정 ──
    // axum 0.8부터 경로 파라미터는 `{name}` 문법을 씁니다.

    // 인증 (회원가입, 로그인)
    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    // 사용자, 선호도, 시험 (계획 생성의 입력 데이터)
    let collaborator_routes = Router::new()
        .route("/user", get(users::list_users))
        .route("/user/{user_id}", get(users::get_user))
        .route(
            "/user-preference/{user_id}",
            get(preferences::get_preference).post(preferences::save_preference),
        )
        .route("/exam", post(exams::create_exam))
        .route(
            "/exam/{user_id}",
            get(exams::list_exams).delete(exams::delete_all_exams),
        )
        .route("/exam/{user_id}/{subject}", delete(exams::delete_exam));

    // 학습 계획 생성/조회와 헬스체크
    let plan_routes = Router::new()
        .route("/ai-plan/generate", post(ai_plan::generate_plan))
        .route("/ai-plan/list", get(ai_plan::list_plans))
        .route("/ai-plan/health", get(health::health_check));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(collaborator_routes)
        .merge(plan_routes)
        .with_state(state);

    // ── 9단계: CORS 미들웨어 설정 ──
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 10단계: 프론트엔드 정적 파일 서빙 설정 ──
    // SPA이므로 찾을 수 없는 경로는 index.html로 돌려보냅니다.
    let frontend_dist = Path::new(&config.frontend_dist);
    let app = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", config.frontend_dist);

        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));

        api_routes
            .fallback_service(serve_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");

        api_routes.layer(cors).layer(TraceLayer::new_for_http())
    };

    // ── 11단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
