//! 진단 로그 초기화 모듈
//!
//! 파싱/입출력 오류 같은 진단 메시지는 `tracing` 으로 stderr 에 출력합니다.
//! `RUST_LOG` 가 설정되어 있으면 그 값을 우선합니다.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 기본 로그 필터 반환
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "jcsv=debug"
    } else {
        "jcsv=warn"
    }
}

/// CLI용 로거 초기화
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // 테스트 등에서 두 번 초기화되는 경우는 무시
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
