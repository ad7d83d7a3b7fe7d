//! 로그(tracing) 구독자 초기화.

use tracing_subscriber::EnvFilter;

/// 기본 fmt 구독자를 설치한다. `RUST_LOG`가 있으면 그 필터를 쓰고,
/// 없으면 `default_level`을 쓴다.
///
/// 이미 전역 구독자가 설정되어 있으면 false를 돌려준다.
pub fn init_default_tracing(default_level: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .is_ok()
}
