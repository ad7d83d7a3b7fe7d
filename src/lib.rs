//! 유압 실린더 원가 계산 로직을 라이브러리로 분리하여 CLI 외의 호출자도 같은 엔진을 쓰게 한다.

pub mod app;
pub mod config;
pub mod i18n;
pub mod pricing;
pub mod table_pricing;
pub mod telemetry;
pub mod ui_cli;
