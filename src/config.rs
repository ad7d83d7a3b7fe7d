use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::table_pricing::TableSettings;

/// `--config`가 없을 때 쓰는 설정 파일 이름.
pub const CONFIG_FILE: &str = "config.toml";

fn default_parameters_path() -> PathBuf {
    PathBuf::from("pricing_parameters.toml")
}

fn default_price_table_path() -> PathBuf {
    PathBuf::from("price_table.toml")
}

fn default_profit_margin() -> f64 {
    0.25
}

fn default_quantity() -> u32 {
    1
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 표시 언어(ko/en/tr). 없으면 시스템 로케일을 따른다.
    #[serde(default)]
    pub language: Option<String>,
    /// 가격 파라미터 파일 경로
    #[serde(default = "default_parameters_path")]
    pub parameters_path: PathBuf,
    /// 표 기반 가격표 경로
    #[serde(default = "default_price_table_path")]
    pub price_table_path: PathBuf,
    /// 견적 기본 이익률(0~1)
    #[serde(default = "default_profit_margin")]
    pub default_profit_margin: f64,
    /// 견적 기본 수량
    #[serde(default = "default_quantity")]
    pub default_quantity: u32,
    /// 표 기반 미터 항목 길이 여유
    #[serde(default)]
    pub table: TableSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            parameters_path: default_parameters_path(),
            price_table_path: default_price_table_path(),
            default_profit_margin: default_profit_margin(),
            default_quantity: default_quantity(),
            table: TableSettings::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 지정한 경로의 설정을 로드하거나 없으면 기본 설정을 만들어 저장한다.
pub fn load_or_default_at(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(path, &cfg)?;
        Ok(cfg)
    }
}

fn save_config(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}
