use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::i18n::{self, Translator};
use crate::pricing::{
    self, types::ParseSelectionError, ParameterFileError, ParameterStore, PricingError,
    PricingParameters, PricingRequest, Quote,
};
use crate::table_pricing::{self, TablePricingError, TableQuote};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 파라미터 파일 오류
    #[error("파라미터 파일 오류: {0}")]
    ParameterFile(#[from] ParameterFileError),
    /// 견적 계산 오류(입력 검증 포함)
    #[error("견적 계산 오류: {0}")]
    Pricing(#[from] PricingError),
    /// 표 기반 계산 오류
    #[error("가격표 오류: {0}")]
    TablePricing(#[from] TablePricingError),
    /// 선택값 파싱 오류
    #[error("{0}")]
    Selection(#[from] ParseSelectionError),
    /// JSON 출력 오류
    #[error("JSON 직렬화 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 덮어쓰기 없이 기존 파라미터 파일에 쓰려 함
    #[error("파라미터 파일이 이미 있습니다: {} (--force로 덮어쓰기)", .0.display())]
    ParametersExist(PathBuf),
}

/// 실행 중 공유하는 설정, 번역기, 파라미터 저장소.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub translator: Translator,
    pub store: ParameterStore,
}

impl AppContext {
    /// 설정에 적힌 파라미터 파일을 읽어 컨텍스트를 만든다.
    /// `parameters_override`가 있으면 설정 대신 그 경로를 쓴다.
    pub fn load(
        config: Config,
        translator: Translator,
        parameters_override: Option<&Path>,
    ) -> Result<Self, AppError> {
        let path = parameters_override.unwrap_or(&config.parameters_path);
        let store = ParameterStore::load(path)?;
        debug!(
            path = %path.display(),
            lang = translator.language_code(),
            "application context ready"
        );
        Ok(Self {
            config,
            translator,
            store,
        })
    }

    /// 현재 파라미터 스냅샷으로 견적을 계산한다.
    pub fn quote(&self, request: &PricingRequest) -> Result<Quote, AppError> {
        let snapshot = self.store.snapshot();
        debug!(version = snapshot.version, "quoting with parameter snapshot");
        Ok(pricing::quote(request, &snapshot.parameters)?)
    }

    /// 설정의 가격표 경로(또는 지정 경로)로 표 기반 견적을 계산한다.
    pub fn table_quote(
        &self,
        table_path: Option<&Path>,
        selections: &BTreeMap<String, String>,
        stroke_mm: f64,
    ) -> Result<TableQuote, AppError> {
        let path = table_path.unwrap_or(&self.config.price_table_path);
        let table = table_pricing::load_table(path)?;
        Ok(table_pricing::calculate_table_price(
            &table,
            selections,
            stroke_mm,
            &self.config.table,
        )?)
    }

    /// 현재 파라미터를 TOML 문자열로 돌려준다.
    pub fn parameters_toml(&self) -> Result<String, AppError> {
        let snapshot = self.store.snapshot();
        let text = toml::to_string_pretty(snapshot.parameters.as_ref())
            .map_err(ParameterFileError::from)?;
        Ok(text)
    }
}

/// 기본 파라미터 파일을 쓴다. 파일이 이미 있으면 `force`일 때만 덮어쓴다.
pub fn init_parameters(path: &Path, force: bool) -> Result<(), AppError> {
    if path.exists() && !force {
        return Err(AppError::ParametersExist(path.to_path_buf()));
    }
    pricing::save_parameters(path, &PricingParameters::default())?;
    info!(path = %path.display(), "default parameter file written");
    Ok(())
}

/// 대화형 메인 루프를 실행한다.
pub fn run(ctx: &AppContext) -> Result<(), AppError> {
    loop {
        let choice = match ui_cli::main_menu(&ctx.translator) {
            Ok(choice) => choice,
            Err(e) if ui_cli::is_end_of_input(&e) => {
                debug!("input closed, leaving interactive mode");
                break;
            }
            Err(e) => return Err(e),
        };
        let outcome = match choice {
            MenuChoice::Quote => ui_cli::handle_quote(ctx),
            MenuChoice::Table => ui_cli::handle_table(ctx),
            MenuChoice::Parameters => ui_cli::handle_parameters(ctx),
            MenuChoice::Options => {
                ui_cli::print_options(&ctx.translator);
                Ok(())
            }
            MenuChoice::Exit => {
                println!("{}", ctx.translator.t(i18n::keys::APP_EXIT));
                break;
            }
        };
        // 입력 오류는 메뉴로 돌아가고, 입출력 오류만 루프를 끝낸다.
        match outcome {
            Ok(()) => {}
            Err(e) if ui_cli::is_end_of_input(&e) => break,
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => println!("{}: {e}", ctx.translator.t(i18n::keys::ERROR_PREFIX)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::CylinderDimensions;

    fn context(dir: &Path) -> AppContext {
        let config = Config {
            parameters_path: dir.join("params.toml"),
            price_table_path: dir.join("table.toml"),
            ..Config::default()
        };
        AppContext::load(config, Translator::new("en"), None).unwrap()
    }

    #[test]
    fn missing_parameter_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        assert_eq!(ctx.store.version(), 1);
        let q = ctx
            .quote(&PricingRequest::new(CylinderDimensions::new(80.0, 50.0, 400.0)))
            .unwrap();
        assert!(q.total_price > 0.0);
    }

    #[test]
    fn init_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.toml");
        init_parameters(&path, false).unwrap();
        let ctx = context(dir.path());
        let text = ctx.parameters_toml().unwrap();
        assert!(text.contains("[labor_rates]"));
        assert_eq!(
            *ctx.store.snapshot().parameters,
            PricingParameters::default()
        );
    }

    #[test]
    fn init_refuses_existing_file_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.toml");
        std::fs::write(&path, "assembly_hours = 4.0\n").unwrap();

        let err = init_parameters(&path, false).unwrap_err();
        assert!(matches!(err, AppError::ParametersExist(ref p) if p == &path));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "assembly_hours = 4.0\n"
        );

        init_parameters(&path, true).unwrap();
        let ctx = context(dir.path());
        assert_eq!(ctx.store.snapshot().parameters.assembly_hours, 1.5);
    }

    #[test]
    fn missing_price_table_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let err = ctx
            .table_quote(None, &BTreeMap::new(), 100.0)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::TablePricing(TablePricingError::Io(_))
        ));
    }
}
