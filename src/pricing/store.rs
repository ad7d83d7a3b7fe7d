//! 파라미터 파일 로드와 버전 관리 저장소.
//!
//! 저장된 값은 기본값 위에 깊은 병합(deep merge)한 뒤 검증한다. 일부 키만 담긴
//! 파일도 유효하며, 계산은 항상 완전한 파라미터 세트의 스냅샷을 받는다.

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info};

use super::error::ConfigurationError;
use super::parameters::PricingParameters;

/// 파라미터 파일 로드/저장 오류.
#[derive(Debug, Error)]
pub enum ParameterFileError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("파라미터 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("파라미터 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// `overlay`의 값을 `base`에 재귀적으로 덮어쓴다. 테이블끼리는 키 단위로 병합한다.
pub fn deep_merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn defaults_value() -> Result<toml::Value, ConfigurationError> {
    toml::Value::try_from(PricingParameters::default())
        .map_err(|e| ConfigurationError::Malformed(e.to_string()))
}

fn from_value(value: toml::Value) -> Result<PricingParameters, ConfigurationError> {
    let params = value
        .try_into::<PricingParameters>()
        .map_err(|e| ConfigurationError::Malformed(e.message().to_string()))?;
    params.validate()?;
    Ok(params)
}

/// 저장된 덮어쓰기 값을 기본값에 병합해 완전한 파라미터 세트를 만든다.
pub fn merge_overrides(overrides: toml::Value) -> Result<PricingParameters, ConfigurationError> {
    let mut merged = defaults_value()?;
    deep_merge(&mut merged, overrides);
    from_value(merged)
}

/// TOML 문자열(일부 키만 있어도 됨)을 파라미터 세트로 읽는다.
pub fn parse_overrides(src: &str) -> Result<PricingParameters, ParameterFileError> {
    let overrides: toml::Value = toml::from_str(src)?;
    Ok(merge_overrides(overrides)?)
}

/// 파라미터 파일을 로드한다. 파일이 없으면 기본값을 돌려준다.
pub fn load_parameters(path: &Path) -> Result<PricingParameters, ParameterFileError> {
    if !path.exists() {
        debug!(path = %path.display(), "parameter file not found, using defaults");
        return Ok(PricingParameters::default());
    }
    let content = fs::read_to_string(path)?;
    let params = parse_overrides(&content)?;
    info!(path = %path.display(), "pricing parameters loaded");
    Ok(params)
}

/// 파라미터 세트를 TOML 파일로 저장한다.
pub fn save_parameters(path: &Path, params: &PricingParameters) -> Result<(), ParameterFileError> {
    params.validate()?;
    let content = toml::to_string_pretty(params)?;
    fs::write(path, content)?;
    Ok(())
}

/// 버전이 붙은 파라미터 스냅샷.
#[derive(Debug, Clone)]
pub struct ParameterSnapshot {
    pub version: u64,
    pub parameters: Arc<PricingParameters>,
}

#[derive(Debug)]
struct StoreState {
    version: u64,
    parameters: Arc<PricingParameters>,
}

/// 현재 파라미터 세트를 보관한다. 교체는 copy-on-write로 이뤄져
/// 이미 스냅샷을 받은 계산은 이전 값을 끝까지 본다.
#[derive(Debug)]
pub struct ParameterStore {
    state: RwLock<StoreState>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(PricingParameters::default())
    }
}

impl ParameterStore {
    /// 검증되지 않은 값은 `replace`로 넣는다. 여기서는 호출자가 검증했다고 본다.
    pub fn new(parameters: PricingParameters) -> Self {
        Self {
            state: RwLock::new(StoreState {
                version: 1,
                parameters: Arc::new(parameters),
            }),
        }
    }

    /// 파일에서 로드해 저장소를 만든다.
    pub fn load(path: &Path) -> Result<Self, ParameterFileError> {
        Ok(Self::new(load_parameters(path)?))
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        ParameterSnapshot {
            version: state.version,
            parameters: Arc::clone(&state.parameters),
        }
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    /// 검증 후 교체하고 새 버전 번호를 돌려준다.
    pub fn replace(&self, parameters: PricingParameters) -> Result<u64, ConfigurationError> {
        parameters.validate()?;
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.version += 1;
        state.parameters = Arc::new(parameters);
        info!(version = state.version, "pricing parameters replaced");
        Ok(state.version)
    }

    /// 현재 값 위에 덮어쓰기 값을 병합해 교체한다.
    ///
    /// 읽기부터 교체까지 쓰기 잠금을 쥐고 있으므로 동시에 들어온 병합이
    /// 서로의 결과를 덮어쓰지 않는다.
    pub fn apply_overrides(&self, overrides: toml::Value) -> Result<u64, ConfigurationError> {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut merged = toml::Value::try_from(state.parameters.as_ref())
            .map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        deep_merge(&mut merged, overrides);
        let parameters = from_value(merged)?;
        state.version += 1;
        state.parameters = Arc::new(parameters);
        info!(version = state.version, "pricing parameter overrides applied");
        Ok(state.version)
    }

    /// 기본값으로 되돌린다.
    pub fn reset(&self) -> u64 {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.version += 1;
        state.parameters = Arc::new(PricingParameters::default());
        info!(version = state.version, "pricing parameters reset to defaults");
        state.version
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    /// 병합 없이 모든 섹션을 요구하는 파싱.
    fn parse_complete(src: &str) -> Result<PricingParameters, ConfigurationError> {
        let value: toml::Value = toml::from_str(src)
            .map_err(|e| ConfigurationError::Malformed(e.message().to_string()))?;
        from_value(value)
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let params = parse_overrides(
            r#"
            chrome_plating_price = 0.5

            [material_prices]
            steel = 52.0
            "#,
        )
        .unwrap();
        assert_eq!(params.chrome_plating_price, 0.5);
        assert_eq!(params.material_prices.steel, 52.0);
        assert_eq!(params.material_prices.stainless, 180.0);
        assert_eq!(params.assembly_hours, 1.5);
    }

    #[test]
    fn override_with_zero_divisor_is_rejected() {
        let err = parse_overrides(
            r#"
            [machining_coefficients]
            bore_diameter_divisor = 0.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParameterFileError::Configuration(ConfigurationError::NonPositive { .. })
        ));
    }

    #[test]
    fn wrong_type_is_malformed() {
        let err = parse_overrides("assembly_hours = \"many\"").unwrap_err();
        assert!(matches!(
            err,
            ParameterFileError::Configuration(ConfigurationError::Malformed(_))
        ));
    }

    #[test]
    fn complete_parse_requires_every_section() {
        let err = parse_complete("assembly_hours = 2.0").unwrap_err();
        assert!(matches!(err, ConfigurationError::Malformed(_)));

        let full = toml::to_string(&PricingParameters::default()).unwrap();
        assert_eq!(parse_complete(&full).unwrap(), PricingParameters::default());
    }

    #[test]
    fn deep_merge_replaces_leaves_and_keeps_siblings() {
        let mut base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\nz = 4").unwrap();
        deep_merge(&mut base, overlay);
        let a = base.get("a").unwrap();
        assert_eq!(a.get("x").unwrap().as_integer(), Some(1));
        assert_eq!(a.get("y").unwrap().as_integer(), Some(3));
        assert_eq!(a.get("z").unwrap().as_integer(), Some(4));
    }

    #[test]
    fn snapshot_survives_replace() {
        let store = ParameterStore::default();
        let before = store.snapshot();
        let mut next = PricingParameters::default();
        next.assembly_hours = 3.0;
        let version = store.replace(next).unwrap();
        assert_eq!(version, before.version + 1);
        assert_eq!(before.parameters.assembly_hours, 1.5);
        assert_eq!(store.snapshot().parameters.assembly_hours, 3.0);
    }

    #[test]
    fn invalid_replace_keeps_current_version() {
        let store = ParameterStore::default();
        let mut bad = PricingParameters::default();
        bad.cylinder_type_multipliers.telescopic = 0.0;
        assert!(store.replace(bad).is_err());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn apply_overrides_and_reset() {
        let store = ParameterStore::default();
        let overlay: toml::Value = toml::from_str("[labor_rates]\nassembly = 700.0").unwrap();
        store.apply_overrides(overlay).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.parameters.labor_rates.assembly, 700.0);
        assert_eq!(snap.parameters.labor_rates.machining, 850.0);
        let v = store.reset();
        assert_eq!(v, 3);
        assert_eq!(*store.snapshot().parameters, PricingParameters::default());
    }

    #[test]
    fn concurrent_overrides_on_different_keys_all_survive() {
        const ROUNDS: u64 = 200;
        let store = ParameterStore::default();
        thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..ROUNDS {
                    let overlay: toml::Value =
                        toml::from_str(&format!("[labor_rates]\nassembly = {}.0", 700 + i)).unwrap();
                    store.apply_overrides(overlay).unwrap();
                }
            });
            scope.spawn(|| {
                for i in 0..ROUNDS {
                    let overlay: toml::Value =
                        toml::from_str(&format!("[labor_rates]\nmachining = {}.0", 900 + i)).unwrap();
                    store.apply_overrides(overlay).unwrap();
                }
            });
        });

        let snap = store.snapshot();
        assert_eq!(snap.version, 1 + 2 * ROUNDS);
        assert_eq!(snap.parameters.labor_rates.assembly, (700 + ROUNDS - 1) as f64);
        assert_eq!(snap.parameters.labor_rates.machining, (900 + ROUNDS - 1) as f64);
    }

    #[test]
    fn failed_override_keeps_current_version() {
        let store = ParameterStore::default();
        let overlay: toml::Value =
            toml::from_str("[machining_coefficients]\nbore_diameter_divisor = 0.0").unwrap();
        assert!(store.apply_overrides(overlay).is_err());
        assert_eq!(store.version(), 1);
    }
}
