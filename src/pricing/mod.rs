//! 유압 실린더 파라메트릭 원가 계산 엔진.
//!
//! 검증 → 형상 → 원가 항목 → 합산 순서의 상태 없는 순수 파이프라인이다.

pub mod components;
pub mod dimensions;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod parameters;
pub mod store;
pub mod types;
pub mod wall_thickness;

pub use dimensions::{validate_dimensions, ValidatedDimensions, DEFAULT_WORKING_PRESSURE_BAR};
pub use engine::{calculate, cost_breakdown, quote, PricingRequest, Quote};
pub use error::{ConfigurationError, DimensionField, PricingError, ValidationError};
pub use parameters::PricingParameters;
pub use store::{load_parameters, save_parameters, ParameterFileError, ParameterStore};
pub use types::*;
