use std::fmt;

use thiserror::Error;

/// 검증 대상이 되는 입력 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionField {
    BoreDiameter,
    RodDiameter,
    StrokeLength,
    WallThickness,
    WorkingPressure,
    ProfitMargin,
    Quantity,
}

impl DimensionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionField::BoreDiameter => "bore_diameter",
            DimensionField::RodDiameter => "rod_diameter",
            DimensionField::StrokeLength => "stroke_length",
            DimensionField::WallThickness => "wall_thickness",
            DimensionField::WorkingPressure => "working_pressure",
            DimensionField::ProfitMargin => "profit_margin",
            DimensionField::Quantity => "quantity",
        }
    }
}

impl fmt::Display for DimensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 치수/선택 입력 검증 오류. 항상 문제 필드를 함께 보고한다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// 필수 입력값이 없음
    #[error("{field} 값이 없습니다")]
    Missing { field: DimensionField },
    /// 0 이하 또는 유한하지 않은 값
    #[error("{field} 값은 0보다 커야 합니다 (입력: {value})")]
    NonPositive { field: DimensionField, value: f64 },
    /// 허용 범위 [min, max] 밖의 값
    #[error("{field} 값 {value} 이(가) 허용 범위 [{min}, {max}] 밖입니다")]
    OutOfRange {
        field: DimensionField,
        value: f64,
        min: f64,
        max: f64,
    },
    /// 로드 직경이 보어 직경 이상
    #[error("rod_diameter({rod})는 bore_diameter({bore})보다 작아야 합니다")]
    RodNotSmallerThanBore { rod: f64, bore: f64 },
    /// 로드가 피스톤 직경(보어 − 씰 여유) 이상이라 피스톤 재료가 남지 않음
    #[error("rod_diameter({rod})는 피스톤 직경({piston_diameter})보다 작아야 합니다")]
    NoPistonMaterial { rod: f64, piston_diameter: f64 },
    /// 이익률이 0~1 밖
    #[error("profit_margin 값 {0} 은(는) 0~1 범위여야 합니다")]
    ProfitMargin(f64),
    /// 수량이 0
    #[error("quantity 는 1 이상이어야 합니다")]
    Quantity,
}

impl ValidationError {
    /// 오류를 일으킨 필드.
    pub fn field(&self) -> DimensionField {
        match self {
            ValidationError::Missing { field }
            | ValidationError::NonPositive { field, .. }
            | ValidationError::OutOfRange { field, .. } => *field,
            ValidationError::RodNotSmallerThanBore { .. }
            | ValidationError::NoPistonMaterial { .. } => DimensionField::RodDiameter,
            ValidationError::ProfitMargin(_) => DimensionField::ProfitMargin,
            ValidationError::Quantity => DimensionField::Quantity,
        }
    }
}

/// 파라미터 세트가 손상되었거나 일관성이 없을 때의 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// 필수 섹션 누락, 타입 불일치 등 구조 오류
    #[error("파라미터 구조 오류: {0}")]
    Malformed(String),
    /// 배수/제수/밀도 등 0보다 커야 하는 값
    #[error("{field} 값은 0보다 커야 합니다 (현재: {value})")]
    NonPositive { field: &'static str, value: f64 },
    /// 가격/시간 등 음수가 될 수 없는 값
    #[error("{field} 값은 음수일 수 없습니다 (현재: {value})")]
    Negative { field: &'static str, value: f64 },
    /// min < max 를 만족하지 않는 입력 한계
    #[error("{field} 한계가 잘못되었습니다: min={min}, max={max}")]
    InvertedLimit {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// 가격 계산 한 번의 결과 오류. 부분 결과는 반환하지 않는다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("입력 검증 오류: {0}")]
    Validation(#[from] ValidationError),
    #[error("설정 오류: {0}")]
    Configuration(#[from] ConfigurationError),
}
