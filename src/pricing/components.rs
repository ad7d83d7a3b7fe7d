//! 9개 원가 항목 계산기. 모두 순수 함수이며 서로 독립이다.
//!
//! 파라미터 세트가 검증을 통과했다면 어떤 계산기도 실패하지 않는다.

use super::dimensions::ValidatedDimensions;
use super::geometry::ComponentWeights;
use super::parameters::{PricingParameters, SealPrices};
use super::types::{CylinderType, MaterialType, MountingType};

/// 앞/뒤 엔드캡
pub const END_CAP_COUNT: f64 = 2.0;

/// 씰 가격 구간 경계 [mm]. 중간 구간은 하한을 포함한다.
pub const SEAL_MEDIUM_FROM_MM: f64 = 50.0;
pub const SEAL_LARGE_ABOVE_MM: f64 = 100.0;

/// 씰 가격 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealBracket {
    Small,
    Medium,
    Large,
}

impl SealBracket {
    pub fn for_bore(bore_diameter: f64) -> Self {
        if bore_diameter < SEAL_MEDIUM_FROM_MM {
            SealBracket::Small
        } else if bore_diameter <= SEAL_LARGE_ABOVE_MM {
            SealBracket::Medium
        } else {
            SealBracket::Large
        }
    }

    pub fn base_price(&self, prices: &SealPrices) -> f64 {
        match self {
            SealBracket::Small => prices.small,
            SealBracket::Medium => prices.medium,
            SealBracket::Large => prices.large,
        }
    }
}

/// 재질 kg당 실효 단가 = 단가 × 재질 배수
fn material_rate(material: MaterialType, params: &PricingParameters) -> f64 {
    params.material_prices.get(material) * params.material_multipliers.get(material)
}

pub fn tube_cost(weights: &ComponentWeights, material: MaterialType, params: &PricingParameters) -> f64 {
    weights.tube_kg * material_rate(material, params)
}

pub fn rod_cost(weights: &ComponentWeights, material: MaterialType, params: &PricingParameters) -> f64 {
    weights.rod_kg * material_rate(material, params)
}

pub fn piston_cost(
    weights: &ComponentWeights,
    material: MaterialType,
    params: &PricingParameters,
) -> f64 {
    weights.piston_kg * material_rate(material, params)
}

pub fn end_caps_cost(
    weights: &ComponentWeights,
    material: MaterialType,
    params: &PricingParameters,
) -> f64 {
    weights.end_cap_kg * END_CAP_COUNT * material_rate(material, params)
}

/// 크롬 도금은 로드 표면 처리이므로 재질과 무관하게 적용한다.
pub fn chrome_plating_cost(chrome_area_cm2: f64, params: &PricingParameters) -> f64 {
    chrome_area_cm2 * params.chrome_plating_price
}

/// 보어 구간 기준가 × 크기 보정 × (복동이면 배수).
///
/// 크기 보정이 음수가 되는 작은 보어에서는 0으로 막는다.
pub fn seal_cost(bore_diameter: f64, cylinder_type: CylinderType, params: &PricingParameters) -> f64 {
    let coeffs = &params.seal_coefficients;
    let base = SealBracket::for_bore(bore_diameter).base_price(&params.seal_prices);
    let size_factor =
        (1.0 + (bore_diameter - coeffs.base_diameter) / coeffs.diameter_divisor).max(0.0);
    let type_factor = if cylinder_type == CylinderType::DoubleActing {
        coeffs.double_acting_multiplier
    } else {
        1.0
    };
    base * size_factor * type_factor
}

/// 가공 시간 [h].
pub fn machining_hours(
    dims: &ValidatedDimensions,
    cylinder_type: CylinderType,
    params: &PricingParameters,
) -> f64 {
    let c = &params.machining_coefficients;
    let size_factor = dims.bore_diameter / c.bore_diameter_divisor
        + dims.stroke_length / c.stroke_length_divisor
        + dims.rod_diameter / c.rod_diameter_divisor;
    c.base_hours * size_factor * params.cylinder_type_multipliers.get(cylinder_type)
}

pub fn machining_cost(
    dims: &ValidatedDimensions,
    cylinder_type: CylinderType,
    params: &PricingParameters,
) -> f64 {
    params.labor_rates.machining * machining_hours(dims, cylinder_type, params)
}

/// 형상과 무관한 고정 조립 비용.
pub fn assembly_cost(params: &PricingParameters) -> f64 {
    params.labor_rates.assembly * params.assembly_hours
}

pub fn mounting_cost(mounting: MountingType, params: &PricingParameters) -> f64 {
    params.mounting_prices.get(mounting)
}
