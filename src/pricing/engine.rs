use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::components;
use super::dimensions::{validate_dimensions, ValidatedDimensions};
use super::error::{PricingError, ValidationError};
use super::geometry::{ComponentWeights, CylinderGeometry};
use super::parameters::PricingParameters;
use super::types::{
    CostBreakdown, CylinderDimensions, CylinderType, MaterialType, MountingType, PricingResult,
};

fn default_quantity() -> u32 {
    1
}

fn default_profit_margin() -> f64 {
    0.25
}

/// 견적 요청. 기본값은 강재, 복동, 플랜지, 1개, 이익률 25%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub dimensions: CylinderDimensions,
    #[serde(default = "default_material")]
    pub material: MaterialType,
    #[serde(default = "default_cylinder_type")]
    pub cylinder_type: CylinderType,
    #[serde(default = "default_mounting_type")]
    pub mounting_type: MountingType,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_profit_margin")]
    pub profit_margin: f64,
}

fn default_material() -> MaterialType {
    MaterialType::Steel
}

fn default_cylinder_type() -> CylinderType {
    CylinderType::DoubleActing
}

fn default_mounting_type() -> MountingType {
    MountingType::Flange
}

impl PricingRequest {
    pub fn new(dimensions: CylinderDimensions) -> Self {
        Self {
            dimensions,
            material: default_material(),
            cylinder_type: default_cylinder_type(),
            mounting_type: default_mounting_type(),
            quantity: default_quantity(),
            profit_margin: default_profit_margin(),
        }
    }
}

/// 수량을 반영한 견적.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 1개 기준 결과
    pub unit: PricingResult,
    pub quantity: u32,
    /// unit.total_price × quantity
    pub total_price: f64,
}

fn check_profit_margin(profit_margin: f64) -> Result<f64, ValidationError> {
    if profit_margin.is_finite() && (0.0..=1.0).contains(&profit_margin) {
        Ok(profit_margin)
    } else {
        Err(ValidationError::ProfitMargin(profit_margin))
    }
}

/// 검증된 치수로 9개 원가 항목을 계산한다.
pub fn cost_breakdown(
    dims: &ValidatedDimensions,
    material: MaterialType,
    cylinder_type: CylinderType,
    mounting_type: MountingType,
    params: &PricingParameters,
) -> CostBreakdown {
    let geometry = CylinderGeometry::from_dimensions(dims, &params.geometry_coefficients);
    let weights = ComponentWeights::new(&geometry, params.material_densities.get(material));
    trace!(?geometry, ?weights, "cylinder geometry");

    CostBreakdown {
        tube_cost: components::tube_cost(&weights, material, params),
        rod_cost: components::rod_cost(&weights, material, params),
        piston_cost: components::piston_cost(&weights, material, params),
        seal_cost: components::seal_cost(dims.bore_diameter, cylinder_type, params),
        end_caps_cost: components::end_caps_cost(&weights, material, params),
        chrome_plating_cost: components::chrome_plating_cost(geometry.chrome_area_cm2, params),
        machining_cost: components::machining_cost(dims, cylinder_type, params),
        assembly_cost: components::assembly_cost(params),
        mounting_cost: components::mounting_cost(mounting_type, params),
    }
}

/// 치수와 선택값으로 원가 내역과 판매가를 계산한다.
///
/// `total = subtotal × 형식 배수 × (1 + 이익률)`. 파라미터 세트를 먼저 검증하므로
/// 손상된 세트가 들어오면 계산 전에 설정 오류로 끝난다.
pub fn calculate(
    dimensions: &CylinderDimensions,
    material: MaterialType,
    cylinder_type: CylinderType,
    mounting_type: MountingType,
    profit_margin: f64,
    params: &PricingParameters,
) -> Result<PricingResult, PricingError> {
    params.validate()?;
    let profit_margin = check_profit_margin(profit_margin)?;
    let dims = validate_dimensions(
        dimensions,
        &params.input_limits,
        &params.wall_thickness_coefficients,
        &params.geometry_coefficients,
    )?;

    let cost_breakdown = cost_breakdown(&dims, material, cylinder_type, mounting_type, params);
    let subtotal = cost_breakdown.total();
    let type_multiplier = params.cylinder_type_multipliers.get(cylinder_type);
    let total_price = subtotal * type_multiplier * (1.0 + profit_margin);

    let notes = dims.wall_thickness_derived.then(|| {
        format!(
            "wall_thickness {:.2} mm derived from {} bar",
            dims.wall_thickness, dims.working_pressure
        )
    });

    debug!(
        material = material.as_str(),
        cylinder_type = cylinder_type.as_str(),
        mounting_type = mounting_type.as_str(),
        subtotal,
        total_price,
        "pricing calculated"
    );

    Ok(PricingResult {
        dimensions: dims.to_dimensions(),
        material,
        cylinder_type,
        mounting_type,
        cost_breakdown,
        subtotal,
        profit_margin,
        total_price,
        notes,
    })
}

/// 요청 전체(수량 포함)를 계산한다.
pub fn quote(request: &PricingRequest, params: &PricingParameters) -> Result<Quote, PricingError> {
    if request.quantity == 0 {
        return Err(ValidationError::Quantity.into());
    }
    let unit = calculate(
        &request.dimensions,
        request.material,
        request.cylinder_type,
        request.mounting_type,
        request.profit_margin,
        params,
    )?;
    let total_price = unit.total_price * f64::from(request.quantity);
    Ok(Quote {
        unit,
        quantity: request.quantity,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::error::{ConfigurationError, DimensionField};

    fn reference() -> CylinderDimensions {
        CylinderDimensions::new(80.0, 50.0, 400.0)
    }

    #[test]
    fn result_echoes_filled_dimensions() {
        let params = PricingParameters::default();
        let r = calculate(
            &reference(),
            MaterialType::Steel,
            CylinderType::DoubleActing,
            MountingType::Flange,
            0.25,
            &params,
        )
        .unwrap();
        assert_eq!(r.dimensions.working_pressure, Some(160.0));
        assert!(r.dimensions.wall_thickness.is_some());
        assert!(r.notes.is_some());
    }

    #[test]
    fn supplied_wall_thickness_leaves_no_note() {
        let params = PricingParameters::default();
        let r = calculate(
            &reference().with_wall_thickness(10.0),
            MaterialType::Steel,
            CylinderType::SingleActing,
            MountingType::Foot,
            0.0,
            &params,
        )
        .unwrap();
        assert!(r.notes.is_none());
    }

    #[test]
    fn margin_outside_unit_interval_is_rejected() {
        let params = PricingParameters::default();
        let err = calculate(
            &reference(),
            MaterialType::Steel,
            CylinderType::DoubleActing,
            MountingType::Flange,
            1.5,
            &params,
        )
        .unwrap_err();
        assert_eq!(err, PricingError::Validation(ValidationError::ProfitMargin(1.5)));
    }

    #[test]
    fn corrupt_parameters_fail_before_validation() {
        let mut params = PricingParameters::default();
        params.seal_coefficients.diameter_divisor = 0.0;
        let err = calculate(
            &CylinderDimensions::new(0.0, 0.0, 0.0),
            MaterialType::Steel,
            CylinderType::DoubleActing,
            MountingType::Flange,
            0.25,
            &params,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PricingError::Configuration(ConfigurationError::NonPositive { .. })
        ));
    }

    #[test]
    fn quote_multiplies_by_quantity() {
        let params = PricingParameters::default();
        let mut req = PricingRequest::new(reference());
        req.quantity = 3;
        let q = quote(&req, &params).unwrap();
        assert!((q.total_price - q.unit.total_price * 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let params = PricingParameters::default();
        let mut req = PricingRequest::new(reference());
        req.quantity = 0;
        let err = quote(&req, &params).unwrap_err();
        match err {
            PricingError::Validation(v) => assert_eq!(v.field(), DimensionField::Quantity),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn request_defaults_match_manual_form() {
        let req: PricingRequest = serde_json::from_str(
            r#"{"dimensions":{"bore_diameter":80,"rod_diameter":50,"stroke_length":400}}"#,
        )
        .unwrap();
        assert_eq!(req.material, MaterialType::Steel);
        assert_eq!(req.cylinder_type, CylinderType::DoubleActing);
        assert_eq!(req.mounting_type, MountingType::Flange);
        assert_eq!(req.quantity, 1);
        assert_eq!(req.profit_margin, 0.25);
    }
}
