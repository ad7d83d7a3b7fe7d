use serde::Serialize;
use tracing::{debug, warn};

use super::error::{DimensionField, ValidationError};
use super::parameters::{GeometryCoefficients, InputLimits, Limit, WallThicknessCoefficients};
use super::types::CylinderDimensions;
use super::wall_thickness::required_wall_thickness;

/// 사용 압력이 주어지지 않았을 때의 기본값 [bar].
pub const DEFAULT_WORKING_PRESSURE_BAR: f64 = 160.0;

/// 검증을 통과하고 기본값이 채워진 치수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidatedDimensions {
    pub bore_diameter: f64,
    pub rod_diameter: f64,
    pub stroke_length: f64,
    pub wall_thickness: f64,
    pub working_pressure: f64,
    /// true면 튜브 두께를 압력 공식으로 계산했음을 의미한다.
    pub wall_thickness_derived: bool,
}

impl ValidatedDimensions {
    /// 기본값이 채워진 입력 형태로 되돌린다. 결과에 그대로 실린다.
    pub fn to_dimensions(&self) -> CylinderDimensions {
        CylinderDimensions {
            bore_diameter: self.bore_diameter,
            rod_diameter: self.rod_diameter,
            stroke_length: self.stroke_length,
            wall_thickness: Some(self.wall_thickness),
            working_pressure: Some(self.working_pressure),
        }
    }
}

fn required(field: DimensionField, value: f64, limit: &Limit) -> Result<f64, ValidationError> {
    if value.is_nan() {
        return Err(ValidationError::Missing { field });
    }
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    within(field, value, limit)
}

fn within(field: DimensionField, value: f64, limit: &Limit) -> Result<f64, ValidationError> {
    if limit.contains(value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: limit.min,
            max: limit.max,
        })
    }
}

/// 치수를 입력 한계로 검증하고 빠진 값을 채운다.
///
/// 주어진 값만 범위 검사를 한다. 계산으로 얻은 튜브 두께는 한계와 무관하다.
pub fn validate_dimensions(
    dimensions: &CylinderDimensions,
    limits: &InputLimits,
    wall_coefficients: &WallThicknessCoefficients,
    geometry: &GeometryCoefficients,
) -> Result<ValidatedDimensions, ValidationError> {
    let result = validate_inner(dimensions, limits, wall_coefficients, geometry);
    if let Err(ref err) = result {
        warn!(field = %err.field(), error = %err, "dimension validation failed");
    }
    result
}

fn validate_inner(
    dimensions: &CylinderDimensions,
    limits: &InputLimits,
    wall_coefficients: &WallThicknessCoefficients,
    geometry: &GeometryCoefficients,
) -> Result<ValidatedDimensions, ValidationError> {
    let bore = required(
        DimensionField::BoreDiameter,
        dimensions.bore_diameter,
        &limits.bore_diameter,
    )?;
    let rod = required(
        DimensionField::RodDiameter,
        dimensions.rod_diameter,
        &limits.rod_diameter,
    )?;
    let stroke = required(
        DimensionField::StrokeLength,
        dimensions.stroke_length,
        &limits.stroke_length,
    )?;
    if rod >= bore {
        return Err(ValidationError::RodNotSmallerThanBore { rod, bore });
    }
    // 피스톤은 로드를 감싸는 링이므로 재료가 남아야 한다.
    let piston_diameter = bore - geometry.piston_seal_clearance;
    if rod >= piston_diameter {
        return Err(ValidationError::NoPistonMaterial {
            rod,
            piston_diameter,
        });
    }

    let working_pressure = match dimensions.working_pressure {
        Some(p) => required(DimensionField::WorkingPressure, p, &limits.working_pressure)?,
        None => {
            debug!(
                pressure_bar = DEFAULT_WORKING_PRESSURE_BAR,
                "working pressure defaulted"
            );
            DEFAULT_WORKING_PRESSURE_BAR
        }
    };

    let (wall_thickness, wall_thickness_derived) = match dimensions.wall_thickness {
        Some(t) => (
            required(DimensionField::WallThickness, t, &limits.wall_thickness)?,
            false,
        ),
        None => {
            let t = required_wall_thickness(working_pressure, bore, wall_coefficients);
            debug!(wall_thickness_mm = t, "wall thickness derived from pressure");
            (t, true)
        }
    };

    Ok(ValidatedDimensions {
        bore_diameter: bore,
        rod_diameter: rod,
        stroke_length: stroke,
        wall_thickness,
        working_pressure,
        wall_thickness_derived,
    })
}
