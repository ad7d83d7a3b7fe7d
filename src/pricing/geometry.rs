use std::f64::consts::PI;

use serde::Serialize;

use super::dimensions::ValidatedDimensions;
use super::parameters::GeometryCoefficients;

/// mm³ → cm³
const MM3_PER_CM3: f64 = 1000.0;
/// mm² → cm²
const MM2_PER_CM2: f64 = 100.0;
/// g → kg
const G_PER_KG: f64 = 1000.0;

/// 직원기둥 체적 [mm³] = π/4 · d² · L
pub fn cylinder_volume_mm3(diameter_mm: f64, length_mm: f64) -> f64 {
    PI / 4.0 * diameter_mm * diameter_mm * length_mm
}

/// 중공 원통 체적 [mm³]. 내경이 외경 이상이면 0.
pub fn annulus_volume_mm3(outer_mm: f64, inner_mm: f64, length_mm: f64) -> f64 {
    (cylinder_volume_mm3(outer_mm, length_mm) - cylinder_volume_mm3(inner_mm, length_mm)).max(0.0)
}

/// 체적 [cm³]과 밀도 [g/cm³]로 질량 [kg]을 구한다.
pub fn weight_kg(volume_cm3: f64, density_g_per_cm3: f64) -> f64 {
    volume_cm3 * density_g_per_cm3 / G_PER_KG
}

/// 원가 계산에 쓰는 부품 형상.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CylinderGeometry {
    pub tube_outer_diameter_mm: f64,
    pub tube_length_mm: f64,
    pub rod_length_mm: f64,
    pub chrome_length_mm: f64,
    /// 크롬 도금 면적 [cm²]
    pub chrome_area_cm2: f64,
    pub piston_diameter_mm: f64,
    pub piston_thickness_mm: f64,
    pub end_cap_thickness_mm: f64,
    /// 튜브 벽 체적 [cm³]
    pub tube_volume_cm3: f64,
    pub rod_volume_cm3: f64,
    /// 피스톤 체적 [cm³]. 로드 구멍을 뺀다.
    pub piston_volume_cm3: f64,
    /// 엔드캡 1개 체적 [cm³]
    pub end_cap_volume_cm3: f64,
}

impl CylinderGeometry {
    /// 검증된 치수와 형상 계수로 부품 형상을 만든다.
    pub fn from_dimensions(dims: &ValidatedDimensions, coeffs: &GeometryCoefficients) -> Self {
        let bore = dims.bore_diameter;
        let rod = dims.rod_diameter;
        let stroke = dims.stroke_length;
        let wall = dims.wall_thickness;

        let tube_outer_diameter_mm = bore + 2.0 * wall;
        let tube_length_mm = stroke + coeffs.tube_extra_length;
        let rod_length_mm = stroke + coeffs.rod_extra_length;
        let chrome_length_mm = stroke + coeffs.chrome_extra_length;
        let chrome_area_cm2 = PI * rod * chrome_length_mm / MM2_PER_CM2;
        let piston_diameter_mm = bore - coeffs.piston_seal_clearance;
        let piston_thickness_mm = bore * coeffs.piston_thickness_ratio;
        let end_cap_thickness_mm = wall * coeffs.end_cap_thickness_ratio;

        Self {
            tube_outer_diameter_mm,
            tube_length_mm,
            rod_length_mm,
            chrome_length_mm,
            chrome_area_cm2,
            piston_diameter_mm,
            piston_thickness_mm,
            end_cap_thickness_mm,
            tube_volume_cm3: annulus_volume_mm3(tube_outer_diameter_mm, bore, tube_length_mm)
                / MM3_PER_CM3,
            rod_volume_cm3: cylinder_volume_mm3(rod, rod_length_mm) / MM3_PER_CM3,
            piston_volume_cm3: annulus_volume_mm3(piston_diameter_mm, rod, piston_thickness_mm)
                / MM3_PER_CM3,
            end_cap_volume_cm3: cylinder_volume_mm3(tube_outer_diameter_mm, end_cap_thickness_mm)
                / MM3_PER_CM3,
        }
    }
}

/// 재질 밀도를 적용한 부품 질량 [kg].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentWeights {
    pub tube_kg: f64,
    pub rod_kg: f64,
    pub piston_kg: f64,
    /// 엔드캡 1개
    pub end_cap_kg: f64,
}

impl ComponentWeights {
    pub fn new(geometry: &CylinderGeometry, density_g_per_cm3: f64) -> Self {
        Self {
            tube_kg: weight_kg(geometry.tube_volume_cm3, density_g_per_cm3),
            rod_kg: weight_kg(geometry.rod_volume_cm3, density_g_per_cm3),
            piston_kg: weight_kg(geometry.piston_volume_cm3, density_g_per_cm3),
            end_cap_kg: weight_kg(geometry.end_cap_volume_cm3, density_g_per_cm3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::parameters::PricingParameters;

    fn dims(bore: f64, rod: f64, stroke: f64, wall: f64) -> ValidatedDimensions {
        ValidatedDimensions {
            bore_diameter: bore,
            rod_diameter: rod,
            stroke_length: stroke,
            wall_thickness: wall,
            working_pressure: 160.0,
            wall_thickness_derived: false,
        }
    }

    #[test]
    fn lengths_and_diameters_follow_coefficients() {
        let g = CylinderGeometry::from_dimensions(
            &dims(80.0, 50.0, 400.0, 10.0),
            &PricingParameters::default().geometry_coefficients,
        );
        assert_eq!(g.tube_outer_diameter_mm, 100.0);
        assert_eq!(g.tube_length_mm, 500.0);
        assert_eq!(g.rod_length_mm, 550.0);
        assert_eq!(g.chrome_length_mm, 450.0);
        assert_eq!(g.piston_diameter_mm, 78.0);
        assert_eq!(g.piston_thickness_mm, 40.0);
        assert_eq!(g.end_cap_thickness_mm, 15.0);
    }

    #[test]
    fn tube_volume_is_wall_annulus() {
        let g = CylinderGeometry::from_dimensions(
            &dims(80.0, 50.0, 400.0, 10.0),
            &PricingParameters::default().geometry_coefficients,
        );
        // π/4 · (100² − 80²) · 500 mm³ = 1 413.7 cm³
        let expected = PI / 4.0 * (100.0f64.powi(2) - 80.0f64.powi(2)) * 500.0 / 1000.0;
        assert!((g.tube_volume_cm3 - expected).abs() < 1e-9);
        // π · 5 cm · 45 cm
        assert!((g.chrome_area_cm2 - PI * 5.0 * 45.0).abs() < 1e-9);
    }

    #[test]
    fn annulus_with_inner_larger_than_outer_is_empty() {
        assert_eq!(annulus_volume_mm3(48.0, 49.0, 100.0), 0.0);
        assert_eq!(annulus_volume_mm3(48.0, 48.0, 100.0), 0.0);
    }

    #[test]
    fn one_litre_of_steel_weighs_7_85_kg() {
        assert!((weight_kg(1000.0, 7.85) - 7.85).abs() < 1e-12);
    }
}
