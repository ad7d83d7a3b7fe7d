//! 가격 계산에 쓰이는 모든 단가, 배수, 계수, 입력 한계를 담는 파라미터 세트.
//!
//! 한 번의 계산 동안에는 불변 값으로 다룬다. 기본값은 시판 강재 기준 참고치이며
//! 실제 견적에는 관리자가 조정한 값을 사용해야 한다.

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::types::{CylinderType, MaterialType, MountingType};

/// 재질별 값 묶음.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialValues {
    pub steel: f64,
    pub stainless: f64,
    pub aluminum: f64,
}

impl MaterialValues {
    pub fn get(&self, material: MaterialType) -> f64 {
        match material {
            MaterialType::Steel => self.steel,
            MaterialType::Stainless => self.stainless,
            MaterialType::Aluminum => self.aluminum,
        }
    }
}

/// 시간당 인건비 [통화/h].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborRates {
    pub machining: f64,
    pub assembly: f64,
}

/// 장착 방식별 부품 단가.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MountingPrices {
    pub flange: f64,
    pub clevis: f64,
    pub trunnion: f64,
    pub foot: f64,
    pub tie_rod: f64,
}

impl MountingPrices {
    pub fn get(&self, mounting: MountingType) -> f64 {
        match mounting {
            MountingType::Flange => self.flange,
            MountingType::Clevis => self.clevis,
            MountingType::Trunnion => self.trunnion,
            MountingType::Foot => self.foot,
            MountingType::TieRod => self.tie_rod,
        }
    }
}

/// 보어 직경 구간별 씰 키트 기준가.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SealPrices {
    /// < 50 mm
    pub small: f64,
    /// 50 ~ 100 mm
    pub medium: f64,
    /// > 100 mm
    pub large: f64,
}

/// 실린더 형식별 배수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderTypeMultipliers {
    pub single_acting: f64,
    pub double_acting: f64,
    pub telescopic: f64,
}

impl CylinderTypeMultipliers {
    pub fn get(&self, cylinder_type: CylinderType) -> f64 {
        match cylinder_type {
            CylinderType::SingleActing => self.single_acting,
            CylinderType::DoubleActing => self.double_acting,
            CylinderType::Telescopic => self.telescopic,
        }
    }
}

/// 닫힌 구간 [min, max].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub min: f64,
    pub max: f64,
}

impl Limit {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// 입력 치수의 허용 범위.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    pub bore_diameter: Limit,
    pub rod_diameter: Limit,
    pub stroke_length: Limit,
    pub wall_thickness: Limit,
    pub working_pressure: Limit,
}

/// 형상 계수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryCoefficients {
    /// 튜브 길이 = 행정 + 이 값 [mm]
    pub tube_extra_length: f64,
    /// 로드 길이 = 행정 + 이 값 [mm]
    pub rod_extra_length: f64,
    /// 크롬 도금 길이 = 행정 + 이 값 [mm]
    pub chrome_extra_length: f64,
    /// 피스톤 직경 = 보어 - 이 값 [mm]
    pub piston_seal_clearance: f64,
    /// 피스톤 두께 = 보어 × 이 비율
    pub piston_thickness_ratio: f64,
    /// 엔드캡 두께 = 튜브 두께 × 이 비율
    pub end_cap_thickness_ratio: f64,
}

/// 가공 시간 계수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachiningCoefficients {
    pub base_hours: f64,
    pub bore_diameter_divisor: f64,
    pub stroke_length_divisor: f64,
    pub rod_diameter_divisor: f64,
}

/// 씰 원가 계수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SealCoefficients {
    /// 크기 보정의 기준 보어 [mm]
    pub base_diameter: f64,
    pub diameter_divisor: f64,
    pub double_acting_multiplier: f64,
}

/// 압력 기반 튜브 두께 계수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallThicknessCoefficients {
    /// 허용 응력
    pub stress_limit: f64,
    /// 여유 두께 [mm]
    pub safety_margin: f64,
    /// 최소 두께 [mm]
    pub minimum_thickness: f64,
}

/// 전체 파라미터 세트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    /// [통화/kg]
    pub material_prices: MaterialValues,
    /// 강 = 1.0 기준
    pub material_multipliers: MaterialValues,
    /// [g/cm³]
    pub material_densities: MaterialValues,
    /// [통화/cm²]
    pub chrome_plating_price: f64,
    pub labor_rates: LaborRates,
    pub mounting_prices: MountingPrices,
    pub seal_prices: SealPrices,
    pub cylinder_type_multipliers: CylinderTypeMultipliers,
    pub input_limits: InputLimits,
    pub geometry_coefficients: GeometryCoefficients,
    pub machining_coefficients: MachiningCoefficients,
    pub seal_coefficients: SealCoefficients,
    pub wall_thickness_coefficients: WallThicknessCoefficients,
    /// 조립 시간 [h]
    pub assembly_hours: f64,
}

impl Default for PricingParameters {
    fn default() -> Self {
        Self {
            material_prices: MaterialValues {
                steel: 45.0,
                stainless: 180.0,
                aluminum: 120.0,
            },
            material_multipliers: MaterialValues {
                steel: 1.0,
                stainless: 2.8,
                aluminum: 1.5,
            },
            material_densities: MaterialValues {
                steel: 7.85,
                stainless: 8.0,
                aluminum: 2.7,
            },
            chrome_plating_price: 0.35,
            labor_rates: LaborRates {
                machining: 850.0,
                assembly: 650.0,
            },
            mounting_prices: MountingPrices {
                flange: 450.0,
                clevis: 380.0,
                trunnion: 520.0,
                foot: 320.0,
                tie_rod: 280.0,
            },
            seal_prices: SealPrices {
                small: 280.0,
                medium: 420.0,
                large: 650.0,
            },
            cylinder_type_multipliers: CylinderTypeMultipliers {
                single_acting: 0.85,
                double_acting: 1.0,
                telescopic: 2.5,
            },
            input_limits: InputLimits {
                bore_diameter: Limit::new(10.0, 500.0),
                rod_diameter: Limit::new(8.0, 300.0),
                stroke_length: Limit::new(50.0, 6000.0),
                wall_thickness: Limit::new(3.0, 50.0),
                working_pressure: Limit::new(50.0, 500.0),
            },
            geometry_coefficients: GeometryCoefficients {
                tube_extra_length: 100.0,
                rod_extra_length: 150.0,
                chrome_extra_length: 50.0,
                piston_seal_clearance: 2.0,
                piston_thickness_ratio: 0.5,
                end_cap_thickness_ratio: 1.5,
            },
            machining_coefficients: MachiningCoefficients {
                base_hours: 2.0,
                bore_diameter_divisor: 50.0,
                stroke_length_divisor: 300.0,
                rod_diameter_divisor: 30.0,
            },
            seal_coefficients: SealCoefficients {
                base_diameter: 40.0,
                diameter_divisor: 100.0,
                double_acting_multiplier: 1.3,
            },
            wall_thickness_coefficients: WallThicknessCoefficients {
                stress_limit: 250.0,
                safety_margin: 3.0,
                minimum_thickness: 6.0,
            },
            assembly_hours: 1.5,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::Negative { field, value })
    }
}

fn ordered(field: &'static str, limit: &Limit) -> Result<(), ConfigurationError> {
    if limit.min.is_finite() && limit.max.is_finite() && limit.min < limit.max {
        Ok(())
    } else {
        Err(ConfigurationError::InvertedLimit {
            field,
            min: limit.min,
            max: limit.max,
        })
    }
}

impl PricingParameters {
    /// 파라미터 세트의 불변 조건을 검사한다.
    ///
    /// 배수·밀도·제수는 0보다 커야 하고, 가격·시간·길이 여유는 음수가 아니어야 하며,
    /// 모든 입력 한계는 min < max 여야 한다. 계산 중에는 0 나눗셈이 생기지 않도록
    /// 로드 시점에 여기서 걸러낸다.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let m = &self.material_prices;
        non_negative("material_prices.steel", m.steel)?;
        non_negative("material_prices.stainless", m.stainless)?;
        non_negative("material_prices.aluminum", m.aluminum)?;

        let m = &self.material_multipliers;
        positive("material_multipliers.steel", m.steel)?;
        positive("material_multipliers.stainless", m.stainless)?;
        positive("material_multipliers.aluminum", m.aluminum)?;

        let d = &self.material_densities;
        positive("material_densities.steel", d.steel)?;
        positive("material_densities.stainless", d.stainless)?;
        positive("material_densities.aluminum", d.aluminum)?;

        non_negative("chrome_plating_price", self.chrome_plating_price)?;
        non_negative("labor_rates.machining", self.labor_rates.machining)?;
        non_negative("labor_rates.assembly", self.labor_rates.assembly)?;

        let mp = &self.mounting_prices;
        non_negative("mounting_prices.flange", mp.flange)?;
        non_negative("mounting_prices.clevis", mp.clevis)?;
        non_negative("mounting_prices.trunnion", mp.trunnion)?;
        non_negative("mounting_prices.foot", mp.foot)?;
        non_negative("mounting_prices.tie_rod", mp.tie_rod)?;

        let sp = &self.seal_prices;
        non_negative("seal_prices.small", sp.small)?;
        non_negative("seal_prices.medium", sp.medium)?;
        non_negative("seal_prices.large", sp.large)?;

        let ct = &self.cylinder_type_multipliers;
        positive("cylinder_type_multipliers.single_acting", ct.single_acting)?;
        positive("cylinder_type_multipliers.double_acting", ct.double_acting)?;
        positive("cylinder_type_multipliers.telescopic", ct.telescopic)?;

        let l = &self.input_limits;
        ordered("input_limits.bore_diameter", &l.bore_diameter)?;
        ordered("input_limits.rod_diameter", &l.rod_diameter)?;
        ordered("input_limits.stroke_length", &l.stroke_length)?;
        ordered("input_limits.wall_thickness", &l.wall_thickness)?;
        ordered("input_limits.working_pressure", &l.working_pressure)?;

        let g = &self.geometry_coefficients;
        non_negative("geometry_coefficients.tube_extra_length", g.tube_extra_length)?;
        non_negative("geometry_coefficients.rod_extra_length", g.rod_extra_length)?;
        non_negative("geometry_coefficients.chrome_extra_length", g.chrome_extra_length)?;
        non_negative(
            "geometry_coefficients.piston_seal_clearance",
            g.piston_seal_clearance,
        )?;
        positive(
            "geometry_coefficients.piston_thickness_ratio",
            g.piston_thickness_ratio,
        )?;
        positive(
            "geometry_coefficients.end_cap_thickness_ratio",
            g.end_cap_thickness_ratio,
        )?;

        let mc = &self.machining_coefficients;
        non_negative("machining_coefficients.base_hours", mc.base_hours)?;
        positive(
            "machining_coefficients.bore_diameter_divisor",
            mc.bore_diameter_divisor,
        )?;
        positive(
            "machining_coefficients.stroke_length_divisor",
            mc.stroke_length_divisor,
        )?;
        positive(
            "machining_coefficients.rod_diameter_divisor",
            mc.rod_diameter_divisor,
        )?;

        let sc = &self.seal_coefficients;
        non_negative("seal_coefficients.base_diameter", sc.base_diameter)?;
        positive("seal_coefficients.diameter_divisor", sc.diameter_divisor)?;
        positive(
            "seal_coefficients.double_acting_multiplier",
            sc.double_acting_multiplier,
        )?;

        let wt = &self.wall_thickness_coefficients;
        positive("wall_thickness_coefficients.stress_limit", wt.stress_limit)?;
        non_negative("wall_thickness_coefficients.safety_margin", wt.safety_margin)?;
        positive(
            "wall_thickness_coefficients.minimum_thickness",
            wt.minimum_thickness,
        )?;

        non_negative("assembly_hours", self.assembly_hours)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        PricingParameters::default()
            .validate()
            .expect("default parameters");
    }

    #[test]
    fn zero_divisor_is_configuration_error() {
        let mut params = PricingParameters::default();
        params.machining_coefficients.stroke_length_divisor = 0.0;
        assert_eq!(
            params.validate(),
            Err(ConfigurationError::NonPositive {
                field: "machining_coefficients.stroke_length_divisor",
                value: 0.0,
            })
        );
    }

    #[test]
    fn negative_price_and_inverted_limit_are_rejected() {
        let mut params = PricingParameters::default();
        params.seal_prices.large = -1.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::Negative {
                field: "seal_prices.large",
                ..
            })
        ));

        let mut params = PricingParameters::default();
        params.input_limits.stroke_length = Limit::new(100.0, 100.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::InvertedLimit {
                field: "input_limits.stroke_length",
                ..
            })
        ));
    }

    #[test]
    fn nan_multiplier_is_rejected() {
        let mut params = PricingParameters::default();
        params.material_multipliers.aluminum = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn limit_is_inclusive_on_both_ends() {
        let limit = Limit::new(10.0, 500.0);
        assert!(limit.contains(10.0));
        assert!(limit.contains(500.0));
        assert!(!limit.contains(500.01));
    }
}
