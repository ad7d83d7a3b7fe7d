use super::parameters::WallThicknessCoefficients;

/// 압력과 보어 직경으로 튜브 두께 [mm]를 계산한다.
///
/// `t = P·D / (2·S) + 여유`, 결과는 최소 두께 이상으로 올린다.
/// 압력은 bar 값을 그대로 넣는다.
pub fn required_wall_thickness(
    pressure: f64,
    bore_diameter: f64,
    coefficients: &WallThicknessCoefficients,
) -> f64 {
    let t = (pressure * bore_diameter) / (2.0 * coefficients.stress_limit)
        + coefficients.safety_margin;
    t.max(coefficients.minimum_thickness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs() -> WallThicknessCoefficients {
        WallThicknessCoefficients {
            stress_limit: 250.0,
            safety_margin: 3.0,
            minimum_thickness: 6.0,
        }
    }

    #[test]
    fn reference_case_160_bar_80_mm() {
        let t = required_wall_thickness(160.0, 80.0, &coeffs());
        assert!((t - 28.6).abs() < 1e-12, "t={t}");
    }

    #[test]
    fn small_bore_low_pressure_is_clamped_to_minimum() {
        // 50·10/500 + 3 = 4 → 6
        let t = required_wall_thickness(50.0, 10.0, &coeffs());
        assert_eq!(t, 6.0);
    }

    #[test]
    fn minimum_above_formula_wins() {
        let mut c = coeffs();
        c.minimum_thickness = 40.0;
        assert_eq!(required_wall_thickness(160.0, 80.0, &c), 40.0);
    }
}
