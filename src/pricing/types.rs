use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{DimensionField, ValidationError};

/// 재질 종류. 밀도, 단가, 배수를 결정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    /// 일반 강 (St52)
    Steel,
    /// 스테인리스 (AISI 304/316)
    Stainless,
    /// 알루미늄
    Aluminum,
}

impl MaterialType {
    pub const ALL: [MaterialType; 3] = [
        MaterialType::Steel,
        MaterialType::Stainless,
        MaterialType::Aluminum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Steel => "steel",
            MaterialType::Stainless => "stainless",
            MaterialType::Aluminum => "aluminum",
        }
    }
}

/// 실린더 형식. 가공 시간과 최종 소계에 배수를 적용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CylinderType {
    SingleActing,
    DoubleActing,
    Telescopic,
}

impl CylinderType {
    pub const ALL: [CylinderType; 3] = [
        CylinderType::SingleActing,
        CylinderType::DoubleActing,
        CylinderType::Telescopic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CylinderType::SingleActing => "single_acting",
            CylinderType::DoubleActing => "double_acting",
            CylinderType::Telescopic => "telescopic",
        }
    }
}

/// 장착 방식. 파라미터 세트의 고정 단가로 바로 매핑된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountingType {
    Flange,
    Clevis,
    Trunnion,
    Foot,
    TieRod,
}

impl MountingType {
    pub const ALL: [MountingType; 5] = [
        MountingType::Flange,
        MountingType::Clevis,
        MountingType::Trunnion,
        MountingType::Foot,
        MountingType::TieRod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MountingType::Flange => "flange",
            MountingType::Clevis => "clevis",
            MountingType::Trunnion => "trunnion",
            MountingType::Foot => "foot",
            MountingType::TieRod => "tie_rod",
        }
    }
}

/// 문자열 선택값 파싱 오류.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSelectionError {
    pub kind: &'static str,
    pub input: String,
}

impl fmt::Display for ParseSelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "알 수 없는 {}: {}", self.kind, self.input)
    }
}

impl std::error::Error for ParseSelectionError {}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

impl FromStr for MaterialType {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        MaterialType::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or(ParseSelectionError {
                kind: "material",
                input: s.to_string(),
            })
    }
}

impl FromStr for CylinderType {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        CylinderType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or(ParseSelectionError {
                kind: "cylinder type",
                input: s.to_string(),
            })
    }
}

impl FromStr for MountingType {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        MountingType::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or(ParseSelectionError {
                kind: "mounting type",
                input: s.to_string(),
            })
    }
}

/// 실린더 치수 입력 [mm, bar].
///
/// 직접 입력이든 도면 분석 결과든 같은 타입으로 들어와 같은 검증을 거친다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderDimensions {
    /// 실린더 튜브 내경 [mm]
    pub bore_diameter: f64,
    /// 피스톤 로드 직경 [mm]
    pub rod_diameter: f64,
    /// 행정 길이 [mm]
    pub stroke_length: f64,
    /// 튜브 두께 [mm]. 없으면 압력 기반으로 계산한다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_thickness: Option<f64>,
    /// 사용 압력 [bar]. 없으면 160 bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_pressure: Option<f64>,
}

impl CylinderDimensions {
    pub fn new(bore_diameter: f64, rod_diameter: f64, stroke_length: f64) -> Self {
        Self {
            bore_diameter,
            rod_diameter,
            stroke_length,
            wall_thickness: None,
            working_pressure: None,
        }
    }

    pub fn with_wall_thickness(mut self, wall_thickness: f64) -> Self {
        self.wall_thickness = Some(wall_thickness);
        self
    }

    pub fn with_working_pressure(mut self, working_pressure: f64) -> Self {
        self.working_pressure = Some(working_pressure);
        self
    }
}

/// 필수 필드가 빠져 있을 수 있는 치수 초안. 도면 분석처럼 최선 추정 결과를 담는다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionDraft {
    #[serde(default)]
    pub bore_diameter: Option<f64>,
    #[serde(default)]
    pub rod_diameter: Option<f64>,
    #[serde(default)]
    pub stroke_length: Option<f64>,
    #[serde(default)]
    pub wall_thickness: Option<f64>,
    #[serde(default)]
    pub working_pressure: Option<f64>,
}

impl TryFrom<DimensionDraft> for CylinderDimensions {
    type Error = ValidationError;

    fn try_from(draft: DimensionDraft) -> Result<Self, Self::Error> {
        let require = |value: Option<f64>, field| value.ok_or(ValidationError::Missing { field });
        Ok(CylinderDimensions {
            bore_diameter: require(draft.bore_diameter, DimensionField::BoreDiameter)?,
            rod_diameter: require(draft.rod_diameter, DimensionField::RodDiameter)?,
            stroke_length: require(draft.stroke_length, DimensionField::StrokeLength)?,
            wall_thickness: draft.wall_thickness,
            working_pressure: draft.working_pressure,
        })
    }
}

/// 9개 원가 항목 [통화 단위]. 합계가 소계다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub tube_cost: f64,
    pub rod_cost: f64,
    pub piston_cost: f64,
    pub seal_cost: f64,
    pub end_caps_cost: f64,
    pub chrome_plating_cost: f64,
    pub machining_cost: f64,
    pub assembly_cost: f64,
    pub mounting_cost: f64,
}

/// 원가 항목 식별자. 라벨 조회와 표 출력 순서에 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostLine {
    Tube,
    Rod,
    Piston,
    Seal,
    EndCaps,
    ChromePlating,
    Machining,
    Assembly,
    Mounting,
}

impl CostLine {
    pub const ALL: [CostLine; 9] = [
        CostLine::Tube,
        CostLine::Rod,
        CostLine::Piston,
        CostLine::Seal,
        CostLine::EndCaps,
        CostLine::ChromePlating,
        CostLine::Machining,
        CostLine::Assembly,
        CostLine::Mounting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostLine::Tube => "tube_cost",
            CostLine::Rod => "rod_cost",
            CostLine::Piston => "piston_cost",
            CostLine::Seal => "seal_cost",
            CostLine::EndCaps => "end_caps_cost",
            CostLine::ChromePlating => "chrome_plating_cost",
            CostLine::Machining => "machining_cost",
            CostLine::Assembly => "assembly_cost",
            CostLine::Mounting => "mounting_cost",
        }
    }
}

impl CostBreakdown {
    pub fn get(&self, line: CostLine) -> f64 {
        match line {
            CostLine::Tube => self.tube_cost,
            CostLine::Rod => self.rod_cost,
            CostLine::Piston => self.piston_cost,
            CostLine::Seal => self.seal_cost,
            CostLine::EndCaps => self.end_caps_cost,
            CostLine::ChromePlating => self.chrome_plating_cost,
            CostLine::Machining => self.machining_cost,
            CostLine::Assembly => self.assembly_cost,
            CostLine::Mounting => self.mounting_cost,
        }
    }

    /// (항목, 금액) 쌍을 고정 순서로 돌려준다.
    pub fn lines(&self) -> impl Iterator<Item = (CostLine, f64)> + '_ {
        CostLine::ALL.into_iter().map(move |line| (line, self.get(line)))
    }

    /// 모든 항목의 합.
    pub fn total(&self) -> f64 {
        self.lines().map(|(_, cost)| cost).sum()
    }
}

/// 한 번의 계산 결과. 생성 후 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// 기본값이 채워진 입력 치수
    pub dimensions: CylinderDimensions,
    pub material: MaterialType,
    pub cylinder_type: CylinderType,
    pub mounting_type: MountingType,
    pub cost_breakdown: CostBreakdown,
    pub subtotal: f64,
    /// 0~1
    pub profit_margin: f64,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selections_parse_from_wire_names_and_cli_spellings() {
        assert_eq!("tie_rod".parse::<MountingType>().unwrap(), MountingType::TieRod);
        assert_eq!("tie-rod".parse::<MountingType>().unwrap(), MountingType::TieRod);
        assert_eq!(
            "Double-Acting".parse::<CylinderType>().unwrap(),
            CylinderType::DoubleActing
        );
        assert!("titanium".parse::<MaterialType>().is_err());
    }

    #[test]
    fn draft_without_rod_reports_missing_rod() {
        let draft = DimensionDraft {
            bore_diameter: Some(80.0),
            stroke_length: Some(400.0),
            ..DimensionDraft::default()
        };
        let err = CylinderDimensions::try_from(draft).unwrap_err();
        assert_eq!(err.field(), DimensionField::RodDiameter);
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&CylinderType::DoubleActing).unwrap();
        assert_eq!(json, "\"double_acting\"");
        let m: MountingType = serde_json::from_str("\"tie_rod\"").unwrap();
        assert_eq!(m, MountingType::TieRod);
    }
}
