use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::TablePricingError;

/// 미터 단가 항목의 길이 기준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBasis {
    /// 튜브: 행정 + 튜브 여유
    Tube,
    /// 로드: 행정 + 로드 여유
    Rod,
}

/// 단가 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PriceUnit {
    /// 개당
    #[default]
    PerItem,
    /// 미터당. 길이는 행정에서 구한다.
    PerMeter { basis: LengthBasis },
}

impl PriceUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PriceUnit::PerItem => "/pc",
            PriceUnit::PerMeter { .. } => "/m",
        }
    }
}

/// 선택지 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOption {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// "없음" 선택지. 목록에는 남기되 금액은 0이다.
    #[serde(default)]
    pub none: bool,
}

/// "YOK", "none", "-" 처럼 부품이 없음을 뜻하는 값인지 판단한다.
pub fn is_none_value(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "yok" | "none" | "-" | "없음"
    )
}

impl PriceOption {
    pub fn new(value: impl Into<String>, price: f64) -> Self {
        Self {
            value: value.into(),
            label: None,
            price,
            none: false,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }

    pub fn is_none(&self) -> bool {
        self.none || is_none_value(&self.value)
    }
}

/// 표의 한 열(부품 범주).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceColumn {
    /// 선택값 키. 비어 있으면 표시 이름의 slug를 쓴다.
    #[serde(default)]
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub unit: PriceUnit,
    #[serde(default)]
    pub options: Vec<PriceOption>,
}

impl PriceColumn {
    pub fn new(display_name: impl Into<String>, unit: PriceUnit) -> Self {
        let display_name = display_name.into();
        Self {
            name: slugify(&display_name),
            display_name,
            unit,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: PriceOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn find_option(&self, value: &str) -> Option<&PriceOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// 부품 선택 → 단가 조회 표.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    #[serde(default)]
    pub columns: Vec<PriceColumn>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl PriceTable {
    pub fn column(&self, name: &str) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// 빈 열 이름을 slug로 채우고 표를 검증한다.
    pub fn normalized(mut self) -> Result<Self, TablePricingError> {
        for column in &mut self.columns {
            if column.name.trim().is_empty() {
                column.name = slugify(&column.display_name);
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// 열 이름 중복과 음수/비유한 단가를 거른다.
    pub fn validate(&self) -> Result<(), TablePricingError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return Err(TablePricingError::EmptyColumnName(column.display_name.clone()));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(TablePricingError::DuplicateColumn(column.name.clone()));
            }
            for option in &column.options {
                if !option.price.is_finite() || option.price < 0.0 {
                    return Err(TablePricingError::InvalidPrice {
                        column: column.name.clone(),
                        value: option.value.clone(),
                        price: option.price,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn total_options(&self) -> usize {
        self.columns.iter().map(|c| c.options.len()).sum()
    }
}

/// 표시 이름을 선택 키로 바꾼다. 터키어 문자는 ASCII로 접고, 소문자화하며,
/// 공백/하이픈/밑줄 묶음은 밑줄 하나로 만든다.
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            'ç' => 'c',
            'ğ' => 'g',
            'ı' => 'i',
            'ö' => 'o',
            'ş' => 's',
            'ü' => 'u',
            'Ç' => 'C',
            'Ğ' => 'G',
            'İ' => 'I',
            'Ö' => 'O',
            'Ş' => 'S',
            'Ü' => 'U',
            other => other,
        })
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_sep = false;
    for c in folded.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_sep = true;
        }
    }
    slug
}

/// TOML 파일에서 가격표를 읽는다.
pub fn load_table(path: &Path) -> Result<PriceTable, TablePricingError> {
    let content = fs::read_to_string(path)?;
    let table: PriceTable = toml::from_str(&content)?;
    let table = table.normalized()?;
    info!(
        path = %path.display(),
        columns = table.columns.len(),
        options = table.total_options(),
        "price table loaded"
    );
    Ok(table)
}

/// 가격표를 TOML 파일로 저장한다.
pub fn save_table(path: &Path, table: &PriceTable) -> Result<(), TablePricingError> {
    table.validate()?;
    let content = toml::to_string_pretty(table)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_turkish_and_collapses_separators() {
        assert_eq!(slugify("Silindir Çapı"), "silindir_capi");
        assert_eq!(slugify("Mil  Başı - Tip"), "mil_basi_tip");
        assert_eq!(slugify("Ön Kapak (mm)"), "on_kapak_mm");
        assert_eq!(slugify("  İç_Conta "), "ic_conta");
    }

    #[test]
    fn none_values_are_recognised() {
        assert!(is_none_value("YOK"));
        assert!(is_none_value(" yok "));
        assert!(is_none_value("-"));
        assert!(!is_none_value("Ø50"));
        assert!(PriceOption {
            none: true,
            ..PriceOption::new("Standart değil", 0.0)
        }
        .is_none());
    }

    #[test]
    fn normalized_fills_names_and_rejects_duplicates() {
        let table = PriceTable {
            columns: vec![PriceColumn {
                name: String::new(),
                display_name: "Boru Çapı".into(),
                unit: PriceUnit::PerItem,
                options: vec![],
            }],
            metadata: BTreeMap::new(),
        }
        .normalized()
        .unwrap();
        assert_eq!(table.columns[0].name, "boru_capi");

        let dup = PriceTable {
            columns: vec![
                PriceColumn::new("Mil", PriceUnit::PerItem),
                PriceColumn::new("mil", PriceUnit::PerItem),
            ],
            metadata: BTreeMap::new(),
        };
        assert!(matches!(
            dup.validate(),
            Err(TablePricingError::DuplicateColumn(name)) if name == "mil"
        ));
    }

    #[test]
    fn toml_layout_parses() {
        let src = r#"
            [metadata]
            format = "vertical"

            [[columns]]
            display_name = "Boru"
            unit = { kind = "per_meter", basis = "tube" }
            options = [
                { value = "Ø50", price = 120.0 },
                { value = "YOK" },
            ]

            [[columns]]
            name = "conta"
            display_name = "Conta"
            options = [{ value = "NBR", label = "NBR Set", price = 85.5 }]
        "#;
        let table: PriceTable = toml::from_str(src).unwrap();
        let table = table.normalized().unwrap();
        assert_eq!(table.columns[0].name, "boru");
        assert_eq!(
            table.columns[0].unit,
            PriceUnit::PerMeter {
                basis: LengthBasis::Tube
            }
        );
        assert_eq!(table.columns[1].unit, PriceUnit::PerItem);
        assert_eq!(table.columns[1].options[0].label(), "NBR Set");
        assert_eq!(table.total_options(), 3);
    }
}
