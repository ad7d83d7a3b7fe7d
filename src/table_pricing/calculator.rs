use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::table::{LengthBasis, PriceTable, PriceUnit};
use super::TablePricingError;

/// 미터 단가 항목의 길이 여유 [mm].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// 튜브 길이 = 행정 + 이 값
    pub tube_offset_mm: f64,
    /// 로드 길이 = 행정 + 이 값
    pub rod_offset_mm: f64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            tube_offset_mm: 120.0,
            rod_offset_mm: 150.0,
        }
    }
}

impl TableSettings {
    pub fn offset_mm(&self, basis: LengthBasis) -> f64 {
        match basis {
            LengthBasis::Tube => self.tube_offset_mm,
            LengthBasis::Rod => self.rod_offset_mm,
        }
    }
}

/// 선택 상태. 선택하지 않은 열은 항목 대신 `not_applicable`에 남는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// 단가가 적용된 선택
    Priced,
    /// "없음" 선택. 금액 0으로 목록에 남긴다.
    SelectedFree,
}

/// 견적 한 줄.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLineItem {
    pub name: String,
    pub value: String,
    pub unit_price: f64,
    pub unit: PriceUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    pub status: SelectionStatus,
}

/// 표 기반 견적 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuote {
    pub items: Vec<TableLineItem>,
    /// 선택하지 않은 열의 표시 이름
    pub not_applicable: Vec<String>,
    pub total: f64,
    pub stroke_mm: f64,
}

/// 열 이름 → 선택값으로 표 기반 가격을 계산한다.
///
/// 개당 항목은 단가 그대로, 미터 항목은 `(행정 + 여유) / 1000 m × 단가`.
/// 빈 문자열 선택은 선택하지 않은 것으로 본다.
pub fn calculate_table_price(
    table: &PriceTable,
    selections: &BTreeMap<String, String>,
    stroke_mm: f64,
    settings: &TableSettings,
) -> Result<TableQuote, TablePricingError> {
    if let Some(unknown) = selections.keys().find(|k| table.column(k).is_none()) {
        return Err(TablePricingError::UnknownColumn(unknown.clone()));
    }

    let mut items = Vec::new();
    let mut not_applicable = Vec::new();

    for column in &table.columns {
        let selected = selections
            .get(&column.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());
        let Some(selected) = selected else {
            not_applicable.push(column.display_name.clone());
            continue;
        };

        let option = column
            .find_option(selected)
            .ok_or_else(|| TablePricingError::UnknownOption {
                column: column.name.clone(),
                value: selected.to_string(),
            })?;

        if option.is_none() {
            trace!(column = %column.name, "free selection");
            items.push(TableLineItem {
                name: column.display_name.clone(),
                value: option.value.clone(),
                unit_price: 0.0,
                unit: column.unit,
                length_m: None,
                price: 0.0,
                formula: None,
                status: SelectionStatus::SelectedFree,
            });
            continue;
        }

        let item = match column.unit {
            PriceUnit::PerItem => TableLineItem {
                name: column.display_name.clone(),
                value: option.value.clone(),
                unit_price: option.price,
                unit: column.unit,
                length_m: None,
                price: option.price,
                formula: None,
                status: SelectionStatus::Priced,
            },
            PriceUnit::PerMeter { basis } => {
                if !(stroke_mm.is_finite() && stroke_mm > 0.0) {
                    return Err(TablePricingError::StrokeRequired {
                        column: column.name.clone(),
                        stroke_mm,
                    });
                }
                let offset = settings.offset_mm(basis);
                let length_m = (stroke_mm + offset) / 1000.0;
                let price = option.price * length_m;
                TableLineItem {
                    name: column.display_name.clone(),
                    value: option.value.clone(),
                    unit_price: option.price,
                    unit: column.unit,
                    length_m: Some(length_m),
                    price,
                    formula: Some(format!(
                        "({stroke_mm} + {offset}) mm = {length_m:.3} m × {:.2}",
                        option.price
                    )),
                    status: SelectionStatus::Priced,
                }
            }
        };
        trace!(column = %column.name, price = item.price, "priced selection");
        items.push(item);
    }

    let total = items.iter().map(|i| i.price).sum();
    debug!(
        items = items.len(),
        not_applicable = not_applicable.len(),
        total,
        "table price calculated"
    );
    Ok(TableQuote {
        items,
        not_applicable,
        total,
        stroke_mm,
    })
}
