//! 표 기반 가격 계산. 부품 선택마다 단가를 조회해 더하는 방식으로,
//! 형상 공식 엔진(`pricing`)과는 불변 조건이 달라 별도로 둔다.

pub mod calculator;
pub mod table;

use thiserror::Error;

pub use calculator::{
    calculate_table_price, SelectionStatus, TableLineItem, TableQuote, TableSettings,
};
pub use table::{
    is_none_value, load_table, save_table, slugify, LengthBasis, PriceColumn, PriceOption,
    PriceTable, PriceUnit,
};

/// 표 기반 가격 계산 오류.
#[derive(Debug, Error)]
pub enum TablePricingError {
    #[error("가격표에 없는 열: {0}")]
    UnknownColumn(String),
    #[error("{column} 열에 없는 선택값: {value}")]
    UnknownOption { column: String, value: String },
    #[error("{column} 열은 미터 단가이므로 행정 길이가 필요합니다 (입력: {stroke_mm})")]
    StrokeRequired { column: String, stroke_mm: f64 },
    #[error("열 이름이 비어 있습니다: {0}")]
    EmptyColumnName(String),
    #[error("열 이름이 중복되었습니다: {0}")]
    DuplicateColumn(String),
    #[error("{column}/{value} 단가가 잘못되었습니다: {price}")]
    InvalidPrice {
        column: String,
        value: String,
        price: f64,
    },
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("가격표 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("가격표 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}
