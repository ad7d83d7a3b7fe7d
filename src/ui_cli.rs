use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use crate::app::{AppContext, AppError};
use crate::i18n::{keys, Translator};
use crate::pricing::{
    CylinderDimensions, CylinderType, MaterialType, MountingType, PricingRequest, Quote,
};
use crate::table_pricing::{self, PriceUnit, SelectionStatus, TableQuote};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Quote,
    Table,
    Parameters,
    Options,
    Exit,
}

/// 메인 메뉴를 표시하고 표준 입력에서 선택값을 읽는다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    main_menu_from(tr, &mut io::stdin().lock())
}

/// 메인 메뉴를 표시하고 `input`에서 선택값을 읽는다.
/// 입력이 끝나면 `UnexpectedEof` 입출력 오류를 돌려준다.
pub fn main_menu_from(tr: &Translator, input: &mut impl BufRead) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_QUOTE));
    println!("{}", tr.t(keys::MAIN_MENU_TABLE));
    println!("{}", tr.t(keys::MAIN_MENU_PARAMETERS));
    println!("{}", tr.t(keys::MAIN_MENU_OPTIONS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line_from(input, tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Quote),
            "2" => return Ok(MenuChoice::Table),
            "3" => return Ok(MenuChoice::Parameters),
            "4" => return Ok(MenuChoice::Options),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 치수 기반 견적 메뉴를 처리한다.
pub fn handle_quote(ctx: &AppContext) -> Result<(), AppError> {
    let tr = &ctx.translator;
    let bore = read_f64(tr, tr.t(keys::PROMPT_BORE))?;
    let rod = read_f64(tr, tr.t(keys::PROMPT_ROD))?;
    let stroke = read_f64(tr, tr.t(keys::PROMPT_STROKE))?;
    let mut dimensions = CylinderDimensions::new(bore, rod, stroke);
    dimensions.wall_thickness = read_optional_f64(tr, tr.t(keys::PROMPT_WALL_OPTIONAL))?;
    dimensions.working_pressure = read_optional_f64(tr, tr.t(keys::PROMPT_PRESSURE_OPTIONAL))?;

    let material = read_choice(
        tr,
        keys::PROMPT_MATERIAL,
        &MaterialType::ALL,
        MaterialType::Steel,
        |m| tr.material(*m),
    )?;
    let cylinder_type = read_choice(
        tr,
        keys::PROMPT_CYLINDER_TYPE,
        &CylinderType::ALL,
        CylinderType::DoubleActing,
        |c| tr.cylinder_type(*c),
    )?;
    let mounting_type = read_choice(
        tr,
        keys::PROMPT_MOUNTING,
        &MountingType::ALL,
        MountingType::Flange,
        |m| tr.mounting(*m),
    )?;
    let profit_margin = read_optional_f64(tr, tr.t(keys::PROMPT_MARGIN))?
        .unwrap_or(ctx.config.default_profit_margin);
    let quantity = loop {
        let s = read_line(tr.t(keys::PROMPT_QUANTITY))?;
        let s = s.trim();
        if s.is_empty() {
            break ctx.config.default_quantity;
        }
        match s.parse::<u32>() {
            Ok(v) => break v,
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    };

    let request = PricingRequest {
        dimensions,
        material,
        cylinder_type,
        mounting_type,
        quantity,
        profit_margin,
    };
    let quote = ctx.quote(&request)?;
    print_quote(tr, &quote);
    Ok(())
}

/// 가격표 기반 견적 메뉴를 처리한다.
pub fn handle_table(ctx: &AppContext) -> Result<(), AppError> {
    let tr = &ctx.translator;
    println!("{}", tr.t(keys::TABLE_HEADING));
    let path = &ctx.config.price_table_path;
    if !path.exists() {
        println!("{} {}", tr.t(keys::TABLE_NOT_LOADED), path.display());
        return Ok(());
    }
    let table = table_pricing::load_table(path)?;

    let needs_stroke = table
        .columns
        .iter()
        .any(|c| matches!(c.unit, PriceUnit::PerMeter { .. }));
    let stroke_mm = if needs_stroke {
        read_f64(tr, tr.t(keys::TABLE_PROMPT_STROKE))?
    } else {
        0.0
    };

    let mut selections = BTreeMap::new();
    for column in &table.columns {
        println!("\n[{}] ({})", column.display_name, column.unit.symbol());
        for (i, option) in column.options.iter().enumerate() {
            println!("  {}) {} {:.2}", i + 1, option.label(), option.price);
        }
        loop {
            let sel = read_line(tr.t(keys::TABLE_PROMPT_SELECTION))?;
            let sel = sel.trim();
            if sel.is_empty() {
                break;
            }
            match sel
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| column.options.get(i))
            {
                Some(option) => {
                    selections.insert(column.name.clone(), option.value.clone());
                    break;
                }
                None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
            }
        }
    }

    let quote =
        table_pricing::calculate_table_price(&table, &selections, stroke_mm, &ctx.config.table)?;
    print_table_quote(tr, &quote);
    Ok(())
}

/// 현재 파라미터를 TOML로 출력한다.
pub fn handle_parameters(ctx: &AppContext) -> Result<(), AppError> {
    println!("{}", ctx.translator.t(keys::PARAMETERS_HEADING));
    println!("# version {}", ctx.store.version());
    print!("{}", ctx.parameters_toml()?);
    Ok(())
}

/// 선택 가능한 재질, 형식, 장착 방식을 라벨과 함께 출력한다.
pub fn print_options(tr: &Translator) {
    println!("\n{}:", tr.t(keys::OPTIONS_MATERIALS));
    for m in MaterialType::ALL {
        println!("  {:<14} {}", m.as_str(), tr.material(m));
    }
    println!("{}:", tr.t(keys::OPTIONS_CYLINDER_TYPES));
    for c in CylinderType::ALL {
        println!("  {:<14} {}", c.as_str(), tr.cylinder_type(c));
    }
    println!("{}:", tr.t(keys::OPTIONS_MOUNTINGS));
    for m in MountingType::ALL {
        println!("  {:<14} {}", m.as_str(), tr.mounting(m));
    }
}

/// 원가 내역과 판매가를 출력한다.
pub fn print_quote(tr: &Translator, quote: &Quote) {
    let unit = &quote.unit;
    let d = &unit.dimensions;
    println!("{}", tr.t(keys::RESULT_HEADING));
    println!(
        "{}: Ø{} / Ø{} × {} mm, t={:.2} mm, {} bar",
        tr.t(keys::RESULT_DIMENSIONS),
        d.bore_diameter,
        d.rod_diameter,
        d.stroke_length,
        d.wall_thickness.unwrap_or_default(),
        d.working_pressure.unwrap_or_default()
    );
    println!(
        "{} / {} / {}",
        tr.material(unit.material),
        tr.cylinder_type(unit.cylinder_type),
        tr.mounting(unit.mounting_type)
    );
    for (line, cost) in unit.cost_breakdown.lines() {
        println!("  {:<20} {:>12.2}", tr.cost_line(line), cost);
    }
    println!("  {:<20} {:>12.2}", tr.t(keys::RESULT_SUBTOTAL), unit.subtotal);
    println!(
        "  {:<20} {:>11.1}%",
        tr.t(keys::RESULT_MARGIN),
        unit.profit_margin * 100.0
    );
    println!("  {:<20} {:>12.2}", tr.t(keys::RESULT_TOTAL), unit.total_price);
    if quote.quantity > 1 {
        println!("  {:<20} {:>12}", tr.t(keys::RESULT_QUANTITY), quote.quantity);
        println!(
            "  {:<20} {:>12.2}",
            tr.t(keys::RESULT_QUANTITY_TOTAL),
            quote.total_price
        );
    }
    if let Some(notes) = &unit.notes {
        println!("{}: {notes}", tr.t(keys::RESULT_NOTES));
    }
}

/// 표 기반 견적을 출력한다.
pub fn print_table_quote(tr: &Translator, quote: &TableQuote) {
    println!("{}", tr.t(keys::TABLE_HEADING));
    for item in &quote.items {
        match item.status {
            SelectionStatus::Priced => {
                println!("  {:<20} {:<12} {:>12.2}", item.name, item.value, item.price);
                if let Some(formula) = &item.formula {
                    println!("      {formula}");
                }
            }
            SelectionStatus::SelectedFree => println!(
                "  {:<20} {:<12} {:>12}",
                item.name,
                item.value,
                tr.t(keys::TABLE_FREE)
            ),
        }
    }
    if !quote.not_applicable.is_empty() {
        println!(
            "  {}: {}",
            tr.t(keys::TABLE_NOT_APPLICABLE),
            quote.not_applicable.join(", ")
        );
    }
    println!("  {:<33} {:>12.2}", tr.t(keys::TABLE_TOTAL), quote.total);
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 한 줄을 읽는다. 닫힌 입력은 빈 줄이 아니라 `UnexpectedEof`다.
fn read_line_from(input: &mut impl BufRead, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
    }
    Ok(buf)
}

/// 입력 스트림이 닫혀 생긴 오류인지 확인한다.
pub fn is_end_of_input(err: &AppError) -> bool {
    matches!(err, AppError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// 빈 입력은 None(기본값 사용)으로 돌려준다.
fn read_optional_f64(tr: &Translator, prompt: &str) -> Result<Option<f64>, AppError> {
    loop {
        let s = read_line(prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// 번호 목록에서 하나를 고른다. 빈 입력은 `default`다.
fn read_choice<T: Copy>(
    tr: &Translator,
    prompt_key: &str,
    items: &[T],
    default: T,
    label: impl Fn(&T) -> String,
) -> Result<T, AppError> {
    for (i, item) in items.iter().enumerate() {
        print!("{}={}  ", i + 1, label(item));
    }
    println!();
    loop {
        let sel = read_line(tr.t(prompt_key))?;
        let sel = sel.trim();
        if sel.is_empty() {
            return Ok(default);
        }
        if let Some(item) = sel
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| items.get(i))
        {
            return Ok(*item);
        }
        println!("{}", tr.t(keys::INVALID_SELECTION_RETRY));
    }
}
