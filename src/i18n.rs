use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::pricing::{CostLine, CylinderType, MaterialType, MountingType};

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_QUOTE: &str = "main_menu.quote";
    pub const MAIN_MENU_TABLE: &str = "main_menu.table";
    pub const MAIN_MENU_PARAMETERS: &str = "main_menu.parameters";
    pub const MAIN_MENU_OPTIONS: &str = "main_menu.options";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const PROMPT_BORE: &str = "prompt.bore";
    pub const PROMPT_ROD: &str = "prompt.rod";
    pub const PROMPT_STROKE: &str = "prompt.stroke";
    pub const PROMPT_WALL_OPTIONAL: &str = "prompt.wall_optional";
    pub const PROMPT_PRESSURE_OPTIONAL: &str = "prompt.pressure_optional";
    pub const PROMPT_MATERIAL: &str = "prompt.material";
    pub const PROMPT_CYLINDER_TYPE: &str = "prompt.cylinder_type";
    pub const PROMPT_MOUNTING: &str = "prompt.mounting";
    pub const PROMPT_MARGIN: &str = "prompt.margin";
    pub const PROMPT_QUANTITY: &str = "prompt.quantity";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_DIMENSIONS: &str = "result.dimensions";
    pub const RESULT_SUBTOTAL: &str = "result.subtotal";
    pub const RESULT_MARGIN: &str = "result.margin";
    pub const RESULT_TOTAL: &str = "result.total";
    pub const RESULT_QUANTITY: &str = "result.quantity";
    pub const RESULT_QUANTITY_TOTAL: &str = "result.quantity_total";
    pub const RESULT_NOTES: &str = "result.notes";

    pub const TABLE_HEADING: &str = "table.heading";
    pub const TABLE_NOT_LOADED: &str = "table.not_loaded";
    pub const TABLE_PROMPT_STROKE: &str = "table.prompt_stroke";
    pub const TABLE_PROMPT_SELECTION: &str = "table.prompt_selection";
    pub const TABLE_FREE: &str = "table.free";
    pub const TABLE_NOT_APPLICABLE: &str = "table.not_applicable";
    pub const TABLE_TOTAL: &str = "table.total";

    pub const PARAMETERS_HEADING: &str = "parameters.heading";
    pub const PARAMETERS_WRITTEN: &str = "parameters.written";

    pub const OPTIONS_MATERIALS: &str = "options.materials";
    pub const OPTIONS_CYLINDER_TYPES: &str = "options.cylinder_types";
    pub const OPTIONS_MOUNTINGS: &str = "options.mountings";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
    Tr,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else if c.starts_with("tr") {
            Language::Tr
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Tr => "tr",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en/tr)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.overrides
            .as_ref()
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    /// 번역을 가져온다. 언어팩 → 선택 언어 → 영어 → 키 순으로 폴백한다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let builtin: Option<&'a str> = match self.lang {
            Language::Ko => ko(key),
            Language::En => en(key),
            Language::Tr => tr(key),
        };
        builtin.or_else(|| en(key)).unwrap_or(key)
    }

    pub fn material(&self, material: MaterialType) -> String {
        self.t(&format!("material.{}", material.as_str())).to_string()
    }

    pub fn cylinder_type(&self, cylinder_type: CylinderType) -> String {
        self.t(&format!("cylinder_type.{}", cylinder_type.as_str()))
            .to_string()
    }

    pub fn mounting(&self, mounting: MountingType) -> String {
        self.t(&format!("mounting.{}", mounting.as_str())).to_string()
    }

    pub fn cost_line(&self, line: CostLine) -> String {
        self.t(&format!("cost.{}", line.as_str())).to_string()
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        other if other.starts_with("tr") => Some("tr".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" | "en" | "tr" => Some(lang),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| normalize_locale_string(&value))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., tr-tr)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., tr)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== 유압 실린더 견적 ===",
        MAIN_MENU_QUOTE => "1) 치수 기반 견적",
        MAIN_MENU_TABLE => "2) 가격표 기반 견적",
        MAIN_MENU_PARAMETERS => "3) 현재 파라미터 보기",
        MAIN_MENU_OPTIONS => "4) 선택 항목 목록",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        PROMPT_BORE => "보어 직경 [mm]: ",
        PROMPT_ROD => "로드 직경 [mm]: ",
        PROMPT_STROKE => "행정 길이 [mm]: ",
        PROMPT_WALL_OPTIONAL => "튜브 두께 [mm] (비우면 자동 계산): ",
        PROMPT_PRESSURE_OPTIONAL => "사용 압력 [bar] (비우면 160): ",
        PROMPT_MATERIAL => "재질 번호: ",
        PROMPT_CYLINDER_TYPE => "실린더 형식 번호: ",
        PROMPT_MOUNTING => "장착 방식 번호: ",
        PROMPT_MARGIN => "이익률 (0~1, 비우면 기본값): ",
        PROMPT_QUANTITY => "수량 (비우면 1): ",
        RESULT_HEADING => "\n-- 원가 내역 --",
        RESULT_DIMENSIONS => "치수",
        RESULT_SUBTOTAL => "소계",
        RESULT_MARGIN => "이익률",
        RESULT_TOTAL => "판매가",
        RESULT_QUANTITY => "수량",
        RESULT_QUANTITY_TOTAL => "합계",
        RESULT_NOTES => "비고",
        TABLE_HEADING => "\n-- 가격표 기반 견적 --",
        TABLE_NOT_LOADED => "가격표가 없습니다.",
        TABLE_PROMPT_STROKE => "행정 길이 [mm] (미터 단가 항목용): ",
        TABLE_PROMPT_SELECTION => "선택값 (비우면 해당 없음): ",
        TABLE_FREE => "(없음)",
        TABLE_NOT_APPLICABLE => "해당 없음",
        TABLE_TOTAL => "합계",
        PARAMETERS_HEADING => "\n-- 현재 파라미터 --",
        PARAMETERS_WRITTEN => "파라미터 파일을 저장했습니다:",
        OPTIONS_MATERIALS => "재질",
        OPTIONS_CYLINDER_TYPES => "실린더 형식",
        OPTIONS_MOUNTINGS => "장착 방식",
        "material.steel" => "강 (St52)",
        "material.stainless" => "스테인리스 (AISI 304/316)",
        "material.aluminum" => "알루미늄",
        "cylinder_type.single_acting" => "단동",
        "cylinder_type.double_acting" => "복동",
        "cylinder_type.telescopic" => "텔레스코픽",
        "mounting.flange" => "플랜지",
        "mounting.clevis" => "클레비스",
        "mounting.trunnion" => "트러니언",
        "mounting.foot" => "풋",
        "mounting.tie_rod" => "타이로드",
        "cost.tube_cost" => "튜브",
        "cost.rod_cost" => "피스톤 로드",
        "cost.piston_cost" => "피스톤",
        "cost.seal_cost" => "씰",
        "cost.end_caps_cost" => "엔드캡",
        "cost.chrome_plating_cost" => "크롬 도금",
        "cost.machining_cost" => "가공",
        "cost.assembly_cost" => "조립",
        "cost.mounting_cost" => "장착 부품",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        MAIN_MENU_TITLE => "\n=== Hydraulic Cylinder Pricing ===",
        MAIN_MENU_QUOTE => "1) Quote from dimensions",
        MAIN_MENU_TABLE => "2) Quote from price table",
        MAIN_MENU_PARAMETERS => "3) Show current parameters",
        MAIN_MENU_OPTIONS => "4) List options",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        PROMPT_BORE => "Bore diameter [mm]: ",
        PROMPT_ROD => "Rod diameter [mm]: ",
        PROMPT_STROKE => "Stroke length [mm]: ",
        PROMPT_WALL_OPTIONAL => "Wall thickness [mm] (blank = computed): ",
        PROMPT_PRESSURE_OPTIONAL => "Working pressure [bar] (blank = 160): ",
        PROMPT_MATERIAL => "Material number: ",
        PROMPT_CYLINDER_TYPE => "Cylinder type number: ",
        PROMPT_MOUNTING => "Mounting number: ",
        PROMPT_MARGIN => "Profit margin (0-1, blank = default): ",
        PROMPT_QUANTITY => "Quantity (blank = 1): ",
        RESULT_HEADING => "\n-- Cost breakdown --",
        RESULT_DIMENSIONS => "Dimensions",
        RESULT_SUBTOTAL => "Subtotal",
        RESULT_MARGIN => "Profit margin",
        RESULT_TOTAL => "Sale price",
        RESULT_QUANTITY => "Quantity",
        RESULT_QUANTITY_TOTAL => "Total",
        RESULT_NOTES => "Notes",
        TABLE_HEADING => "\n-- Price table quote --",
        TABLE_NOT_LOADED => "No price table loaded.",
        TABLE_PROMPT_STROKE => "Stroke length [mm] (for per-meter items): ",
        TABLE_PROMPT_SELECTION => "Selection (blank = not applicable): ",
        TABLE_FREE => "(none)",
        TABLE_NOT_APPLICABLE => "Not applicable",
        TABLE_TOTAL => "Total",
        PARAMETERS_HEADING => "\n-- Current parameters --",
        PARAMETERS_WRITTEN => "Parameter file written:",
        OPTIONS_MATERIALS => "Materials",
        OPTIONS_CYLINDER_TYPES => "Cylinder types",
        OPTIONS_MOUNTINGS => "Mountings",
        "material.steel" => "Steel (St52)",
        "material.stainless" => "Stainless steel (AISI 304/316)",
        "material.aluminum" => "Aluminum",
        "cylinder_type.single_acting" => "Single acting",
        "cylinder_type.double_acting" => "Double acting",
        "cylinder_type.telescopic" => "Telescopic",
        "mounting.flange" => "Flange",
        "mounting.clevis" => "Clevis",
        "mounting.trunnion" => "Trunnion",
        "mounting.foot" => "Foot",
        "mounting.tie_rod" => "Tie rod",
        "cost.tube_cost" => "Tube",
        "cost.rod_cost" => "Piston rod",
        "cost.piston_cost" => "Piston",
        "cost.seal_cost" => "Seals",
        "cost.end_caps_cost" => "End caps",
        "cost.chrome_plating_cost" => "Chrome plating",
        "cost.machining_cost" => "Machining",
        "cost.assembly_cost" => "Assembly",
        "cost.mounting_cost" => "Mounting hardware",
        _ => return None,
    })
}

fn tr(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Hata",
        APP_EXIT => "Çıkılıyor.",
        MAIN_MENU_TITLE => "\n=== Hidrolik Silindir Fiyatlandırma ===",
        MAIN_MENU_QUOTE => "1) Ölçülere göre fiyat",
        MAIN_MENU_TABLE => "2) Fiyat tablosuna göre fiyat",
        MAIN_MENU_PARAMETERS => "3) Parametreleri göster",
        MAIN_MENU_OPTIONS => "4) Seçenekleri listele",
        MAIN_MENU_EXIT => "0) Çıkış",
        PROMPT_MENU_SELECT => "Seçim: ",
        INVALID_SELECTION_RETRY => "Geçersiz giriş. Tekrar deneyin.",
        ERROR_INVALID_NUMBER => "Lütfen bir sayı girin.",
        PROMPT_BORE => "Silindir iç çapı [mm]: ",
        PROMPT_ROD => "Piston mili çapı [mm]: ",
        PROMPT_STROKE => "Strok boyu [mm]: ",
        PROMPT_WALL_OPTIONAL => "Gövde et kalınlığı [mm] (boş = hesapla): ",
        PROMPT_PRESSURE_OPTIONAL => "Çalışma basıncı [bar] (boş = 160): ",
        PROMPT_MATERIAL => "Malzeme no: ",
        PROMPT_CYLINDER_TYPE => "Silindir tipi no: ",
        PROMPT_MOUNTING => "Bağlantı tipi no: ",
        PROMPT_MARGIN => "Kâr marjı (0-1, boş = varsayılan): ",
        PROMPT_QUANTITY => "Adet (boş = 1): ",
        RESULT_HEADING => "\n-- Maliyet dağılımı --",
        RESULT_DIMENSIONS => "Ölçüler",
        RESULT_SUBTOTAL => "Ara toplam",
        RESULT_MARGIN => "Kâr marjı",
        RESULT_TOTAL => "Toplam fiyat",
        RESULT_QUANTITY => "Adet",
        RESULT_QUANTITY_TOTAL => "Genel toplam",
        RESULT_NOTES => "Notlar",
        TABLE_HEADING => "\n-- Tablo bazlı fiyat --",
        TABLE_NOT_LOADED => "Fiyat tablosu yüklenmemiş.",
        TABLE_PROMPT_STROKE => "Strok boyu [mm] (metre bazlı kalemler için): ",
        TABLE_PROMPT_SELECTION => "Seçim (boş = uygulanmaz): ",
        TABLE_FREE => "(YOK)",
        TABLE_NOT_APPLICABLE => "Uygulanmaz",
        TABLE_TOTAL => "Toplam",
        PARAMETERS_HEADING => "\n-- Mevcut parametreler --",
        PARAMETERS_WRITTEN => "Parametre dosyası yazıldı:",
        OPTIONS_MATERIALS => "Malzemeler",
        OPTIONS_CYLINDER_TYPES => "Silindir tipleri",
        OPTIONS_MOUNTINGS => "Bağlantı tipleri",
        "material.steel" => "Çelik (St52)",
        "material.stainless" => "Paslanmaz Çelik (AISI 304/316)",
        "material.aluminum" => "Alüminyum",
        "cylinder_type.single_acting" => "Tek Etkili",
        "cylinder_type.double_acting" => "Çift Etkili",
        "cylinder_type.telescopic" => "Teleskopik",
        "mounting.flange" => "Flanşlı",
        "mounting.clevis" => "Mafsallı (Clevis)",
        "mounting.trunnion" => "Trunyon",
        "mounting.foot" => "Ayaklı",
        "mounting.tie_rod" => "Bağlantı Çubuklu",
        "cost.tube_cost" => "Gövde",
        "cost.rod_cost" => "Piston Mili",
        "cost.piston_cost" => "Piston",
        "cost.seal_cost" => "Conta/Sızdırmazlık",
        "cost.end_caps_cost" => "Kapaklar",
        "cost.chrome_plating_cost" => "Krom Kaplama",
        "cost.machining_cost" => "İşleme",
        "cost.assembly_cost" => "Montaj",
        "cost.mounting_cost" => "Bağlantı Elemanı",
        _ => return None,
    })
}
