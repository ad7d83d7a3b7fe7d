use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cylinder_pricing::app::{self, AppContext, AppError};
use cylinder_pricing::i18n::{self, keys, Translator};
use cylinder_pricing::pricing::{
    CylinderDimensions, CylinderType, MaterialType, MountingType, PricingRequest,
};
use cylinder_pricing::{config, telemetry, ui_cli};

#[derive(Parser)]
#[command(name = "cylinder-pricing")]
#[command(about = "Hydraulic cylinder cost estimation")]
#[command(version)]
struct Cli {
    /// 표시 언어 (ko, en, tr, auto)
    #[arg(long, global = true, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = config::CONFIG_FILE)]
    config: PathBuf,
    /// 결과를 JSON으로 출력
    #[arg(long, global = true)]
    json: bool,
    /// debug 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 치수로 견적 계산
    Quote(QuoteArgs),
    /// 가격 파라미터 파일 관리
    Params {
        #[command(subcommand)]
        action: ParamsCommand,
    },
    /// 가격표 기반 견적
    Table(TableArgs),
    /// 선택 가능한 재질/형식/장착 방식 목록
    Options,
    /// 대화형 메뉴 (기본)
    Interactive,
}

#[derive(Args)]
struct QuoteArgs {
    /// 보어 직경 [mm]
    #[arg(long)]
    bore: f64,
    /// 로드 직경 [mm]
    #[arg(long)]
    rod: f64,
    /// 행정 길이 [mm]
    #[arg(long)]
    stroke: f64,
    /// 튜브 두께 [mm]. 없으면 압력에서 계산한다.
    #[arg(long)]
    wall: Option<f64>,
    /// 사용 압력 [bar]
    #[arg(long)]
    pressure: Option<f64>,
    #[arg(long, default_value = "steel")]
    material: MaterialType,
    #[arg(long = "type", default_value = "double_acting")]
    cylinder_type: CylinderType,
    #[arg(long, default_value = "flange")]
    mounting: MountingType,
    /// 이익률 (0~1). 없으면 설정값.
    #[arg(long)]
    margin: Option<f64>,
    /// 수량. 없으면 설정값.
    #[arg(long)]
    quantity: Option<u32>,
    /// 파라미터 파일 (설정값 대신)
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ParamsCommand {
    /// 적용 중인 파라미터를 출력
    Show {
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// 기본 파라미터 파일 생성
    Init {
        /// 생성할 경로. 없으면 설정값.
        path: Option<PathBuf>,
        /// 기존 파일 덮어쓰기
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
struct TableArgs {
    /// 가격표 파일 (설정값 대신)
    #[arg(long)]
    table: Option<PathBuf>,
    /// 행정 길이 [mm]. 미터 단가 항목에 필요하다.
    #[arg(long, default_value_t = 0.0)]
    stroke: f64,
    /// 열=선택값 (반복 가능)
    #[arg(short, long = "select", value_parser = parse_selection)]
    selections: Vec<(String, String)>,
}

fn parse_selection(s: &str) -> Result<(String, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("column=value 형식이 아닙니다: {s}"))?;
    Ok((column.trim().to_string(), value.trim().to_string()))
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
fn main() {
    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), AppError> {
    let cli = Cli::parse();
    telemetry::init_default_tracing(if cli.verbose { "debug" } else { "info" });

    let cfg = config::load_or_default_at(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, cfg.language.as_deref());
    let tr = Translator::new_with_pack(&lang, None);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Quote(args) => {
            let ctx = AppContext::load(cfg, tr, args.params.as_deref())?;
            let mut dimensions = CylinderDimensions::new(args.bore, args.rod, args.stroke);
            dimensions.wall_thickness = args.wall;
            dimensions.working_pressure = args.pressure;
            let request = PricingRequest {
                dimensions,
                material: args.material,
                cylinder_type: args.cylinder_type,
                mounting_type: args.mounting,
                quantity: args.quantity.unwrap_or(ctx.config.default_quantity),
                profit_margin: args.margin.unwrap_or(ctx.config.default_profit_margin),
            };
            let quote = ctx.quote(&request)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                ui_cli::print_quote(&ctx.translator, &quote);
            }
        }
        Commands::Params { action } => match action {
            ParamsCommand::Show { params } => {
                let ctx = AppContext::load(cfg, tr, params.as_deref())?;
                if cli.json {
                    let snapshot = ctx.store.snapshot();
                    println!("{}", serde_json::to_string_pretty(&*snapshot.parameters)?);
                } else {
                    print!("{}", ctx.parameters_toml()?);
                }
            }
            ParamsCommand::Init { path, force } => {
                let path = path.unwrap_or_else(|| cfg.parameters_path.clone());
                app::init_parameters(&path, force)?;
                println!("{} {}", tr.t(keys::PARAMETERS_WRITTEN), path.display());
            }
        },
        Commands::Table(args) => {
            let ctx = AppContext::load(cfg, tr, None)?;
            let selections: BTreeMap<String, String> = args.selections.into_iter().collect();
            let quote = ctx.table_quote(args.table.as_deref(), &selections, args.stroke)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                ui_cli::print_table_quote(&ctx.translator, &quote);
            }
        }
        Commands::Options => {
            if cli.json {
                let listing = serde_json::json!({
                    "materials": MaterialType::ALL,
                    "cylinder_types": CylinderType::ALL,
                    "mounting_types": MountingType::ALL,
                });
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                ui_cli::print_options(&tr);
            }
        }
        Commands::Interactive => {
            let ctx = AppContext::load(cfg, tr, None)?;
            app::run(&ctx)?;
        }
    }
    Ok(())
}
