use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use verigrain::audit::{self, AuditOptions};
use verigrain::cli::{Cli, Commands};
use verigrain::config::Config;
use verigrain::detector::{CacheFile, Detector};
use verigrain::error::VerigrainError;
use verigrain::{export, scanner, selector};
use verigrain_common::{build_report_fields, evaluate, format_purity, AuditRecord, Standard, UserMode};

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn print_record(record: &AuditRecord) {
    println!("  ■ {}", record.file_name);
    for field in build_report_fields(record) {
        println!("    {}: {}", field.label, field.value);
    }
    println!("    → {}", record.result.message());
}

fn print_summary(records: &[AuditRecord]) {
    let summary = audit::summarize(records);
    println!(
        "  監査: {}枚 / 合格: {} / 棄却: {} / 平均純度: {}",
        summary.audited,
        summary.approved,
        summary.rejected,
        format_purity(summary.mean_purity)
    );
}

/// 画像フォルダ（単一ファイルなら親フォルダ）
fn cache_dir_for(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    } else {
        path.to_path_buf()
    }
}

struct AuditRequest<'a> {
    path: &'a Path,
    standard: Standard,
    mode: UserMode,
    detections: Option<&'a Path>,
    sidecar: bool,
    use_cache: bool,
    recursive: bool,
}

async fn run_audit(request: AuditRequest<'_>, config: &Config, verbose: bool) -> anyhow::Result<Vec<AuditRecord>> {
    println!("[1/3] 写真をスキャン中...");
    let images = scanner::scan_path(request.path, request.recursive)?;
    if images.is_empty() {
        return Err(VerigrainError::NoImagesFound(request.path.display().to_string()).into());
    }
    println!("✔ {}枚の写真を検出\n", images.len());

    let detector = Detector::from_config(config, request.detections, request.sidecar)?;
    let options = AuditOptions {
        standard: request.standard,
        mode: request.mode,
        min_confidence: config.confidence_threshold,
    };

    println!(
        "[2/3] 粒を検出中... ({} / {}){}",
        options.standard.name,
        options.mode,
        if request.use_cache { " (キャッシュ有効)" } else { "" }
    );
    let records = if request.use_cache {
        let cache_dir = cache_dir_for(request.path);
        audit::audit_images_with_cache(&images, &cache_dir, &detector, &options, verbose).await?
    } else {
        audit::audit_images(&images, &detector, &options, verbose).await?
    };
    println!("✔ 監査完了\n");

    for record in &records {
        print_record(record);
    }
    println!();
    print_summary(&records);
    println!();

    Ok(records)
}

fn load_records(input: &Path) -> anyhow::Result<Vec<AuditRecord>> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("台帳を読み込めません: {}", input.display()))?;
    let mut records: Vec<AuditRecord> = serde_json::from_str(&content)
        .with_context(|| format!("台帳の形式が不正です: {}", input.display()))?;

    // JSONファイルの親ディレクトリを基準に相対パスを解決
    let base_dir = input.parent().unwrap_or_else(|| Path::new("."));
    for record in &mut records {
        if record.file_path.is_empty() {
            continue;
        }
        let path = Path::new(&record.file_path);
        if path.is_relative() {
            if let Ok(abs_path) = base_dir.join(path).canonicalize() {
                record.file_path = abs_path.to_string_lossy().to_string();
            }
        }
    }
    Ok(records)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Audit { path, standard, detections, sidecar, output, use_cache, recursive } => {
            println!("🍚 verigrain - 純度監査\n");

            let table = config.variety_table()?;
            let resolved = selector::resolve_standard(&standard, &table)?;
            let request = AuditRequest {
                path: &path,
                standard: resolved,
                mode: standard.mode.unwrap_or(config.default_mode),
                detections: detections.as_deref(),
                sidecar,
                use_cache,
                recursive,
            };
            let records = run_audit(request, &config, cli.verbose).await?;

            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| PathBuf::from("audit.json"));
            export::write_json(&records, &output)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 監査完了");
        }

        Commands::Run {
            path,
            standard,
            detections,
            sidecar,
            format,
            output,
            title,
            pdf_quality,
            use_cache,
            recursive,
        } => {
            println!("🚀 verigrain - 一括処理\n");

            let table = config.variety_table()?;
            let resolved = selector::resolve_standard(&standard, &table)?;
            let request = AuditRequest {
                path: &path,
                standard: resolved,
                mode: standard.mode.unwrap_or(config.default_mode),
                detections: detections.as_deref(),
                sidecar,
                use_cache,
                recursive,
            };
            let records = run_audit(request, &config, cli.verbose).await?;

            println!("[3/3] エクスポート中...");
            let output_dir = output.unwrap_or_else(|| cache_dir_for(&path));
            export::export_records(&records, format, &output_dir, &title, pdf_quality)?;

            println!("\n✅ 完了");
        }

        Commands::Export { input, format, output, title, pdf_quality } => {
            println!("📄 verigrain - エクスポート\n");

            let records = load_records(&input)?;
            println!("✔ {}件の監査記録を読み込み", records.len());
            print_summary(&records);
            println!();

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            export::export_records(&records, format, &output_dir, &title, pdf_quality)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Evaluate { labels, standard } => {
            let table = config.variety_table()?;
            let resolved = selector::resolve_standard(&standard, &table)?;
            let mode = standard.mode.unwrap_or(config.default_mode);
            let result = evaluate(labels.as_slice(), &resolved, mode);

            println!("基準: {} ({})", resolved.name, resolved.describe());
            println!("モード: {}", mode);
            println!("  Total Grains: {}", result.total);
            println!("  Target: {}", result.target_count);
            println!("  Adulterants: {}", result.adulterant_count);
            if mode == UserMode::Industry {
                println!("    Wrong Variety: {}", result.wrong_variety_count);
                println!("    Broken/Dust: {}", result.broken_count);
            }
            println!("  Purity: {}", format_purity(result.purity_percent));
            println!("→ {}", result.message());
        }

        Commands::Varieties => {
            let table = config.variety_table()?;
            println!("品種基準:");
            for entry in table.entries() {
                let standard = entry.standard();
                println!("  {:<22} {}", standard.name, standard.describe());
            }
        }

        Commands::Config { set_model, set_detector, detector_arg, show } => {
            let mut config = config;

            if let Some(path) = set_model {
                config.set_model(path)?;
                println!("✔ モデルを設定しました: {}", config.model_path.display());
            }

            if let Some(command) = set_detector {
                config.set_detector(command, detector_arg)?;
                println!("✔ 検出器を設定しました: {}", config.detector_command);
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model_path.display());
                println!(
                    "  モデル状態: {}",
                    if config.model_path.exists() { "利用可能" } else { "見つかりません" }
                );
                println!("  検出器: {} {}", config.detector_command, config.detector_args.join(" "));
                println!("  信頼度しきい値: {:.2}", config.confidence_threshold);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  既定モード: {}", config.default_mode);
                match &config.variety_table {
                    Some(path) => println!("  品種表: {}", path.display()),
                    None => println!("  品種表: プリセット"),
                }
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  モデル: {}", cache.model());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                if CacheFile::clear(&target)? {
                    println!("✔ キャッシュを削除しました: {}", cache_path.display());
                } else {
                    println!("キャッシュファイルが存在しません");
                }
            }
        }
    }

    Ok(())
}
