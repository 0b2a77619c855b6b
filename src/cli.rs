use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use verigrain_common::{GrainShape, UserMode};

#[derive(Parser)]
#[command(name = "verigrain")]
#[command(about = "米粒写真の純度監査ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 照合基準の指定（未指定なら対話選択）
#[derive(Args, Clone, Debug, Default)]
pub struct StandardArgs {
    /// 品種名 (例: basmati, "Sona Masoori")
    #[arg(long, conflicts_with = "shape")]
    pub variety: Option<String>,

    /// 新品種の粒形 (long/medium/short)
    #[arg(long)]
    pub shape: Option<GrainShape>,

    /// 利用モード (consumer/industry)
    #[arg(short, long)]
    pub mode: Option<UserMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真（またはフォルダ）を監査してJSON台帳を出力
    Audit {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        #[command(flatten)]
        standard: StandardArgs,

        /// 検出結果JSON（指定時は検出器を起動しない）
        #[arg(short, long)]
        detections: Option<PathBuf>,

        /// 画像と同名の `.json` から検出結果を読む
        #[arg(long, conflicts_with = "detections")]
        sidecar: bool,

        /// 出力JSONファイル（デフォルト: audit.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// キャッシュを使用（再検出をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 監査からレポート出力まで一括実行
    Run {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        #[command(flatten)]
        standard: StandardArgs,

        /// 検出結果JSON（指定時は検出器を起動しない）
        #[arg(short, long)]
        detections: Option<PathBuf>,

        /// 画像と同名の `.json` から検出結果を読む
        #[arg(long, conflicts_with = "detections")]
        sidecar: bool,

        /// 出力形式 (json/pdf/excel/card/all)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートタイトル
        #[arg(short, long, default_value = "Grain Audit Report")]
        title: String,

        /// PDF画像品質 (high/medium/low)
        #[arg(long, default_value = "medium")]
        pdf_quality: PdfQuality,

        /// キャッシュを使用（再検出をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// JSON台帳からレポートを生成
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (json/pdf/excel/card/all)
        #[arg(short, long, default_value = "all")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートタイトル
        #[arg(short, long, default_value = "Grain Audit Report")]
        title: String,

        /// PDF画像品質 (high/medium/low)
        #[arg(long, default_value = "medium")]
        pdf_quality: PdfQuality,
    },

    /// 形状ラベルを直接評価
    Evaluate {
        /// 形状ラベル（カンマ区切り）
        #[arg(required = true, value_delimiter = ',')]
        labels: Vec<String>,

        #[command(flatten)]
        standard: StandardArgs,
    },

    /// 品種基準の一覧を表示
    Varieties,

    /// 設定を表示/編集
    Config {
        /// 検出モデルのパスを設定
        #[arg(long)]
        set_model: Option<PathBuf>,

        /// 検出器コマンドを設定
        #[arg(long)]
        set_detector: Option<String>,

        /// 検出器の追加引数（--set-detector と併用）
        #[arg(long, requires = "set_detector")]
        detector_arg: Vec<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 検出キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    #[default]
    Pdf,
    Excel,
    Card,
    All,
}

impl ExportFormat {
    pub fn includes(&self, other: ExportFormat) -> bool {
        *self == ExportFormat::All || *self == other
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "card" | "png" => Ok(ExportFormat::Card),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use json, pdf, excel, card, or all", s)),
        }
    }
}

/// PDF画像品質設定
#[derive(Clone, Copy, Debug, Default)]
pub enum PdfQuality {
    /// 高品質: 1400px, 85%
    High,
    /// 中品質: 800px, 75%（デフォルト）
    #[default]
    Medium,
    /// 低品質: 500px, 60%
    Low,
}

impl PdfQuality {
    /// 最大ピクセル幅
    pub fn max_width(&self) -> u32 {
        match self {
            PdfQuality::High => 1400,
            PdfQuality::Medium => 800,
            PdfQuality::Low => 500,
        }
    }

    /// JPEG品質 (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PdfQuality::High => 85,
            PdfQuality::Medium => 75,
            PdfQuality::Low => 60,
        }
    }
}

impl std::str::FromStr for PdfQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(PdfQuality::High),
            "medium" | "med" | "m" => Ok(PdfQuality::Medium),
            "low" | "l" => Ok(PdfQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl std::fmt::Display for PdfQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfQuality::High => write!(f, "high"),
            PdfQuality::Medium => write!(f, "medium"),
            PdfQuality::Low => write!(f, "low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate_labels() {
        let cli = Cli::try_parse_from([
            "verigrain", "evaluate", "premium,premium,low", "--variety", "basmati", "-m", "industry",
        ])
        .unwrap();
        match cli.command {
            Commands::Evaluate { labels, standard } => {
                assert_eq!(labels, vec!["premium", "premium", "low"]);
                assert_eq!(standard.variety.as_deref(), Some("basmati"));
                assert_eq!(standard.mode, Some(UserMode::Industry));
            }
            _ => panic!("evaluate として解釈されていない"),
        }
    }

    #[test]
    fn test_variety_conflicts_with_shape() {
        let result = Cli::try_parse_from([
            "verigrain", "evaluate", "low", "--variety", "ponni", "--shape", "long",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sidecar_conflicts_with_detections() {
        let result = Cli::try_parse_from([
            "verigrain", "audit", "photos", "--sidecar", "-d", "dets.json",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["verigrain", "run", "photos", "--sidecar", "-f", "all"]).unwrap();
        match cli.command {
            Commands::Run { sidecar, format, .. } => {
                assert!(sidecar);
                assert_eq!(format, ExportFormat::All);
            }
            _ => panic!("run として解釈されていない"),
        }
    }

    #[test]
    fn test_export_format_includes() {
        assert!(ExportFormat::All.includes(ExportFormat::Card));
        assert!(ExportFormat::Pdf.includes(ExportFormat::Pdf));
        assert!(!ExportFormat::Pdf.includes(ExportFormat::Excel));
        assert!("xlsx".parse::<ExportFormat>().unwrap() == ExportFormat::Excel);
    }
}
