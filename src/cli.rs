use clap::{Args, Parser, Subcommand};
use garment_recolor_common::Pattern;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "garment-recolor")]
#[command(about = "AI衣服領域検出・再着色ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像から衣服領域を検出してJSONを出力
    Detect {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 出力JSONファイル（デフォルト: 画像名.regions.json）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 保存済みの領域JSONを使って選択領域を再着色
    Recolor {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// `detect` が出力した領域JSON
        #[arg(short, long, required = true)]
        regions: PathBuf,

        #[command(flatten)]
        edit: EditArgs,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 検出から再着色・出力まで一括実行
    Run {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        #[command(flatten)]
        edit: EditArgs,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 検出した領域JSONも保存
        #[arg(long)]
        regions_out: Option<PathBuf>,
    },

    /// 参照画像から色を取得
    PickColor {
        /// 参照画像
        #[arg(required = true)]
        reference: PathBuf,

        /// 横位置（0.0-1.0）
        #[arg(short, long, default_value = "0.5")]
        x: f64,

        /// 縦位置（0.0-1.0）
        #[arg(short, long, default_value = "0.5")]
        y: f64,
    },

    /// 表示フィルタ（CSS filter）を計算
    Filter {
        /// 明るさ（50-150）
        #[arg(long)]
        brightness: Option<u32>,

        /// コントラスト（50-150）
        #[arg(long)]
        contrast: Option<u32>,

        /// 彩度（0-200）
        #[arg(long)]
        saturation: Option<u32>,

        /// シャープネス（0-100）
        #[arg(long)]
        sharpness: Option<u32>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 選択と編集内容
#[derive(Args, Clone, Debug, Default)]
pub struct EditArgs {
    /// 選択する領域のインデックス（例: 0,2）
    #[arg(short, long)]
    pub select: Option<String>,

    /// 全領域を選択
    #[arg(long, conflicts_with = "select")]
    pub all: bool,

    /// 新しい生地色（#rrggbb）
    #[arg(short, long)]
    pub color: Option<String>,

    /// 生地パターン (none/ribbed/stripes/plaid/dots/floral)
    #[arg(short, long)]
    pub pattern: Option<Pattern>,

    /// 選択中のdetail領域を最初のmain領域に揃える
    #[arg(long)]
    pub sync_details: bool,

    /// 色を拾う参照画像
    #[arg(long)]
    pub pick_from: Option<PathBuf>,

    /// 参照画像の横位置（0.0-1.0）
    #[arg(long, default_value = "0.5", requires = "pick_from")]
    pub pick_x: f64,

    /// 参照画像の縦位置（0.0-1.0）
    #[arg(long, default_value = "0.5", requires = "pick_from")]
    pub pick_y: f64,
}

/// "0,2, 3" 形式のインデックス列をパース
pub fn parse_indices(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("Invalid index: {}. Use comma-separated numbers like 0,2", s))
        })
        .collect()
}
