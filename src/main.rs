use anyhow::{bail, Context, Result};
use clap::Parser;
use garment_recolor::cli::{parse_indices, Cli, Commands, EditArgs};
use garment_recolor::config::Config;
use garment_recolor::export;
use garment_recolor::gemini::GeminiClient;
use garment_recolor::sampler::{ColorSampler, ImageSampler};
use garment_recolor::session::Editor;
use garment_recolor_common::{normalize_hex, FashionItem, GlobalPatch, GlobalSettings, ItemPatch};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let mut config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Detect { image, output } => {
            println!("👕 garment-recolor - 領域検出\n");

            let mut editor = Editor::new(client(&config)?);
            detect_into(&mut editor, &image).await?;

            let output = output.unwrap_or_else(|| regions_path_for(&image));
            save_regions(editor.state().items(), &output)?;
            println!("\n✅ 検出完了");
        }

        Commands::Recolor { image, regions, edit, output } => {
            println!("🎨 garment-recolor - 再着色\n");

            println!("[1/3] 画像と領域を読み込み中...");
            let working = export::load_image_file(&image)?;
            let content = std::fs::read_to_string(&regions)
                .with_context(|| format!("領域JSONを読めません: {}", regions.display()))?;
            let items: Vec<FashionItem> =
                serde_json::from_str(&content).context("領域JSONの形式が不正です")?;
            println!("✔ {}件の領域を読み込み\n", items.len());

            let mut editor = Editor::new(client(&config)?);
            editor.load_regions(working, items)?;

            println!("[2/3] 編集を適用中...");
            apply_edits(&mut editor, &edit)?;

            recolor_and_export(&mut editor, output.as_deref(), "[3/3]").await?;
        }

        Commands::Run { image, edit, output, regions_out } => {
            println!("👕 garment-recolor - 検出と再着色\n");

            let mut editor = Editor::new(client(&config)?);
            println!("[1/3] 領域を検出中...");
            detect_into(&mut editor, &image).await?;
            if let Some(path) = regions_out {
                save_regions(editor.state().items(), &path)?;
            }
            println!();

            println!("[2/3] 編集を適用中...");
            apply_edits(&mut editor, &edit)?;

            recolor_and_export(&mut editor, output.as_deref(), "[3/3]").await?;
        }

        Commands::PickColor { reference, x, y } => {
            let bytes = std::fs::read(&reference)
                .with_context(|| format!("参照画像を読めません: {}", reference.display()))?;
            let color = ImageSampler.sample(&bytes, x, y)?;
            println!("{}", color.to_hex());
            println!("rgb({}, {}, {})", color.r, color.g, color.b);
        }

        Commands::Filter { brightness, contrast, saturation, sharpness } => {
            let mut settings = GlobalSettings::default();
            settings.apply(&GlobalPatch {
                brightness,
                contrast,
                saturation,
                sharpness,
            });

            println!("明るさ: {}%", settings.brightness);
            println!("コントラスト: {}%", settings.contrast);
            println!("彩度: {}%", settings.saturation);
            println!("シャープネス: {}", settings.sharpness);
            println!("\nfilter: {}", settings.css_filter());
        }

        Commands::Config { set_api_key, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを保存しました");
            }

            if show {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!(
                    "APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
                println!("検出モデル: {}", config.detect_model);
                println!("再着色モデル: {}", config.recolor_model);
                match config.timeout_seconds {
                    Some(secs) => println!("タイムアウト: {}秒", secs),
                    None => println!("タイムアウト: なし"),
                }
            }
        }
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn client(config: &Config) -> Result<GeminiClient> {
    let api_key = config.get_api_key()?;
    Ok(GeminiClient::new(api_key, config)?)
}

/// 待機中はスピナーを回す
async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    pb.finish_and_clear();
    output
}

async fn detect_into(editor: &mut Editor<GeminiClient>, image: &Path) -> Result<()> {
    let working = export::load_image_file(image)?;
    with_spinner("AI解析中...", editor.upload(working)).await?;

    if let Some(message) = editor.state().error() {
        bail!("{}", message);
    }

    let items = editor.state().items();
    println!("✔ {}件の領域を検出", items.len());
    print_items(items);
    Ok(())
}

fn print_items(items: &[FashionItem]) {
    for (index, item) in items.iter().enumerate() {
        println!(
            "  [{}] {} ({}, {:.0}%) {}",
            index,
            item.name,
            item.category.as_str(),
            item.confidence * 100.0,
            item.color
        );
    }
}

fn regions_path_for(image: &Path) -> PathBuf {
    image.with_extension("regions.json")
}

fn save_regions(items: &[FashionItem], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(path, json)
        .with_context(|| format!("領域JSONを書き込めません: {}", path.display()))?;
    println!("✔ 領域を保存: {}", path.display());
    Ok(())
}

/// 選択・色・パターン・detail同期を順に適用
fn apply_edits(editor: &mut Editor<GeminiClient>, edit: &EditArgs) -> Result<()> {
    if edit.all {
        editor.select_all();
    } else if let Some(select) = &edit.select {
        let indices = parse_indices(select).map_err(anyhow::Error::msg)?;
        editor.select_indices(&indices)?;
    }

    if editor.state().selection().is_empty() {
        bail!("領域が選択されていません。--select または --all を指定してください");
    }
    println!("✔ {}件の領域を選択", editor.state().selection().len());

    if let Some(reference) = &edit.pick_from {
        let bytes = std::fs::read(reference)
            .with_context(|| format!("参照画像を読めません: {}", reference.display()))?;
        let color = editor.pick_color(&ImageSampler, &bytes, edit.pick_x, edit.pick_y)?;
        println!("✔ 参照画像から色を取得: {}", color.to_hex());
    }

    if let Some(color) = &edit.color {
        let color = normalize_hex(color)?;
        editor.update_selected(ItemPatch::color(color.clone()));
        println!("✔ 色を設定: {}", color);
    }

    if let Some(pattern) = edit.pattern {
        editor.update_selected(ItemPatch::pattern(pattern));
        println!("✔ パターンを設定: {}", pattern.label());
    }

    if edit.sync_details {
        let synced = editor.sync_selected_details();
        println!("✔ {}件のdetail領域をmainに同期", synced);
    }

    println!();
    Ok(())
}

async fn recolor_and_export(
    editor: &mut Editor<GeminiClient>,
    output: Option<&Path>,
    step: &str,
) -> Result<()> {
    println!("{} AI再着色中...", step);
    let ran = with_spinner("画像を生成中...", editor.apply_recolor()).await?;
    if !ran {
        bail!("再着色できる領域がありません");
    }
    if let Some(message) = editor.state().error() {
        bail!("{}", message);
    }
    println!("✔ 再着色完了（履歴 {}件）", editor.state().history().len());

    let image = editor
        .state()
        .image()
        .context("作業画像がありません")?;
    let path = export::export_image(image, output.unwrap_or(Path::new(".")))?;
    println!("✔ 画像を保存: {}", path.display());

    println!("\n✅ 完了");
    Ok(())
}
