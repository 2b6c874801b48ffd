//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xmg_codec::{Completion, Diagnostic, Limits, XmgDecoder, XmgHeader};
use xmg_pixelbuffer::{Color, ManagedPixelBuffer};
use xmg_scene::{Config, DirectoryArchive, Scene};

/// Everything `info` reports about one file.
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub file: PathBuf,
    pub file_size: usize,
    pub header: XmgHeader,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<Completion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_consumed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipped_pixels: Option<u64>,
    /// Why the body failed to decode, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Inspect a file; a body that fails to decode is reported, not returned.
pub fn inspect(file: &Path, data: &[u8]) -> Result<InfoReport> {
    let header = XmgDecoder::probe(data).context("Failed to read XMG header")?;

    let mut report = InfoReport {
        file: file.to_path_buf(),
        file_size: data.len(),
        header,
        diagnostics: header.diagnostics(),
        completion: None,
        bytes_consumed: None,
        clipped_pixels: None,
        error: None,
    };

    match XmgDecoder::new().decode(data.to_vec()) {
        Ok(image) => {
            report.completion = Some(image.completion);
            report.bytes_consumed = Some(image.bytes_consumed);
            report.clipped_pixels = Some(image.clipped_pixels);
        }
        Err(e) => report.error = Some(e.to_string()),
    }
    Ok(report)
}

pub async fn info(file: &Path, json: bool) -> Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let report = inspect(file, &data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let header = &report.header;
    println!("{}", report.file.display());
    println!("  size:          {}x{}", header.width, header.height);
    println!("  version:       {}", header.version);
    println!("  key color:     {:#010x}", header.transparent_color);
    println!("  stride:        {}", header.declared_stride);
    println!(
        "  reserved:      {:#010x} {:#010x}",
        header.reserved1, header.reserved2
    );
    println!("  file size:     {} bytes", report.file_size);
    for diagnostic in &report.diagnostics {
        println!("  warning:       {}", diagnostic);
    }
    match (&report.completion, &report.error) {
        (Some(completion), _) => {
            println!("  completion:    {:?}", completion);
            println!(
                "  consumed:      {} bytes",
                report.bytes_consumed.unwrap_or_default()
            );
            println!(
                "  clipped:       {} pixels",
                report.clipped_pixels.unwrap_or_default()
            );
        }
        (None, Some(error)) => println!("  error:         {}", error),
        (None, None) => {}
    }
    Ok(())
}

/// Write a surface as an 8-bit RGBA PNG.
pub fn save_png(pixels: &ManagedPixelBuffer, path: &Path) -> Result<()> {
    let image = image::RgbaImage::from_raw(pixels.width(), pixels.height(), pixels.to_rgba8())
        .context("Pixel buffer does not match its dimensions")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Decode one file and write it as PNG.
pub fn convert_file(input: &Path, output: &Path, decoder: &XmgDecoder) -> Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let image = decoder
        .decode(data)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    if image.completion == Completion::StreamExhausted {
        warn!(
            "{}: stream ended before the last row, lower rows are blank",
            input.display()
        );
    }
    save_png(&image.pixels, output)
}

pub async fn convert(file: &Path, output: Option<PathBuf>, no_limits: bool) -> Result<()> {
    let output = output.unwrap_or_else(|| file.with_extension("png"));
    let decoder = if no_limits {
        XmgDecoder::with_limits(Limits::none())
    } else {
        XmgDecoder::new()
    };

    let input = file.to_path_buf();
    let target = output.clone();
    tokio::task::spawn_blocking(move || convert_file(&input, &target, &decoder)).await??;

    info!("Converted {} -> {}", file.display(), output.display());
    Ok(())
}

/// Outcome of a batch run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: Vec<PathBuf>,
}

/// `*.xmg` files directly inside `dir`, sorted.
pub fn find_xmg_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let path = entry?.path();
        let is_xmg = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("xmg"))
            .unwrap_or(false);
        if is_xmg && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `a.b.xmg` becomes `a.b.png`; only the final extension is replaced.
fn png_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    format!("{}.png", stem.to_string_lossy())
}

/// Convert every file in parallel, one decode per worker.
pub fn convert_all(files: &[PathBuf], output_dir: &Path) -> BatchSummary {
    let decoder = XmgDecoder::new();

    let results: Vec<(PathBuf, Result<()>)> = files
        .par_iter()
        .map(|input| {
            let output = output_dir.join(png_name(input));
            (input.clone(), convert_file(input, &output, &decoder))
        })
        .collect();

    let mut summary = BatchSummary::default();
    for (input, result) in results {
        match result {
            Ok(()) => summary.converted += 1,
            Err(e) => {
                warn!("{:#}", e);
                summary.failed.push(input);
            }
        }
    }
    summary
}

pub async fn batch(dir: &Path, output: &Path, jobs: Option<usize>) -> Result<()> {
    let files = find_xmg_files(dir)?;
    if files.is_empty() {
        warn!("No .xmg files found in {}", dir.display());
        return Ok(());
    }
    tokio::fs::create_dir_all(output)
        .await
        .with_context(|| format!("Failed to create {}", output.display()))?;

    info!("Converting {} files", files.len());
    let output_dir = output.to_path_buf();
    let summary = tokio::task::spawn_blocking(move || -> Result<BatchSummary> {
        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = jobs {
            pool = pool.num_threads(jobs);
        }
        let pool = pool.build().context("Failed to start worker threads")?;
        Ok(pool.install(|| convert_all(&files, &output_dir)))
    })
    .await??;

    info!(
        "Converted {} files, {} failed",
        summary.converted,
        summary.failed.len()
    );
    if !summary.failed.is_empty() {
        bail!(
            "{} of {} files failed to convert",
            summary.failed.len(),
            summary.converted + summary.failed.len()
        );
    }
    Ok(())
}

pub async fn compose(config_path: &Path, output: &Path) -> Result<()> {
    let config = Config::load(config_path)
        .await
        .with_context(|| format!("Failed to load scene {}", config_path.display()))?;
    let archive = DirectoryArchive::new(&config.archive);

    let scene = Scene::load(&config, &archive).await?;
    let canvas = scene.render_to_canvas(
        config.canvas.width,
        config.canvas.height,
        Color::from_packed(config.canvas.background),
    )?;

    let target = output.to_path_buf();
    tokio::task::spawn_blocking(move || save_png(&canvas, &target)).await??;

    info!(
        "Composed {} elements into {}",
        scene.len(),
        output.display()
    );
    Ok(())
}
