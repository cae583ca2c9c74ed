use deli_base::log;
use deli_stylize::{OnnxBackend, StyleDispatcher, StylizeConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const FRAME_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <input-dir> <output-dir> <mode> [config.json]",
            args[0]
        );
        eprintln!("  mode: 0 = comix, 1 = Hayao, 2 = Hosoda");
        std::process::exit(1);
    }

    let input_dir = PathBuf::from(&args[1]);
    let output_dir = PathBuf::from(&args[2]);
    let mode: i64 = args[3].parse()?;
    let config = match args.get(4) {
        Some(path) => StylizeConfig::from_file(path)?,
        None => StylizeConfig::default(),
    };

    let level = config.log_level_filter()?;
    match &config.log_dir {
        Some(dir) => deli_base::init_file_logger_with_level(dir, level)?,
        None => deli_base::init_stdout_logger_with_level(level),
    }

    // Collect frames in file name order
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(&input_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_frame_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        eprintln!("No frames found in {}", input_dir.display());
        std::process::exit(1);
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes = tokio::fs::read(path).await?;
        frames.push(deli_image::decode_frame(&bytes)?);
    }
    log::info!(
        "Read {} frames from {}, first is {:?}",
        frames.len(),
        input_dir.display(),
        frames[0].shape
    );

    let start = Instant::now();
    let dispatcher = Arc::new(StyleDispatcher::from_config(
        &config,
        Arc::new(OnnxBackend),
    )?);
    log::info!("Models ready in {:?}", start.elapsed());

    // Inference is CPU/GPU bound, keep it off the async workers
    let gpu = config.gpu;
    let start = Instant::now();
    let stylized = tokio::task::spawn_blocking(move || {
        dispatcher.get_stylized_frames(&frames, mode, gpu)
    })
    .await??;
    log::info!("Stylized {} frames in {:?}", stylized.len(), start.elapsed());

    tokio::fs::create_dir_all(&output_dir).await?;
    for (index, frame) in stylized.iter().enumerate() {
        let png = deli_image::encode_png(&deli_image::quantize(frame))?;
        let path = output_dir.join(format!("frame_{index:05}.png"));
        tokio::fs::write(&path, png).await?;
    }

    log::info!(
        "Wrote {} frames to {}",
        stylized.len(),
        output_dir.display()
    );
    Ok(())
}
