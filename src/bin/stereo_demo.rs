use plane_stereo::config::stereo;
use plane_stereo::image::io::{load_planar_image, save_normalized_f32, write_json_file};
use plane_stereo::StereoPipeline;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = stereo::load_config(Path::new(&config_path))?;

    let left = load_planar_image(&config.left, config.color_space)?;
    let right = load_planar_image(&config.right, config.color_space)?;
    let segmentation = config.segmentation(left.width(), left.height())?;

    let pipeline = StereoPipeline::new(config.params.clone());
    let out = pipeline
        .run(&left, &right, &segmentation)
        .map_err(|e| format!("Stereo pipeline failed: {e}"))?;

    let matching = &config.params.matching;
    let (lo, hi) = (matching.min_disp as f32, matching.max_disp as f32);
    save_normalized_f32(
        &out.disparity.disparity.to_image_f32(),
        lo,
        hi,
        &config.output.disparity_image,
    )?;
    if let Some(path) = &config.output.plane_image {
        save_normalized_f32(&out.dense, lo, hi, path)?;
        println!("Saved plane disparity to {}", path.display());
    }
    write_json_file(&config.output.report_json, &out.report)?;

    let valid_planes = out.planes.iter().filter(|p| p.is_some()).count();
    println!(
        "{} segments -> {} ({} with a plane) in {:.1} ms",
        segmentation.len(),
        out.segmentation.len(),
        valid_planes,
        out.report.timings.total_ms
    );
    println!(
        "Saved disparity to {}",
        config.output.disparity_image.display()
    );
    println!("Saved report to {}", config.output.report_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: stereo_demo <config.json>".to_string()
}
