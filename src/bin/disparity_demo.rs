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

    let pipeline = StereoPipeline::new(config.params.clone());
    let (out, report) = pipeline
        .run_disparity(&left, &right)
        .map_err(|e| format!("Matching failed: {e}"))?;

    let matching = &config.params.matching;
    save_normalized_f32(
        &out.disparity.to_image_f32(),
        matching.min_disp as f32,
        matching.max_disp as f32,
        &config.output.disparity_image,
    )?;
    write_json_file(&config.output.report_json, &report)?;

    let stats = &report.matching.consistency;
    println!(
        "{} / {} pixels consistent ({} out of bounds, {} inconsistent) in {:.1} ms",
        stats.valid, stats.total, stats.out_of_bounds, stats.inconsistent, report.timings.total_ms
    );
    println!(
        "Saved disparity to {}",
        config.output.disparity_image.display()
    );
    println!("Saved report to {}", config.output.report_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: disparity_demo <config.json>".to_string()
}
