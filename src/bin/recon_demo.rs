use grain_recon::config::{load_config, RuntimeConfig};
use grain_recon::orientation::quat::from_axis_angle;
use grain_recon::types::ReconResult;
use grain_recon::{NoProgress, Reconstructor, VoxelGrid};
use nalgebra::{Quaternion, Vector3};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = match env::args().nth(1) {
        Some(path) => load_config(Path::new(&path)).map_err(|e| e.to_string())?,
        None => RuntimeConfig::default(),
    };

    let mut grid = synthetic_volume();
    let recon = Reconstructor::new(config.recon_params.clone());
    let result = recon
        .run(&mut grid, &mut NoProgress)
        .map_err(|e| e.to_string())?;

    print_text_summary(&result);

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
    if let Some(path) = &config.output.json_out {
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        println!("\nJSON report written to {}", path.display());
    } else {
        println!("\nJSON report:\n{json}");
    }

    Ok(())
}

/// A 24x24x8 cubic volume holding three grains (two of them separated by a
/// coherent twin boundary) and a sprinkling of low-confidence voxels.
fn synthetic_volume() -> VoxelGrid {
    let mut grid = VoxelGrid::new(24, 24, 8);
    let twin = from_axis_angle(
        60f32.to_radians(),
        Vector3::new(1.0, 1.0, 1.0).normalize(),
    );
    let rotated = from_axis_angle(35f32.to_radians(), Vector3::x());
    for idx in 0..grid.len() {
        let (x, y, _) = grid.coords(idx);
        grid.phases[idx] = 1;
        grid.confidences[idx] = if (x * 7 + y * 3) % 29 == 0 { 0.0 } else { 1.0 };
        grid.image_qualities[idx] = 100.0;
        grid.quats[idx] = if x < 8 {
            Quaternion::identity()
        } else if x < 16 {
            twin
        } else {
            rotated
        };
    }
    grid
}

fn print_text_summary(result: &ReconResult) {
    println!("Reconstruction summary");
    println!("  grains: {}", result.grain_count);
    println!("  unassigned voxels: {}", result.unassigned_voxels);
    println!("  cleaned voxels: {}", result.cleaned_voxels);
    println!(
        "  merges: twins={} colonies={} contained={}",
        result.twin_merges, result.colony_merges, result.contained_merges
    );
    println!("  graph edges: {}", result.graph_edges);
    println!("\nTimings (ms): total={:.3}", result.timing.total_ms);
    for stage in &result.timing.stages {
        println!("  {}: {:.3}", stage.label, stage.elapsed_ms);
    }
}
