use grain_recon::{NoProgress, ReconParams, Reconstructor, VoxelGrid};
use nalgebra::Quaternion;

fn main() {
    // Demo stub: fills a small single-orientation volume and runs the
    // pipeline over it.
    let mut grid = VoxelGrid::new(16, 16, 4);
    for idx in 0..grid.len() {
        grid.phases[idx] = 1;
        grid.confidences[idx] = 1.0;
        grid.quats[idx] = Quaternion::identity();
    }

    let recon = Reconstructor::new(ReconParams::default());
    match recon.run(&mut grid, &mut NoProgress) {
        Ok(result) => println!(
            "grains={} unassigned={} total_ms={:.3}",
            result.grain_count, result.unassigned_voxels, result.timing.total_ms
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
