use argh::FromArgs;

use superpose::linalg::transform_points;
use superpose::transforms::axis_angle_to_rotation_matrix;

#[derive(FromArgs)]
/// Example of rigid superposition of a displaced point cloud
struct Args {
    /// number of points in the synthetic cloud
    #[argh(option, default = "100")]
    num_points: usize,

    /// rotation angle in radians applied before alignment
    #[argh(option, default = "0.7")]
    angle: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // synthesize a reference cloud
    let reference = (0..args.num_points)
        .map(|_| {
            [
                rand::random::<f64>() * 10.0,
                rand::random::<f64>() * 10.0,
                rand::random::<f64>() * 10.0,
            ]
        })
        .collect::<Vec<_>>();
    println!("Reference cloud: #{} points", reference.len());

    // displace it by a known rigid transform
    let rotation = axis_angle_to_rotation_matrix(&[1.0, 2.0, 0.5], args.angle)?;
    let translation = [4.0, -2.0, 0.5];
    let mut displaced = vec![[0.0; 3]; reference.len()];
    transform_points(&reference, &rotation, &translation, &mut displaced);

    let masses = vec![1.0; reference.len()];
    println!("rmsd before alignment: {:.6}", rmsd(&displaced, &reference));

    let aligned = superpose::align(&displaced, &reference, &masses, &masses)?;
    println!("rmsd after alignment:  {:.6}", rmsd(&aligned, &reference));

    Ok(())
}

fn rmsd(a: &[[f64; 3]], b: &[[f64; 3]]) -> f64 {
    let sum_sq: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(pa, pb)| {
            let dx = pa[0] - pb[0];
            let dy = pa[1] - pb[1];
            let dz = pa[2] - pb[2];
            dx * dx + dy * dy + dz * dz
        })
        .sum();
    (sum_sq / a.len() as f64).sqrt()
}
