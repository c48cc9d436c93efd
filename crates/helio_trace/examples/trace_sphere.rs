//! Trace a small parallel bundle onto a spherical mirror and print the
//! reflected rays.
//!
//! Run with `RUST_LOG=debug` to see the per-call hit statistics.

use anyhow::Result;
use helio_trace::{
    optics, DMat4, DVec3, QuadricGeometry, RayBundle, SphereQuadric, Surface, UniformSurface,
};

fn main() -> Result<()> {
    env_logger::init();

    // Mirror sphere of radius 2 centered two units down the z axis.
    let shape = SphereQuadric::new(2.0)?;
    let mut surface = UniformSurface::new(QuadricGeometry::new(shape))
        .with_frame(DMat4::from_translation(DVec3::new(0.0, 0.0, -2.0)))
        .with_absorptivity(0.1)?;

    // Parallel bundle travelling down -z; the last ray is aimed wide.
    let xs = [-0.5, -0.25, 0.0, 0.25, 0.5, 2.5];
    let bundle = RayBundle::new(
        xs.iter().map(|&x| DVec3::new(x, 0.0, 2.0)).collect(),
        vec![DVec3::new(0.0, 0.0, -1.0); xs.len()],
    );

    let params = surface.register_incoming(&bundle)?;
    log::info!("registered {} rays", bundle.num_rays());

    for (i, t) in params.iter().enumerate() {
        if t.is_infinite() {
            println!("ray {i}: missed the mirror");
        }
    }

    let selector: Vec<bool> = params.iter().map(|t| t.is_finite()).collect();
    let outgoing = surface.get_outgoing(&selector);
    let energy = optics::attenuate(outgoing.energy(), surface.absorptivity());

    for (i, ((v, d), e)) in outgoing
        .vertices()
        .iter()
        .zip(outgoing.directions())
        .zip(&energy)
        .enumerate()
    {
        println!(
            "ray {i}: hit ({:+.4}, {:+.4}, {:+.4})  reflected ({:+.4}, {:+.4}, {:+.4})  energy {:.2}",
            v.x, v.y, v.z, d.x, d.y, d.z, e
        );
    }

    Ok(())
}
