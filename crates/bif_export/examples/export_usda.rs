//! Example: Build a small renderer scene and export it as USDA.
//!
//! Run with: cargo run --example export_usda -- [output.usda] [config.json]

use std::env;

use bif_export::node::ArrayValue;
use bif_export::{ExportConfig, Registry, Stage, Universe, Writer};
use bif_math::{Mat4, Vec3};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(2) {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };

    let mut universe = Universe::new();

    let options = universe.add_builtin("options", "options")?;
    let camera = universe.add_builtin("/World/cam", "persp_camera")?;
    universe.set(options, "xres", 1920i32)?;
    universe.set(options, "yres", 1080i32)?;
    universe.set(options, "camera", camera)?;
    universe.set(camera, "fov", 35.0f32)?;
    universe.set(camera, "matrix", Mat4::from_translation(Vec3::new(0.0, 1.5, 8.0)))?;

    let red = universe.add_builtin("/looks/red", "standard_surface")?;
    universe.set(red, "base_color", bif_export::AttrValue::Rgb(Vec3::new(0.8, 0.1, 0.1)))?;

    let quad = universe.add_builtin("/World/quad", "polymesh")?;
    universe.set(quad, "nsides", ArrayValue::UInt(vec![4]))?;
    universe.set(quad, "vidxs", ArrayValue::UInt(vec![0, 1, 2, 3]))?;
    universe.set(
        quad,
        "vlist",
        ArrayValue::Vector(vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ]),
    )?;
    universe.set(quad, "shader", red)?;

    // Three instances; only the overrides differing from the quad are written
    for i in 0..3 {
        let inst = universe.add_builtin(&format!("/World/quad_inst{}", i), "ginstance")?;
        universe.set(inst, "node", quad)?;
        universe.set(inst, "shader", red)?;
        universe.set(
            inst,
            "matrix",
            Mat4::from_translation(Vec3::new(3.0 * (i + 1) as f32, 0.0, 0.0)),
        )?;
        if i == 1 {
            universe.set(inst, "matte", true)?;
        }
    }

    let light = universe.add_builtin("/World/key", "point_light")?;
    universe.set(light, "intensity", 20.0f32)?;
    universe.set(light, "matrix", Mat4::from_translation(Vec3::new(2.0, 4.0, 2.0)))?;

    let mut stage = Stage::new();
    let translated = {
        let mut writer = Writer::new(&mut stage, &universe, &config);
        Registry::new().write_universe(&universe, &mut writer)
    };

    println!("=== Export ===");
    println!("Nodes translated: {}", translated);
    println!("Prims written: {}", stage.prim_count());

    match args.get(1) {
        Some(path) => {
            stage.write_usda(path)?;
            println!("Wrote {}", path);
        }
        None => println!("\n{}", stage.to_usda()),
    }

    Ok(())
}
