//! BDSpace 演示程序
//! 构建一个带坐标系的空间，挂载图形、曲线和场，并在点阵上求值

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bdspace_core::coordinates::CoordinateSystem;
use bdspace_core::curve::{Curve, CurveShape};
use bdspace_core::field::{Field, PointSourceField};
use bdspace_core::figure::{Figure, FigureShape};
use bdspace_core::math::Point3;
use bdspace_core::space::Space;

/// 采样点数量
const SAMPLE_COUNT: usize = 5;

fn build_space() -> Result<Space> {
    let coordinate_system = CoordinateSystem::from_convention_name(Point3::origin(), "canova")?;
    println!("{}", coordinate_system);

    let mut my_space = Space::with_coordinate_system("My new space", coordinate_system);
    println!("{}", my_space);

    let my_figure = my_space.add_element(Figure::with_shape(
        "My figure",
        FigureShape::Sphere { radius: 1.0 },
    ))?;
    println!("{}", my_figure);

    let my_field = my_figure.add_element(Field::with_function(
        "My Field",
        "My Field type",
        PointSourceField::new(Point3::origin(), 1.0),
    ))?;
    println!("{}", my_field);

    let my_curve = my_space.add_element(Curve::with_shape(
        "My curve",
        CurveShape::Helix {
            radius: 2.0,
            pitch: 1.0,
        },
    ))?;
    println!("{}", my_curve);

    info!("Created {} elements", my_space.descendant_count());
    Ok(my_space)
}

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish()
    )?;

    info!("Starting BDSpace demo...");

    let space = build_space()?;
    print!("{}", space.tree());

    // 沿螺旋线采样，并在这些点上求点源场
    let t: Vec<f64> = (0..SAMPLE_COUNT).map(|i| i as f64 * 0.5).collect();
    let curve = space
        .element("My curve")
        .and_then(|e| e.as_curve())
        .ok_or_else(|| anyhow::anyhow!("curve 'My curve' not found"))?;
    let samples = curve.space().coordinate_system().to_parent(&curve.points(&t)?);

    let potential = space.scalar_field_at(&["My figure", "My Field"], &samples)?;
    let strength = space.vector_field_at(&["My figure", "My Field"], &samples)?;

    for ((point, phi), e) in samples.iter().zip(&potential).zip(&strength) {
        println!(
            "r = [{:.3}, {:.3}, {:.3}]  phi = {:.4}  |E| = {:.4}",
            point.x,
            point.y,
            point.z,
            phi,
            e.norm()
        );
    }

    info!("Evaluated field at {} points", samples.len());
    Ok(())
}
