//! End-to-end behaviour of the raster engine and motion interpreter.

use laserpreview_core::{BeamProperties, CellBounds, MaterialProperties, Point2};
use laserpreview_visualizer::{
    BeamState, BurnSimulator, GrayscaleImage, InterpreterSettings, MotionInterpreter,
};
use std::collections::HashMap;

fn nonzero_cells(sim: &BurnSimulator) -> HashMap<(i32, i32), f32> {
    let b = sim.bounds();
    let mut cells = HashMap::new();
    for y in b.y0..=b.y1 {
        for x in b.x0..=b.x1 {
            let v = sim.canvas().value_at(x, y);
            if v != 0.0 {
                cells.insert((x, y), v);
            }
        }
    }
    cells
}

#[test]
fn zero_diffusion_marks_only_hit_cells() {
    let mut sim = BurnSimulator::new(
        MaterialProperties::new(1.0, 0.0, 0.0),
        BeamProperties::new(10.0, 0.1, 0.5),
    );
    sim.set_pixel_energy(1.0);

    let steps = sim
        .draw_segment(Point2::new(0.0, 0.0), Point2::new(4.0, 2.0), 0.5)
        .unwrap();
    assert_eq!(steps, 4);

    // Spots at (1,0.75) (2,1.25) (3,1.75) (4,2.25); cell (i,j) is centered
    // on (i+0.5, j+0.5) so each spot splits evenly across two columns.
    let expected = [
        ((0, 0), 0.1875),
        ((1, 0), 0.25),
        ((2, 0), 0.0625),
        ((0, 1), 0.0625),
        ((1, 1), 0.25),
        ((2, 1), 0.375),
        ((3, 1), 0.25),
        ((4, 1), 0.0625),
        ((2, 2), 0.0625),
        ((3, 2), 0.25),
        ((4, 2), 0.1875),
    ];
    let cells = nonzero_cells(&sim);
    assert_eq!(cells.len(), expected.len(), "{:?}", cells);
    for ((x, y), value) in expected {
        let got = cells[&(x, y)];
        assert!((got - value).abs() < 1e-6, "cell ({x},{y}) = {got}");
    }
    assert!((sim.canvas().total_energy() - 2.0).abs() < 1e-6);
}

#[test]
fn program_draws_one_full_power_segment() {
    let mut sim = BurnSimulator::new(MaterialProperties::clear_wood(), BeamProperties::default());
    sim.set_feed_rate(1000.0);
    let mut interp = MotionInterpreter::new(InterpreterSettings {
        zoom: BeamProperties::default().zoom(),
        ..Default::default()
    });

    let stats = interp
        .run_str("G1\nM3 S255\nX10\nM5\nX20\n", &mut sim)
        .unwrap();

    assert_eq!(stats.lines, 5);
    assert_eq!(stats.segments, 1);
    assert_eq!(interp.state(), BeamState::Idle);
    assert_eq!(interp.position(), Point2::new(200.0, 0.0));
    assert_eq!(interp.intensity(), 1.0);

    let sim_stats = sim.stats();
    assert_eq!(sim_stats.segments, 1);
    assert_eq!(sim_stats.deposits, 100);

    // The travel move after M5 leaves no trace.
    assert!(sim.canvas().value_at(50, 0) > 0.0);
    assert_eq!(sim.canvas().value_at(150, 0), 0.0);
    assert!(sim.bounds().x1 < 110);
}

#[test]
fn program_without_feed_uses_seeded_energy() {
    let mut sim = BurnSimulator::new(MaterialProperties::clear_wood(), BeamProperties::default());
    let mut interp = MotionInterpreter::default();
    interp.run_str("M3\nG1 X8\n", &mut sim).unwrap();
    assert_eq!(sim.stats().marked_cells, 0);

    sim.set_feed_rate(1000.0);
    interp.run_str("G1 X0\n", &mut sim).unwrap();
    assert!(sim.stats().marked_cells > 0);
}

#[test]
fn positive_factor_share_grows_until_clamped() {
    let mut sim = BurnSimulator::new(
        MaterialProperties::clear_wood().with_diffusion(0.0),
        BeamProperties::default(),
    );
    sim.set_feed_rate(1000.0);

    let mut previous = 0.0;
    let mut reached_full = false;
    for _ in 0..20 {
        let share = sim.burn(Point2::new(5.5, 5.5), 0.3).unwrap().cells[0].share;
        assert!(share >= previous, "{share} < {previous}");
        assert!(share <= 1.0);
        reached_full |= share == 1.0;
        previous = share;
    }
    assert!(reached_full);
}

#[test]
fn negative_factor_share_decays() {
    let mut sim = BurnSimulator::new(
        MaterialProperties::painted_aluminum().with_diffusion(0.0),
        BeamProperties::default(),
    );
    sim.set_feed_rate(1000.0);

    let mut previous = f32::INFINITY;
    for _ in 0..20 {
        let share = sim.burn(Point2::new(5.5, 5.5), 0.3).unwrap().cells[0].share;
        assert!(share >= 0.0);
        assert!(share < previous, "{share} >= {previous}");
        previous = share;
    }
    assert!(previous < 0.01);
    assert!(sim.canvas().value_at(5, 5) <= 1.0);
}

#[test]
fn diffusion_never_creates_energy() {
    let mut sim = BurnSimulator::new(MaterialProperties::clear_wood(), BeamProperties::default());
    sim.set_feed_rate(1000.0);

    let outcome = sim.burn(Point2::new(2.25, 3.5), 0.8).unwrap();
    let applied = f64::from(outcome.applied_energy());
    let total = sim.canvas().total_energy();
    let retained = f64::from(sim.material().diffusion);

    assert!(total <= applied + 1e-6, "{total} > {applied}");
    assert!(total >= applied * retained);
    assert!(sim.bounds().contains_bounds(&CellBounds::new(0, 2, 3, 4)));
}

#[test]
fn rendered_image_has_dark_stroke() {
    let mut sim = BurnSimulator::new(MaterialProperties::clear_wood(), BeamProperties::default());
    sim.reserve_area(20, 5).unwrap();
    sim.set_feed_rate(1000.0);
    let mut interp = MotionInterpreter::default();
    interp.run_str("G0 Y2\nM3 S255\nG1 X15\n", &mut sim).unwrap();

    let image = GrayscaleImage::from_canvas(sim.canvas()).unwrap();
    assert_eq!(image.width() as u64, sim.bounds().width());
    assert_eq!(image.height() as u64, sim.bounds().height());

    // Canvas row y maps to image row y1 - y.
    let row = (sim.bounds().y1 - 2) as u32;
    assert!(image.pixel(8, row).unwrap() < 255);
    assert_eq!(image.pixel(19, 0), Some(255));
}
