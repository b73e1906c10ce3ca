use super::*;
use crate::{
    Eye, Grid, Shape, assets::decode::encode_png, render::compose::render_stereogram,
};

const JOB: &str = r#"
{
  "label_image": "labels.png",
  "noise_flags": "noise.png",
  "dot_positions": [6, 11],
  "noise_budget": 1,
  "ovals": { "light": "light.png", "dark": "dark.png", "alpha": "alpha.png" },
  "background": 128
}
"#;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stereodots_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(dir: &Path, name: &str, grid: &Grid<u8>) {
    std::fs::write(dir.join(name), encode_png(grid).unwrap()).unwrap();
}

#[test]
fn parses_and_validates() {
    let job = StereoJob::from_json(JOB).unwrap();
    assert_eq!(job.dot_positions, vec![6, 11]);
    assert_eq!(job.noise_budget, 1);
    assert_eq!(job.ovals.alpha, "alpha.png");
    job.validate().unwrap();
}

#[test]
fn budget_and_background_default_to_zero() {
    let job = StereoJob::from_json(
        r#"{"label_image":"a.png","noise_flags":"b.png","dot_positions":[],
            "ovals":{"light":"l.png","dark":"d.png","alpha":"m.png"}}"#,
    )
    .unwrap();
    assert_eq!(job.noise_budget, 0);
    assert_eq!(job.background, 0);
}

#[test]
fn unknown_fields_and_negative_budgets_fail_to_parse() {
    let extra = JOB.replace("\"background\": 128", "\"background\": 128, \"seed\": 1");
    assert!(matches!(
        StereoJob::from_json(&extra),
        Err(StereoError::Other(_))
    ));
    let negative = JOB.replace("\"noise_budget\": 1", "\"noise_budget\": -1");
    assert!(StereoJob::from_json(&negative).is_err());
}

#[test]
fn rejects_escaping_paths_and_zero_positions() {
    let mut job = StereoJob::from_json(JOB).unwrap();
    job.ovals.dark = "../dark.png".to_string();
    assert!(matches!(
        job.validate(),
        Err(StereoError::InvalidParameter(_))
    ));

    let mut job = StereoJob::from_json(JOB).unwrap();
    job.label_image = "/abs/labels.png".to_string();
    assert!(matches!(
        job.validate(),
        Err(StereoError::InvalidParameter(_))
    ));

    let mut job = StereoJob::from_json(JOB).unwrap();
    job.dot_positions.push(0);
    assert!(matches!(job.validate(), Err(StereoError::OutOfRange(_))));
}

#[test]
fn load_scene_decodes_images_and_renders() {
    let dir = scratch_dir("job_load");
    let mut labels = Grid::filled(Shape::new(4, 4), 0u8);
    labels[(2, 2, 0)] = 3;
    write_png(&dir, "labels.png", &labels);
    write_png(&dir, "noise.png", &Grid::filled(Shape::new(4, 4), 0));
    write_png(&dir, "light.png", &Grid::filled(Shape::new(3, 3), 250));
    write_png(&dir, "dark.png", &Grid::filled(Shape::new(3, 3), 5));
    write_png(&dir, "alpha.png", &Grid::filled(Shape::new(3, 3), 255));

    let scene = StereoJob::from_json(JOB).unwrap().load_scene(&dir).unwrap();
    assert_eq!(scene.label_image.shape(), Shape::new(4, 4));
    assert_eq!(scene.ovals.alpha[(0, 0, 0)], 1.0);

    // Dot 6 is (2, 2) with an even label, dot 11 is (3, 3) with label 3.
    let out = render_stereogram(&scene, Eye::Left).unwrap();
    assert_eq!(out[(0, 0, 0)], 250);
    assert_eq!(out[(3, 3, 0)], 5);
    assert_eq!(out[(0, 3, 0)], 128);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_image_is_reported_with_its_path() {
    let dir = scratch_dir("job_missing");
    let err = StereoJob::from_json(JOB)
        .unwrap()
        .load_scene(&dir)
        .unwrap_err();
    assert!(format!("{err:#}").contains("labels.png"));
    std::fs::remove_dir_all(&dir).ok();
}
