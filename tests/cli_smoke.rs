use std::path::PathBuf;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stripe-loader"))
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("cli_smoke").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn cli_frame_writes_png() {
    let dir = scratch("frame");
    let cfg = dir.join("opts.json");
    let out = dir.join("out.png");
    std::fs::write(&cfg, r##"{ "backgroundColor": "#204080", "rectRandom": false }"##).unwrap();

    let status = bin()
        .args(["frame", "--width", "96", "--height", "8", "--at", "400", "--config"])
        .arg(&cfg)
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (96, 8));
    assert!(img.pixels().any(|p| p.0[3] > 0));
}

#[test]
fn cli_sequence_stops_after_vanish() {
    let dir = scratch("sequence");
    let status = bin()
        .args([
            "sequence",
            "--width",
            "64",
            "--height",
            "4",
            "--fps",
            "50",
            "--duration",
            "5000",
            "--stop-at",
            "200",
            "--out",
        ])
        .arg(&dir)
        .status()
        .unwrap();
    assert!(status.success());

    let frames = std::fs::read_dir(&dir).unwrap().count();
    // 20 ms frames: stop at 200, vanish window of 200 ms, then the clearing frame.
    assert!(frames > 10 && frames < 30, "frames={frames}");

    let last = dir.join(format!("frame_{:05}.png", frames - 1));
    let img = image::open(&last).unwrap().to_rgba8();
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn cli_rejects_bad_config() {
    let dir = scratch("bad_config");
    let cfg = dir.join("opts.json");
    std::fs::write(&cfg, r#"{ "gaussWeight": 3 }"#).unwrap();

    let status = bin()
        .args(["frame", "--width", "8", "--height", "2", "--at", "0", "--config"])
        .arg(&cfg)
        .arg("--out")
        .arg(dir.join("never.png"))
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_prints_defaults() {
    let out = bin().arg("defaults").output().unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["rectInterval"], serde_json::json!(800.0));
    assert_eq!(v["backgroundColor"], serde_json::json!("#123d84ff"));
}
