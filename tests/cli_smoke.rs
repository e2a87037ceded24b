use std::path::PathBuf;

#[test]
fn cli_emit_writes_frame_files() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let scene_path = dir.join("scene.json");
    let frames_dir = dir.join("jsonFrames");
    let ini_dir = dir.join("iniFrames");
    let out_dir = dir.join("outputFrames");
    let _ = std::fs::remove_dir_all(&frames_dir);
    let _ = std::fs::remove_dir_all(&ini_dir);

    let scene = serde_json::json!({
        "cameraData": { "position": [5.0, 2.0, 0.0], "focus": [0.0, 0.0, 0.0] },
        "groups": [
            { "name": "floor", "translate": [0.0, 0.0, 0.0] },
            { "groups": [ { "translate": [0.0, 3.0, 0.0], "rotate": [0.0, 1.0, 0.0, 0.0] } ] }
        ]
    });
    std::fs::write(&scene_path, serde_json::to_vec(&scene).unwrap()).unwrap();

    let exe = std::env::var_os("CARGO_BIN_EXE_raybatch")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "raybatch.exe"
            } else {
                "raybatch"
            });
            p
        });

    let status = std::process::Command::new(exe)
        .args([
            "emit",
            "--scene",
            scene_path.to_string_lossy().as_ref(),
            "--frames-dir",
            frames_dir.to_string_lossy().as_ref(),
            "--ini-dir",
            ini_dir.to_string_lossy().as_ref(),
            "--out-dir",
            out_dir.to_string_lossy().as_ref(),
        ])
        .status()
        .unwrap();

    assert!(status.success());

    for n in 0..11u64 {
        assert!(frames_dir.join(format!("frame{n}.json")).is_file());
        assert!(ini_dir.join(format!("frame{n}.ini")).is_file());
    }

    let ini0 = std::fs::read_to_string(ini_dir.join("frame0.ini")).unwrap();
    assert!(ini0.contains("frame0.json"));
    assert!(ini0.contains("frame0.png"));
    assert!(ini0.contains("width = 1024"));
    assert!(ini0.contains("shadows = false"));
}
