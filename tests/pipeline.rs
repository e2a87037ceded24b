use std::path::{Path, PathBuf};

use raybatch::{
    FieldPath, FrameIndex, IniTemplate, MutateSpec, MutateTargets, RenderStatus, Renderer,
    RunConfig, SceneDoc,
};

fn write_scene(dir: &Path) -> PathBuf {
    let scene = serde_json::json!({
        "name": "root",
        "cameraData": {
            "position": [5.0, 2.0, 0.0],
            "focus": [0.0, 0.0, 0.0],
            "up": [0.0, 1.0, 0.0]
        },
        "groups": [
            { "name": "floor", "translate": [0.0, 0.0, 0.0] },
            { "groups": [ { "translate": [0.0, 3.0, 0.0], "rotate": [0.0, 1.0, 0.0, 0.0] } ] },
            { "groups": [
                { "translate": [1.0, 1.0, 0.0] },
                { "translate": [-1.0, 1.0, 0.0] },
                { "translate": [0.0, 1.0, 1.0] }
            ] }
        ]
    });

    let path = dir.join("scene.json");
    std::fs::write(&path, serde_json::to_vec(&scene).unwrap()).unwrap();
    path
}

fn config(root: &Path, spec: MutateSpec, renderer: Option<Renderer>) -> RunConfig {
    let template = IniTemplate {
        shadows: spec.shadows,
        ..IniTemplate::default()
    };
    RunConfig {
        scene_path: write_scene(root),
        frames_dir: root.join("jsonFrames"),
        ini_dir: root.join("iniFrames"),
        out_dir: root.join("outputFrames"),
        renderer,
        frames: 11,
        seed: 1,
        spec,
        targets: MutateTargets::default(),
        template,
    }
}

#[test]
fn emit_writes_eleven_scene_and_ini_files() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), MutateSpec::fall(), None);

    let report = raybatch::run(&cfg).unwrap();
    assert!(report.outcomes.is_empty());

    let template_lines: Vec<String> = cfg
        .template
        .render(&PathBuf::from("x.json"), &PathBuf::from("x.png"))
        .lines()
        .map(str::to_string)
        .collect();

    for n in 0..11u64 {
        let json = cfg.frames_dir.join(format!("frame{n}.json"));
        let ini = cfg.ini_dir.join(format!("frame{n}.ini"));
        assert!(json.is_file(), "missing {}", json.display());
        assert!(ini.is_file(), "missing {}", ini.display());

        let text = std::fs::read_to_string(&ini).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), template_lines.len());
        for (i, line) in lines.iter().enumerate() {
            match i {
                1 => {
                    assert!(line.starts_with("    scene = "));
                    assert!(line.ends_with(&format!("frame{n}.json")));
                }
                2 => {
                    assert!(line.starts_with("    output = "));
                    assert!(line.ends_with(&format!("frame{n}.png")));
                }
                _ => assert_eq!(*line, template_lines[i], "line {i} of frame{n}.ini drifted"),
            }
        }
    }

    assert!(!cfg.frames_dir.join("frame11.json").exists());
}

#[test]
fn fall_frame_n_is_initial_minus_n_steps() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), MutateSpec::fall(), None);
    raybatch::run(&cfg).unwrap();

    let y: FieldPath = "groups.1.groups.0.translate.1".parse().unwrap();
    for n in [0u64, 5, 10] {
        let doc = SceneDoc::load(&cfg.frames_dir.join(format!("frame{n}.json"))).unwrap();
        let expected = 3.0 - n as f64 * 0.2;
        let got = doc.get_f64(&y).unwrap();
        assert!(
            (got - expected).abs() < 1e-9,
            "frame{n}: got {got}, expected {expected}"
        );
    }
}

#[test]
fn plunge_runs_with_same_seed_are_byte_identical() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let cfg_a = config(dir_a.path(), MutateSpec::plunge(), None);
    let cfg_b = config(dir_b.path(), MutateSpec::plunge(), None);

    raybatch::run(&cfg_a).unwrap();
    raybatch::run(&cfg_b).unwrap();

    for n in 0..11u64 {
        let a = std::fs::read(cfg_a.frames_dir.join(format!("frame{n}.json"))).unwrap();
        let b = std::fs::read(cfg_b.frames_dir.join(format!("frame{n}.json"))).unwrap();
        assert_eq!(a, b, "frame{n} differs between identically seeded runs");
    }
}

#[test]
fn unspawnable_renderer_still_emits_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        dir.path(),
        MutateSpec::fall(),
        Some(Renderer::new("/no/such/renderer")),
    );

    // Every invocation fails, so the run reports an error...
    let err = raybatch::run(&cfg).unwrap_err();
    assert!(err.to_string().contains("all 11 render invocations failed"));

    // ...but every frame was still attempted and its inputs written.
    for n in 0..11u64 {
        assert!(cfg.frames_dir.join(format!("frame{n}.json")).is_file());
        assert!(cfg.ini_dir.join(format!("frame{n}.ini")).is_file());
    }
}

#[cfg(unix)]
#[test]
fn failing_frame_does_not_stop_the_batch() {
    use std::os::unix::fs::PermissionsExt as _;

    let dir = tempfile::tempdir().unwrap();

    // Renderer stand-in that fails only for frame 3.
    let exe = dir.path().join("fake-renderer.sh");
    std::fs::write(
        &exe,
        "#!/bin/sh\ncase \"$1\" in *frame3.ini) echo 'frame 3 exploded' >&2; exit 2;; esac\nexit 0\n",
    )
    .unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

    let cfg = config(dir.path(), MutateSpec::fall(), Some(Renderer::new(&exe)));
    let report = raybatch::run(&cfg).unwrap();

    assert_eq!(report.outcomes.len(), 11);
    assert_eq!(report.failed_count(), 1);

    let failed = report.failed().next().unwrap();
    assert_eq!(failed.frame, FrameIndex(3));
    assert_eq!(failed.status, RenderStatus::Failed(Some(2)));
    assert!(failed.stderr.contains("frame 3 exploded"));

    // Frames after the failure were still attempted.
    assert!(report.outcomes[4..].iter().all(|o| o.status.is_ok()));
}

#[test]
fn zero_frames_is_rejected_up_front() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), MutateSpec::fall(), None);
    cfg.frames = 0;
    assert!(raybatch::run(&cfg).is_err());
}

#[test]
fn missing_scene_file_is_rejected_up_front() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), MutateSpec::fall(), None);
    cfg.scene_path = dir.path().join("nope.json");
    let err = raybatch::run(&cfg).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}
