use crate::{
    core::FrameIndex,
    error::RaybatchResult,
    scene::{FieldPath, SceneDoc},
};

#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// Field paths the mutator touches. Everything else in the document is
/// opaque pass-through.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MutateTargets {
    /// Group holding the falling object; must have `translate` (vec3) and,
    /// when spin is enabled, `rotate` ([axis_x, axis_y, axis_z, angle_deg]).
    pub object: FieldPath,
    /// Camera block with `position` and `focus` vec3 fields.
    pub camera: FieldPath,
    /// Group whose `groups` children each carry a `translate` to scatter.
    pub cards: FieldPath,
}

impl Default for MutateTargets {
    fn default() -> Self {
        Self {
            object: FieldPath::new().key("groups").index(1).key("groups").index(0),
            camera: FieldPath::new().key("cameraData"),
            cards: FieldPath::new().key("groups").index(2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpinSpec {
    pub amp: f64,
    pub freq: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrbitSpec {
    /// Azimuth advance per frame, radians.
    pub step: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScatterSpec {
    pub amp: f64,
}

/// Per-frame update tuning. The two presets correspond to the two observed
/// animation styles: a plain linear fall, and a faster fall with object spin,
/// camera orbit, and a random card scatter.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MutateSpec {
    /// Subtracted from the object's vertical translation each frame.
    pub fall_step: f64,
    pub spin: Option<SpinSpec>,
    pub orbit: Option<OrbitSpec>,
    pub scatter: Option<ScatterSpec>,
    /// Forwarded into the renderer config's Feature section.
    pub shadows: bool,
}

impl MutateSpec {
    pub fn fall() -> Self {
        Self {
            fall_step: 0.2,
            spin: None,
            orbit: None,
            scatter: None,
            shadows: false,
        }
    }

    pub fn plunge() -> Self {
        Self {
            fall_step: 0.5,
            spin: Some(SpinSpec {
                amp: 4.0,
                freq: 0.35,
            }),
            orbit: Some(OrbitSpec { step: 0.12 }),
            scatter: Some(ScatterSpec { amp: 0.3 }),
            shadows: true,
        }
    }
}

/// Applies one frame's worth of updates to the scene document. The document
/// accumulates across frames; frame N's state is the cumulative effect of all
/// prior applies, never a fresh computation from the index alone.
pub struct FrameMutator {
    spec: MutateSpec,
    targets: MutateTargets,
    // Initialized lazily from the camera's starting azimuth so the first
    // orbit step continues smoothly from wherever the scene put the camera.
    orbit_angle: Option<f64>,
    rng: Rng64,
}

impl FrameMutator {
    pub fn new(spec: MutateSpec, targets: MutateTargets, seed: u64) -> Self {
        Self {
            spec,
            targets,
            orbit_angle: None,
            rng: Rng64::new(seed),
        }
    }

    pub fn apply(&mut self, scene: &mut SceneDoc, frame: FrameIndex) -> RaybatchResult<()> {
        let translate_y = self.targets.object.clone().key("translate").index(1);
        scene.add_f64(&translate_y, -self.spec.fall_step)?;

        if let Some(spin) = self.spec.spin {
            let angle = self.targets.object.clone().key("rotate").index(3);
            scene.add_f64(&angle, spin.amp * (spin.freq * frame.0 as f64).sin())?;
        }

        if let Some(orbit) = self.spec.orbit {
            self.orbit_camera(scene, orbit)?;
        }

        if let Some(scatter) = self.spec.scatter {
            self.scatter_cards(scene, scatter)?;
        }

        Ok(())
    }

    fn orbit_camera(&mut self, scene: &mut SceneDoc, orbit: OrbitSpec) -> RaybatchResult<()> {
        let pos_path = self.targets.camera.clone().key("position");
        let focus_path = self.targets.camera.clone().key("focus");
        let pos = scene.vec3(&pos_path)?;
        let focus = scene.vec3(&focus_path)?;

        let dx = pos[0] - focus[0];
        let dz = pos[2] - focus[2];
        let radius = (dx * dx + dz * dz).sqrt();

        let angle = self.orbit_angle.get_or_insert_with(|| dz.atan2(dx));
        *angle += orbit.step;

        // Circle in the xz plane around the focus; height preserved.
        scene.set_vec3(
            &pos_path,
            [
                focus[0] + radius * angle.cos(),
                pos[1],
                focus[2] + radius * angle.sin(),
            ],
        )
    }

    fn scatter_cards(&mut self, scene: &mut SceneDoc, scatter: ScatterSpec) -> RaybatchResult<()> {
        // One velocity per frame, broadcast to every card. Axis 1 is biased
        // downward so the cards drift with the fall.
        let v = [
            (self.rng.next_f64_01() - 0.5) * scatter.amp,
            -self.rng.next_f64_01() * scatter.amp,
            (self.rng.next_f64_01() - 0.5) * scatter.amp,
        ];

        let children = self.targets.cards.clone().key("groups");
        let count = scene.array_len(&children)?;
        for i in 0..count {
            let t = children.clone().index(i).key("translate");
            let cur = scene.vec3(&t)?;
            scene.set_vec3(&t, [cur[0] + v[0], cur[1] + v[1], cur[2] + v[2]])?;
        }
        Ok(())
    }
}
