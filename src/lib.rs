#![forbid(unsafe_code)]

pub mod core;
pub mod error;
pub mod ini;
pub mod invoke;
pub mod mutate;
pub mod pipeline;
pub mod scene;

pub use core::{FrameIndex, FrameRange};
pub use error::{RaybatchError, RaybatchResult};
pub use ini::IniTemplate;
pub use invoke::{FrameOutcome, RenderStatus, Renderer};
pub use mutate::{FrameMutator, MutateSpec, MutateTargets};
pub use pipeline::{RunConfig, RunReport, run};
pub use scene::{FieldPath, SceneDoc};
