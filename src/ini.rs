use std::path::Path;

use anyhow::Context as _;

use crate::error::{RaybatchError, RaybatchResult};

/// The renderer's per-frame config block. One immutable template per run;
/// `render` substitutes the two IO paths and leaves every other line constant
/// across frames.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IniTemplate {
    pub width: u32,
    pub height: u32,
    pub shadows: bool,
    pub reflect: bool,
    pub refract: bool,
    pub texture: bool,
    pub parallel: bool,
    pub super_sample: bool,
    pub num_samples: u32,
    pub post_process: bool,
    pub acceleration: bool,
    pub depth_of_field: bool,
}

impl Default for IniTemplate {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            shadows: false,
            reflect: false,
            refract: false,
            texture: false,
            parallel: false,
            super_sample: false,
            num_samples: 1,
            post_process: false,
            acceleration: false,
            depth_of_field: false,
        }
    }
}

impl IniTemplate {
    pub fn validate(&self) -> RaybatchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RaybatchError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if self.num_samples == 0 {
            return Err(RaybatchError::validation("num-samples must be >= 1"));
        }
        Ok(())
    }

    /// Pure substitution: produces the full block with the given scene and
    /// output paths spliced into the IO section.
    pub fn render(&self, scene_path: &Path, output_path: &Path) -> String {
        let mut out = String::new();
        out.push_str("[IO]\n");
        out.push_str(&format!("    scene = {}\n", scene_path.display()));
        out.push_str(&format!("    output = {}\n", output_path.display()));
        out.push('\n');
        out.push_str("[Canvas]\n");
        out.push_str(&format!("    width = {}\n", self.width));
        out.push_str(&format!("    height = {}\n", self.height));
        out.push('\n');
        out.push_str("[Feature]\n");
        out.push_str(&format!("    shadows = {}\n", self.shadows));
        out.push_str(&format!("    reflect = {}\n", self.reflect));
        out.push_str(&format!("    refract = {}\n", self.refract));
        out.push_str(&format!("    texture = {}\n", self.texture));
        out.push_str(&format!("    parallel = {}\n", self.parallel));
        out.push_str(&format!("    super-sample = {}\n", self.super_sample));
        out.push_str(&format!("    num-samples = {}\n", self.num_samples));
        out.push_str(&format!("    post-process = {}\n", self.post_process));
        out.push_str(&format!("    acceleration = {}\n", self.acceleration));
        out.push_str(&format!("    depthoffield = {}\n", self.depth_of_field));
        out
    }
}

/// Writes the block, overwriting any existing file. A missing parent
/// directory propagates as an I/O error with the target path attached.
pub fn write_ini(path: &Path, text: &str) -> RaybatchResult<()> {
    std::fs::write(path, text).with_context(|| format!("write ini '{}'", path.display()))?;
    Ok(())
}
