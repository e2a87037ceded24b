use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
    str::FromStr,
};

use anyhow::Context as _;

use crate::error::{RaybatchError, RaybatchResult};

/// One step into the scene document: an object key or an array index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(k) => write!(f, "{k}"),
            Step::Index(n) => write!(f, "{n}"),
        }
    }
}

/// A dotted path into the scene document, e.g. `groups.1.groups.0.translate`.
/// All-digit segments address array elements; everything else is an object key.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(Vec<Step>);

impl FieldPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn key(mut self, k: &str) -> Self {
        self.0.push(Step::Key(k.to_string()));
        self
    }

    pub fn index(mut self, n: usize) -> Self {
        self.0.push(Step::Index(n));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    fn prefix(&self, n: usize) -> String {
        let parts: Vec<String> = self.0[..n].iter().map(|s| s.to_string()).collect();
        parts.join(".")
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix(self.0.len()))
    }
}

impl FromStr for FieldPath {
    type Err = RaybatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut steps = Vec::new();
        for seg in s.split('.') {
            if seg.is_empty() {
                return Err(RaybatchError::validation(format!(
                    "empty segment in field path '{s}'"
                )));
            }
            if seg.bytes().all(|b| b.is_ascii_digit()) {
                let n: usize = seg.parse().map_err(|_| {
                    RaybatchError::validation(format!("index '{seg}' out of range in path '{s}'"))
                })?;
                steps.push(Step::Index(n));
            } else {
                steps.push(Step::Key(seg.to_string()));
            }
        }
        Ok(Self(steps))
    }
}

impl TryFrom<String> for FieldPath {
    type Error = RaybatchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldPath> for String {
    fn from(p: FieldPath) -> Self {
        p.to_string()
    }
}

/// An opaque scene document. Nothing is validated beyond the specific field
/// paths the caller reads or writes; the rest passes through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDoc {
    root: serde_json::Value,
}

impl SceneDoc {
    pub fn new(root: serde_json::Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &serde_json::Value {
        &self.root
    }

    pub fn load(path: &Path) -> RaybatchResult<Self> {
        let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
        let root = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            RaybatchError::serde(format!("parse scene '{}': {e}", path.display()))
        })?;
        Ok(Self { root })
    }

    pub fn save(&self, path: &Path) -> RaybatchResult<()> {
        let f = File::create(path).with_context(|| format!("write scene '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer(&mut w, &self.root).map_err(|e| {
            RaybatchError::serde(format!("serialize scene '{}': {e}", path.display()))
        })?;
        w.flush()
            .with_context(|| format!("flush scene '{}'", path.display()))?;
        Ok(())
    }

    fn resolve(&self, path: &FieldPath) -> RaybatchResult<&serde_json::Value> {
        let mut cur = &self.root;
        for (i, step) in path.steps().iter().enumerate() {
            cur = match step {
                Step::Key(k) => cur.get(k.as_str()),
                Step::Index(n) => cur.get(*n),
            }
            .ok_or_else(|| {
                RaybatchError::structure(format!("missing '{}' in scene", path.prefix(i + 1)))
            })?;
        }
        Ok(cur)
    }

    fn resolve_mut(&mut self, path: &FieldPath) -> RaybatchResult<&mut serde_json::Value> {
        let mut cur = &mut self.root;
        for (i, step) in path.steps().iter().enumerate() {
            cur = match step {
                Step::Key(k) => cur.get_mut(k.as_str()),
                Step::Index(n) => cur.get_mut(*n),
            }
            .ok_or_else(|| {
                RaybatchError::structure(format!("missing '{}' in scene", path.prefix(i + 1)))
            })?;
        }
        Ok(cur)
    }

    pub fn get_f64(&self, path: &FieldPath) -> RaybatchResult<f64> {
        self.resolve(path)?
            .as_f64()
            .ok_or_else(|| RaybatchError::structure(format!("'{path}' is not a number")))
    }

    pub fn set_f64(&mut self, path: &FieldPath, v: f64) -> RaybatchResult<()> {
        let n = serde_json::Number::from_f64(v).ok_or_else(|| {
            RaybatchError::structure(format!("non-finite value {v} for '{path}'"))
        })?;
        let slot = self.resolve_mut(path)?;
        if !slot.is_number() {
            return Err(RaybatchError::structure(format!("'{path}' is not a number")));
        }
        *slot = serde_json::Value::Number(n);
        Ok(())
    }

    /// Read-modify-write of one numeric leaf. Returns the new value.
    pub fn add_f64(&mut self, path: &FieldPath, delta: f64) -> RaybatchResult<f64> {
        let next = self.get_f64(path)? + delta;
        self.set_f64(path, next)?;
        Ok(next)
    }

    pub fn array_len(&self, path: &FieldPath) -> RaybatchResult<usize> {
        self.resolve(path)?
            .as_array()
            .map(Vec::len)
            .ok_or_else(|| RaybatchError::structure(format!("'{path}' is not an array")))
    }

    pub fn vec3(&self, path: &FieldPath) -> RaybatchResult<[f64; 3]> {
        let arr = self
            .resolve(path)?
            .as_array()
            .ok_or_else(|| RaybatchError::structure(format!("'{path}' is not an array")))?;
        if arr.len() != 3 {
            return Err(RaybatchError::structure(format!(
                "'{path}' has {} elements, expected 3",
                arr.len()
            )));
        }
        let mut out = [0.0; 3];
        for (i, v) in arr.iter().enumerate() {
            out[i] = v.as_f64().ok_or_else(|| {
                RaybatchError::structure(format!("'{path}.{i}' is not a number"))
            })?;
        }
        Ok(out)
    }

    pub fn set_vec3(&mut self, path: &FieldPath, v: [f64; 3]) -> RaybatchResult<()> {
        self.vec3(path)?; // shape check before any element is touched
        for i in 0..3 {
            self.set_f64(&path.clone().index(i), v[i])?;
        }
        Ok(())
    }
}
