use crate::error::{RaybatchError, RaybatchResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> RaybatchResult<Self> {
        if start.0 > end.0 {
            return Err(RaybatchError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Per-frame scene file name (`frame<N>.json`).
pub fn scene_file_name(frame: FrameIndex) -> String {
    format!("frame{}.json", frame.0)
}

/// Per-frame renderer config file name (`frame<N>.ini`).
pub fn ini_file_name(frame: FrameIndex) -> String {
    format!("frame{}.ini", frame.0)
}

/// Per-frame image file name the renderer is asked to produce (`frame<N>.png`).
pub fn image_file_name(frame: FrameIndex) -> String {
    format!("frame{}.png", frame.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(FrameRange::new(FrameIndex(3), FrameIndex(1)).is_err());
        assert!(FrameRange::new(FrameIndex(1), FrameIndex(1)).is_ok());
    }

    #[test]
    fn range_iterates_exclusive_end() {
        let r = FrameRange::new(FrameIndex(0), FrameIndex(11)).unwrap();
        let frames: Vec<u64> = r.iter().map(|f| f.0).collect();
        assert_eq!(frames.len(), 11);
        assert_eq!(frames.first(), Some(&0));
        assert_eq!(frames.last(), Some(&10));
        assert!(r.contains(FrameIndex(10)));
        assert!(!r.contains(FrameIndex(11)));
    }

    #[test]
    fn frame_file_names() {
        assert_eq!(scene_file_name(FrameIndex(0)), "frame0.json");
        assert_eq!(ini_file_name(FrameIndex(7)), "frame7.ini");
        assert_eq!(image_file_name(FrameIndex(10)), "frame10.png");
    }
}
