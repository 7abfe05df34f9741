use crate::core_api::{CoreError, CoreErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &ByteRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionId {
    Header,
    Team(usize),
    Player(usize),
    LogoHigh(usize),
    LogoLow(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    pub range: ByteRange,
}

/// The editable regions of an image, in logical (post-prefix) offsets.
#[derive(Debug, Clone)]
pub struct RomLayout {
    pub rom_len: usize,
    pub regions: Vec<Region>,
}

impl RomLayout {
    pub fn new(rom_len: usize) -> Self {
        Self {
            rom_len,
            regions: Vec::new(),
        }
    }

    pub fn push(&mut self, id: RegionId, range: ByteRange) {
        self.regions.push(Region { id, range });
    }

    /// Every region must fit in the image and no two may share a byte, so
    /// committing one record can never clobber another.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.regions.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                "rom layout must contain at least one region",
            ));
        }

        let mut sorted: Vec<&Region> = self.regions.iter().collect();
        sorted.sort_by_key(|region| region.range.start);

        for region in &sorted {
            if region.range.end > self.rom_len {
                return Err(CoreError::new(
                    CoreErrorCode::Format,
                    format!(
                        "region {:?} ({:#x}..{:#x}) extends past end of image ({:#x})",
                        region.id, region.range.start, region.range.end, self.rom_len
                    ),
                ));
            }
        }

        for pair in sorted.windows(2) {
            if pair[0].range.overlaps(&pair[1].range) {
                return Err(CoreError::new(
                    CoreErrorCode::Format,
                    format!(
                        "region {:?} ({:#x}..{:#x}) overlaps {:?} ({:#x}..{:#x})",
                        pair[0].id,
                        pair[0].range.start,
                        pair[0].range.end,
                        pair[1].id,
                        pair[1].range.start,
                        pair[1].range.end
                    ),
                ));
            }
        }

        Ok(())
    }

    pub fn find(&self, id: RegionId) -> Option<ByteRange> {
        self.regions
            .iter()
            .find(|region| region.id == id)
            .map(|region| region.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overlap_and_out_of_bounds() {
        let mut layout = RomLayout::new(0x100);
        layout.push(RegionId::Team(0), ByteRange::new(0x00, 0x20));
        layout.push(RegionId::Team(1), ByteRange::new(0x20, 0x20));
        assert!(layout.validate().is_ok());
        assert_eq!(layout.find(RegionId::Team(1)), Some(ByteRange::new(0x20, 0x20)));

        layout.push(RegionId::Player(0), ByteRange::new(0x30, 0x18));
        let err = layout.validate().unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Format);
        assert!(err.message.contains("overlaps"));

        let mut layout = RomLayout::new(0x100);
        layout.push(RegionId::LogoLow(3), ByteRange::new(0xF0, 0x60));
        assert!(layout.validate().unwrap_err().message.contains("past end"));
    }
}
