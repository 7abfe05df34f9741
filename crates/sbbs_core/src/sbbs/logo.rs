//! Team logos: six 8x8 4bpp planar tiles, three on top and three below,
//! drawn with a fixed 16-color palette.

use crate::core_api::{CoreError, CoreErrorCode};
use crate::layout::ByteRange;
use crate::rom::Rom;

use super::types::{
    LOGO_BASE, LOGO_GROUP_SIZE, LOGO_HEIGHT, LOGO_LOW_OFFSET, LOGO_PALETTE, LOGO_TEAM_STRIDE,
    LOGO_TEAMS_PER_ROW, LOGO_TILES_PER_GROUP, LOGO_WIDTH, MAX_TEAM_IDX,
};

pub type Rgba = [u8; 4];

pub const TILE_SIZE: usize = 32;
pub const TILE_DIM: usize = 8;

/// Row `r` of a tile keeps bitplanes 0/1 at bytes `2r`/`2r+1` and bitplanes
/// 2/3 at `16+2r`/`17+2r`. The leftmost pixel is the most significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    bytes: [u8; TILE_SIZE],
}

impl Tile {
    pub fn from_bytes(bytes: [u8; TILE_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8; TILE_SIZE] {
        &self.bytes
    }

    fn plane_offsets(y: usize) -> [usize; 4] {
        [2 * y, 2 * y + 1, 16 + 2 * y, 17 + 2 * y]
    }

    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        let shift = 7 - x;
        Self::plane_offsets(y)
            .iter()
            .enumerate()
            .fold(0u8, |acc, (plane, &offset)| {
                acc | (((self.bytes[offset] >> shift) & 1) << plane)
            })
    }

    pub fn set_index(&mut self, x: usize, y: usize, index: u8) {
        let mask = 1u8 << (7 - x);
        for (plane, offset) in Self::plane_offsets(y).into_iter().enumerate() {
            if (index >> plane) & 1 != 0 {
                self.bytes[offset] |= mask;
            } else {
                self.bytes[offset] &= !mask;
            }
        }
    }

    /// All 64 palette indices, row-major.
    pub fn indices(&self) -> [u8; TILE_DIM * TILE_DIM] {
        let mut out = [0u8; TILE_DIM * TILE_DIM];
        for (i, px) in out.iter_mut().enumerate() {
            *px = self.index_at(i % TILE_DIM, i / TILE_DIM);
        }
        out
    }
}

/// Pick the palette entry closest to `color`. Anything not fully opaque maps
/// to the transparent entry; on equal distance the later entry wins.
pub fn nearest_palette_index(color: Rgba, palette: &[Rgba; 16]) -> u8 {
    if color[3] != 0xFF {
        return 0;
    }
    let mut best = 0u8;
    let mut best_dist = u32::MAX;
    for (idx, entry) in palette.iter().enumerate() {
        let dist: u32 = (0..3)
            .map(|c| {
                let d = i32::from(color[c]) - i32::from(entry[c]);
                (d * d) as u32
            })
            .sum();
        if dist <= best_dist {
            best_dist = dist;
            best = idx as u8;
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width * height],
        }
    }

    /// Build from tightly packed RGBA bytes.
    pub fn from_rgba(width: usize, height: usize, data: &[u8]) -> Result<Self, CoreError> {
        if data.len() != width * height * 4 {
            return Err(CoreError::new(
                CoreErrorCode::Encoding,
                format!(
                    "{} bytes of RGBA data for a {width}x{height} bitmap, expected {}",
                    data.len(),
                    width * height * 4
                ),
            ));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        self.pixels[y * self.width + x] = color;
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLogo {
    team: usize,
    high: [Tile; LOGO_TILES_PER_GROUP],
    low: [Tile; LOGO_TILES_PER_GROUP],
}

pub fn logo_high_offset(team: usize) -> Result<usize, CoreError> {
    if team > MAX_TEAM_IDX {
        return Err(CoreError::new(
            CoreErrorCode::Range,
            format!("team index {team} is bigger than max team index {MAX_TEAM_IDX}"),
        ));
    }
    Ok(LOGO_BASE
        + LOGO_TEAM_STRIDE * (team % LOGO_TEAMS_PER_ROW)
        + LOGO_GROUP_SIZE * (team / LOGO_TEAMS_PER_ROW))
}

pub fn logo_low_offset(team: usize) -> Result<usize, CoreError> {
    Ok(logo_high_offset(team)? + LOGO_LOW_OFFSET)
}

pub fn logo_ranges(team: usize) -> Result<(ByteRange, ByteRange), CoreError> {
    Ok((
        ByteRange::new(logo_high_offset(team)?, LOGO_GROUP_SIZE),
        ByteRange::new(logo_low_offset(team)?, LOGO_GROUP_SIZE),
    ))
}

impl TeamLogo {
    pub fn decode(rom: &Rom, team: usize) -> Result<Self, CoreError> {
        let reader = rom.reader();
        let read_group = |base: usize| -> Result<[Tile; LOGO_TILES_PER_GROUP], CoreError> {
            let mut tiles = [Tile::from_bytes([0; TILE_SIZE]); LOGO_TILES_PER_GROUP];
            for (i, tile) in tiles.iter_mut().enumerate() {
                *tile = Tile::from_bytes(reader.read_array(base + i * TILE_SIZE)?);
            }
            Ok(tiles)
        };
        Ok(Self {
            team,
            high: read_group(logo_high_offset(team)?)?,
            low: read_group(logo_low_offset(team)?)?,
        })
    }

    pub fn team(&self) -> usize {
        self.team
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.high.iter().chain(self.low.iter())
    }

    fn tile_at(&self, x: usize, y: usize) -> (&Tile, usize, usize) {
        let group = if y < TILE_DIM { &self.high } else { &self.low };
        (&group[x / TILE_DIM], x % TILE_DIM, y % TILE_DIM)
    }

    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        let (tile, tx, ty) = self.tile_at(x, y);
        tile.index_at(tx, ty)
    }

    pub fn to_bitmap(&self) -> Bitmap {
        let mut bitmap = Bitmap::new(LOGO_WIDTH, LOGO_HEIGHT);
        for y in 0..LOGO_HEIGHT {
            for x in 0..LOGO_WIDTH {
                bitmap.set(x, y, LOGO_PALETTE[usize::from(self.index_at(x, y))]);
            }
        }
        bitmap
    }

    /// Quantize `bitmap` onto the palette and replace every tile. Nothing
    /// changes unless the bitmap is exactly logo sized.
    pub fn apply_bitmap(&mut self, bitmap: &Bitmap) -> Result<(), CoreError> {
        if bitmap.width() != LOGO_WIDTH || bitmap.height() != LOGO_HEIGHT {
            return Err(CoreError::new(
                CoreErrorCode::Encoding,
                format!(
                    "logo must be {LOGO_WIDTH}x{LOGO_HEIGHT}, got {}x{}",
                    bitmap.width(),
                    bitmap.height()
                ),
            ));
        }
        for y in 0..LOGO_HEIGHT {
            for x in 0..LOGO_WIDTH {
                let index = nearest_palette_index(bitmap.get(x, y), &LOGO_PALETTE);
                let group = if y < TILE_DIM {
                    &mut self.high
                } else {
                    &mut self.low
                };
                group[x / TILE_DIM].set_index(x % TILE_DIM, y % TILE_DIM, index);
            }
        }
        Ok(())
    }

    pub fn commit(&self, rom: &mut Rom) -> Result<(), CoreError> {
        let high: Vec<u8> = self.high.iter().flat_map(|t| *t.bytes()).collect();
        let low: Vec<u8> = self.low.iter().flat_map(|t| *t.bytes()).collect();
        let high_offset = logo_high_offset(self.team)?;
        let low_offset = logo_low_offset(self.team)?;
        // Both groups are range-checked before either is written.
        rom.read(high_offset, high.len())?;
        rom.read(low_offset, low.len())?;
        rom.write(high_offset, &high)?;
        rom.write(low_offset, &low)?;
        tracing::trace!("committed logo for team {}", self.team);
        Ok(())
    }
}
