use glam::{Vec2, Vec4};

use super::depth_pack::{unpack_unit_depth, PackedDepth};
use crate::error::{Result, ShadeError};

/// Texture lookup seam for the shadow filter
///
/// Returns the texel at a [0, 1] texture coordinate. Depth textures answer
/// with the stored depth replicated into `xyz` and `w = 1`.
pub trait DepthSampler {
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// CPU depth texture: nearest sampling, clamp-to-edge addressing
///
/// Texels are stored row-major, row 0 at `v = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthMap {
    width: u32,
    height: u32,
    depths: Vec<f32>,
}

impl DepthMap {
    /// Map with every texel set to `depth`
    pub fn filled(width: u32, height: u32, depth: f32) -> Result<Self> {
        check_extent(width, height)?;
        Ok(Self {
            width,
            height,
            depths: vec![depth; width as usize * height as usize],
        })
    }

    /// Map from raw depth-attachment values in [0, 1]
    pub fn from_depths(width: u32, height: u32, depths: Vec<f32>) -> Result<Self> {
        check_extent(width, height)?;
        check_len(width, height, depths.len())?;
        Ok(Self {
            width,
            height,
            depths,
        })
    }

    /// Map from the output of a depth pass, decoding each packed sample
    pub fn from_packed(width: u32, height: u32, packed: &[PackedDepth]) -> Result<Self> {
        check_extent(width, height)?;
        check_len(width, height, packed.len())?;
        Ok(Self {
            width,
            height,
            depths: packed.iter().copied().map(unpack_unit_depth).collect(),
        })
    }

    /// Map from a tightly packed RGBA8 color target written by a depth pass
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        check_extent(width, height)?;
        let texels: &[[u8; 4]] =
            bytemuck::try_cast_slice(bytes).map_err(|_| ShadeError::DepthMapSize {
                width,
                height,
                expected: width as usize * height as usize * 4,
                actual: bytes.len(),
            })?;
        check_len(width, height, texels.len())?;
        Ok(Self {
            width,
            height,
            depths: texels
                .iter()
                .map(|&texel| unpack_unit_depth(PackedDepth::from_rgba8(texel)))
                .collect(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of one texel in texture coordinates (`1/width`, `1/height`)
    #[inline]
    pub fn texel_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    /// Stored depth at integer texel coordinates, `None` outside the map
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.depths
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    fn texel_index(&self, uv: Vec2) -> usize {
        // `as` saturates and maps NaN to 0
        let x = ((uv.x * self.width as f32).floor() as i64).clamp(0, self.width as i64 - 1);
        let y = ((uv.y * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1);
        y as usize * self.width as usize + x as usize
    }
}

impl DepthSampler for DepthMap {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let depth = self.depths[self.texel_index(uv)];
        Vec4::new(depth, depth, depth, 1.0)
    }
}

fn check_extent(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ShadeError::EmptyDepthMap { width, height });
    }
    Ok(())
}

fn check_len(width: u32, height: u32, actual: usize) -> Result<()> {
    let expected = width as usize * height as usize;
    if actual != expected {
        return Err(ShadeError::DepthMapSize {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::pack_unit_depth;

    fn gradient() -> DepthMap {
        // 2x2: row 0 = [0.1, 0.2], row 1 = [0.3, 0.4]
        DepthMap::from_depths(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap()
    }

    #[test]
    fn test_nearest_sampling() {
        let map = gradient();
        assert_eq!(map.sample(Vec2::new(0.25, 0.25)).x, 0.1);
        assert_eq!(map.sample(Vec2::new(0.75, 0.25)).x, 0.2);
        assert_eq!(map.sample(Vec2::new(0.25, 0.75)).x, 0.3);
        assert_eq!(map.sample(Vec2::new(0.75, 0.75)), Vec4::new(0.4, 0.4, 0.4, 1.0));
    }

    #[test]
    fn test_clamp_to_edge() {
        let map = gradient();
        assert_eq!(map.sample(Vec2::new(-3.0, -0.01)).x, 0.1);
        assert_eq!(map.sample(Vec2::new(1.0, 0.0)).x, 0.2);
        assert_eq!(map.sample(Vec2::new(5.0, 5.0)).x, 0.4);
        assert_eq!(map.sample(Vec2::new(f32::NAN, f32::NAN)).x, 0.1);
    }

    #[test]
    fn test_texel_size() {
        let map = DepthMap::filled(512, 256, 1.0).unwrap();
        assert_eq!(map.texel_size(), Vec2::new(1.0 / 512.0, 1.0 / 256.0));
        assert_eq!(map.depth_at(511, 255), Some(1.0));
        assert_eq!(map.depth_at(512, 0), None);
    }

    #[test]
    fn test_size_errors() {
        assert_eq!(
            DepthMap::from_depths(2, 2, vec![0.0; 3]),
            Err(ShadeError::DepthMapSize {
                width: 2,
                height: 2,
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            DepthMap::filled(0, 4, 0.5),
            Err(ShadeError::EmptyDepthMap {
                width: 0,
                height: 4
            })
        );
        assert!(DepthMap::from_rgba8(1, 1, &[0, 0, 0]).is_err());
    }

    #[test]
    fn test_from_packed() {
        let packed: Vec<PackedDepth> = [0.25, 0.5, 0.75, 0.0]
            .into_iter()
            .map(pack_unit_depth)
            .collect();
        let map = DepthMap::from_packed(2, 2, &packed).unwrap();

        assert_eq!(map.depth_at(0, 0), Some(0.25));
        assert_eq!(map.depth_at(1, 1), Some(0.0));
    }

    #[test]
    fn test_from_rgba8() {
        let bytes: Vec<u8> = [0.25f32, 0.5]
            .into_iter()
            .flat_map(|d| pack_unit_depth(d).to_rgba8())
            .collect();
        let map = DepthMap::from_rgba8(2, 1, &bytes).unwrap();

        assert!((map.depth_at(0, 0).unwrap() - 0.25).abs() < 1.0 / 256.0);
        assert!((map.depth_at(1, 0).unwrap() - 0.5).abs() < 1.0 / 256.0);
    }
}
