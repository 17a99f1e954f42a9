//! YCbCr to RGB conversion parameters for the fragment shader

use crate::media::{ColorMatrix, ColorRange};

/// Colour conversion uniform, matching `ColorParams` in `yuv_quad.wgsl`
///
/// Each row turns `(y, u, v, 1)` sampled in 0..1 into one RGB channel with a
/// single dot product; range offsets are folded into the fourth column.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorParams {
    /// R, G and B rows
    pub rows: [[f32; 4]; 3],
    /// x: 1.0 when the render target re-encodes to sRGB
    pub flags: [f32; 4],
}

impl ColorParams {
    pub fn new(matrix: ColorMatrix, range: ColorRange, srgb_target: bool) -> Self {
        let (kr, kb) = match matrix {
            ColorMatrix::Bt601 => (0.299_f32, 0.114_f32),
            ColorMatrix::Bt709 => (0.2126, 0.0722),
        };
        let kg = 1.0 - kr - kb;

        // (offset, scale) applied to luma and to chroma before the matrix
        let ((y_offset, y_scale), (c_offset, c_scale)) = match range {
            ColorRange::Limited => ((16.0 / 255.0, 255.0 / 219.0), (128.0 / 255.0, 255.0 / 224.0)),
            ColorRange::Full => ((0.0, 1.0), (128.0 / 255.0, 1.0)),
        };

        let coefficients = [
            [1.0, 0.0, 2.0 * (1.0 - kr)],
            [1.0, -2.0 * kb * (1.0 - kb) / kg, -2.0 * kr * (1.0 - kr) / kg],
            [1.0, 2.0 * (1.0 - kb), 0.0],
        ];

        let rows = coefficients.map(|[cy, cu, cv]| {
            let y = cy * y_scale;
            let u = cu * c_scale;
            let v = cv * c_scale;
            [y, u, v, -(y * y_offset + u * c_offset + v * c_offset)]
        });

        Self {
            rows,
            flags: [if srgb_target { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    /// CPU version of the shader's conversion, before clamping
    pub fn to_rgb(&self, y: f32, u: f32, v: f32) -> [f32; 3] {
        self.rows
            .map(|[ry, ru, rv, rc]| ry * y + ru * u + rv * v + rc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-4, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_uniform_is_64_bytes() {
        assert_eq!(std::mem::size_of::<ColorParams>(), 64);
    }

    #[test]
    fn test_limited_range_black_and_white() {
        let grey = 128.0 / 255.0;
        for matrix in [ColorMatrix::Bt601, ColorMatrix::Bt709] {
            let params = ColorParams::new(matrix, ColorRange::Limited, false);
            assert_rgb(params.to_rgb(16.0 / 255.0, grey, grey), [0.0, 0.0, 0.0]);
            assert_rgb(params.to_rgb(235.0 / 255.0, grey, grey), [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn test_full_range_black_and_white() {
        let grey = 128.0 / 255.0;
        let params = ColorParams::new(ColorMatrix::Bt709, ColorRange::Full, false);
        assert_rgb(params.to_rgb(0.0, grey, grey), [0.0, 0.0, 0.0]);
        assert_rgb(params.to_rgb(1.0, grey, grey), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_bt601_full_range_red() {
        // Pure red in BT.601 full range: Y = 0.299, Cb = -0.1687, Cr = 0.5
        let params = ColorParams::new(ColorMatrix::Bt601, ColorRange::Full, false);
        let offset = 128.0 / 255.0;
        let rgb = params.to_rgb(0.299, offset - 0.168736, offset + 0.5);
        assert_rgb(rgb, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_srgb_flag() {
        let params = ColorParams::new(ColorMatrix::Bt601, ColorRange::Limited, true);
        assert_eq!(params.flags[0], 1.0);
        let params = ColorParams::new(ColorMatrix::Bt601, ColorRange::Limited, false);
        assert_eq!(params.flags[0], 0.0);
    }
}
