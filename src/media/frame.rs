//! Planar YUV frame view handed from the decoder to the renderer

use ffmpeg_next::format::Pixel;
use ffmpeg_next::util::color;
use ffmpeg_next::frame;

/// YCbCr to RGB conversion matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMatrix {
    /// ITU-R BT.601 (SD)
    Bt601,
    /// ITU-R BT.709 (HD)
    Bt709,
}

impl ColorMatrix {
    /// Pick the matrix from stream metadata, guessing by height when unspecified
    pub fn from_space(space: color::Space, height: u32) -> Self {
        match space {
            color::Space::BT709 => ColorMatrix::Bt709,
            color::Space::Unspecified if height >= 720 => ColorMatrix::Bt709,
            _ => ColorMatrix::Bt601,
        }
    }
}

/// Quantization range of the luma and chroma samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRange {
    /// 16..235 luma, 16..240 chroma
    Limited,
    /// 0..255 for every plane
    Full,
}

impl ColorRange {
    pub fn from_range(range: color::Range, format: Pixel) -> Self {
        match (range, format) {
            (color::Range::JPEG, _) | (_, Pixel::YUVJ420P) => ColorRange::Full,
            _ => ColorRange::Limited,
        }
    }
}

/// One image plane: rows of `width` samples spaced `stride` bytes apart
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    pub data: &'a [u8],
    pub stride: usize,
    pub width: u32,
    pub height: u32,
}

impl Plane<'_> {
    /// Bytes the last row needs; a plane is valid when `data` covers
    /// `stride * (height - 1) + width`
    pub fn required_len(&self) -> usize {
        if self.height == 0 {
            return 0;
        }
        self.stride * (self.height as usize - 1) + self.width as usize
    }
}

/// A decoded picture in planar 4:2:0 layout (Y, U, V)
#[derive(Debug, Clone, Copy)]
pub struct YuvFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub planes: [Plane<'a>; 3],
    /// Presentation timestamp in stream time-base units
    pub pts: Option<i64>,
    /// FFmpeg's heuristic presentation time, used for pacing
    pub best_effort_timestamp: Option<i64>,
    pub matrix: ColorMatrix,
    pub range: ColorRange,
}

/// Size of a 4:2:0 chroma plane for a luma plane of `width` x `height`
pub fn chroma_extent(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(2), height.div_ceil(2))
}

/// Whether frames of this format can be uploaded without conversion
pub fn is_planar_420(format: Pixel) -> bool {
    matches!(format, Pixel::YUV420P | Pixel::YUVJ420P)
}

impl<'a> YuvFrame<'a> {
    /// Borrow the planes of `picture`, taking timestamps and colour
    /// metadata from `metadata`
    ///
    /// `picture` must be planar 4:2:0. `metadata` is the frame as it left the
    /// decoder, which differs from `picture` when a pixel format conversion
    /// ran in between.
    pub fn from_video(picture: &'a frame::Video, metadata: &frame::Video) -> Self {
        let width = picture.width();
        let height = picture.height();
        let (chroma_width, chroma_height) = chroma_extent(width, height);

        let plane = |index: usize, width: u32, height: u32| Plane {
            data: picture.data(index),
            stride: picture.stride(index),
            width,
            height,
        };

        Self {
            width,
            height,
            planes: [
                plane(0, width, height),
                plane(1, chroma_width, chroma_height),
                plane(2, chroma_width, chroma_height),
            ],
            pts: metadata.pts(),
            best_effort_timestamp: metadata.timestamp(),
            matrix: ColorMatrix::from_space(metadata.color_space(), height),
            range: ColorRange::from_range(metadata.color_range(), metadata.format()),
        }
    }

    /// Timestamp used for seeking: the PTS when present, else the best effort
    pub fn position(&self) -> Option<i64> {
        self.pts.or(self.best_effort_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chroma_extent_rounds_up() {
        assert_eq!(chroma_extent(800, 600), (400, 300));
        assert_eq!(chroma_extent(17, 9), (9, 5));
        assert_eq!(chroma_extent(1, 1), (1, 1));
    }

    #[test]
    fn test_matrix_from_space() {
        assert_eq!(ColorMatrix::from_space(color::Space::BT709, 480), ColorMatrix::Bt709);
        assert_eq!(ColorMatrix::from_space(color::Space::BT470BG, 1080), ColorMatrix::Bt601);
        assert_eq!(ColorMatrix::from_space(color::Space::Unspecified, 1080), ColorMatrix::Bt709);
        assert_eq!(ColorMatrix::from_space(color::Space::Unspecified, 576), ColorMatrix::Bt601);
    }

    #[test]
    fn test_range_from_metadata() {
        assert_eq!(ColorRange::from_range(color::Range::JPEG, Pixel::YUV420P), ColorRange::Full);
        assert_eq!(ColorRange::from_range(color::Range::Unspecified, Pixel::YUVJ420P), ColorRange::Full);
        assert_eq!(ColorRange::from_range(color::Range::MPEG, Pixel::YUV420P), ColorRange::Limited);
    }

    #[test]
    fn test_plane_required_len() {
        let data = [0u8; 64];
        let plane = Plane { data: &data, stride: 32, width: 20, height: 2 };
        assert_eq!(plane.required_len(), 52);

        let empty = Plane { data: &data, stride: 32, width: 20, height: 0 };
        assert_eq!(empty.required_len(), 0);
    }

    #[test]
    fn test_only_420_passes_through() {
        assert!(is_planar_420(Pixel::YUV420P));
        assert!(is_planar_420(Pixel::YUVJ420P));
        assert!(!is_planar_420(Pixel::YUV444P));
        assert!(!is_planar_420(Pixel::NV12));
    }
}
