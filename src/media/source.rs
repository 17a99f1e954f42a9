//! Video source backed by an FFmpeg demuxer and decoder
//!
//! Owns the container context, the decoder of the first video stream and
//! one reusable packet and frame. Frames that are not planar 4:2:0 are
//! converted to YUV420P before they are handed out.

use std::os::raw::c_int;
use std::path::Path;

use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling;
use ffmpeg_next::{codec, decoder, ffi, frame, media, Packet, Rational};

use super::frame::{is_planar_420, YuvFrame};
use super::timing::{self, SeekDirection};
use super::MediaError;

/// Metadata of the selected video stream
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamInfo {
    /// Index of the stream in the container
    pub index: usize,
    /// Unit of packet and frame timestamps
    pub time_base: Rational,
    /// Average frame rate, or the container's guess when unknown
    pub frame_rate: Rational,
    /// First timestamp of the stream, if the container knows it
    pub start_time: Option<i64>,
    pub width: u32,
    pub height: u32,
    pub codec: codec::Id,
}

impl VideoStreamInfo {
    /// One frame in time-base ticks
    pub fn frame_duration(&self) -> i64 {
        timing::frame_duration(self.frame_rate, self.time_base)
    }
}

/// Outcome of reading one packet from the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketStatus {
    /// A packet of the selected video stream is held
    Video,
    /// A packet of some other stream is held
    OtherStream,
    /// Nothing could be read (end of file or a read error)
    Unavailable,
}

/// Demuxer and decoder for the first video stream of a file
///
/// Fields are declared in release order.
pub struct VideoSource {
    /// Reusable decoded-frame buffer
    frame: frame::Video,
    /// Conversion target for non-4:2:0 frames
    converted: frame::Video,
    /// Lazily created pixel format converter
    scaler: Option<scaling::Context>,
    /// Reusable compressed-packet buffer
    packet: Packet,
    decoder: decoder::Video,
    input: ffmpeg_next::format::context::Input,
    stream: VideoStreamInfo,
}

impl VideoSource {
    /// Open `path`, select its first video stream and open a decoder for it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MediaError> {
        super::init()?;

        let path = path.as_ref();
        let input = ffmpeg_next::format::input(&path).map_err(|source| MediaError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let video_stream = input
            .streams()
            .find(|stream| stream.parameters().medium() == media::Type::Video)
            .ok_or(MediaError::NoVideoStream)?;

        let parameters = video_stream.parameters();
        let codec_id = parameters.id();
        let video_codec = decoder::find(codec_id).ok_or(MediaError::UnsupportedCodec(codec_id))?;

        let context =
            codec::context::Context::from_parameters(parameters).map_err(MediaError::DecoderOpen)?;
        let decoder = context
            .decoder()
            .open_as(video_codec)
            .and_then(|opened| opened.video())
            .map_err(MediaError::DecoderOpen)?;

        let avg_frame_rate = video_stream.avg_frame_rate();
        let frame_rate = if avg_frame_rate.numerator() > 0 {
            avg_frame_rate
        } else {
            video_stream.rate()
        };
        let start_time = Some(video_stream.start_time()).filter(|&ts| ts != ffi::AV_NOPTS_VALUE);

        let stream = VideoStreamInfo {
            index: video_stream.index(),
            time_base: video_stream.time_base(),
            frame_rate,
            start_time,
            width: decoder.width(),
            height: decoder.height(),
            codec: codec_id,
        };

        tracing::info!(
            path = %path.display(),
            stream = stream.index,
            codec = ?stream.codec,
            width = stream.width,
            height = stream.height,
            frame_rate = %stream.frame_rate,
            time_base = %stream.time_base,
            "Opened video stream"
        );

        Ok(Self {
            frame: frame::Video::empty(),
            converted: frame::Video::empty(),
            scaler: None,
            packet: Packet::empty(),
            decoder,
            input,
            stream,
        })
    }

    /// Metadata of the selected stream
    pub fn stream(&self) -> &VideoStreamInfo {
        &self.stream
    }

    /// Read the next packet of any stream into the reusable packet buffer
    pub fn read_packet(&mut self) -> PacketStatus {
        match self.packet.read(&mut self.input) {
            Ok(()) if self.packet.stream() == self.stream.index => PacketStatus::Video,
            Ok(()) => PacketStatus::OtherStream,
            Err(ffmpeg_next::Error::Eof) => PacketStatus::Unavailable,
            Err(e) => {
                tracing::trace!("Packet read failed: {}", e);
                PacketStatus::Unavailable
            }
        }
    }

    /// Submit the held packet to the decoder and hand every frame it yields
    /// to `on_frame`
    ///
    /// Decode and conversion failures drop the affected packet or frame.
    pub fn decode_packet(&mut self, on_frame: &mut dyn FnMut(&YuvFrame<'_>)) {
        if let Err(e) = self.decoder.send_packet(&self.packet) {
            tracing::trace!("Decoder rejected packet: {}", e);
            return;
        }

        while self.decoder.receive_frame(&mut self.frame).is_ok() {
            if is_planar_420(self.frame.format()) {
                on_frame(&YuvFrame::from_video(&self.frame, &self.frame));
                continue;
            }

            match convert_to_420(&self.frame, &mut self.scaler, &mut self.converted) {
                Ok(()) => on_frame(&YuvFrame::from_video(&self.converted, &self.frame)),
                Err(e) => tracing::trace!("Dropping frame: {}", e),
            }
        }
    }

    /// Drop the held packet's payload reference so the buffer can be reused
    pub fn release_packet(&mut self) {
        unsafe {
            ffi::av_packet_unref(self.packet.as_mut_ptr());
        }
    }

    /// Seek the selected stream to `target` (time-base units) and flush the
    /// decoder
    ///
    /// Backward seeks land on the nearest keyframe at or before `target`,
    /// clamped to the stream start when it is known.
    pub fn seek(&mut self, target: i64, direction: SeekDirection) -> Result<(), MediaError> {
        let (target, flags) = match direction {
            SeekDirection::Backward => (
                self.stream.start_time.map_or(target, |start| target.max(start)),
                ffi::AVSEEK_FLAG_BACKWARD as c_int,
            ),
            SeekDirection::Forward => (target, 0),
        };

        let ret = unsafe {
            ffi::av_seek_frame(
                self.input.as_mut_ptr(),
                self.stream.index as c_int,
                target,
                flags,
            )
        };
        if ret < 0 {
            return Err(MediaError::Seek(ffmpeg_next::Error::from(ret)));
        }

        self.decoder.flush();
        tracing::debug!(seek_target = target, ?direction, "Seeked");
        Ok(())
    }
}

/// Convert `decoded` into planar 4:2:0, rebuilding the converter when the
/// input format or size changes
fn convert_to_420(
    decoded: &frame::Video,
    scaler: &mut Option<scaling::Context>,
    converted: &mut frame::Video,
) -> Result<(), MediaError> {
    let stale = scaler.as_ref().map_or(true, |ctx| {
        let input = ctx.input();
        input.format != decoded.format()
            || input.width != decoded.width()
            || input.height != decoded.height()
    });

    if stale {
        tracing::debug!(
            format = ?decoded.format(),
            width = decoded.width(),
            height = decoded.height(),
            "Creating YUV420P converter"
        );
        *scaler = Some(
            scaling::Context::get(
                decoded.format(),
                decoded.width(),
                decoded.height(),
                Pixel::YUV420P,
                decoded.width(),
                decoded.height(),
                scaling::Flags::BILINEAR,
            )
            .map_err(MediaError::Scaler)?,
        );
        *converted = frame::Video::empty();
    }

    match scaler.as_mut() {
        Some(ctx) => ctx.run(decoded, converted).map_err(MediaError::Scaler),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CLIP_SIZE: usize = 16;

    /// Write a raw YUV4MPEG2 clip whose luma value encodes the frame number
    fn write_y4m(frames: usize, chroma: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".y4m")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "YUV4MPEG2 W{CLIP_SIZE} H{CLIP_SIZE} F25:1 Ip A1:1 C{chroma}"
        )
        .unwrap();

        let luma = CLIP_SIZE * CLIP_SIZE;
        let chroma_len = match chroma {
            "444" => luma,
            _ => (CLIP_SIZE / 2) * (CLIP_SIZE / 2),
        };
        for index in 0..frames {
            file.write_all(b"FRAME\n").unwrap();
            file.write_all(&vec![(16 + index) as u8; luma]).unwrap();
            file.write_all(&vec![128u8; chroma_len * 2]).unwrap();
        }
        file.flush().unwrap();
        file
    }

    /// Write a short mono 16-bit PCM WAV file
    fn write_wav() -> NamedTempFile {
        let samples = 800u32;
        let data_len = samples * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(bytes.len() + data_len as usize, 0);

        let mut file = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();
        file
    }

    /// Read and decode until `count` frames came out, returning their timestamps
    fn decode_frames(source: &mut VideoSource, count: usize) -> Vec<i64> {
        let mut timestamps = Vec::new();
        while timestamps.len() < count {
            match source.read_packet() {
                PacketStatus::Video => source.decode_packet(&mut |frame| {
                    timestamps.push(frame.position().unwrap());
                }),
                PacketStatus::OtherStream => {}
                PacketStatus::Unavailable => break,
            }
            source.release_packet();
        }
        timestamps
    }

    #[test]
    fn test_open_missing_file() {
        let result = VideoSource::open("/definitely/not/here.mp4");
        assert!(matches!(result, Err(MediaError::Open { .. })));
    }

    #[test]
    fn test_open_audio_only_file() {
        let wav = write_wav();
        let result = VideoSource::open(wav.path());
        assert!(matches!(result, Err(MediaError::NoVideoStream)));
    }

    #[test]
    fn test_open_selects_video_stream() {
        let clip = write_y4m(5, "420jpeg");
        let source = VideoSource::open(clip.path()).unwrap();
        let stream = source.stream();
        assert_eq!(stream.index, 0);
        assert_eq!((stream.width, stream.height), (16, 16));
        assert_eq!(stream.frame_duration(), 1);
    }

    #[test]
    fn test_decodes_every_frame_then_runs_dry() {
        let clip = write_y4m(5, "420jpeg");
        let mut source = VideoSource::open(clip.path()).unwrap();

        let timestamps = decode_frames(&mut source, 10);
        assert_eq!(timestamps, vec![0, 1, 2, 3, 4]);
        assert_eq!(source.read_packet(), PacketStatus::Unavailable);
    }

    #[test]
    fn test_frames_are_planar_420() {
        let clip = write_y4m(1, "420jpeg");
        let mut source = VideoSource::open(clip.path()).unwrap();

        let mut seen = 0;
        assert_eq!(source.read_packet(), PacketStatus::Video);
        source.decode_packet(&mut |frame| {
            assert_eq!((frame.width, frame.height), (16, 16));
            assert_eq!((frame.planes[0].width, frame.planes[0].height), (16, 16));
            assert_eq!((frame.planes[1].width, frame.planes[1].height), (8, 8));
            assert_eq!((frame.planes[2].width, frame.planes[2].height), (8, 8));
            for plane in &frame.planes {
                assert!(plane.data.len() >= plane.required_len());
            }
            assert_eq!(frame.planes[0].data[0], 16);
            seen += 1;
        });
        source.release_packet();
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_non_420_frames_are_converted() {
        let clip = write_y4m(2, "444");
        let mut source = VideoSource::open(clip.path()).unwrap();

        let mut chroma_sizes = Vec::new();
        while chroma_sizes.len() < 2 {
            match source.read_packet() {
                PacketStatus::Video => source.decode_packet(&mut |frame| {
                    chroma_sizes.push((frame.planes[1].width, frame.planes[1].height));
                }),
                PacketStatus::OtherStream => {}
                PacketStatus::Unavailable => break,
            }
            source.release_packet();
        }
        assert_eq!(chroma_sizes, vec![(8, 8), (8, 8)]);
    }

    #[test]
    fn test_backward_seek_does_not_move_later() {
        let clip = write_y4m(30, "420jpeg");
        let mut source = VideoSource::open(clip.path()).unwrap();

        let decoded = decode_frames(&mut source, 15);
        let current = *decoded.last().unwrap();
        let target = timing::seek_target(
            current,
            source.stream().frame_duration(),
            10,
            SeekDirection::Backward,
        );
        source.seek(target, SeekDirection::Backward).unwrap();

        let next = decode_frames(&mut source, 1);
        assert!(next[0] <= current, "{} > {}", next[0], current);
    }

    #[test]
    fn test_forward_seek_does_not_move_earlier() {
        let clip = write_y4m(30, "420jpeg");
        let mut source = VideoSource::open(clip.path()).unwrap();

        let decoded = decode_frames(&mut source, 3);
        let current = *decoded.last().unwrap();
        let target = timing::seek_target(
            current,
            source.stream().frame_duration(),
            10,
            SeekDirection::Forward,
        );
        source.seek(target, SeekDirection::Forward).unwrap();

        let next = decode_frames(&mut source, 1);
        assert!(next[0] >= current, "{} < {}", next[0], current);
    }
}
