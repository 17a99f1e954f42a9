//! Embedded WGSL shaders

/// Fullscreen planar YUV to RGB shader
///
/// Bindings (group 0): 0-2 Y/U/V plane textures, 3 sampler, 4 `ColorParams`
/// uniform. Entry points `vs_main` and `fs_main`.
pub const YUV_QUAD_SHADER: &str = include_str!("yuv_quad.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_declares_entry_points() {
        assert!(YUV_QUAD_SHADER.contains("fn vs_main"));
        assert!(YUV_QUAD_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn test_shader_bindings_match_layout() {
        for binding in 0..=4 {
            let declaration = format!("@group(0) @binding({binding})");
            assert!(YUV_QUAD_SHADER.contains(&declaration), "missing {declaration}");
        }
    }
}
