use super::ExportError;

/// Rasterize an SVG document to PNG bytes.
///
/// `scale` multiplies the SVG's intrinsic size. `background` is `white`,
/// `black`, `transparent` or a `#rgb`/`#rrggbb`/`#rrggbbaa` colour; when
/// absent the image is transparent.
pub fn to_png(svg: &str, scale: f32, background: Option<&str>) -> Result<Vec<u8>, ExportError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(ExportError::Raster(format!("invalid scale {}", scale)));
    }

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| ExportError::Svg(e.to_string()))?;

    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px)
        .ok_or_else(|| ExportError::Raster("failed to allocate pixmap".to_string()))?;

    if let Some(bg) = background {
        let color = parse_color(bg)
            .ok_or_else(|| ExportError::Raster(format!("invalid background colour `{}`", bg)))?;
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Raster(e.to_string()))
}

pub fn parse_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    let nibble = |c: u8| (c as char).to_digit(16).map(|v| v as u8);
    let byte = |hi: u8, lo: u8| Some((nibble(hi)? << 4) | nibble(lo)?);

    let b = hex.as_bytes();
    let (r, g, bl, a) = match b.len() {
        3 => (
            byte(b[0], b[0])?,
            byte(b[1], b[1])?,
            byte(b[2], b[2])?,
            255,
        ),
        6 => (byte(b[0], b[1])?, byte(b[2], b[3])?, byte(b[4], b[5])?, 255),
        8 => (
            byte(b[0], b[1])?,
            byte(b[2], b[3])?,
            byte(b[4], b[5])?,
            byte(b[6], b[7])?,
        ),
        _ => return None,
    };
    Some(tiny_skia::Color::from_rgba8(r, g, bl, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10"><rect x="0" y="0" width="20" height="10" fill="#ff0000"/></svg>"##;

    #[test]
    fn test_png_has_signature() {
        let png = to_png(SQUARE, 1.0, None).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_scale_changes_dimensions() {
        let png = to_png(SQUARE, 2.0, Some("white")).unwrap();
        let decoded = tiny_skia::Pixmap::decode_png(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }

    #[test]
    fn test_invalid_svg_is_an_error() {
        assert!(matches!(
            to_png("<not-svg", 1.0, None),
            Err(ExportError::Svg(_))
        ));
    }

    #[test]
    fn test_parse_color() {
        let c = parse_color("#f80").unwrap();
        assert_eq!(c, tiny_skia::Color::from_rgba8(0xff, 0x88, 0x00, 0xff));
        assert!(parse_color("#12345").is_none());
        assert!(parse_color("chartreuse").is_none());
        assert_eq!(parse_color("WHITE"), Some(tiny_skia::Color::WHITE));
    }
}
