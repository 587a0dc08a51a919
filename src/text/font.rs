use std::collections::HashMap;
use std::path::Path;
use std::str::SplitWhitespace;

use anyhow::Context;
use glam::Vec2;
use serde::Deserialize;

/// A closed outline, already flattened to line segments.
pub type Contour = Vec<Vec2>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { control: Vec2, to: Vec2 },
    CubicTo { control1: Vec2, control2: Vec2, to: Vec2 },
}

#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub advance: f32,
    pub outline: Vec<PathCommand>,
}

#[derive(Debug, Clone)]
pub struct Font {
    pub family: String,
    pub resolution: f32,
    /// Distance between baselines in font units.
    pub line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

#[derive(Deserialize)]
struct TypefaceJson {
    glyphs: HashMap<String, GlyphJson>,
    resolution: f32,
    #[serde(rename = "boundingBox")]
    bounding_box: BoundingBoxJson,
    #[serde(rename = "underlineThickness", default)]
    underline_thickness: f32,
    #[serde(rename = "familyName", default)]
    family_name: String,
}

#[derive(Deserialize)]
struct GlyphJson {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Deserialize)]
struct BoundingBoxJson {
    #[serde(rename = "yMin")]
    y_min: f32,
    #[serde(rename = "yMax")]
    y_max: f32,
}

const FALLBACK_GLYPH: char = '?';

impl Font {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Font> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;

        Self::from_json_str(&source)
            .with_context(|| format!("Failed to parse font {}", path.display()))
    }

    pub fn from_json_str(source: &str) -> anyhow::Result<Font> {
        let json: TypefaceJson =
            serde_json::from_str(source).context("Invalid typeface JSON")?;

        if json.resolution <= 0.0 {
            return Err(anyhow::anyhow!(
                "Font resolution must be positive, got {}",
                json.resolution
            ));
        }

        let mut glyphs = HashMap::with_capacity(json.glyphs.len());
        for (key, glyph) in json.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                log::debug!("Skipping glyph with multi-character key {key:?}");
                continue;
            };

            let outline = match &glyph.o {
                Some(outline) => parse_outline(outline)
                    .with_context(|| format!("Invalid outline for glyph {ch:?}"))?,
                None => Vec::new(),
            };

            glyphs.insert(
                ch,
                Glyph {
                    advance: glyph.ha,
                    outline,
                },
            );
        }

        Ok(Font {
            family: json.family_name,
            resolution: json.resolution,
            line_height: json.bounding_box.y_max - json.bounding_box.y_min
                + json.underline_thickness,
            glyphs,
        })
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Lays out `text` at `size` world units per em and flattens every curve
    /// into `curve_segments` line segments. Lines run down from y = 0.
    pub fn layout(&self, text: &str, size: f32, curve_segments: usize) -> Vec<Contour> {
        let scale = size / self.resolution;
        let line_height = self.line_height * scale;
        let curve_segments = curve_segments.max(1);

        let mut contours = Vec::new();
        let mut offset = Vec2::ZERO;

        for ch in text.chars() {
            if ch == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }

            let Some(glyph) = self.glyph(ch).or_else(|| {
                log::warn!(
                    "Character {ch:?} does not exist in font family {}",
                    self.family
                );
                self.glyph(FALLBACK_GLYPH)
            }) else {
                continue;
            };

            flatten_outline(&glyph.outline, scale, offset, curve_segments, &mut contours);
            offset.x += glyph.advance * scale;
        }

        contours
    }
}

fn parse_outline(outline: &str) -> anyhow::Result<Vec<PathCommand>> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    while let Some(action) = tokens.next() {
        let command = match action {
            "m" => PathCommand::MoveTo(next_point(&mut tokens)?),
            "l" => PathCommand::LineTo(next_point(&mut tokens)?),
            "q" => {
                let to = next_point(&mut tokens)?;
                let control = next_point(&mut tokens)?;
                PathCommand::QuadTo { control, to }
            }
            "b" => {
                let to = next_point(&mut tokens)?;
                let control1 = next_point(&mut tokens)?;
                let control2 = next_point(&mut tokens)?;
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                }
            }
            "z" => continue,
            other => return Err(anyhow::anyhow!("Unknown outline command {other:?}")),
        };
        commands.push(command);
    }

    Ok(commands)
}

fn next_point(tokens: &mut SplitWhitespace<'_>) -> anyhow::Result<Vec2> {
    let x = next_coordinate(tokens)?;
    let y = next_coordinate(tokens)?;
    Ok(Vec2::new(x, y))
}

fn next_coordinate(tokens: &mut SplitWhitespace<'_>) -> anyhow::Result<f32> {
    let token = tokens.next().context("Outline ended mid-command")?;
    token
        .parse::<f32>()
        .with_context(|| format!("Invalid coordinate {token:?}"))
}

fn flatten_outline(
    outline: &[PathCommand],
    scale: f32,
    offset: Vec2,
    curve_segments: usize,
    contours: &mut Vec<Contour>,
) {
    let place = |point: Vec2| point * scale + offset;
    let mut current: Contour = Vec::new();

    for command in outline {
        match *command {
            PathCommand::MoveTo(to) => {
                finish_contour(&mut current, contours);
                current.push(place(to));
            }
            PathCommand::LineTo(to) => current.push(place(to)),
            PathCommand::QuadTo { control, to } => {
                let Some(&from) = current.last() else {
                    current.push(place(to));
                    continue;
                };
                let (control, to) = (place(control), place(to));
                for step in 1..=curve_segments {
                    let t = step as f32 / curve_segments as f32;
                    let u = 1.0 - t;
                    current.push(from * (u * u) + control * (2.0 * u * t) + to * (t * t));
                }
            }
            PathCommand::CubicTo {
                control1,
                control2,
                to,
            } => {
                let Some(&from) = current.last() else {
                    current.push(place(to));
                    continue;
                };
                let (control1, control2, to) = (place(control1), place(control2), place(to));
                for step in 1..=curve_segments {
                    let t = step as f32 / curve_segments as f32;
                    let u = 1.0 - t;
                    current.push(
                        from * (u * u * u)
                            + control1 * (3.0 * u * u * t)
                            + control2 * (3.0 * u * t * t)
                            + to * (t * t * t),
                    );
                }
            }
        }
    }

    finish_contour(&mut current, contours);
}

fn finish_contour(current: &mut Contour, contours: &mut Vec<Contour>) {
    let mut contour = std::mem::take(current);

    if contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }

    if contour.len() >= 3 {
        contours.push(contour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_FONT: &str = r#"{
        "glyphs": {
            "I": { "ha": 500, "x_min": 0, "x_max": 400,
                   "o": "m 0 0 l 400 0 l 400 1000 l 0 1000 z " },
            "?": { "ha": 300, "o": "m 0 0 l 100 0 l 100 100 z " },
            " ": { "ha": 250 }
        },
        "familyName": "Squares",
        "resolution": 1000,
        "boundingBox": { "yMin": -200, "xMin": 0, "yMax": 1000, "xMax": 500 },
        "underlineThickness": 50
    }"#;

    #[test]
    fn parses_glyphs_and_metrics() {
        let font = Font::from_json_str(SQUARE_FONT).unwrap();

        assert_eq!(font.family, "Squares");
        assert_eq!(font.glyph_count(), 3);
        assert_eq!(font.line_height, 1250.0);

        let glyph = font.glyph('I').unwrap();
        assert_eq!(glyph.advance, 500.0);
        assert_eq!(glyph.outline.len(), 4);
        assert_eq!(glyph.outline[0], PathCommand::MoveTo(Vec2::ZERO));
        assert!(font.glyph(' ').unwrap().outline.is_empty());
    }

    #[test]
    fn curve_arguments_put_endpoint_first() {
        let commands = parse_outline("m 0 0 q 10 0 5 5 b 0 0 10 10 0 10").unwrap();

        assert_eq!(
            commands[1],
            PathCommand::QuadTo {
                control: Vec2::new(5.0, 5.0),
                to: Vec2::new(10.0, 0.0)
            }
        );
        assert_eq!(
            commands[2],
            PathCommand::CubicTo {
                control1: Vec2::new(10.0, 10.0),
                control2: Vec2::new(0.0, 10.0),
                to: Vec2::ZERO
            }
        );
    }

    #[test]
    fn rejects_truncated_outline() {
        assert!(parse_outline("m 0 0 l 10").is_err());
        assert!(parse_outline("x 1 2").is_err());
    }

    #[test]
    fn layout_advances_and_breaks_lines() {
        let font = Font::from_json_str(SQUARE_FONT).unwrap();
        // A size equal to the resolution keeps coordinates in font units.
        let contours = font.layout("I I\nI", 1000.0, 4);

        assert_eq!(contours.len(), 3);
        assert_eq!(contours[0][0], Vec2::ZERO);
        // "I" plus the space
        assert_eq!(contours[1][0], Vec2::new(750.0, 0.0));
        assert_eq!(contours[2][0], Vec2::new(0.0, -1250.0));
        // The closing point of the square is dropped.
        assert_eq!(contours[0].len(), 4);
    }

    #[test]
    fn unknown_characters_use_fallback_glyph() {
        let font = Font::from_json_str(SQUARE_FONT).unwrap();
        let contours = font.layout("♥I", 1000.0, 4);

        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].len(), 3);
        assert_eq!(contours[1][0], Vec2::new(300.0, 0.0));
    }

    #[test]
    fn quadratic_curves_are_flattened() {
        let font = Font::from_json_str(
            r#"{ "glyphs": { "o": { "ha": 100, "o": "m 0 0 q 100 0 50 100 l 50 -50" } },
                 "resolution": 100,
                 "boundingBox": { "yMin": 0, "yMax": 100 } }"#,
        )
        .unwrap();
        let contours = font.layout("o", 100.0, 8);

        assert_eq!(contours[0].len(), 1 + 8 + 1);
        assert_eq!(contours[0][8], Vec2::new(100.0, 0.0));
        assert_eq!(contours[0][4], Vec2::new(50.0, 50.0));
    }
}
