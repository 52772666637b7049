use crate::error::{config_error, AppResult};
use image::Rgb;
use std::collections::HashMap;

/// The seven colours the panel can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelColor {
    Black,
    White,
    Green,
    Blue,
    Red,
    Yellow,
    Orange,
}

impl PanelColor {
    /// Every panel colour, ordered by its wire index
    pub const ALL: [PanelColor; 7] = [
        PanelColor::Black,
        PanelColor::White,
        PanelColor::Green,
        PanelColor::Blue,
        PanelColor::Red,
        PanelColor::Yellow,
        PanelColor::Orange,
    ];

    /// Parse a colour name from the color map. Unknown names fall back to black.
    pub fn from_name(name: &str) -> Self {
        match name {
            "yellow" => PanelColor::Yellow,
            "orange" => PanelColor::Orange,
            "red" => PanelColor::Red,
            "green" => PanelColor::Green,
            "blue" => PanelColor::Blue,
            "white" => PanelColor::White,
            _ => PanelColor::Black,
        }
    }

    pub fn rgb(self) -> Rgb<u8> {
        match self {
            PanelColor::Black => Rgb([0, 0, 0]),
            PanelColor::White => Rgb([255, 255, 255]),
            PanelColor::Green => Rgb([0, 255, 0]),
            PanelColor::Blue => Rgb([0, 0, 255]),
            PanelColor::Red => Rgb([255, 0, 0]),
            PanelColor::Yellow => Rgb([255, 255, 0]),
            PanelColor::Orange => Rgb([255, 128, 0]),
        }
    }

    /// 4-bit index used in the panel frame buffer
    pub fn index(self) -> u8 {
        match self {
            PanelColor::Black => 0,
            PanelColor::White => 1,
            PanelColor::Green => 2,
            PanelColor::Blue => 3,
            PanelColor::Red => 4,
            PanelColor::Yellow => 5,
            PanelColor::Orange => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Closest panel colour by squared RGB distance
    pub fn nearest(pixel: Rgb<u8>) -> Self {
        let distance = |color: PanelColor| {
            let Rgb(target) = color.rgb();
            pixel
                .0
                .iter()
                .zip(target.iter())
                .map(|(&a, &b)| {
                    let d = a as i32 - b as i32;
                    d * d
                })
                .sum::<i32>()
        };

        Self::ALL
            .into_iter()
            .min_by_key(|&color| distance(color))
            .unwrap_or(PanelColor::White)
    }

    /// Text drawn on top of this colour. Black on the light fills, white elsewhere.
    pub fn text_color(self) -> Self {
        match self {
            PanelColor::Yellow | PanelColor::Orange => PanelColor::Black,
            _ => PanelColor::White,
        }
    }
}

/// Calendar name to fill colour, read once per run
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    colors: HashMap<String, PanelColor>,
}

impl ColorMap {
    /// Parse `calendarName=colorName` lines
    pub fn parse(content: &str) -> AppResult<Self> {
        let mut colors = HashMap::new();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Fields past the second `=` are ignored
            let mut fields = line.split('=');
            let (Some(name), Some(color)) = (fields.next(), fields.next()) else {
                return Err(config_error(&format!(
                    "color map line {} is not calendarName=colorName: {}",
                    number + 1,
                    line
                )));
            };

            colors.insert(name.to_string(), PanelColor::from_name(color));
        }

        Ok(Self { colors })
    }

    /// Fill colour for a calendar, black when it is not mapped
    pub fn color_for(&self, calendar_name: &str) -> PanelColor {
        self.colors
            .get(calendar_name)
            .copied()
            .unwrap_or(PanelColor::Black)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_map() {
        let map = ColorMap::parse(
            "Family=yellow\nWork=blue\n\n# comment\nChores=purple\nSchool=orange\n",
        )
        .unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.color_for("Family"), PanelColor::Yellow);
        assert_eq!(map.color_for("Work"), PanelColor::Blue);
        assert_eq!(map.color_for("School"), PanelColor::Orange);
        // Unknown colour names are black
        assert_eq!(map.color_for("Chores"), PanelColor::Black);
        // Unmapped calendars are black
        assert_eq!(map.color_for("Nobody"), PanelColor::Black);
    }

    #[test]
    fn test_parse_color_map_uses_second_field() {
        let map = ColorMap::parse("  Pets=green  \nTeam=red=dark").unwrap();
        assert_eq!(map.color_for("Pets"), PanelColor::Green);
        assert_eq!(map.color_for("Team"), PanelColor::Red);
    }

    #[test]
    fn test_parse_color_map_rejects_missing_separator() {
        let err = ColorMap::parse("Family=red\nWork blue\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_text_color_contrast() {
        assert_eq!(PanelColor::Yellow.text_color(), PanelColor::Black);
        assert_eq!(PanelColor::Orange.text_color(), PanelColor::Black);
        assert_eq!(PanelColor::Black.text_color(), PanelColor::White);
        assert_eq!(PanelColor::Red.text_color(), PanelColor::White);
        assert_eq!(PanelColor::Blue.text_color(), PanelColor::White);
        assert_eq!(PanelColor::Green.text_color(), PanelColor::White);
    }

    #[test]
    fn test_nearest_color() {
        assert_eq!(PanelColor::nearest(Rgb([10, 12, 8])), PanelColor::Black);
        assert_eq!(PanelColor::nearest(Rgb([240, 250, 245])), PanelColor::White);
        assert_eq!(PanelColor::nearest(Rgb([250, 120, 10])), PanelColor::Orange);
        assert_eq!(PanelColor::nearest(Rgb([250, 250, 30])), PanelColor::Yellow);
    }

    #[test]
    fn test_index_round_trip() {
        for color in PanelColor::ALL {
            assert_eq!(PanelColor::from_index(color.index()), Some(color));
        }
        assert_eq!(PanelColor::from_index(7), None);
    }
}
