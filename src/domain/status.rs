// Status identifiers and their display colors
use super::reading::RgbColor;

/// Alert levels published by the activity feed. The identifiers are a wire
/// contract with the data source and are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Red,
    Green,
    Yellow,
    Amber,
}

impl Status {
    #[cfg(test)]
    pub const ALL: [Status; 4] = [Status::Red, Status::Green, Status::Yellow, Status::Amber];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "red" => Some(Status::Red),
            "green" => Some(Status::Green),
            "yellow" => Some(Status::Yellow),
            "amber" => Some(Status::Amber),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> &'static str {
        match self {
            Status::Red => "red",
            Status::Green => "green",
            Status::Yellow => "yellow",
            Status::Amber => "amber",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusColorMap {
    red: RgbColor,
    green: RgbColor,
    yellow: RgbColor,
    amber: RgbColor,
    default: RgbColor,
}

impl StatusColorMap {
    pub const fn standard() -> Self {
        Self {
            red: RgbColor::new(0xFF, 0x00, 0x00),
            green: RgbColor::new(0x00, 0xFF, 0x00),
            yellow: RgbColor::new(0xFF, 0xFF, 0x00),
            amber: RgbColor::new(0xFF, 0xA5, 0x00),
            default: RgbColor::new(0x00, 0x00, 0x00),
        }
    }

    pub fn color(&self, status: Status) -> RgbColor {
        match status {
            Status::Red => self.red,
            Status::Green => self.green,
            Status::Yellow => self.yellow,
            Status::Amber => self.amber,
        }
    }

    pub fn default_color(&self) -> RgbColor {
        self.default
    }

    /// Total over all identifiers: anything unknown gets the default color.
    pub fn resolve(&self, status_id: &str) -> RgbColor {
        Status::from_id(status_id)
            .map(|status| self.color(status))
            .unwrap_or(self.default_color())
    }
}

impl Default for StatusColorMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses() {
        let colors = StatusColorMap::standard();
        assert_eq!(colors.resolve("red").to_hex(), "#FF0000");
        assert_eq!(colors.resolve("green").to_hex(), "#00FF00");
        assert_eq!(colors.resolve("yellow").to_hex(), "#FFFF00");
        assert_eq!(colors.resolve("amber").to_hex(), "#FFA500");
    }

    #[test]
    fn test_unknown_status_uses_default() {
        let colors = StatusColorMap::standard();
        assert_eq!(colors.resolve("teal"), colors.default_color());
        assert_eq!(colors.resolve(""), colors.default_color());
        assert_eq!(colors.resolve("RED"), colors.default_color());
    }

    #[test]
    fn test_id_round_trip() {
        for status in Status::ALL {
            assert_eq!(Status::from_id(status.id()), Some(status));
        }
    }
}
