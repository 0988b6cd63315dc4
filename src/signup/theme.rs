use std::str::FromStr;

use serde::Deserialize;

/// Visual variant of the signup page. Palette data only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Navy,
    Gold,
    Emerald,
    Crimson,
    Slate,
    Sunset,
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: &'static str,
    pub gradient: Option<&'static str>,
    pub text: &'static str,
    pub accent: &'static str,
    pub button: &'static str,
    pub button_hover: &'static str,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Navy => Palette {
                background: "#001f3f",
                gradient: None,
                text: "#ffffff",
                accent: "#FFD700",
                button: "#0074D9",
                button_hover: "#39CCCC",
            },
            Theme::Gold => Palette {
                background: "#1a1400",
                gradient: Some("linear-gradient(160deg, #1a1400 0%, #4d3b00 100%)"),
                text: "#fff8e1",
                accent: "#FFD700",
                button: "#b8860b",
                button_hover: "#FFD700",
            },
            Theme::Emerald => Palette {
                background: "#002b1f",
                gradient: Some("linear-gradient(180deg, #002b1f 0%, #00573e 100%)"),
                text: "#ffffff",
                accent: "#7CFC9A",
                button: "#00875a",
                button_hover: "#2ecc71",
            },
            Theme::Crimson => Palette {
                background: "#2b0008",
                gradient: None,
                text: "#ffffff",
                accent: "#ffb3b3",
                button: "#b3002d",
                button_hover: "#e6194b",
            },
            Theme::Slate => Palette {
                background: "#2f3640",
                gradient: None,
                text: "#f5f6fa",
                accent: "#fbc531",
                button: "#40739e",
                button_hover: "#487eb0",
            },
            Theme::Sunset => Palette {
                background: "#3d1f4d",
                gradient: Some("linear-gradient(135deg, #3d1f4d 0%, #c0392b 60%, #f39c12 100%)"),
                text: "#ffffff",
                accent: "#ffe082",
                button: "#e67e22",
                button_hover: "#f39c12",
            },
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "navy" => Ok(Theme::Navy),
            "gold" => Ok(Theme::Gold),
            "emerald" => Ok(Theme::Emerald),
            "crimson" => Ok(Theme::Crimson),
            "slate" => Ok(Theme::Slate),
            "sunset" => Ok(Theme::Sunset),
            other => anyhow::bail!("unknown theme: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_parse_case_insensitively() {
        assert_eq!("Sunset".parse::<Theme>().unwrap(), Theme::Sunset);
        assert_eq!("navy".parse::<Theme>().unwrap(), Theme::default());
        assert!("neon".parse::<Theme>().is_err());
    }
}
