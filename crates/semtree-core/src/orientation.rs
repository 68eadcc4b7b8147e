use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Root at the top, depth grows downwards.
    #[default]
    #[serde(rename = "top-bottom")]
    TopToBottom,
    /// Root on the left, depth grows to the right.
    #[serde(rename = "left-right")]
    LeftToRight,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::TopToBottom => "top-bottom",
            Orientation::LeftToRight => "left-right",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Orientation::TopToBottom => Orientation::LeftToRight,
            Orientation::LeftToRight => Orientation::TopToBottom,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-bottom" | "tb" | "td" => Ok(Orientation::TopToBottom),
            "left-right" | "lr" => Ok(Orientation::LeftToRight),
            _ => Err(()),
        }
    }
}
