use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Marathi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Marathi];

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Marathi => "Marathi",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            Language::English => Language::Hindi,
            Language::Hindi => Language::Marathi,
            Language::Marathi => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown language '{s}' (expected English, Hindi or Marathi)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!(" MARATHI ".parse::<Language>().unwrap(), Language::Marathi);
        assert!("french".parse::<Language>().is_err());
    }

    #[test]
    fn cycle_visits_every_language() {
        let mut lang = Language::English;
        for _ in 0..Language::ALL.len() {
            lang = lang.cycle();
        }
        assert_eq!(lang, Language::English);
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&Language::Marathi).unwrap();
        assert_eq!(json, "\"Marathi\"");
    }
}
