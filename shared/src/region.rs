use std::fmt;

use serde::{Deserialize, Serialize};

/// The 26 Swiss canton codes.
pub const SWISS_CANTONS: [&str; 26] = [
    "AG", "AI", "AR", "BE", "BL", "BS", "FR", "GE", "GL", "GR", "JU", "LU", "NE", "NW", "OW", "SG",
    "SH", "SO", "SZ", "TG", "TI", "UR", "VD", "VS", "ZG", "ZH",
];

pub const DEFAULT_COUNTRY_PREFIX: &str = "CH";

const PREFIX_SEPARATORS: [char; 4] = ['-', '_', '.', ' '];

/// Canonical two-letter region code. Only produced by [`NormalizeRules`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How raw identifiers from external map documents are mapped to codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeRules {
    /// Stripped from the front (with one optional separator) when more text follows it.
    pub country_prefix: String,
    pub whitelist: Vec<String>,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self {
            country_prefix: DEFAULT_COUNTRY_PREFIX.to_string(),
            whitelist: SWISS_CANTONS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl NormalizeRules {
    /// Map a raw identifier (`"ZH"`, `"CH-ZH"`, `"ch_zh"`, `"canton-ZH"`) to a known code.
    pub fn normalize(&self, raw: &str) -> Option<RegionCode> {
        let upper = raw.trim().to_uppercase();
        let rest = self.strip_prefix(&upper);

        let letters: Vec<char> = rest.chars().filter(|c| c.is_uppercase()).collect();
        let tail = &letters[letters.len().saturating_sub(2)..];
        let candidate: String = tail.iter().collect();

        self.lookup(&candidate)
    }

    /// Accept an already-canonical code, e.g. a key restored from storage.
    pub fn lookup(&self, code: &str) -> Option<RegionCode> {
        self.whitelist
            .iter()
            .find(|known| known.as_str() == code)
            .map(|known| RegionCode(known.clone()))
    }

    pub fn is_known(&self, code: &RegionCode) -> bool {
        self.whitelist.iter().any(|known| known == code.as_str())
    }

    fn strip_prefix<'a>(&self, upper: &'a str) -> &'a str {
        let prefix = self.country_prefix.to_uppercase();
        if prefix.is_empty() || upper.len() <= prefix.len() {
            return upper;
        }
        let Some(rest) = upper.strip_prefix(prefix.as_str()) else {
            return upper;
        };
        rest.strip_prefix(PREFIX_SEPARATORS).unwrap_or(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::{NormalizeRules, SWISS_CANTONS};

    fn code(rules: &NormalizeRules, raw: &str) -> Option<String> {
        rules.normalize(raw).map(|c| c.as_str().to_string())
    }

    #[test]
    fn whitelisted_codes_are_fixed_points() {
        let rules = NormalizeRules::default();
        for canton in SWISS_CANTONS {
            assert_eq!(code(&rules, canton).as_deref(), Some(canton));
            let once = rules.normalize(canton).unwrap();
            assert_eq!(rules.normalize(once.as_str()), Some(once));
        }
    }

    #[test]
    fn strips_country_prefix_with_separators() {
        let rules = NormalizeRules::default();
        assert_eq!(code(&rules, "CH-ZH").as_deref(), Some("ZH"));
        assert_eq!(code(&rules, "ch_be").as_deref(), Some("BE"));
        assert_eq!(code(&rules, "CH.GE").as_deref(), Some("GE"));
        assert_eq!(code(&rules, " CH TI ").as_deref(), Some("TI"));
        assert_eq!(code(&rules, "CHVS").as_deref(), Some("VS"));
    }

    #[test]
    fn keeps_last_two_letters_of_longer_ids() {
        let rules = NormalizeRules::default();
        assert_eq!(code(&rules, "canton-ZH").as_deref(), Some("ZH"));
        assert_eq!(code(&rules, "Kanton_LU_1").as_deref(), Some("LU"));
    }

    #[test]
    fn non_ascii_capitals_count_as_letters() {
        let rules = NormalizeRules::default();
        assert_eq!(code(&rules, "ZHÄ"), None);
        assert_eq!(code(&rules, "Zürich-ZH").as_deref(), Some("ZH"));
        assert_eq!(code(&rules, "ÄZH").as_deref(), Some("ZH"));
    }

    #[test]
    fn rejects_unknown_ids() {
        let rules = NormalizeRules::default();
        assert_eq!(code(&rules, "layer1"), None);
        assert_eq!(code(&rules, "CH"), None);
        assert_eq!(code(&rules, "CH-"), None);
        assert_eq!(code(&rules, ""), None);
        assert_eq!(code(&rules, "42"), None);
        assert_eq!(code(&rules, "XX"), None);
    }

    #[test]
    fn prefix_and_whitelist_are_configurable() {
        let rules = NormalizeRules {
            country_prefix: "AT".to_string(),
            whitelist: vec!["WI".to_string(), "TI".to_string()],
        };
        assert_eq!(code(&rules, "AT-WI").as_deref(), Some("WI"));
        assert_eq!(code(&rules, "CH-ZH"), None);

        let no_prefix = NormalizeRules {
            country_prefix: String::new(),
            ..NormalizeRules::default()
        };
        assert_eq!(code(&no_prefix, "CH-ZH").as_deref(), Some("ZH"));
    }
}
