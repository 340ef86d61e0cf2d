//! Rule and presentation tables that drive the note parser.
//!
//! A [`Vocabulary`] is built once (from the built-in Korean tables or a JSON
//! file) and then only read. Reloading means building a fresh value and
//! handing that to later parse calls.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::VocabError;
use crate::parser::record::RESOLVED_MARKER;

/// Characters allowed between the letters of a term: OCR output splits and
/// punctuates words unpredictably ("수 면", "수.면").
const GAP: &str = r"[\s\p{P}]*";

const DEFAULT_YEARS: (i32, i32) = (1900, 2100);

/// Canonical labels and the surface terms that indicate them.
const BUILTIN_LABELS: &[(&str, &[&str])] = &[
    ("땀", &["땀", "발한"]),
    ("자가배뇨", &["자가배뇨"]),
    ("수면", &["수면", "불면"]),
    ("가래", &["가래", "객담"]),
    ("욕창", &["욕창"]),
];

/// Any of these in a block vetoes every label in it.
const BUILTIN_EXCLUSIONS: &[(&str, &[&str])] = &[
    ("예방", &["예방"]),
    ("교육", &["교육"]),
    ("부정", &["없음", "없었음"]),
];

const BUILTIN_SYMPTOMS: &[(&str, &str)] = &[
    ("땀", "발한"),
    ("수면", "수면장애"),
    ("가래", "객담"),
];

/// Ordered: the first trigger found in a detail wins.
const BUILTIN_CAUSES: &[(&str, &str)] = &[
    ("흡인", "객담 흡인 시행"),
    ("드레싱", "욕창 부위 드레싱 시행"),
    ("체위", "체위 변경 시행"),
    ("수면제", "수면제 투약 후 관찰"),
    ("도뇨", "도뇨 시행"),
    ("미온수", "미온수 마사지 시행"),
];

const BUILTIN_BOILERPLATE: &[&str] = &[
    r"^간호\s*기록\s*지?$",
    r"^경과\s*기록\s*지?$",
    r"^\S*요양\s*병원$",
    r"(?i)^(page|페이지)\s*\d+(\s*(/|of)\s*\d+)?$",
    r"(?i)^p\.?\s*\d+\s*/\s*\d+$",
    r"^\d\s*/\s*\d$",
    r"^-\s*\d+\s*-$",
    r"^(출력일|인쇄일|출력일시)\s*[:：]",
    r"^(날짜|일자)\s+(내용|기록|간호기록)$",
];

/// Regex source matching `term` with optional whitespace or punctuation
/// between its characters. Whitespace inside the term itself is dropped.
pub fn tolerant_pattern(term: &str) -> String {
    term.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| regex::escape(c.encode_utf8(&mut [0u8; 4])))
        .collect::<Vec<_>>()
        .join(GAP)
}

#[derive(Debug, Clone)]
pub struct SymptomRule {
    label: String,
    pattern: Regex,
    exclude: bool,
}

impl SymptomRule {
    /// Rule from a raw regex.
    pub fn new(label: &str, pattern: &str, exclude: bool) -> Result<Self, VocabError> {
        if label.trim().is_empty() {
            return Err(VocabError::EmptyLabel);
        }
        let pattern = Regex::new(pattern).map_err(|source| VocabError::Pattern {
            label: label.to_string(),
            source,
        })?;
        Ok(Self {
            label: label.to_string(),
            pattern,
            exclude,
        })
    }

    /// Rule matching any of `terms`, each spacing/punctuation tolerant.
    pub fn from_terms<S: AsRef<str>>(
        label: &str,
        terms: &[S],
        exclude: bool,
    ) -> Result<Self, VocabError> {
        let alternatives: Vec<String> = terms
            .iter()
            .map(|t| tolerant_pattern(t.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        if alternatives.is_empty() {
            return Err(VocabError::NoMatcher(label.to_string()));
        }
        Self::new(label, &alternatives.join("|"), exclude)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_exclusion(&self) -> bool {
        self.exclude
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Replaces a whole detail when `trigger` occurs in it. `phrase` may not be
/// the resolved marker.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CausePhrase {
    pub trigger: String,
    pub phrase: String,
}

// ── JSON configuration ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfig {
    pub rules: Vec<RuleConfig>,
    #[serde(default)]
    pub symptoms: HashMap<String, String>,
    #[serde(default)]
    pub causes: Vec<CausePhrase>,
    #[serde(default)]
    pub boilerplate: Vec<String>,
    #[serde(default = "default_years")]
    pub year_range: (i32, i32),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub label: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub terms: Vec<String>,
    #[serde(default)]
    pub exclude: bool,
}

fn default_years() -> (i32, i32) {
    DEFAULT_YEARS
}

// ── Vocabulary ──

#[derive(Debug, Clone)]
pub struct Vocabulary {
    rules: Vec<SymptomRule>,
    symptoms: HashMap<String, String>,
    causes: Vec<CausePhrase>,
    boilerplate: Vec<Regex>,
    years: RangeInclusive<i32>,
}

impl Vocabulary {
    /// Built-in Korean nursing-note tables.
    pub fn builtin() -> Self {
        let config = VocabularyConfig {
            rules: BUILTIN_LABELS
                .iter()
                .map(|(label, terms)| (label, terms, false))
                .chain(BUILTIN_EXCLUSIONS.iter().map(|(label, terms)| (label, terms, true)))
                .map(|(label, terms, exclude)| RuleConfig {
                    label: label.to_string(),
                    pattern: None,
                    terms: terms.iter().map(|t| t.to_string()).collect(),
                    exclude,
                })
                .collect(),
            symptoms: BUILTIN_SYMPTOMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            causes: BUILTIN_CAUSES
                .iter()
                .map(|(trigger, phrase)| CausePhrase {
                    trigger: trigger.to_string(),
                    phrase: phrase.to_string(),
                })
                .collect(),
            boilerplate: BUILTIN_BOILERPLATE.iter().map(|p| p.to_string()).collect(),
            year_range: DEFAULT_YEARS,
        };
        // Constant tables; `builtin_compiles` exercises them.
        Self::from_config(config).unwrap_or_else(|e| panic!("built-in vocabulary is invalid: {e}"))
    }

    pub fn from_config(config: VocabularyConfig) -> Result<Self, VocabError> {
        let (lo, hi) = config.year_range;
        if lo > hi {
            return Err(VocabError::YearRange(lo, hi));
        }
        if let Some(c) = config.causes.iter().find(|c| c.phrase == RESOLVED_MARKER) {
            return Err(VocabError::ReservedPhrase(c.trigger.clone()));
        }

        let rules = config
            .rules
            .iter()
            .map(|r| match &r.pattern {
                Some(p) => SymptomRule::new(&r.label, p, r.exclude),
                None => SymptomRule::from_terms(&r.label, r.terms.as_slice(), r.exclude),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let boilerplate = config
            .boilerplate
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| VocabError::Boilerplate {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            symptoms: config.symptoms,
            causes: config.causes,
            boilerplate,
            years: lo..=hi,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, VocabError> {
        let config: VocabularyConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    pub fn load(path: &Path) -> Result<Self, VocabError> {
        let json = std::fs::read_to_string(path).map_err(|source| VocabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vocab = Self::from_json_str(&json)?;
        debug!(
            "Loaded vocabulary from {} ({} rules, {} causes)",
            path.display(),
            vocab.rules.len(),
            vocab.causes.len()
        );
        Ok(vocab)
    }

    /// Non-exclusion rules, in table order.
    pub fn label_rules(&self) -> impl Iterator<Item = &SymptomRule> {
        self.rules.iter().filter(|r| !r.is_exclusion())
    }

    pub fn exclusion_rules(&self) -> impl Iterator<Item = &SymptomRule> {
        self.rules.iter().filter(|r| r.is_exclusion())
    }

    /// True when `line` carries a known symptom term (exclusions don't count).
    pub fn mentions_symptom(&self, line: &str) -> bool {
        self.label_rules().any(|r| r.is_match(line))
    }

    pub fn is_boilerplate(&self, line: &str) -> bool {
        self.boilerplate.iter().any(|re| re.is_match(line))
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn symptom_presentation(&self, label: &str) -> Option<&str> {
        self.symptoms.get(label).map(String::as_str)
    }

    pub fn causes(&self) -> &[CausePhrase] {
        &self.causes
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}
