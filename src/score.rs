use serde::{Deserialize, Serialize};

use crate::{math::clamp, metrics::DrawingMetrics};

/// Minimum score for an attempt to count as the target character.
pub const PASS_SCORE: u8 = 60;

/// Which scoring formula to apply. The two are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Guide-track aware: outside-track penalty and a 12 point edge penalty.
    #[default]
    Track,
    /// No guide track; 10 point edge penalty.
    Basic,
}

impl Variant {
    fn edge_penalty(self) -> f64 {
        match self {
            Variant::Track => 12.0,
            Variant::Basic => 10.0,
        }
    }

    fn models_track(self) -> bool {
        self == Variant::Track
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Locale {
    /// Traditional Chinese.
    #[default]
    #[serde(rename = "zh-Hant")]
    ZhHant,
    #[serde(rename = "en")]
    En,
}

/// An improvement hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    MoreStrokes,
    SpreadOut,
    Center,
    AvoidBorder,
    StayInTrack,
}

impl Locale {
    fn no_ink_label(self) -> &'static str {
        match self {
            Locale::ZhHant => "未書寫",
            Locale::En => "nothing written",
        }
    }

    fn unclear_label(self) -> &'static str {
        match self {
            Locale::ZhHant => "不明",
            Locale::En => "unclear",
        }
    }

    fn no_ink_feedback(self, character: &str) -> String {
        match self {
            Locale::ZhHant => format!("看起來還沒有落筆，試著先描寫「{character}」的筆畫。"),
            Locale::En => {
                format!("Nothing is written yet. Start by tracing the strokes of \"{character}\".")
            }
        }
    }

    fn praise(self, character: &str) -> String {
        match self {
            Locale::ZhHant => format!("太棒了！你的「{character}」筆畫穩定又清楚。"),
            Locale::En => format!("Great job! Your \"{character}\" is steady and clear."),
        }
    }

    fn advice(self, joined: &str, character: &str) -> String {
        match self {
            Locale::ZhHant => format!("試著{joined}，你的「{character}」會更好看。"),
            Locale::En => format!("Try to {joined} to make your \"{character}\" look even better."),
        }
    }

    pub fn phrase(self, suggestion: Suggestion) -> &'static str {
        match (self, suggestion) {
            (Locale::ZhHant, Suggestion::MoreStrokes) => "多寫幾筆讓字形更清楚",
            (Locale::ZhHant, Suggestion::SpreadOut) => "把筆畫稍微拉開填滿米字格",
            (Locale::ZhHant, Suggestion::Center) => "讓整個字更居中",
            (Locale::ZhHant, Suggestion::AvoidBorder) => "注意不要碰到外框",
            (Locale::ZhHant, Suggestion::StayInTrack) => "維持筆畫在描紅軌跡內",
            (Locale::En, Suggestion::MoreStrokes) => "add more strokes so the shape is clearer",
            (Locale::En, Suggestion::SpreadOut) => "spread your strokes out to fill the guide",
            (Locale::En, Suggestion::Center) => "center the character",
            (Locale::En, Suggestion::AvoidBorder) => "keep your strokes inside the border",
            (Locale::En, Suggestion::StayInTrack) => "stay within the guide track",
        }
    }

    /// Joins phrases into one clause: `a`, `a and b`, `a, b, and c`.
    pub fn join(self, items: &[&str]) -> String {
        let (pair, sep, last_sep) = match self {
            Locale::ZhHant => ("並且", "、", "，並且"),
            Locale::En => (" and ", ", ", ", and "),
        };
        match items {
            [] => String::new(),
            [one] => one.to_string(),
            [a, b] => format!("{a}{pair}{b}"),
            [init @ .., last] => format!("{}{last_sep}{last}", init.join(sep)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub identified_character: String,
    pub is_correct: bool,
    /// 0 to 100.
    pub score: u8,
    pub feedback: String,
}

/// Turns [`DrawingMetrics`] into a score and feedback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    pub variant: Variant,
    pub locale: Locale,
}

impl Scorer {
    pub fn new(variant: Variant, locale: Locale) -> Self {
        Self { variant, locale }
    }

    pub fn score(&self, metrics: &DrawingMetrics, character: &str) -> EvaluationResult {
        if !metrics.has_ink {
            return EvaluationResult {
                identified_character: self.locale.no_ink_label().to_string(),
                is_correct: false,
                score: 0,
                feedback: self.locale.no_ink_feedback(character),
            };
        }

        let score = self.points(metrics);
        let is_correct = score >= PASS_SCORE;
        let identified_character = if is_correct {
            character.to_string()
        } else {
            self.locale.unclear_label().to_string()
        };

        let phrases: Vec<&str> = self
            .suggestions(metrics)
            .into_iter()
            .map(|s| self.locale.phrase(s))
            .collect();
        let feedback = if phrases.is_empty() {
            self.locale.praise(character)
        } else {
            self.locale.advice(&self.locale.join(&phrases), character)
        };

        log::debug!("scored {character} at {score} ({} hints)", phrases.len());
        EvaluationResult {
            identified_character,
            is_correct,
            score,
            feedback,
        }
    }

    /// The 0..=100 score for an inked drawing.
    pub fn points(&self, metrics: &DrawingMetrics) -> u8 {
        let coverage_score = clamp(metrics.coverage / 0.15, 0.0, 1.0) * 45.0;
        let span_score = clamp(span_average(metrics) / 0.7, 0.0, 1.0) * 35.0;
        let balance_score = clamp(1.0 - offset_average(metrics), 0.0, 1.0) * 20.0;
        let outside_penalty = if self.variant.models_track() {
            clamp(metrics.outside_track_ratio, 0.0, 1.0) * 40.0
        } else {
            0.0
        };

        let mut raw = coverage_score + span_score + balance_score - outside_penalty;
        if metrics.touches_edge {
            raw -= self.variant.edge_penalty();
        }
        clamp(raw, 0.0, 100.0).round() as u8
    }

    /// Improvement hints, in feedback order.
    pub fn suggestions(&self, metrics: &DrawingMetrics) -> Vec<Suggestion> {
        let mut out = Vec::new();
        if metrics.coverage < 0.03 {
            out.push(Suggestion::MoreStrokes);
        }
        if span_average(metrics) < 0.45 {
            out.push(Suggestion::SpreadOut);
        }
        if offset_average(metrics) > 0.2 {
            out.push(Suggestion::Center);
        }
        if metrics.touches_edge {
            out.push(Suggestion::AvoidBorder);
        }
        if self.variant.models_track() && metrics.outside_track_ratio > 0.15 {
            out.push(Suggestion::StayInTrack);
        }
        out
    }
}

fn span_average(m: &DrawingMetrics) -> f64 {
    (m.span_x + m.span_y) / 2.0
}

fn offset_average(m: &DrawingMetrics) -> f64 {
    (m.offset_x + m.offset_y) / 2.0
}
