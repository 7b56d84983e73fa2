pub mod topics;

use crate::models::chat::Language;
use self::topics::{ Canned, PediatricFocus, TopicKind, GENERIC, TOPICS };
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicMatch {
    pub topic: TopicKind,
    pub focus: Option<PediatricFocus>,
}

struct NormalizedInput {
    words: Vec<String>,
    // words joined by single spaces, padded with one space on each side
    padded: String,
}

impl NormalizedInput {
    fn new(input: &str) -> Self {
        let lowered = input.to_lowercase();
        let words: Vec<String> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_string())
            .collect();
        let padded = format!(" {} ", words.join(" "));
        Self { words, padded }
    }

    // Keywords are stems: they must start on a word boundary and may end
    // mid-word, so "vaccin" hits "vaccines" while "eat" leaves "great" alone.
    // A leading '=' pins the end to a word boundary as well ("=kid" skips
    // "kidney"). Phrases are matched the same way against the joined words.
    fn has_keyword(&self, keyword: &str) -> bool {
        let (keyword, whole) = match keyword.strip_prefix('=') {
            Some(rest) => (rest, true),
            None => (keyword, false),
        };
        if keyword.contains(' ') {
            let needle = if whole { format!(" {} ", keyword) } else { format!(" {}", keyword) };
            self.padded.contains(&needle)
        } else if whole {
            self.words.iter().any(|w| w == keyword)
        } else {
            self.words.iter().any(|w| w.starts_with(keyword))
        }
    }

    fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.has_keyword(k))
    }
}

pub fn match_topic(input: &str) -> Option<TopicMatch> {
    let normalized = NormalizedInput::new(input);
    let topic = TOPICS.iter().find(|t| normalized.has_any(t.keywords))?;
    let focus = topic.subtopics
        .iter()
        .find(|s| normalized.has_any(s.keywords))
        .map(|s| s.focus);
    Some(TopicMatch { topic: topic.kind, focus })
}

fn canned_for(topic_match: Option<TopicMatch>) -> &'static Canned {
    let Some(m) = topic_match else {
        return &GENERIC;
    };
    let Some(topic) = TOPICS.iter().find(|t| t.kind == m.topic) else {
        return &GENERIC;
    };
    m.focus
        .and_then(|focus| topic.subtopics.iter().find(|s| s.focus == focus))
        .map(|s| &s.response)
        .unwrap_or(&topic.response)
}

fn select(canned: &Canned, language: Language) -> &'static str {
    match language {
        Language::En => canned.en,
        Language::Es => canned.es,
    }
}

/// Canned answer for `input` in `language`. Deterministic and side-effect free.
pub fn get_sample_response(input: &str, language: Language) -> String {
    select(canned_for(match_topic(input)), language).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::topics::TOPICS;

    fn topic_response(kind: TopicKind) -> &'static Canned {
        &TOPICS.iter().find(|t| t.kind == kind).unwrap().response
    }

    #[test]
    fn pediatric_wins_over_nutrition() {
        let input = "My baby needs a better diet";
        let m = match_topic(input).unwrap();
        assert_eq!(m.topic, TopicKind::Pediatric);
        assert_eq!(m.focus, Some(PediatricFocus::Nutrition));

        let reply = get_sample_response(input, Language::En);
        assert_ne!(reply, topic_response(TopicKind::Nutrition).en);
    }

    #[test]
    fn pediatric_subtopics_follow_fixed_order() {
        // feeding is checked before sleep
        let m = match_topic("my newborn won't feed at night").unwrap();
        assert_eq!(m.focus, Some(PediatricFocus::Feeding));

        let m = match_topic("when should my toddler get vaccines").unwrap();
        assert_eq!(m.focus, Some(PediatricFocus::Vaccination));

        let m = match_topic("mi hijo tiene berrinches").unwrap();
        assert_eq!(m.focus, Some(PediatricFocus::Behavior));
    }

    #[test]
    fn pediatric_without_subtopic_uses_generic_paragraph() {
        let m = match_topic("I have questions about my child").unwrap();
        assert_eq!(m, TopicMatch { topic: TopicKind::Pediatric, focus: None });
        assert_eq!(
            get_sample_response("I have questions about my child", Language::Es),
            topic_response(TopicKind::Pediatric).es
        );
    }

    #[test]
    fn top_level_topics_match_in_both_languages() {
        let cases = [
            ("How much exercise do I need?", TopicKind::Exercise),
            ("I can't sleep well", TopicKind::Sleep),
            ("work stress is too much", TopicKind::Stress),
            ("what is a normal blood pressure", TopicKind::Heart),
            ("my glucose is high", TopicKind::Diabetes),
            ("I have a headache", TopicKind::Headache),
            ("I feel depressed", TopicKind::MentalHealth),
            ("tengo dolor de cabeza", TopicKind::Headache),
            ("me siento muy triste", TopicKind::MentalHealth),
            ("quiero hacer ejercicio", TopicKind::Exercise),
            ("tengo diabetes", TopicKind::Diabetes),
        ];
        for (input, expected) in cases {
            assert_eq!(match_topic(input).map(|m| m.topic), Some(expected), "input: {}", input);
        }
    }

    #[test]
    fn earlier_topic_wins_on_overlap() {
        // sleep is ranked above stress
        assert_eq!(match_topic("stress keeps me from sleeping").unwrap().topic, TopicKind::Sleep);
    }

    #[test]
    fn keyword_stems_do_not_match_inside_words() {
        assert_eq!(match_topic("that's great news"), None);
    }

    #[test]
    fn everyday_words_for_a_child_reach_pediatric() {
        let cases = [
            ("my kid has a rash", PediatricFocus::Illness),
            ("my son has a fever", PediatricFocus::Illness),
            ("my son's cough won't stop", PediatricFocus::Illness),
            ("my kid won't eat", PediatricFocus::Nutrition),
            ("my daughter is a picky eater", PediatricFocus::Nutrition),
            ("mi hija tiene fiebre", PediatricFocus::Illness),
            ("mi hijo no quiere dormir", PediatricFocus::Sleep),
        ];
        for (input, focus) in cases {
            assert_eq!(
                match_topic(input),
                Some(TopicMatch { topic: TopicKind::Pediatric, focus: Some(focus) }),
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn whole_word_keywords_stay_whole() {
        assert_eq!(match_topic("my kidney hurts"), None);
        assert_eq!(match_topic("my sonogram results"), None);
        assert_eq!(
            match_topic("¿cuáles son los síntomas de la diabetes?").map(|m| m.topic),
            Some(TopicKind::Diabetes)
        );
    }

    #[test]
    fn unmatched_input_gets_generic_prompt() {
        assert_eq!(get_sample_response("hello there", Language::En), GENERIC.en);
        assert_eq!(get_sample_response("", Language::Es), GENERIC.es);
    }

    #[test]
    fn headache_in_spanish_mode() {
        assert_eq!(
            get_sample_response("I have a headache", Language::Es),
            topic_response(TopicKind::Headache).es
        );
    }

    #[test]
    fn uppercase_input_is_normalized() {
        assert_eq!(match_topic("MY HEART RACES").unwrap().topic, TopicKind::Heart);
    }
}
