// src/core/rules.rs
//! Ordered rewrite stages turning stress-marked lowercase text into a
//! phonemic transcription.
//!
//! Every stage reads the whole string produced by the previous one; several
//! rules look across a following space, so nothing here works per token.

use crate::core::types::{is_vowel, SOFT_MARK, STRESS_MARK};

/// Consonants that take the softness mark before a softening vowel.
const SOFTENABLE: &str = "бвгдзклмнпрстфхчщ";
const SOFTENING: &str = "яёюеиь";
const IOTATED: &str = "еёюя";
const VOICELESS: &str = "пкфтсшщхцч";
const VOICED_AFTER_S: &str = "бгдзжмнл";
/// Devoicing passes run in this order.
const DEVOICING_ORDER: [char; 6] = ['б', 'г', 'в', 'д', 'з', 'ж'];
const WORD_FINAL_ORDER: [char; 6] = ['г', 'д', 'б', 'з', 'ж', 'в'];

fn is_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё')
}

fn letter_at(chars: &[char], i: usize) -> bool {
    chars.get(i).copied().is_some_and(is_letter)
}

fn matches_at(chars: &[char], i: usize, pattern: &str) -> bool {
    let mut k = i;
    for p in pattern.chars() {
        if chars.get(k) != Some(&p) {
            return false;
        }
        k += 1;
    }
    true
}

/// Unsoftened phonetic counterpart of a softening letter; `None` for the
/// soft sign, which leaves only the mark behind.
fn base_vowel(c: char) -> Option<char> {
    match c {
        'я' => Some('а'),
        'ё' => Some('о'),
        'ю' => Some('у'),
        'е' => Some('э'),
        'и' => Some('и'),
        _ => None,
    }
}

fn devoiced(c: char) -> char {
    match c {
        'б' => 'п',
        'в' => 'ф',
        'г' => 'к',
        'д' => 'т',
        'ж' => 'ш',
        'з' => 'с',
        other => other,
    }
}

/// Replaces word-final occurrences of `from` with `to` when `guard` accepts
/// the character preceding the match (`None` at text start).
fn replace_word_final(s: &str, from: &str, to: &str, guard: impl Fn(Option<char>) -> bool) -> String {
    let chars: Vec<char> = s.chars().collect();
    let len = from.chars().count();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        if matches_at(&chars, i, from) && !letter_at(&chars, i + len) && guard(prev) {
            out.push_str(to);
            i += len;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// "-ться"/"-тся" → "ца"; unstressed "-его"/"-ого" → "-ива"/"-ава";
/// stressed "-`ого" → "-`ова".
pub fn word_ending(s: &str) -> String {
    let s = replace_word_final(s, "ться", "ца", |_| true);
    let s = replace_word_final(&s, "тся", "ца", |_| true);
    let unmarked = |prev: Option<char>| prev != Some(STRESS_MARK);
    let s = replace_word_final(&s, "его", "ива", unmarked);
    let s = replace_word_final(&s, "ого", "ава", unmarked);
    replace_word_final(&s, "`ого", "`ова", |_| true)
}

/// Unstressed о → а, е → и (not after ь, not word-final),
/// я → и (inside a word only).
pub fn vowel_reduction(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let stressed = prev == Some(STRESS_MARK) || next == Some(STRESS_MARK);
            match c {
                'о' if !stressed => 'а',
                'е' if !stressed && prev != Some('ь') && letter_at(&chars, i + 1) => 'и',
                'я' if prev.is_some_and(is_letter) && letter_at(&chars, i + 1) => 'и',
                other => other,
            }
        })
        .collect()
}

/// Consonant + softening vowel or soft sign → consonant, softness mark,
/// base vowel. The stress mark stays attached to the vowel.
pub fn soften_vowels(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if SOFTENABLE.contains(c) {
            let stressed = chars.get(i + 1) == Some(&STRESS_MARK);
            let j = if stressed { i + 2 } else { i + 1 };
            if let Some(&v) = chars.get(j).filter(|v| SOFTENING.contains(**v)) {
                out.push(c);
                out.push(SOFT_MARK);
                if stressed {
                    out.push(STRESS_MARK);
                }
                if let Some(base) = base_vowel(v) {
                    out.push(base);
                }
                i = j + 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Positional softening: н before ч/щ, hard д т з с н before an already
/// soft д т з с н, and ч/щ always.
pub fn soften_consonants(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut pass: Vec<char> = Vec::with_capacity(chars.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        pass.push(c);
        if c == 'н' && matches!(chars.get(i + 1), Some('ч') | Some('щ')) {
            pass.push(SOFT_MARK);
        }
    }

    let assimilating = "дтзсн";
    let mut second: Vec<char> = Vec::with_capacity(pass.len() + 8);
    let mut i = 0;
    while i < pass.len() {
        let c = pass[i];
        let soft_neighbour = pass.get(i + 1).is_some_and(|n| assimilating.contains(*n))
            && pass.get(i + 2) == Some(&SOFT_MARK);
        if assimilating.contains(c) && soft_neighbour {
            second.extend([c, SOFT_MARK, pass[i + 1], SOFT_MARK]);
            i += 3;
        } else {
            second.push(c);
            i += 1;
        }
    }

    let mut out = String::with_capacity(second.len() + 8);
    for (i, &c) in second.iter().enumerate() {
        out.push(c);
        if matches!(c, 'ч' | 'щ') && second.get(i + 1) != Some(&SOFT_MARK) {
            out.push(SOFT_MARK);
        }
    }
    out
}

pub fn soften(s: &str) -> String {
    soften_consonants(&soften_vowels(s))
}

/// е ё ю я at text start or after a vowel, ъ, ь, softness mark or whitespace
/// become й + softness mark + base vowel. Any left over (after ж ш ц й)
/// become softness mark + base vowel.
pub fn iotation(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    let mut i = 0;
    while i < chars.len() {
        let stressed = chars[i] == STRESS_MARK;
        let v_at = if stressed { i + 1 } else { i };
        let Some(&v) = chars.get(v_at).filter(|v| IOTATED.contains(**v)) else {
            out.push(chars[i]);
            i += 1;
            continue;
        };
        let opens_syllable = match i.checked_sub(1).map(|p| chars[p]) {
            None => true,
            Some(p) => is_vowel(p) || matches!(p, 'ъ' | 'ь' | SOFT_MARK) || p.is_whitespace(),
        };
        if opens_syllable {
            out.push('й');
        }
        out.push(SOFT_MARK);
        if stressed {
            out.push(STRESS_MARK);
        }
        if let Some(base) = base_vowel(v) {
            out.push(base);
        }
        i = v_at + 1;
    }
    out
}

/// "сч" → a single soft "щ".
pub fn cluster_simplification(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == 'с' && chars.get(i + 1) == Some(&'ч') {
            out.push('щ');
            out.push(SOFT_MARK);
            i += 2;
            while chars.get(i) == Some(&SOFT_MARK) {
                i += 1;
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Regressive devoicing, word-final devoicing, and voicing across a
/// following space.
pub fn voicing_assimilation(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    let len = chars.len();

    for i in 0..len.saturating_sub(1) {
        if chars[i] == 'г' && chars[i + 1] == 'к' {
            chars[i] = 'х';
        }
    }

    for voiced in DEVOICING_ORDER {
        for i in 0..len.saturating_sub(1) {
            if chars[i] == voiced && VOICELESS.contains(chars[i + 1]) {
                chars[i] = devoiced(voiced);
            }
        }
    }

    for voiced in WORD_FINAL_ORDER {
        for i in 0..len {
            if chars[i] != voiced {
                continue;
            }
            let after_letter = i > 0 && matches!(chars[i - 1], 'а'..='я');
            // A trailing soft sign after ж ш ц is silent.
            let next = if chars.get(i + 1) == Some(&'ь') { i + 2 } else { i + 1 };
            let at_end = next >= len;
            let before_boundary = chars
                .get(next)
                .is_some_and(|&n| !is_letter(n) && n != STRESS_MARK && n != SOFT_MARK);
            if at_end || (after_letter && before_boundary) {
                chars[i] = devoiced(voiced);
            }
        }
    }

    for i in 0..len.saturating_sub(2) {
        if chars[i + 1] != ' ' {
            continue;
        }
        let starts_word = i == 0 || !is_letter(chars[i - 1]);
        if chars[i] == 'в' && starts_word && VOICELESS.contains(chars[i + 2]) {
            chars[i] = 'ф';
        } else if chars[i] == 'с' && VOICED_AFTER_S.contains(chars[i + 2]) {
            chars[i] = 'з';
        }
    }

    chars.into_iter().collect()
}

/// Drops ъ and any ь softening did not consume.
pub fn remove_signs(s: &str) -> String {
    s.chars().filter(|&c| c != 'ъ' && c != 'ь').collect()
}

/// Collapses horizontal whitespace runs to one space and strips spaces at
/// the start and end of every line. Newlines are kept.
pub fn normalize_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\n' {
            while out.ends_with(' ') {
                out.pop();
            }
            out.push('\n');
        } else if c.is_whitespace() {
            if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Drops stress marks and everything outside vowels, consonants, the
/// softness mark, space and newline. Doubled softness marks collapse.
pub fn simplify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let keep = is_vowel(c)
            || crate::core::types::is_consonant(c)
            || c == ' '
            || c == '\n'
            || (c == SOFT_MARK && !out.ends_with(SOFT_MARK));
        if keep {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    WordEnding,
    VowelReduction,
    Softening,
    Iotation,
    ClusterSimplification,
    VoicingAssimilation,
    SignRemoval,
    Whitespace,
    Simplify,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::WordEnding => "word_ending",
            Stage::VowelReduction => "vowel_reduction",
            Stage::Softening => "soften",
            Stage::Iotation => "iotation",
            Stage::ClusterSimplification => "sch",
            Stage::VoicingAssimilation => "deafen_and_sharpen",
            Stage::SignRemoval => "signs",
            Stage::Whitespace => "whitespace",
            Stage::Simplify => "simplify",
        }
    }

    pub fn apply(&self, s: &str) -> String {
        match self {
            Stage::WordEnding => word_ending(s),
            Stage::VowelReduction => vowel_reduction(s),
            Stage::Softening => soften(s),
            Stage::Iotation => iotation(s),
            Stage::ClusterSimplification => cluster_simplification(s),
            Stage::VoicingAssimilation => voicing_assimilation(s),
            Stage::SignRemoval => remove_signs(s),
            Stage::Whitespace => normalize_whitespace(s),
            Stage::Simplify => simplify(s),
        }
    }
}

/// Mandatory stages, in order. [`Stage::Simplify`] is appended on request.
pub const PIPELINE: [Stage; 8] = [
    Stage::WordEnding,
    Stage::VowelReduction,
    Stage::Softening,
    Stage::Iotation,
    Stage::ClusterSimplification,
    Stage::VoicingAssimilation,
    Stage::SignRemoval,
    Stage::Whitespace,
];

/// Runs the stages over lowercase stress-marked text, reporting each
/// intermediate result to `observe`.
pub fn run_pipeline(marked: &str, simplify: bool, mut observe: impl FnMut(Stage, &str)) -> String {
    let extra = simplify.then_some(Stage::Simplify);
    PIPELINE
        .iter()
        .copied()
        .chain(extra)
        .fold(marked.to_string(), |text, stage| {
            let next = stage.apply(&text);
            observe(stage, &next);
            next
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_endings() {
        assert_eq!(word_ending("мыться"), "мыца");
        assert_eq!(word_ending("учится в"), "учица в");
        assert_eq!(word_ending("отсядь"), "отсядь");
        assert_eq!(word_ending("синего"), "синива");
        assert_eq!(word_ending("его"), "ива");
        assert_eq!(word_ending("ег`о"), "ег`о");
        assert_eq!(word_ending("кр`асного дома"), "кр`аснава дома");
        assert_eq!(word_ending("больш`ого"), "больш`ова");
    }

    #[test]
    fn test_vowel_reduction() {
        assert_eq!(vowel_reduction("молок`о"), "малак`о");
        assert_eq!(vowel_reduction("п`оле"), "п`оле");
        assert_eq!(vowel_reduction("лес`а"), "лис`а");
        assert_eq!(vowel_reduction("`язык"), "`язык");
        assert_eq!(vowel_reduction("тяжел`о"), "тижил`о");
        assert_eq!(vowel_reduction("по`ет"), "по`ет");
        assert_eq!(vowel_reduction("семья"), "симья");
    }

    #[test]
    fn test_softening() {
        assert_eq!(soften("мяч"), "м'ач'");
        assert_eq!(soften("пь`ю"), "п'`ю");
        assert_eq!(soften("дети"), "д'эт'и");
        assert_eq!(soften("пончик"), "пон'ч'ик");
        assert_eq!(soften("гвоздь"), "гвоз'д'");
        assert_eq!(soften("л`юди"), "л'`уд'и");
        assert_eq!(soften("шест"), "шест");
    }

    #[test]
    fn test_iotation() {
        assert_eq!(iotation("`яма"), "й'`ама");
        assert_eq!(iotation("мо`я"), "мой'`а");
        assert_eq!(iotation("п'`ю"), "п'й'`у");
        assert_eq!(iotation("съ`ел"), "съй'`эл");
        assert_eq!(iotation("шь`ют"), "шьй'`ут");
        assert_eq!(iotation("я и ты"), "й'а и ты");
        assert_eq!(iotation("шест"), "ш'эст");
    }

    #[test]
    fn test_cluster_simplification() {
        assert_eq!(cluster_simplification("сч'`астйэ"), "щ'`астйэ");
        assert_eq!(cluster_simplification("сч"), "щ'");
        assert_eq!(cluster_simplification("щ'ука"), "щ'ука");
    }

    #[test]
    fn test_voicing_assimilation() {
        assert_eq!(voicing_assimilation("дуб"), "дуп");
        assert_eq!(voicing_assimilation("дуб лес"), "дуп лес");
        assert_eq!(voicing_assimilation("лодка"), "лотка");
        assert_eq!(voicing_assimilation("мягкий"), "мяхкий");
        assert_eq!(voicing_assimilation("трава травка"), "трава трафка");
        assert_eq!(voicing_assimilation("в парк"), "ф парк");
        assert_eq!(voicing_assimilation("с дом"), "з дом");
        assert_eq!(voicing_assimilation("глаз\nнос"), "глас\nнос");
        assert_eq!(voicing_assimilation("гвоз'д'"), "гвоз'д'");
    }

    #[test]
    fn test_sign_removal_and_whitespace() {
        assert_eq!(remove_signs("подъезд"), "подезд");
        assert_eq!(remove_signs("р`ожь"), "р`ож");
        assert_eq!(normalize_whitespace("  а  б\n  в \t г"), "а б\nв г");
        assert_eq!(normalize_whitespace("а \t\nб  \n"), "а\nб\n");
    }

    #[test]
    fn test_soft_sign_after_unpaired_consonant() {
        assert_eq!(iotation("шь`ю"), "шьй'`у");
        assert_eq!(run_pipeline("шь`ю", false, |_, _| {}), "шй'`у");
        assert_eq!(run_pipeline("шь`ю", true, |_, _| {}), "шй'у");

        assert_eq!(voicing_assimilation("р`ожь"), "р`ошь");
        assert_eq!(voicing_assimilation("р`ожь `и"), "р`ошь `и");
        assert_eq!(run_pipeline("р`ожь", false, |_, _| {}), "р`ош");
    }

    #[test]
    fn test_simplify() {
        assert_eq!(simplify("й'`ама, т''"), "й'ама т'");
        assert_eq!(simplify("к`от.\nрожь"), "кот\nрож");
    }

    #[test]
    fn test_pipeline_order_and_observer() {
        let mut seen = Vec::new();
        let out = run_pipeline("д`уб", true, |stage, _| seen.push(stage));
        assert_eq!(out, "дуп");
        assert_eq!(seen.len(), PIPELINE.len() + 1);
        assert_eq!(seen.last(), Some(&Stage::Simplify));

        let out = run_pipeline("счастье", false, |_, _| {});
        assert_eq!(out, "щ'ас'т'й'э");
    }
}
