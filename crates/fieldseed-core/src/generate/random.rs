//! # Random Value Provider
//!
//! `RandomSource` owns the seeded RNG for a whole run and hands out scalar
//! values: vocabulary picks, numeric ranges, dates relative to a pinned
//! "today", and faker-backed names, addresses and prose. Every generator
//! receives the same `&mut RandomSource`, so a fixed seed and base date
//! reproduce the dataset exactly.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};
use fake::faker::address::en::*;
use fake::faker::company::en::*;
use fake::faker::internet::en::*;
use fake::faker::lorem::en::*;
use fake::faker::name::en::*;
use fake::faker::phone_number::en::*;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DAYS_PER_YEAR: i64 = 365;
pub const DAYS_PER_MONTH: i64 = 30;

const SECONDS_PER_DAY: i64 = 86_400;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days up to and including `today`.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self::new(today - ChronoDuration::days(days), today)
    }

    /// From `today` through `days` days ahead.
    pub fn next_days(today: NaiveDate, days: i64) -> Self {
        Self::new(today, today + ChronoDuration::days(days))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Seeded random source shared by every generator in a run.
pub struct RandomSource {
    rng: StdRng,
    today: NaiveDate,
}

impl RandomSource {
    pub fn new(seed: u64, today: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            today,
        }
    }

    /// The pinned "current" date all relative windows are computed from.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    // --- scalars ---

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// `Some(f(self))` on heads, `None` on tails.
    pub fn maybe<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.coin() {
            Some(f(self))
        } else {
            None
        }
    }

    /// Uniform pick from a non-empty constant vocabulary.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.random_range(0..items.len())]
    }

    /// Uniform integer in `low..=high`.
    pub fn int(&mut self, low: i64, high: i64) -> i64 {
        self.rng.random_range(low..=high)
    }

    /// Uniform float in `low..high`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.random_range(low..high)
    }

    /// Distinct indices into a population of `len`, at most `amount` of them,
    /// in random order.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }

    // --- dates ---

    /// Uniform date in the window. A reversed window collapses to its start.
    pub fn date_in(&mut self, window: DateWindow) -> NaiveDate {
        let span = (window.end - window.start).num_days();
        if span <= 0 {
            return window.start;
        }
        window.start + ChronoDuration::days(self.rng.random_range(0..=span))
    }

    /// Uniform date between `start` and `today`, or `start` when it is
    /// already in the future.
    pub fn date_since(&mut self, start: NaiveDate) -> NaiveDate {
        let end = start.max(self.today);
        self.date_in(DateWindow::new(start, end))
    }

    /// Random wall-clock time on the given date.
    pub fn time_on(&mut self, date: NaiveDate) -> NaiveDateTime {
        let seconds = self.rng.random_range(0..SECONDS_PER_DAY);
        date.and_time(NaiveTime::MIN) + ChronoDuration::seconds(seconds)
    }

    /// Uniform timestamp between `start` and `end` (second resolution).
    pub fn datetime_between(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        let span = (end - start).num_seconds();
        if span <= 0 {
            return start;
        }
        start + ChronoDuration::seconds(self.rng.random_range(0..=span))
    }

    // --- vocabulary ---

    pub fn company(&mut self) -> String {
        CompanyName().fake_with_rng(&mut self.rng)
    }

    pub fn person_name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    pub fn first_name(&mut self) -> String {
        FirstName().fake_with_rng(&mut self.rng)
    }

    pub fn last_name(&mut self) -> String {
        LastName().fake_with_rng(&mut self.rng)
    }

    pub fn phone(&mut self) -> String {
        PhoneNumber().fake_with_rng(&mut self.rng)
    }

    pub fn email(&mut self) -> String {
        SafeEmail().fake_with_rng(&mut self.rng)
    }

    /// Single-line postal address.
    pub fn address(&mut self) -> String {
        let number: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        let city: String = CityName().fake_with_rng(&mut self.rng);
        let state: String = StateAbbr().fake_with_rng(&mut self.rng);
        let zip: String = ZipCode().fake_with_rng(&mut self.rng);
        format!("{} {}, {}, {} {}", number, street, city, state, zip)
    }

    /// A lorem word with its first letter capitalized.
    pub fn title_word(&mut self) -> String {
        let word: String = Word().fake_with_rng(&mut self.rng);
        capitalize(&word)
    }

    pub fn sentence(&mut self) -> String {
        Sentence(4..10).fake_with_rng(&mut self.rng)
    }

    /// Prose of at most `max_chars` characters, built from whole sentences.
    pub fn text(&mut self, max_chars: usize) -> String {
        let mut text = String::new();
        loop {
            let sentence = self.sentence();
            let needed = if text.is_empty() {
                sentence.len()
            } else {
                sentence.len() + 1
            };
            if text.len() + needed > max_chars {
                if text.is_empty() {
                    text = truncate_words(&sentence, max_chars);
                }
                return text;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&sentence);
        }
    }

    /// Fill a pattern: `#` becomes a digit, `?` an upper-case letter.
    pub fn bothify(&mut self, pattern: &str) -> String {
        pattern
            .chars()
            .map(|c| match c {
                '#' => char::from(b'0' + self.rng.random_range(0..10u8)),
                '?' => char::from(b'A' + self.rng.random_range(0..26u8)),
                other => other,
            })
            .collect()
    }
}

/// Round to one decimal place (durations, ratings).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Cut a sentence to `max_chars` on a word boundary and close it with a period.
fn truncate_words(sentence: &str, max_chars: usize) -> String {
    let mut out = String::new();
    for word in sentence.trim_end_matches('.').split_whitespace() {
        let needed = if out.is_empty() { word.len() } else { word.len() + 1 };
        if out.len() + needed + 1 > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    if !out.is_empty() {
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_same_seed_same_values() {
        let mut a = RandomSource::new(7, today());
        let mut b = RandomSource::new(7, today());
        for _ in 0..20 {
            assert_eq!(a.int(0, 1_000_000), b.int(0, 1_000_000));
            assert_eq!(a.company(), b.company());
            assert_eq!(a.address(), b.address());
        }
    }

    #[test]
    fn test_date_in_stays_in_window() {
        let mut random = RandomSource::new(1, today());
        let window = DateWindow::last_days(today(), 30);
        for _ in 0..500 {
            assert!(window.contains(random.date_in(window)));
        }
    }

    #[test]
    fn test_reversed_window_collapses_to_start() {
        let mut random = RandomSource::new(1, today());
        let start = today() + ChronoDuration::days(10);
        let window = DateWindow::new(start, today());
        assert_eq!(random.date_in(window), start);
        assert_eq!(random.date_since(start), start);
    }

    #[test]
    fn test_time_on_keeps_the_date() {
        let mut random = RandomSource::new(3, today());
        for _ in 0..100 {
            assert_eq!(random.time_on(today()).date(), today());
        }
    }

    #[test]
    fn test_text_respects_max_chars() {
        let mut random = RandomSource::new(11, today());
        for max in [20, 150, 200, 300] {
            for _ in 0..20 {
                let text = random.text(max);
                assert!(text.len() <= max, "{} > {}: {}", text.len(), max, text);
            }
        }
    }

    #[test]
    fn test_bothify() {
        let mut random = RandomSource::new(5, today());
        let serial = random.bothify("??##-####-####");
        assert_eq!(serial.len(), 14);
        let chars: Vec<char> = serial.chars().collect();
        assert!(chars[0].is_ascii_uppercase() && chars[1].is_ascii_uppercase());
        assert!(chars[2].is_ascii_digit() && chars[3].is_ascii_digit());
        assert_eq!(chars[4], '-');
    }

    #[test]
    fn test_sample_indices_are_distinct_and_clamped() {
        let mut random = RandomSource::new(9, today());
        let picked = random.sample_indices(10, 25);
        assert_eq!(picked.len(), 10);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round1(3.14159), 3.1);
        assert_eq!(round2(3.14159), 3.14);
    }
}
