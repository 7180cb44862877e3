/// Reading-time budget allocation.
///
/// Splits an ordered section list into a visible prefix set and a hidden
/// remainder, bounded by the depth's cumulative reading-time budget.

use crate::schema::section::Section;

/// A section annotated with its budget visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocatedSection<'a> {
    pub section: &'a Section,
    pub hidden: bool,
}

/// Estimated minutes to read `text` at `words_per_minute`.
///
/// Whitespace-only text takes no time.
pub fn estimate_minutes_for_text(text: &str, words_per_minute: f64) -> f64 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }
    words as f64 / words_per_minute
}

/// Estimated reading minutes for a section.
///
/// A positive `reading_time_sec` is authoritative; otherwise the estimate
/// comes from the word count of `content`.
pub fn estimate_section_minutes(section: &Section, content: &str, words_per_minute: f64) -> f64 {
    match section.reading_time_sec {
        Some(seconds) if seconds > 0.0 => seconds / 60.0,
        _ => estimate_minutes_for_text(content, words_per_minute),
    }
}

/// Greedy budget admission over `ordered`.
///
/// The first section is always visible. Each later section is visible iff it
/// still fits on top of the minutes admitted so far; a hidden section adds
/// nothing, so a shorter section after it can still fit. Output keeps input
/// order.
pub fn allocate<'a, F>(
    ordered: &[&'a Section],
    budget_minutes: f64,
    words_per_minute: f64,
    content_of: F,
) -> Vec<AllocatedSection<'a>>
where
    F: Fn(&'a Section) -> &'a str,
{
    let mut cumulative = 0.0;
    ordered
        .iter()
        .enumerate()
        .map(|(i, &section)| {
            let minutes = estimate_section_minutes(section, content_of(section), words_per_minute);
            let visible = i == 0 || cumulative + minutes <= budget_minutes;
            if visible {
                cumulative += minutes;
            }
            AllocatedSection {
                section,
                hidden: !visible,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WPM: f64 = 200.0;

    fn timed(id: &str, seconds: f64) -> Section {
        let mut s = Section::new(id, "castle", id, "Some words here.", 50);
        s.reading_time_sec = Some(seconds);
        s
    }

    fn words(id: &str, count: usize) -> Section {
        let content = vec!["word"; count].join(" ");
        Section::new(id, "castle", id, content, 50)
    }

    fn hidden_flags(allocated: &[AllocatedSection<'_>]) -> Vec<bool> {
        allocated.iter().map(|a| a.hidden).collect()
    }

    #[test]
    fn estimate_from_words() {
        assert!((estimate_minutes_for_text("one two three four", 2.0) - 2.0).abs() < 1e-9);
        assert_eq!(estimate_minutes_for_text("   \n\n  ", WPM), 0.0);
        assert_eq!(estimate_minutes_for_text("", WPM), 0.0);
    }

    #[test]
    fn reading_time_override_wins() {
        let section = timed("t", 90.0);
        let minutes = estimate_section_minutes(&section, &"word ".repeat(1000), WPM);
        assert!((minutes - 1.5).abs() < 1e-9);
    }

    #[test]
    fn non_positive_override_falls_back_to_words() {
        let mut section = words("w", 400);
        section.reading_time_sec = Some(0.0);
        let minutes = estimate_section_minutes(&section, &section.content, WPM);
        assert!((minutes - 2.0).abs() < 1e-9);

        section.reading_time_sec = Some(-30.0);
        let minutes = estimate_section_minutes(&section, &section.content, WPM);
        assert!((minutes - 2.0).abs() < 1e-9);
    }

    #[test]
    fn skips_overflow_and_keeps_evaluating() {
        let sections = vec![timed("a", 48.0), timed("b", 30.0), timed("c", 6.0)];
        let ordered: Vec<&Section> = sections.iter().collect();
        let allocated = allocate(&ordered, 1.0, WPM, |s| s.content.as_str());
        assert_eq!(hidden_flags(&allocated), vec![false, true, false]);
    }

    #[test]
    fn first_section_always_visible() {
        let sections = vec![words("huge", 2000), words("small", 10)];
        let ordered: Vec<&Section> = sections.iter().collect();
        let allocated = allocate(&ordered, 1.0, WPM, |s| s.content.as_str());
        assert_eq!(hidden_flags(&allocated), vec![false, true]);
    }

    #[test]
    fn preserves_order() {
        let sections = vec![words("x", 10), words("y", 10), words("z", 10)];
        let ordered: Vec<&Section> = sections.iter().collect();
        let allocated = allocate(&ordered, 5.0, WPM, |s| s.content.as_str());
        let ids: Vec<&str> = allocated.iter().map(|a| a.section.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        assert!(allocated.iter().all(|a| !a.hidden));
    }

    #[test]
    fn uses_supplied_content() {
        // Base content is short, but the resolved content is long.
        let sections = vec![words("lead", 10), words("next", 10)];
        let long = "word ".repeat(400);
        let ordered: Vec<&Section> = sections.iter().collect();
        let allocated = allocate(&ordered, 1.0, WPM, |_| long.as_str());
        assert_eq!(hidden_flags(&allocated), vec![false, true]);
    }

    #[test]
    fn empty_input() {
        assert!(allocate(&[], 1.0, WPM, |s| s.content.as_str()).is_empty());
    }
}
