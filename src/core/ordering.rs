/// Section ordering by importance, then thematic relevance, then id.

use std::cmp::Ordering;

use crate::core::scoring::thematic_score;
use crate::schema::profile::UserPreferenceProfile;
use crate::schema::section::Section;

/// Order sections for reading.
///
/// Sort key: importance descending, thematic score descending, id ascending.
/// Thematic score only breaks importance ties. The id tie-break makes the
/// result a total order, independent of input order.
pub fn order_sections<'a>(
    sections: &'a [Section],
    profile: &UserPreferenceProfile,
) -> Vec<&'a Section> {
    if sections.len() <= 1 {
        return sections.iter().collect();
    }

    let mut scored: Vec<(&Section, f64)> = sections
        .iter()
        .map(|section| (section, thematic_score(section, profile)))
        .collect();

    scored.sort_by(|(a, a_score), (b, b_score)| compare(a, *a_score, b, *b_score));

    scored.into_iter().map(|(section, _)| section).collect()
}

fn compare(a: &Section, a_score: f64, b: &Section, b_score: f64) -> Ordering {
    b.importance
        .cmp(&a.importance)
        .then_with(|| b_score.total_cmp(&a_score))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::profile::{DepthPreference, InterestTag};
    use crate::schema::section::{ThematicAxis, ThematicScores};

    fn section(id: &str, importance: u8, history: Option<f64>) -> Section {
        let mut s = Section::new(id, "castle", id, "Text.", importance);
        if let Some(h) = history {
            s.thematic_scores = Some(ThematicScores::default().with(ThematicAxis::History, h));
        }
        s
    }

    fn history_fan() -> UserPreferenceProfile {
        UserPreferenceProfile::new(&[InterestTag::History], DepthPreference::Normal, "default")
    }

    fn ids(ordered: &[&Section]) -> Vec<String> {
        ordered.iter().map(|s| s.id.0.clone()).collect()
    }

    #[test]
    fn thematic_score_breaks_importance_ties() {
        let sections = vec![section("b", 90, Some(10.0)), section("a", 90, Some(80.0))];
        assert_eq!(ids(&order_sections(&sections, &history_fan())), vec!["a", "b"]);

        let sections = vec![section("a", 90, Some(10.0)), section("b", 90, Some(80.0))];
        assert_eq!(ids(&order_sections(&sections, &history_fan())), vec!["b", "a"]);
    }

    #[test]
    fn importance_outranks_thematic_fit() {
        let sections = vec![section("perfect", 20, Some(100.0)), section("major", 95, Some(0.0))];
        assert_eq!(
            ids(&order_sections(&sections, &history_fan())),
            vec!["major", "perfect"]
        );
    }

    #[test]
    fn id_is_final_tie_break() {
        let sections = vec![section("c", 50, None), section("a", 50, None), section("b", 50, None)];
        assert_eq!(
            ids(&order_sections(&sections, &history_fan())),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn no_interests_orders_by_importance_only() {
        let sections = vec![
            section("x", 10, Some(100.0)),
            section("y", 60, Some(0.0)),
            section("z", 60, Some(90.0)),
        ];
        let ordered = order_sections(&sections, &UserPreferenceProfile::default());
        assert_eq!(ids(&ordered), vec!["y", "z", "x"]);
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(order_sections(&[], &history_fan()).is_empty());
        let one = vec![section("solo", 1, None)];
        assert_eq!(ids(&order_sections(&one, &history_fan())), vec!["solo"]);
    }
}
