/// Thematic relevance of a section against the user's interests.

use crate::schema::profile::UserPreferenceProfile;
use crate::schema::section::Section;

/// Mean of the section's scores on the axes the user's interests map to.
///
/// Axes the section has no value for are left out of the mean rather than
/// counted as zero. Returns 0 when nothing could be collected (no interests,
/// no mapped axes, or no thematic metadata on the section).
///
/// Each interest contributes on its own, so two interests sharing an axis
/// count that axis twice.
pub fn thematic_score(section: &Section, profile: &UserPreferenceProfile) -> f64 {
    let Some(scores) = section.thematic_scores.as_ref() else {
        return 0.0;
    };

    let mut total = 0.0;
    let mut count = 0u32;
    for interest in &profile.interests {
        let Some(axis) = interest.axis() else {
            continue;
        };
        if let Some(value) = scores.get(axis) {
            total += value;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        total / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::profile::{DepthPreference, InterestTag};
    use crate::schema::section::{ThematicAxis, ThematicScores};

    fn scored_section(scores: ThematicScores) -> Section {
        let mut section = Section::new("s", "castle", "T", "Text.", 50);
        section.thematic_scores = Some(scores);
        section
    }

    fn profile(interests: &[InterestTag]) -> UserPreferenceProfile {
        UserPreferenceProfile::new(interests, DepthPreference::Normal, "default")
    }

    #[test]
    fn mean_of_defined_axes() {
        let section = scored_section(
            ThematicScores::default()
                .with(ThematicAxis::History, 80.0)
                .with(ThematicAxis::Architecture, 40.0),
        );
        let score = thematic_score(
            &section,
            &profile(&[InterestTag::History, InterestTag::Architecture]),
        );
        assert!((score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn missing_axes_are_excluded_not_zeroed() {
        let section = scored_section(ThematicScores::default().with(ThematicAxis::History, 80.0));
        let score = thematic_score(
            &section,
            &profile(&[InterestTag::History, InterestTag::Defense]),
        );
        assert!((score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn no_interests_scores_zero() {
        let section = scored_section(ThematicScores::default().with(ThematicAxis::History, 80.0));
        assert_eq!(thematic_score(&section, &profile(&[])), 0.0);
    }

    #[test]
    fn no_thematic_metadata_scores_zero() {
        let section = Section::new("s", "castle", "T", "Text.", 50);
        assert_eq!(thematic_score(&section, &profile(&[InterestTag::History])), 0.0);
    }

    #[test]
    fn shared_axis_counts_per_interest() {
        let section = scored_section(
            ThematicScores::default()
                .with(ThematicAxis::Culture, 90.0)
                .with(ThematicAxis::History, 30.0),
        );
        // legends + art both map to culture: (90 + 90 + 30) / 3
        let score = thematic_score(
            &section,
            &profile(&[InterestTag::Legends, InterestTag::Art, InterestTag::History]),
        );
        assert!((score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn many_interests_are_tolerated() {
        let section = scored_section(ThematicScores::default().with(ThematicAxis::Military, 50.0));
        let score = thematic_score(&section, &profile(&InterestTag::ALL));
        assert!((score - 50.0).abs() < 1e-9);
    }
}
