/// Section Linter: validates section bundles before they ship.
///
/// Usage: section_linter <bundle_or_dir> [--wpm <n>]

use narrative_playback::core::budget::estimate_section_minutes;
use narrative_playback::core::segment::{flatten, segment};
use narrative_playback::core::store::SectionBundle;
use narrative_playback::schema::profile::PresentationStyle;
use narrative_playback::schema::section::{Section, ThematicAxis};
use std::collections::HashSet;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: section_linter <bundle_or_dir> [--wpm <n>]");
        process::exit(0);
    }

    let bundle_path = Path::new(&args[1]);
    let mut words_per_minute = 200.0;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--wpm" if i + 1 < args.len() => {
                i += 1;
                words_per_minute = match parse_wpm(&args[i]) {
                    Some(wpm) => wpm,
                    None => {
                        eprintln!("ERROR: --wpm must be a positive number, got '{}'", args[i]);
                        eprintln!("Usage: section_linter <bundle_or_dir> [--wpm <n>]");
                        process::exit(1);
                    }
                };
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: section_linter <bundle_or_dir> [--wpm <n>]");
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut sections = Vec::new();
    if bundle_path.is_file() {
        match SectionBundle::load_from_ron(bundle_path) {
            Ok(bundle) => sections.extend(bundle.sections),
            Err(e) => {
                eprintln!("ERROR: Failed to load bundle: {}", e);
                process::exit(1);
            }
        }
    } else if bundle_path.is_dir() {
        load_bundles_recursive(bundle_path, &mut sections);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", bundle_path.display());
        process::exit(1);
    }

    println!("Loaded {} sections", sections.len());

    let (errors, warnings) = lint_sections(&sections, words_per_minute);

    println!("\n=== Section Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn parse_wpm(arg: &str) -> Option<f64> {
    arg.parse::<f64>()
        .ok()
        .filter(|wpm| wpm.is_finite() && *wpm > 0.0)
}

fn load_bundles_recursive(dir: &Path, sections: &mut Vec<Section>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_bundles_recursive(&path, sections);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match SectionBundle::load_from_ron(&path) {
                    Ok(bundle) => {
                        println!("  Loaded: {}", path.display());
                        sections.extend(bundle.sections);
                    }
                    Err(e) => {
                        eprintln!("  ERROR loading {}: {}", path.display(), e);
                    }
                }
            }
        }
    }
}

fn lint_sections(sections: &[Section], words_per_minute: f64) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for section in sections {
        let id = &section.id;

        // Ids are unique across subjects, not just within one
        if !seen.insert(id.as_str()) {
            errors.push(format!("Duplicate section id '{}'", id));
        }

        if section.importance > 100 {
            errors.push(format!(
                "Section '{}' has importance {} (must be 0-100)",
                id, section.importance
            ));
        }

        if let Some(ref scores) = section.thematic_scores {
            for axis in ThematicAxis::ALL {
                if let Some(value) = scores.get(axis) {
                    if !(0.0..=100.0).contains(&value) {
                        errors.push(format!(
                            "Section '{}' has {} score {} (must be 0-100)",
                            id,
                            axis.name(),
                            value
                        ));
                    }
                }
            }
        }

        if section.variants.contains_key(PresentationStyle::DEFAULT) {
            errors.push(format!(
                "Section '{}' defines a '{}' variant; base content already serves that style",
                id,
                PresentationStyle::DEFAULT
            ));
        }

        if section.content.trim().is_empty() {
            errors.push(format!("Section '{}' has empty content", id));
        } else if flatten(&segment(&section.content)).is_empty() {
            warnings.push(format!("Section '{}' produces no narratable sentences", id));
        }

        for (style, variant) in &section.variants {
            if variant.content.trim().is_empty() {
                errors.push(format!(
                    "Section '{}' has empty content in variant '{}'",
                    id, style
                ));
            }
        }

        if let Some(seconds) = section.reading_time_sec {
            if !seconds.is_finite() || seconds <= 0.0 {
                errors.push(format!(
                    "Section '{}' has readingTimeSec {} (must be positive)",
                    id, seconds
                ));
            }
        }

        match section.teaser {
            Some(ref teaser) if teaser.trim().is_empty() => {
                warnings.push(format!("Section '{}' has an empty teaser", id));
            }
            None => {
                warnings.push(format!(
                    "Section '{}' has no teaser (proposals will show the title)",
                    id
                ));
            }
            _ => {}
        }

        if section.thematic_scores.is_none() {
            warnings.push(format!(
                "Section '{}' has no thematic scores (ranks on importance alone)",
                id
            ));
        }

        let minutes = estimate_section_minutes(section, &section.content, words_per_minute);
        if minutes > 10.0 {
            warnings.push(format!(
                "Section '{}' reads for {:.1} minutes; longer than any default budget",
                id, minutes
            ));
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wpm_must_be_positive_and_finite() {
        assert_eq!(parse_wpm("180"), Some(180.0));
        assert_eq!(parse_wpm("0"), None);
        assert_eq!(parse_wpm("-50"), None);
        assert_eq!(parse_wpm("inf"), None);
        assert_eq!(parse_wpm("fast"), None);
    }

    #[test]
    fn duplicate_ids_and_default_variant_are_errors() {
        let mut first = Section::new("a", "castle", "A", "A.", 10);
        first.variants.insert(
            PresentationStyle::DEFAULT.to_string(),
            narrative_playback::schema::section::Variant {
                title: None,
                content: "A again.".to_string(),
            },
        );
        let second = Section::new("a", "castle", "A2", "A2.", 10);
        let (errors, _) = lint_sections(&[first, second], 200.0);
        assert_eq!(errors.len(), 2);
    }
}
