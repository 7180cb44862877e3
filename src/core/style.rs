/// Style variant resolution: picks a section's title/content for a presentation style.

use crate::core::budget::AllocatedSection;
use crate::schema::profile::PresentationStyle;
use crate::schema::section::{Section, SectionId};

/// A section's title and content as shown under one presentation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDisplay<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

/// Resolve the title/content of `section` for `style`.
///
/// The default style, or a style the section has no variant for, yields the
/// base title/content. A variant without its own title keeps the base title.
pub fn resolve<'a>(section: &'a Section, style: &PresentationStyle) -> SectionDisplay<'a> {
    if !style.is_default() {
        if let Some(variant) = section.variant(style.name()) {
            return SectionDisplay {
                title: variant.title.as_deref().unwrap_or(&section.title),
                content: &variant.content,
            };
        }
    }
    SectionDisplay {
        title: &section.title,
        content: &section.content,
    }
}

/// A section resolved under the current style, with its budget visibility.
///
/// `hidden` is the allocator's verdict; disclosure does not rewrite it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSection {
    pub section: Section,
    pub display_title: String,
    pub display_content: String,
    pub hidden: bool,
}

impl ResolvedSection {
    pub fn id(&self) -> &SectionId {
        &self.section.id
    }
}

/// Resolve every allocated section under `style`, keeping order.
pub fn resolve_all(
    allocated: &[AllocatedSection<'_>],
    style: &PresentationStyle,
) -> Vec<ResolvedSection> {
    allocated
        .iter()
        .map(|entry| {
            let display = resolve(entry.section, style);
            ResolvedSection {
                section: entry.section.clone(),
                display_title: display.title.to_string(),
                display_content: display.content.to_string(),
                hidden: entry.hidden,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::section::Variant;

    fn make_section() -> Section {
        let mut section = Section::new(
            "gate",
            "castle",
            "The Gatehouse",
            "The gatehouse guarded the only entrance.",
            70,
        );
        section.variants.insert(
            "children".to_string(),
            Variant {
                title: Some("The Big Gate".to_string()),
                content: "A huge gate kept the castle safe!".to_string(),
            },
        );
        section.variants.insert(
            "casual".to_string(),
            Variant {
                title: None,
                content: "So, this gate was basically the front door.".to_string(),
            },
        );
        section
    }

    #[test]
    fn default_style_returns_base() {
        let section = make_section();
        let display = resolve(&section, &PresentationStyle::default());
        assert_eq!(display.title, "The Gatehouse");
        assert_eq!(display.content, "The gatehouse guarded the only entrance.");
    }

    #[test]
    fn unknown_style_falls_back_to_base() {
        let section = make_section();
        let display = resolve(&section, &PresentationStyle::new("pirate"));
        assert_eq!(display.title, section.title);
        assert_eq!(display.content, section.content);
    }

    #[test]
    fn variant_with_title() {
        let section = make_section();
        let display = resolve(&section, &PresentationStyle::new("children"));
        assert_eq!(display.title, "The Big Gate");
        assert_eq!(display.content, "A huge gate kept the castle safe!");
    }

    #[test]
    fn variant_without_title_keeps_base_title() {
        let section = make_section();
        let display = resolve(&section, &PresentationStyle::new("casual"));
        assert_eq!(display.title, "The Gatehouse");
        assert_eq!(display.content, "So, this gate was basically the front door.");
    }

    #[test]
    fn stray_default_variant_is_ignored() {
        let mut section = make_section();
        section.variants.insert(
            "default".to_string(),
            Variant {
                title: None,
                content: "should never be used".to_string(),
            },
        );
        let display = resolve(&section, &PresentationStyle::default());
        assert_eq!(display.content, "The gatehouse guarded the only entrance.");
    }

    #[test]
    fn resolve_all_carries_hidden_flag() {
        let gate = make_section();
        let well = Section::new("well", "castle", "The Well", "A deep well.", 30);
        let allocated = vec![
            AllocatedSection {
                section: &gate,
                hidden: false,
            },
            AllocatedSection {
                section: &well,
                hidden: true,
            },
        ];
        let resolved = resolve_all(&allocated, &PresentationStyle::new("children"));
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].display_title, "The Big Gate");
        assert!(!resolved[0].hidden);
        assert_eq!(resolved[1].display_title, "The Well");
        assert_eq!(resolved[1].display_content, "A deep well.");
        assert!(resolved[1].hidden);
    }
}
