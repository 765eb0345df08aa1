//! The compiled-in template catalog

use crate::element::{ButtonContent, ElementSeed, Icon};
use crate::error::CompositionError;
use crate::theme::{ThemeError, ThemeSet};

use super::page::{PageInfo, PageKey};
use super::pages::{self, *};
use super::registry::{TemplateCategory, TemplateDefinition, TemplateRegistry};

const BISTRO_THEMES: &str = r##"
[themes.default]
primary = "#7a2e1f"
secondary = "#2b2118"
accent = "#d98e04"
highlight = "#fff4e0"

[themes.olive]
primary = "#4f5d2f"
secondary = "#1f2616"
accent = "#c9a227"
highlight = "#f4f1e1"

[themes.midnight]
primary = "#1b1f3b"
secondary = "#0d0f1e"
accent = "#e94560"
highlight = "#f5f5f5"
"##;

const STUDIO_THEMES: &str = r##"
[themes.default]
primary = "#111111"
secondary = "#333333"
accent = "#ff5a36"
highlight = "#fafafa"

[themes.pastel]
primary = "#6c5b7b"
secondary = "#355c7d"
accent = "#f67280"
highlight = "#fdf6f0"
"##;

const CLINIC_THEMES: &str = r##"
[themes.default]
primary = "#0b6e8a"
secondary = "#1d3557"
accent = "#2a9d8f"
highlight = "#f1faee"

[themes.calm]
primary = "#457b9d"
secondary = "#1d3557"
accent = "#a8dadc"
highlight = "#ffffff"

[themes.warm]
primary = "#9c6644"
secondary = "#3d2b1f"
accent = "#e6b8a2"
highlight = "#fff8f0"
"##;

/// Build the catalog; invalid entries are logged and left out
pub(super) fn build() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    for definition in [bistro(), studio(), clinic()] {
        let registered = definition
            .map_err(CompositionError::from)
            .and_then(|def| registry.register(def).map_err(CompositionError::from));
        if let Err(error) = registered {
            tracing::error!(%error, "skipping invalid built-in template");
        }
    }
    registry
}

fn definition(
    id: &str,
    name: &str,
    category: TemplateCategory,
    page_list: &[(PageKey, &str)],
    palette: &str,
    elements: Vec<ElementSeed>,
) -> Result<TemplateDefinition, ThemeError> {
    let keys: Vec<PageKey> = page_list.iter().map(|(key, _)| *key).collect();
    let (edit_pages, display_pages) = pages::tables(&keys);
    Ok(TemplateDefinition {
        id: id.to_string(),
        name: name.to_string(),
        category,
        pages: page_list
            .iter()
            .map(|(key, page_name)| PageInfo::new(format!("{id}-{key}"), *page_name, *key))
            .collect(),
        themes: ThemeSet::from_toml(palette)?,
        edit_pages,
        display_pages,
        elements,
    })
}

/// Header and footer elements, saved with the home page
fn chrome(brand: &str, tagline: &str, social: Icon, newsletter: &str) -> Vec<ElementSeed> {
    let home = PageKey::Home;
    vec![
        ElementSeed::text(home, NAV_BRAND, brand),
        ElementSeed::text(home, FOOTER_TAGLINE, tagline),
        ElementSeed::icon(home, FOOTER_SOCIAL, social),
        ElementSeed::text(home, NEWSLETTER_TITLE, newsletter),
        ElementSeed::button(home, NEWSLETTER_BUTTON, ButtonContent::new("Subscribe")),
        ElementSeed::button(
            home,
            CHAT_LAUNCHER,
            ButtonContent::new("Chat with us")
                .with_radial("var(--color-accent)", "var(--color-primary)")
                .with_border_radius("24px"),
        ),
    ]
}

fn bistro() -> Result<TemplateDefinition, ThemeError> {
    use PageKey::*;

    let mut elements = chrome(
        "Bistro",
        "Seasonal cooking, served daily.",
        Icon::Instagram,
        "Get our weekly menu",
    );
    elements.extend([
        ElementSeed::icon(Home, HOME_ICON, Icon::Utensils),
        ElementSeed::text(Home, HOME_TITLE, "A table is waiting for you"),
        ElementSeed::text(Home, HOME_SUBTITLE, "Local produce, open kitchen, late hours."),
        ElementSeed::button(
            Home,
            HOME_CTA,
            ButtonContent::new("See the menu").with_linear(
                "45deg",
                "var(--color-primary)",
                "var(--color-accent)",
            ),
        ),
        ElementSeed::button(Home, HOME_BOOKING, ButtonContent::new("Book a table")),
        ElementSeed::text(About, ABOUT_TITLE, "Our story"),
        ElementSeed::text(
            About,
            ABOUT_BODY,
            "Started as a six-seat counter, still run by the same family.",
        ),
        ElementSeed::text(Services, SERVICES_TITLE, "Menu"),
        ElementSeed::icon(Services, SERVICE_CARDS[0].0, Icon::Coffee),
        ElementSeed::text(Services, SERVICE_CARDS[0].1, "Breakfast"),
        ElementSeed::text(Services, SERVICE_CARDS[0].2, "Pastries and coffee from 7am."),
        ElementSeed::icon(Services, SERVICE_CARDS[1].0, Icon::Utensils),
        ElementSeed::text(Services, SERVICE_CARDS[1].1, "Lunch"),
        ElementSeed::text(Services, SERVICE_CARDS[1].2, "A short menu that changes weekly."),
        ElementSeed::icon(Services, SERVICE_CARDS[2].0, Icon::Star),
        ElementSeed::text(Services, SERVICE_CARDS[2].1, "Dinner"),
        ElementSeed::text(Services, SERVICE_CARDS[2].2, "Tasting menu on weekends."),
        ElementSeed::text(Gallery, GALLERY_TITLE, "From the kitchen"),
        ElementSeed::text(Gallery, GALLERY_CAPTION, "Photos by our guests."),
        ElementSeed::text(Testimonials, TESTIMONIALS_TITLE, "Guests say"),
        ElementSeed::text(Testimonials, TESTIMONIALS[0].0, "Best bread in town."),
        ElementSeed::text(Testimonials, TESTIMONIALS[0].1, "Marta"),
        ElementSeed::text(Testimonials, TESTIMONIALS[1].0, "We come back every Friday."),
        ElementSeed::text(Testimonials, TESTIMONIALS[1].1, "Jon and Ali"),
        ElementSeed::text(Contact, CONTACT_TITLE, "Find us"),
        ElementSeed::text(Contact, CONTACT_BODY, "12 Market Street, open Tuesday to Sunday."),
        ElementSeed::icon(Contact, CONTACT_ICON, Icon::MapPin),
        ElementSeed::button(Contact, CONTACT_SUBMIT, ButtonContent::new("Send message")),
    ]);

    definition(
        "bistro",
        "Bistro",
        TemplateCategory::Restaurant,
        &[
            (Home, "Home"),
            (About, "Our Story"),
            (Services, "Menu"),
            (Gallery, "Gallery"),
            (Testimonials, "Reviews"),
            (Contact, "Contact"),
        ],
        BISTRO_THEMES,
        elements,
    )
}

fn studio() -> Result<TemplateDefinition, ThemeError> {
    use PageKey::*;

    let mut elements = chrome(
        "Studio",
        "Independent design and photography.",
        Icon::Instagram,
        "Studio notes, monthly",
    );
    elements.extend([
        ElementSeed::icon(Home, HOME_ICON, Icon::Palette),
        ElementSeed::text(Home, HOME_TITLE, "Work that speaks quietly"),
        ElementSeed::text(Home, HOME_SUBTITLE, "Identity, editorial and product photography."),
        ElementSeed::button(
            Home,
            HOME_CTA,
            ButtonContent::new("View work")
                .with_solid("var(--color-secondary)")
                .with_border_radius("0"),
        ),
        ElementSeed::button(Home, HOME_BOOKING, ButtonContent::new("Book a shoot")),
        ElementSeed::text(About, ABOUT_TITLE, "About the studio"),
        ElementSeed::text(About, ABOUT_BODY, "Two designers, one camera, many ideas."),
        ElementSeed::text(Gallery, GALLERY_TITLE, "Selected work"),
        ElementSeed::text(Gallery, GALLERY_CAPTION, "Projects from 2019 onward."),
        ElementSeed::text(Blog, BLOG_TITLE, "Journal"),
        ElementSeed::text(Blog, BLOG_INTRO, "Process notes and behind the scenes."),
        ElementSeed::text(Contact, CONTACT_TITLE, "Start a project"),
        ElementSeed::text(Contact, CONTACT_BODY, "Tell us about your idea."),
        ElementSeed::icon(Contact, CONTACT_ICON, Icon::Mail),
        ElementSeed::button(
            Contact,
            CONTACT_SUBMIT,
            ButtonContent::new("Send brief").with_linear(
                "to right",
                "var(--color-accent)",
                "var(--color-primary)",
            ),
        ),
    ]);

    definition(
        "studio",
        "Studio",
        TemplateCategory::Portfolio,
        &[
            (Home, "Home"),
            (About, "About"),
            (Gallery, "Work"),
            (Blog, "Journal"),
            (Contact, "Contact"),
        ],
        STUDIO_THEMES,
        elements,
    )
}

fn clinic() -> Result<TemplateDefinition, ThemeError> {
    use PageKey::*;

    let mut elements = chrome(
        "Clinic",
        "Family care close to home.",
        Icon::Facebook,
        "Health tips in your inbox",
    );
    elements.extend([
        ElementSeed::icon(Home, HOME_ICON, Icon::Stethoscope),
        ElementSeed::text(Home, HOME_TITLE, "Care for the whole family"),
        ElementSeed::text(Home, HOME_SUBTITLE, "Same-week appointments, no referral needed."),
        ElementSeed::button(Home, HOME_CTA, ButtonContent::new("Our services")),
        ElementSeed::button(
            Home,
            HOME_BOOKING,
            ButtonContent::new("Book an appointment").with_radial(
                "var(--color-accent)",
                "var(--color-primary)",
            ),
        ),
        ElementSeed::text(About, ABOUT_TITLE, "Our practice"),
        ElementSeed::text(About, ABOUT_BODY, "Five clinicians serving the area since 2004."),
        ElementSeed::text(Services, SERVICES_TITLE, "Services"),
        ElementSeed::icon(Services, SERVICE_CARDS[0].0, Icon::Heart),
        ElementSeed::text(Services, SERVICE_CARDS[0].1, "General practice"),
        ElementSeed::text(Services, SERVICE_CARDS[0].2, "Check-ups and chronic care."),
        ElementSeed::icon(Services, SERVICE_CARDS[1].0, Icon::Leaf),
        ElementSeed::text(Services, SERVICE_CARDS[1].1, "Nutrition"),
        ElementSeed::text(Services, SERVICE_CARDS[1].2, "Plans that fit your life."),
        ElementSeed::icon(Services, SERVICE_CARDS[2].0, Icon::Calendar),
        ElementSeed::text(Services, SERVICE_CARDS[2].1, "Vaccinations"),
        ElementSeed::text(Services, SERVICE_CARDS[2].2, "Walk-in on Wednesdays."),
        ElementSeed::text(Testimonials, TESTIMONIALS_TITLE, "Patient stories"),
        ElementSeed::text(Testimonials, TESTIMONIALS[0].0, "They actually listen."),
        ElementSeed::text(Testimonials, TESTIMONIALS[0].1, "R. Okafor"),
        ElementSeed::text(Testimonials, TESTIMONIALS[1].0, "Booking took two minutes."),
        ElementSeed::text(Testimonials, TESTIMONIALS[1].1, "L. Meyer"),
        ElementSeed::text(Blog, BLOG_TITLE, "Health notes"),
        ElementSeed::text(Blog, BLOG_INTRO, "Seasonal advice from our team."),
        ElementSeed::text(Contact, CONTACT_TITLE, "Contact the clinic"),
        ElementSeed::text(Contact, CONTACT_BODY, "Call us or send a message."),
        ElementSeed::icon(Contact, CONTACT_ICON, Icon::Phone),
        ElementSeed::button(Contact, CONTACT_SUBMIT, ButtonContent::new("Request a call")),
    ]);

    definition(
        "clinic",
        "Clinic",
        TemplateCategory::Health,
        &[
            (Home, "Home"),
            (About, "About"),
            (Services, "Services"),
            (Testimonials, "Patients"),
            (Blog, "Health Notes"),
            (Contact, "Contact"),
        ],
        CLINIC_THEMES,
        elements,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::element::ElementStore;

    #[test]
    fn test_every_template_registers() {
        for built in [bistro(), studio(), clinic()] {
            let def = built.expect("palette should parse");
            let mut registry = TemplateRegistry::new();
            registry
                .register(def)
                .expect("catalog entry should be valid");
        }
        assert_eq!(build().len(), 3);
    }

    #[test]
    fn test_seeds_match_what_pages_draw() {
        for def in build().iter() {
            let store = ElementStore::from_seeds(&def.elements);
            let mut drawn = BTreeSet::new();
            let required = CHROME_ELEMENTS.iter().copied().chain(
                def.pages
                    .iter()
                    .flat_map(|page| page_elements(page.key)),
            );
            for (id, kind) in required {
                let element = store
                    .get(id)
                    .unwrap_or_else(|| panic!("{}: missing element {id}", def.id));
                assert_eq!(element.kind(), kind, "{}: {id}", def.id);
                drawn.insert(id);
            }
            for seed in &def.elements {
                assert!(
                    drawn.contains(seed.id.as_str()),
                    "{}: element {} is never drawn",
                    def.id,
                    seed.id
                );
            }
        }
    }

    #[test]
    fn test_template_categories() {
        let registry = build();
        let category = |id: &str| registry.get(id).map(|def| def.category);
        assert_eq!(category("bistro"), Some(TemplateCategory::Restaurant));
        assert_eq!(category("studio"), Some(TemplateCategory::Portfolio));
        assert_eq!(category("clinic"), Some(TemplateCategory::Health));
    }

    #[test]
    fn test_every_template_has_alternate_themes() {
        for def in build().iter() {
            assert!(def.themes.names().count() >= 2, "{}", def.id);
        }
    }
}
