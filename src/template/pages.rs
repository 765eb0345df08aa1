//! Page bodies shared by the compiled-in templates
//!
//! Every page is wrapped in the same chrome: a header with brand and
//! navigation, and a footer whose optional parts follow capability flags.
//! Edit-mode renderers add a toolbar above the chrome.

use crate::dispatch::{PageTable, RenderContext};
use crate::element::ElementKind;
use crate::features::FeatureKey;
use crate::renderer::HtmlBuilder;

use super::page::PageKey;

pub const NAV_BRAND: &str = "nav.brand";
pub const FOOTER_TAGLINE: &str = "footer.tagline";
pub const FOOTER_SOCIAL: &str = "footer.social.primary";
pub const NEWSLETTER_TITLE: &str = "footer.newsletter.title";
pub const NEWSLETTER_BUTTON: &str = "footer.newsletter.button";
pub const CHAT_LAUNCHER: &str = "chat.launcher";

pub const HOME_ICON: &str = "home.hero.icon";
pub const HOME_TITLE: &str = "home.hero.title";
pub const HOME_SUBTITLE: &str = "home.hero.subtitle";
pub const HOME_CTA: &str = "home.hero.cta";
pub const HOME_BOOKING: &str = "home.booking.button";

pub const ABOUT_TITLE: &str = "about.title";
pub const ABOUT_BODY: &str = "about.body";

pub const SERVICES_TITLE: &str = "services.title";
/// (icon, title, body) of each service card
pub const SERVICE_CARDS: [(&str, &str, &str); 3] = [
    ("services.1.icon", "services.1.title", "services.1.body"),
    ("services.2.icon", "services.2.title", "services.2.body"),
    ("services.3.icon", "services.3.title", "services.3.body"),
];

pub const GALLERY_TITLE: &str = "gallery.title";
pub const GALLERY_CAPTION: &str = "gallery.caption";

pub const TESTIMONIALS_TITLE: &str = "testimonials.title";
/// (quote, author) of each testimonial
pub const TESTIMONIALS: [(&str, &str); 2] = [
    ("testimonials.1.quote", "testimonials.1.author"),
    ("testimonials.2.quote", "testimonials.2.author"),
];

pub const BLOG_TITLE: &str = "blog.title";
pub const BLOG_INTRO: &str = "blog.intro";

pub const CONTACT_TITLE: &str = "contact.title";
pub const CONTACT_BODY: &str = "contact.body";
pub const CONTACT_ICON: &str = "contact.icon";
pub const CONTACT_SUBMIT: &str = "contact.submit";

/// Elements drawn on every page; saved with the home page
pub const CHROME_ELEMENTS: &[(&str, ElementKind)] = &[
    (NAV_BRAND, ElementKind::Text),
    (FOOTER_TAGLINE, ElementKind::Text),
    (FOOTER_SOCIAL, ElementKind::Icon),
    (NEWSLETTER_TITLE, ElementKind::Text),
    (NEWSLETTER_BUTTON, ElementKind::Button),
    (CHAT_LAUNCHER, ElementKind::Button),
];

/// Elements a page body draws
pub fn page_elements(page: PageKey) -> Vec<(&'static str, ElementKind)> {
    use ElementKind::{Button, Icon, Text};
    match page {
        PageKey::Home => vec![
            (HOME_ICON, Icon),
            (HOME_TITLE, Text),
            (HOME_SUBTITLE, Text),
            (HOME_CTA, Button),
            (HOME_BOOKING, Button),
        ],
        PageKey::About => vec![(ABOUT_TITLE, Text), (ABOUT_BODY, Text)],
        PageKey::Services => {
            let mut elements = vec![(SERVICES_TITLE, Text)];
            for (icon, title, body) in SERVICE_CARDS {
                elements.extend([(icon, Icon), (title, Text), (body, Text)]);
            }
            elements
        }
        PageKey::Gallery => vec![(GALLERY_TITLE, Text), (GALLERY_CAPTION, Text)],
        PageKey::Testimonials => {
            let mut elements = vec![(TESTIMONIALS_TITLE, Text)];
            for (quote, author) in TESTIMONIALS {
                elements.extend([(quote, Text), (author, Text)]);
            }
            elements
        }
        PageKey::Blog => vec![(BLOG_TITLE, Text), (BLOG_INTRO, Text)],
        PageKey::Contact => vec![
            (CONTACT_TITLE, Text),
            (CONTACT_BODY, Text),
            (CONTACT_ICON, Icon),
            (CONTACT_SUBMIT, Button),
        ],
    }
}

type Body = fn(&RenderContext<'_>, &mut HtmlBuilder);

fn body(page: PageKey) -> Body {
    match page {
        PageKey::Home => home,
        PageKey::About => about,
        PageKey::Services => services,
        PageKey::Gallery => gallery,
        PageKey::Testimonials => testimonials,
        PageKey::Blog => blog,
        PageKey::Contact => contact,
    }
}

/// Edit and display tables for a template offering `pages`
pub fn tables(pages: &[PageKey]) -> (PageTable, PageTable) {
    let mut edit = PageTable::new(|ctx, out| edit_page(ctx, out, home));
    let mut display = PageTable::new(|ctx, out| display_page(ctx, out, home));
    for page in pages.iter().copied().filter(|page| *page != PageKey::DEFAULT) {
        let body = body(page);
        edit = edit.with(page, move |ctx, out| edit_page(ctx, out, body));
        display = display.with(page, move |ctx, out| display_page(ctx, out, body));
    }
    (edit, display)
}

fn display_page(ctx: &RenderContext<'_>, out: &mut HtmlBuilder, body: Body) {
    header(ctx, out);
    out.start("main", &["main"]);
    body(ctx, out);
    out.end("main");
    footer(ctx, out);
}

fn edit_page(ctx: &RenderContext<'_>, out: &mut HtmlBuilder, body: Body) {
    toolbar(ctx, out);
    display_page(ctx, out, body);
}

fn toolbar(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    let page_name = ctx
        .template
        .page(ctx.page)
        .map_or(ctx.page.as_str(), |page| page.name.as_str());
    out.start("div", &["toolbar"]);
    out.add_static_text("strong", &format!("Editing: {}", page_name), "toolbar-page");
    out.add_static_text(
        "span",
        &format!(
            "{} pages, {} features enabled",
            ctx.features.count_enabled_pages(),
            ctx.features.count_enabled_features()
        ),
        "toolbar-summary",
    );
    out.end("div");
}

fn header(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start("header", &["header"]);
    ctx.text(out, "span", NAV_BRAND);
    out.start("nav", &["nav"]);
    for page in ctx.pages {
        out.add_link(
            &format!("#/{}", page.key),
            &page.name,
            page.key == ctx.page,
        );
    }
    out.end("nav");
    out.end("header");
}

fn footer(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start("footer", &["footer"]);
    ctx.text(out, "p", FOOTER_TAGLINE);
    if ctx.features.get(FeatureKey::SocialLinks) {
        ctx.icon(out, FOOTER_SOCIAL);
    }
    if ctx.features.get(FeatureKey::Newsletter) {
        out.start("div", &["newsletter"]);
        ctx.text(out, "h4", NEWSLETTER_TITLE);
        ctx.button(out, NEWSLETTER_BUTTON);
        out.end("div");
    }
    out.add_static_text(
        "small",
        &format!("\u{a9} {}", ctx.business_name()),
        "copyright",
    );
    out.end("footer");
    if ctx.features.get(FeatureKey::LiveChat) {
        ctx.button(out, CHAT_LAUNCHER);
    }
}

fn home(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start_section("hero");
    ctx.icon(out, HOME_ICON);
    ctx.text(out, "h1", HOME_TITLE);
    ctx.text(out, "p", HOME_SUBTITLE);
    ctx.button(out, HOME_CTA);
    if ctx.features.get(FeatureKey::OnlineBooking) {
        ctx.button(out, HOME_BOOKING);
    }
    out.end_section();
}

fn about(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start_section("about");
    ctx.text(out, "h2", ABOUT_TITLE);
    ctx.text(out, "p", ABOUT_BODY);
    out.end_section();
}

fn services(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start_section("services");
    ctx.text(out, "h2", SERVICES_TITLE);
    out.start("div", &["grid"]);
    for (icon, title, body) in SERVICE_CARDS {
        out.start("article", &["card"]);
        ctx.icon(out, icon);
        ctx.text(out, "h3", title);
        ctx.text(out, "p", body);
        out.end("article");
    }
    out.end("div");
    out.end_section();
}

fn gallery(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start_section("gallery");
    ctx.text(out, "h2", GALLERY_TITLE);
    out.start("div", &["grid"]);
    for n in 1..=6 {
        out.add_static_text("figure", &format!("Photo {}", n), "photo");
    }
    out.end("div");
    ctx.text(out, "p", GALLERY_CAPTION);
    out.end_section();
}

fn testimonials(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start_section("testimonials");
    ctx.text(out, "h2", TESTIMONIALS_TITLE);
    for (quote, author) in TESTIMONIALS {
        out.start("blockquote", &["quote"]);
        ctx.text(out, "p", quote);
        ctx.text(out, "cite", author);
        out.end("blockquote");
    }
    out.end_section();
}

fn blog(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start_section("blog");
    ctx.text(out, "h2", BLOG_TITLE);
    ctx.text(out, "p", BLOG_INTRO);
    out.end_section();
}

fn contact(ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
    out.start_section("contact");
    ctx.text(out, "h2", CONTACT_TITLE);
    ctx.icon(out, CONTACT_ICON);
    ctx.text(out, "p", CONTACT_BODY);
    ctx.button(out, CONTACT_SUBMIT);
    out.end_section();
}
