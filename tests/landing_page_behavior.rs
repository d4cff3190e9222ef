use page_behavior::{Page, PageConfig, TaskKind, utils};

const LANDING_HTML: &str = r##"
<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Northwind Consulting</title>
  <style>.navbar.scrolled { background: #fff; }</style>
</head>
<body>
  <nav id="navbar" class="navbar">
    <a href="#" class="logo">Northwind</a>
    <button id="hamburger" class="hamburger" aria-label="Toggle navigation">
      <span></span><span></span><span></span>
    </button>
    <ul id="nav-menu" class="nav-menu">
      <li><a href="#home" class="nav-link">Home</a></li>
      <li><a href="#about" class="nav-link">About</a></li>
      <li><a href="#stats" class="nav-link">Numbers</a></li>
      <li><a href="#contact" class="nav-link">Contact</a></li>
    </ul>
  </nav>

  <section id="home" class="hero">
    <video id="hero-video" autoplay muted loop playsinline>
      <source src="hero.mp4" type="video/mp4">
    </video>
    <a href="#contact" class="cta">Get in touch</a>
  </section>

  <section id="about">
    <div class="feature-box" id="feature-1">Strategy</div>
    <div class="feature-box" id="feature-2">Delivery</div>
  </section>

  <section id="stats">
    <div class="stat-item" id="stat-1">120 clients</div>
    <div class="stat-item" id="stat-2">15 years</div>
  </section>

  <section id="contact">
    <div class="contact-item" id="contact-email">hello@northwind.test</div>
    <form id="contact-form" novalidate>
      <input id="name" name="name" required>
      <input id="email" name="email" type="email" required>
      <textarea id="message" name="message" required></textarea>
      <button type="submit">Send</button>
    </form>
  </section>

  <script>console.log("behavior is wired natively");</script>
</body>
</html>
"##;

/// Navigation bar 80 high; home `[0, 900)`, about `[900, 1600)`,
/// stats `[1600, 2200)`, contact `[2200, 3200)`.
fn landing_page() -> page_behavior::Result<Page> {
    let mut page = Page::from_html(LANDING_HTML)?;
    page.set_layout("#navbar", 0.0, 80.0)?;
    page.set_layout("#home", 0.0, 900.0)?;
    page.set_layout("#hero-video", 0.0, 900.0)?;
    page.set_layout("#about", 900.0, 700.0)?;
    page.set_layout("#feature-1", 1000.0, 250.0)?;
    page.set_layout("#feature-2", 1300.0, 250.0)?;
    page.set_layout("#stats", 1600.0, 600.0)?;
    page.set_layout("#stat-1", 1700.0, 150.0)?;
    page.set_layout("#stat-2", 1900.0, 150.0)?;
    page.set_layout("#contact", 2200.0, 1000.0)?;
    page.set_layout("#contact-email", 2300.0, 100.0)?;
    page.set_layout("#contact-form", 2450.0, 600.0)?;
    page.init()?;
    Ok(page)
}

fn active_link(page: &Page) -> page_behavior::Result<Vec<String>> {
    let mut active = Vec::new();
    for section in ["home", "about", "stats", "contact"] {
        let selector = format!(r##".nav-link[href="#{section}"]"##);
        if page.has_class(&selector, "active")? {
            active.push(section.to_string());
        }
    }
    Ok(active)
}

#[test]
fn visitor_opens_menu_and_jumps_to_a_section() -> page_behavior::Result<()> {
    let mut page = landing_page()?;
    assert_eq!(active_link(&page)?, vec!["home"]);
    assert!(page.is_playing("#hero-video")?);

    page.click("#hamburger")?;
    page.assert_class("#nav-menu", "active", true)?;
    page.assert_style("body", "overflow", "hidden")?;

    page.click(r##".nav-link[href="#stats"]"##)?;
    page.assert_class("#nav-menu", "active", false)?;
    page.assert_style("body", "overflow", "")?;
    page.flush()?;

    // 1600 - 80
    assert_eq!(page.scroll_y(), 1520.0);
    page.assert_class("#navbar", "scrolled", true)?;
    assert_eq!(active_link(&page)?, vec!["stats"]);
    assert!(!page.is_playing("#hero-video")?);
    for selector in ["#feature-1", "#feature-2", "#stat-1", "#stat-2"] {
        page.assert_class(selector, "visible", true)?;
    }
    page.assert_class("#contact-email", "visible", false)?;
    Ok(())
}

#[test]
fn call_to_action_inside_the_hero_scrolls_to_contact() -> page_behavior::Result<()> {
    let mut page = landing_page()?;
    page.click(".cta")?;
    assert_eq!(page.scroll_animations_in_flight(), 1);
    page.flush()?;
    assert_eq!(page.scroll_y(), 2120.0);
    assert_eq!(active_link(&page)?, vec!["contact"]);
    page.assert_class("#contact-email", "visible", true)?;
    Ok(())
}

#[test]
fn scrolling_back_to_top_resumes_video_and_clears_scrolled() -> page_behavior::Result<()> {
    let mut page = landing_page()?;
    page.scroll_to(2500.0)?;
    page.advance_time(200)?;
    assert!(!page.is_playing("#hero-video")?);
    page.assert_class("#navbar", "scrolled", true)?;

    page.scroll_to(0.0)?;
    page.advance_time(200)?;
    assert!(page.is_playing("#hero-video")?);
    page.assert_class("#navbar", "scrolled", false)?;
    assert_eq!(active_link(&page)?, vec!["home"]);

    // Reveals are one-shot.
    page.assert_class("#contact-email", "visible", true)?;
    Ok(())
}

#[test]
fn contact_form_round_trip() -> page_behavior::Result<()> {
    let mut page = landing_page()?;
    assert!(!utils::validate_form(&mut page, "#contact-form")?);
    assert_eq!(page.count(".error-message")?, 3);

    page.type_text("#name", "Grace")?;
    page.type_text("#email", "grace@")?;
    page.type_text("#message", "Let's talk.")?;
    assert!(!page.validate_form("#contact-form")?);
    assert_eq!(page.count(".error-message")?, 1);
    page.assert_text(".error-message", "Please enter a valid email")?;

    page.type_text("#email", "grace@navy.test")?;
    assert!(page.validate_form("#contact-form")?);
    assert_eq!(page.count(".error")?, 0);
    Ok(())
}

#[test]
fn timers_stay_bounded_under_a_scroll_burst() -> page_behavior::Result<()> {
    let mut page = landing_page()?;
    for step in 1..=40 {
        page.scroll_to(f64::from(step) * 25.0)?;
        page.advance_time(3)?;
    }
    let pending = page.pending_timers();
    assert!(
        pending
            .iter()
            .filter(|timer| timer.kind == TaskKind::AnimationFrame)
            .count()
            <= 1
    );
    assert!(
        pending
            .iter()
            .filter(|timer| timer.kind == TaskKind::Timeout)
            .count()
            <= 1
    );
    page.flush()?;
    assert!(page.pending_timers().is_empty());
    assert_eq!(active_link(&page)?, vec!["about"]);
    Ok(())
}

#[test]
fn page_without_any_behavior_markup_initializes_cleanly() -> page_behavior::Result<()> {
    let mut page = Page::from_html("<main><h1>Plain</h1><p>No navigation here.</p></main>")?;
    page.init()?;
    assert_eq!(page.listener_count(), 0);
    assert_eq!(page.observation_count(), 0);
    page.scroll_to(400.0)?;
    page.press_key("Escape")?;
    page.flush()?;
    page.assert_text("h1", "Plain")?;
    Ok(())
}

#[test]
fn slower_reveal_threshold_from_config() -> page_behavior::Result<()> {
    let config = PageConfig {
        reveal_threshold: 0.9,
        reveal_root_margin_bottom: 0.0,
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config(r#"<div class="feature-box" id="box"></div>"#, config)?;
    page.set_layout("#box", 700.0, 200.0)?;
    page.init()?;
    page.assert_class("#box", "visible", false)?;

    // 170 of 200 visible.
    page.scroll_to(70.0)?;
    page.assert_class("#box", "visible", false)?;
    page.scroll_to(80.0)?;
    page.assert_class("#box", "visible", true)?;
    Ok(())
}
