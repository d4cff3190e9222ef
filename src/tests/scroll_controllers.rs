use super::*;

const THREE_SECTIONS_HTML: &str = r##"
<ul>
  <li><a class="nav-link" href="#one">One</a></li>
  <li><a class="nav-link" href="#two">Two</a></li>
  <li><a class="nav-link" href="#three">Three</a></li>
</ul>
<section id="one"></section>
<section id="two"></section>
<section id="three"></section>
"##;

/// No navigation bar, so each band is `[top - 100, top - 100 + height)`:
/// one `[0, 500)`, two `[500, 1000)`, three `[1000, 1500)`.
fn three_section_page() -> Result<Page> {
    let mut page = Page::from_html(THREE_SECTIONS_HTML)?;
    page.set_layout("#one", 100.0, 500.0)?;
    page.set_layout("#two", 600.0, 500.0)?;
    page.set_layout("#three", 1100.0, 500.0)?;
    page.init()?;
    Ok(page)
}

fn active_links(page: &Page) -> Result<Vec<bool>> {
    ["one", "two", "three"]
        .iter()
        .map(|id| page.has_class(&format!(r##"a[href="#{id}"]"##), "active"))
        .collect()
}

#[test]
fn scrolled_marker_tracks_threshold_after_one_frame() -> Result<()> {
    let mut page = initialized_landing_page()?;
    page.assert_class("#navbar", "scrolled", false)?;

    page.scroll_to(50.0)?;
    page.advance_time(16)?;
    page.assert_class("#navbar", "scrolled", false)?;

    page.scroll_to(51.0)?;
    page.assert_class("#navbar", "scrolled", false)?;
    page.advance_time(15)?;
    page.assert_class("#navbar", "scrolled", false)?;
    page.advance_time(1)?;
    page.assert_class("#navbar", "scrolled", true)?;

    page.scroll_to(10.0)?;
    page.advance_time(16)?;
    page.assert_class("#navbar", "scrolled", false)?;
    Ok(())
}

#[test]
fn scroll_bursts_are_coalesced_to_one_frame_and_one_timer() -> Result<()> {
    let mut page = initialized_landing_page()?;
    page.scroll_to(100.0)?;
    page.scroll_to(200.0)?;
    page.scroll_to(300.0)?;
    assert_eq!(pending_of_kind(&page, TaskKind::AnimationFrame), 1);
    assert_eq!(pending_of_kind(&page, TaskKind::Timeout), 1);

    page.advance_time(16)?;
    page.assert_class("#navbar", "scrolled", true)?;
    assert_eq!(pending_of_kind(&page, TaskKind::AnimationFrame), 0);

    page.scroll_to(400.0)?;
    assert_eq!(pending_of_kind(&page, TaskKind::AnimationFrame), 1);
    Ok(())
}

#[test]
fn scrolled_state_is_applied_at_init() -> Result<()> {
    let mut page = landing_page()?;
    page.scroll_to(300.0)?;
    page.init()?;
    page.assert_class("#navbar", "scrolled", true)?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn anchor_click_animates_to_target_minus_navbar() -> Result<()> {
    let mut page = initialized_landing_page()?;
    page.click(r##"#nav-menu a[href="#services"]"##)?;
    assert_eq!(page.scroll_y(), 0.0);

    // The first frame at t=16 fixes the start time; halfway is t=416.
    page.advance_time_to(416)?;
    assert_eq!(page.scroll_y(), 365.0);

    page.advance_time_to(816)?;
    assert_eq!(page.scroll_y(), 730.0);
    assert_eq!(page.scroll_animations_in_flight(), 0);

    page.flush()?;
    assert_eq!(page.scroll_y(), 730.0);
    page.assert_class(r##"a[href="#services"]"##, "active", true)?;
    page.assert_class(r##"a[href="#home"]"##, "active", false)?;
    page.assert_class("#navbar", "scrolled", true)?;
    Ok(())
}

#[test]
fn bare_hash_link_keeps_default_behavior() -> Result<()> {
    let mut page = initialized_landing_page()?;
    page.enable_trace(true);
    page.click("#navbar .logo")?;
    assert_eq!(page.scroll_animations_in_flight(), 0);
    assert_eq!(pending_of_kind(&page, TaskKind::AnimationFrame), 0);

    let logs = page.take_trace_logs();
    assert!(
        logs.iter()
            .any(|line| line.starts_with("[event] click target=a.logo") && line.ends_with("default_prevented=false")),
        "{logs:?}"
    );
    Ok(())
}

#[test]
fn missing_anchor_target_is_a_no_op() -> Result<()> {
    let mut page = Page::from_html(r##"<a id="ghost" href="#nowhere">Ghost</a>"##)?;
    page.init()?;
    page.click("#ghost")?;
    page.flush()?;
    assert_eq!(page.scroll_y(), 0.0);
    assert_eq!(page.scroll_animations_in_flight(), 0);
    Ok(())
}

#[test]
fn target_near_top_is_clamped_to_zero() -> Result<()> {
    let mut page = initialized_landing_page()?;
    page.scroll_to(400.0)?;
    page.click(r##"a[href="#home"]"##)?;
    page.flush()?;
    assert_eq!(page.scroll_y(), 0.0);
    Ok(())
}

#[test]
fn overlapping_animations_are_not_cancelled() -> Result<()> {
    let mut page = initialized_landing_page()?;
    page.click(r##"a[href="#services"]"##)?;
    page.advance_time(100)?;
    page.click(r##"a[href="#contact"]"##)?;
    assert_eq!(page.scroll_animations_in_flight(), 2);

    page.advance_time_to(816)?;
    assert_eq!(page.scroll_animations_in_flight(), 1);

    page.flush()?;
    assert_eq!(page.scroll_animations_in_flight(), 0);
    assert_eq!(page.scroll_y(), 1630.0);
    Ok(())
}

#[test]
fn exactly_one_link_is_active_for_the_section_in_view() -> Result<()> {
    let mut page = three_section_page()?;
    assert_eq!(active_links(&page)?, vec![true, false, false]);

    page.scroll_to(700.0)?;
    assert_eq!(active_links(&page)?, vec![true, false, false]);
    page.advance_time(100)?;
    assert_eq!(active_links(&page)?, vec![false, true, false]);
    assert_eq!(page.count(".nav-link.active")?, 1);
    Ok(())
}

#[test]
fn scroll_events_during_pending_recompute_are_dropped() -> Result<()> {
    let mut page = three_section_page()?;
    page.scroll_to(700.0)?;
    page.advance_time(50)?;
    page.scroll_to(1200.0)?;
    assert_eq!(pending_of_kind(&page, TaskKind::Timeout), 1);

    page.advance_time(50)?;
    assert_eq!(active_links(&page)?, vec![false, false, true]);
    assert_eq!(pending_of_kind(&page, TaskKind::Timeout), 0);
    Ok(())
}

#[test]
fn marking_is_kept_when_no_section_matches() -> Result<()> {
    let mut page = three_section_page()?;
    page.scroll_to(700.0)?;
    page.advance_time(100)?;
    page.scroll_to(5000.0)?;
    page.advance_time(100)?;
    assert_eq!(active_links(&page)?, vec![false, true, false]);
    Ok(())
}

#[test]
fn later_section_wins_when_bands_overlap() -> Result<()> {
    let mut page = Page::from_html(THREE_SECTIONS_HTML)?;
    page.set_layout("#one", 100.0, 800.0)?;
    page.set_layout("#two", 600.0, 500.0)?;
    page.set_layout("#three", 1100.0, 500.0)?;
    page.init()?;
    page.scroll_to(600.0)?;
    page.advance_time(100)?;
    assert_eq!(active_links(&page)?, vec![false, true, false]);
    Ok(())
}

#[test]
fn navbar_height_shifts_section_bands() -> Result<()> {
    let mut page = initialized_landing_page()?;
    page.assert_class(r##"a[href="#home"]"##, "active", true)?;

    // services band: [800 - 70 - 100, 800 - 70 - 100 + 900) = [630, 1530)
    page.scroll_to(629.0)?;
    page.advance_time(100)?;
    page.assert_class(r##"a[href="#home"]"##, "active", true)?;
    page.scroll_to(630.0)?;
    page.advance_time(100)?;
    page.assert_class(r##"a[href="#services"]"##, "active", true)?;
    page.assert_class(r##"a[href="#home"]"##, "active", false)?;
    Ok(())
}

#[test]
fn active_nav_is_skipped_without_sections() -> Result<()> {
    let mut page = Page::from_html(r#"<a class="nav-link" href="/blog">Blog</a>"#)?;
    page.init()?;
    page.scroll_to(300.0)?;
    assert!(page.pending_timers().is_empty());
    page.assert_class(".nav-link", "active", false)?;
    Ok(())
}

#[test]
fn eased_position_is_symmetric_and_exact_at_the_end() {
    assert_eq!(scroll_position_at(0.0, 1000.0, 0.5), 500.0);
    assert_eq!(scroll_position_at(0.0, 1000.0, 1.0), 1000.0);
    assert_eq!(scroll_position_at(0.0, 1000.0, 0.0), 0.0);
    assert_eq!(scroll_position_at(730.0, 0.0, 2.0), 0.0);
    assert!(scroll_position_at(0.0, 1000.0, 0.25) < 250.0);
    assert!(scroll_position_at(0.0, 1000.0, 0.75) > 750.0);
}
