use page_behavior::{Debounce, Page, Task, Throttle, ease_in_out_cubic, scroll_position_at};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};

const CONTROLLER_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/controller_property_test.txt";
const DEFAULT_CONTROLLER_PROPTEST_CASES: u32 = 96;

const PAGE_HTML: &str = r##"
<nav id="navbar">
  <button id="hamburger"></button>
  <ul id="nav-menu">
    <li><a class="nav-link" href="#a">A</a></li>
    <li><a class="nav-link" href="#b">B</a></li>
    <li><a class="nav-link" href="#c">C</a></li>
  </ul>
</nav>
<section id="a"><div class="service-card" id="card-a"></div></section>
<section id="b"><div class="service-card" id="card-b"></div></section>
<section id="c"><div class="service-card" id="card-c"></div></section>
<footer id="footer">footer</footer>
"##;

#[derive(Clone, Debug)]
enum PageAction {
    ScrollTo(u16),
    Advance(u16),
    ClickLink(usize),
    ToggleMenu,
    ClickOutside,
    Escape,
}

fn controller_proptest_cases() -> u32 {
    std::env::var("PAGE_BEHAVIOR_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_CONTROLLER_PROPTEST_CASES)
}

fn page_action_strategy() -> BoxedStrategy<PageAction> {
    prop_oneof![
        4 => (0u16..=3000).prop_map(PageAction::ScrollTo),
        4 => (0u16..=300).prop_map(PageAction::Advance),
        2 => (0usize..3).prop_map(PageAction::ClickLink),
        2 => Just(PageAction::ToggleMenu),
        1 => Just(PageAction::ClickOutside),
        1 => Just(PageAction::Escape),
    ]
    .boxed()
}

fn fixture() -> page_behavior::Result<Page> {
    let mut page = Page::from_html(PAGE_HTML)?;
    page.set_layout("#navbar", 0.0, 60.0)?;
    page.set_layout("#a", 0.0, 1000.0)?;
    page.set_layout("#card-a", 300.0, 200.0)?;
    page.set_layout("#b", 1000.0, 1000.0)?;
    page.set_layout("#card-b", 1300.0, 200.0)?;
    page.set_layout("#c", 2000.0, 1000.0)?;
    page.set_layout("#card-c", 2300.0, 200.0)?;
    page.set_layout("#footer", 3000.0, 200.0)?;
    page.init()?;
    Ok(page)
}

fn run_action(page: &mut Page, action: &PageAction) -> page_behavior::Result<()> {
    match action {
        PageAction::ScrollTo(y) => page.scroll_to(f64::from(*y)),
        PageAction::Advance(ms) => page.advance_time(i64::from(*ms)),
        PageAction::ClickLink(index) => {
            let section = ["a", "b", "c"][*index];
            page.click(&format!(r##".nav-link[href="#{section}"]"##))
        }
        PageAction::ToggleMenu => page.click("#hamburger"),
        PageAction::ClickOutside => page.click("#footer"),
        PageAction::Escape => page.press_key("Escape"),
    }
}

fn fail(err: page_behavior::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn assert_page_invariants(actions: &[PageAction]) -> TestCaseResult {
    let mut page = fixture().map_err(fail)?;

    for (step, action) in actions.iter().enumerate() {
        run_action(&mut page, action).map_err(fail)?;

        let open = page.is_menu_open();
        for (selector, class_name) in [
            ("#hamburger", "active"),
            ("#nav-menu", "active"),
            ("#navbar", "menu-open"),
        ] {
            prop_assert_eq!(
                page.has_class(selector, class_name).map_err(fail)?,
                open,
                "{} out of sync at step {}: {:?}",
                selector,
                step,
                action
            );
        }
        let expanded = if open { "true" } else { "false" };
        prop_assert_eq!(
            page.attr("#hamburger", "aria-expanded").map_err(fail)?,
            Some(expanded.to_string())
        );
        prop_assert!(page.count(".nav-link.active").map_err(fail)? <= 1);

        let timers = page.pending_timers();
        prop_assert!(
            timers
                .iter()
                .filter(|timer| matches!(timer.task, Task::ActiveNavRecompute { .. }))
                .count()
                <= 1,
            "more than one recompute pending at step {}: {:?}",
            step,
            timers
        );
        prop_assert!(
            timers
                .iter()
                .filter(|timer| matches!(timer.task, Task::ScrollEffectFrame { .. }))
                .count()
                <= 1,
            "more than one scroll-effect frame pending at step {}: {:?}",
            step,
            timers
        );
    }

    page.flush().map_err(fail)?;
    prop_assert_eq!(
        page.has_class("#navbar", "scrolled").map_err(fail)?,
        page.scroll_y() > 50.0
    );
    prop_assert_eq!(page.count(".nav-link.active").map_err(fail)?, 1);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: controller_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(CONTROLLER_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn controller_markers_stay_consistent(actions in vec(page_action_strategy(), 1..=20)) {
        assert_page_invariants(&actions)?;
    }

    #[test]
    fn easing_is_monotonic_and_symmetric(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(ease_in_out_cubic(lo) <= ease_in_out_cubic(hi) + 1e-12);
        prop_assert!((ease_in_out_cubic(a) + ease_in_out_cubic(1.0 - a) - 1.0).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&ease_in_out_cubic(a)));
    }

    #[test]
    fn animation_lands_exactly_on_target(
        start in 0.0f64..5000.0,
        target in 0.0f64..5000.0,
        overshoot in 1.0f64..3.0,
    ) {
        prop_assert_eq!(scroll_position_at(start, target, overshoot), target);
        prop_assert_eq!(scroll_position_at(start, target, 0.0), start);
    }

    #[test]
    fn debounce_fires_once_with_the_last_arguments(
        gaps in vec(0i64..50, 1..30),
        wait in 50i64..200,
    ) {
        let mut fired = Vec::new();
        let mut debounced = Debounce::new(wait, |value: usize| fired.push(value));
        let mut now = 0i64;
        for (index, gap) in gaps.iter().enumerate() {
            now += gap;
            debounced.call(now, index);
            prop_assert!(!debounced.poll(now));
        }
        prop_assert_eq!(debounced.next_deadline(), Some(now + wait));
        prop_assert!(debounced.poll(now + wait));
        prop_assert!(!debounced.poll(now + 10 * wait));
        drop(debounced);
        prop_assert_eq!(fired, vec![gaps.len() - 1]);
    }

    #[test]
    fn throttle_runs_only_when_the_limit_has_elapsed(
        gaps in vec(0i64..150, 1..40),
        limit in 1i64..120,
    ) {
        let mut ran_at = Vec::new();
        let mut throttled = Throttle::new(limit, |now: i64| ran_at.push(now));
        let mut now = 0i64;
        let mut last: Option<i64> = None;
        for gap in &gaps {
            now += gap;
            let expected = last.is_none_or(|last| now - last >= limit);
            prop_assert_eq!(throttled.call(now, now), expected);
            if expected {
                last = Some(now);
            }
        }
        drop(throttled);
        prop_assert!(ran_at.windows(2).all(|pair| pair[1] - pair[0] >= limit));
        prop_assert_eq!(ran_at.first().copied(), Some(gaps[0]));
    }
}
