use super::*;

mod scroll_controllers;

const LANDING_HTML: &str = r##"
<!DOCTYPE html>
<html>
  <head><title>Acme Studio</title></head>
  <body>
    <nav id="navbar">
      <a class="logo" href="#">Acme</a>
      <button id="hamburger" aria-label="Menu">Menu</button>
      <ul id="nav-menu">
        <li><a class="nav-link" href="#home">Home</a></li>
        <li><a class="nav-link" href="#services">Services</a></li>
        <li><a class="nav-link" href="#contact">Contact</a></li>
      </ul>
    </nav>
    <section id="home">
      <video id="hero-video" autoplay muted loop playsinline></video>
    </section>
    <section id="services">
      <div class="service-card" id="card-1">Design</div>
      <div class="service-card" id="card-2">Build</div>
    </section>
    <section id="contact">
      <form id="contact-form">
        <input id="name" name="name" required>
        <input id="email" name="email" type="email" required>
        <textarea id="message" name="message"></textarea>
      </form>
    </section>
    <footer id="footer"><p>&copy; Acme</p></footer>
  </body>
</html>
"##;

/// The landing page with a 70-unit fixed navigation bar and three stacked
/// sections: home `[0, 800)`, services `[800, 1700)`, contact `[1700, 2400)`.
fn landing_page() -> Result<Page> {
    let mut page = Page::from_html(LANDING_HTML)?;
    page.set_layout("#navbar", 0.0, 70.0)?;
    page.set_layout("#home", 0.0, 800.0)?;
    page.set_layout("#hero-video", 0.0, 800.0)?;
    page.set_layout("#services", 800.0, 900.0)?;
    page.set_layout("#card-1", 900.0, 200.0)?;
    page.set_layout("#card-2", 1200.0, 200.0)?;
    page.set_layout("#contact", 1700.0, 700.0)?;
    page.set_layout("#footer", 2400.0, 200.0)?;
    Ok(page)
}

fn initialized_landing_page() -> Result<Page> {
    let mut page = landing_page()?;
    page.init()?;
    Ok(page)
}

fn pending_of_kind(page: &Page, kind: TaskKind) -> usize {
    page.pending_timers()
        .iter()
        .filter(|timer| timer.kind == kind)
        .count()
}
