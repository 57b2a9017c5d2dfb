use kissj_domain::session::{
    CurrentUserResolver, Event, FlashLevel, FlashMessage, FlashMessageStore, User,
};
use kissj_domain::settings::AppSettings;
use kissj_domain::{AppPaths, Locale};
use kissj_view::{Translator, ViewError, ViewRenderer};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Default)]
struct FixedUser(Option<User>);

impl CurrentUserResolver for FixedUser {
    fn current_user(&self) -> Option<User> {
        self.0.clone()
    }
}

#[derive(Debug, Default)]
struct Flashes(Mutex<Vec<FlashMessage>>);

impl FlashMessageStore for Flashes {
    fn push(&self, message: FlashMessage) {
        self.0.lock().unwrap().push(message);
    }

    fn messages(&self) -> Vec<FlashMessage> {
        self.0.lock().unwrap().clone()
    }
}

fn app(debug: bool, template_cache: bool) -> AppSettings {
    AppSettings {
        name: "KISSJ".to_owned(),
        debug,
        testing_site: false,
        template_cache,
        default_locale: Locale::En,
        insecure_dev_mode: false,
    }
}

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> (TempDir, AppPaths) {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("templates");
    write(&templates, "en.yaml", "greeting: 'Hello %name%'\nmail:\n  subject: Payment info\nonly_en: English only\n");
    write(&templates, "cs.yaml", "greeting: 'Ahoj %name%'\nmail:\n  subject: Platební údaje\n");
    let paths = AppPaths::new(dir.path().join("kissj.sqlite"), templates, dir.path().join("uploads"));
    (dir, paths)
}

fn renderer(paths: &AppPaths, settings: &AppSettings, user: Option<User>, flashes: Arc<Flashes>) -> ViewRenderer {
    let translator = Translator::load(paths, settings.default_locale).unwrap();
    ViewRenderer::new(paths, settings, translator, Arc::new(FixedUser(user)), flashes)
}

fn participant() -> User {
    User {
        id: 7,
        email: "scout@example.com".to_owned(),
        event: Some(Event { id: 1, slug: "cej26".to_owned(), read_only_name: "CEJ 2026".to_owned() }),
    }
}

#[test]
fn translator_falls_back_to_default_locale_then_to_the_id() {
    let (_dir, paths) = fixture();
    let translator = Translator::load(&paths, Locale::En).unwrap();
    assert_eq!(translator.locale(), Locale::En);
    assert_eq!(translator.fallback_locale(), Locale::En);

    translator.set_locale(Locale::Cs);
    assert_eq!(translator.trans("mail.subject", &[]), "Platební údaje");
    assert_eq!(translator.trans("greeting", &[("%name%", "Jana")]), "Ahoj Jana");
    assert_eq!(translator.trans("only_en", &[]), "English only");
    assert_eq!(translator.trans("missing.id", &[]), "missing.id");

    // sk.yaml is absent: everything comes from the fallback
    assert_eq!(translator.trans_in(Locale::Sk, "mail.subject", &[]), "Payment info");
    assert!(translator.has("only_en"));
    assert!(!translator.has("missing.id"));
}

#[test]
fn clones_share_the_current_locale() {
    let (_dir, paths) = fixture();
    let translator = Translator::load(&paths, Locale::En).unwrap();
    let clone = translator.clone();
    clone.set_locale(Locale::Cs);
    assert_eq!(translator.locale(), Locale::Cs);
}

#[test]
fn malformed_catalog_is_reported() {
    let (_dir, paths) = fixture();
    write(&paths.templates_dir, "sk.yaml", "greeting: [unclosed\n");
    let err = Translator::load(&paths, Locale::En).unwrap_err();
    assert!(matches!(err, ViewError::Catalog { .. }));
    assert!(err.to_string().contains("sk.yaml"));
}

#[test]
fn render_exposes_user_event_and_flash_messages() {
    let (_dir, paths) = fixture();
    write(
        &paths.translatable_dir(),
        "page.html.twig",
        "{{ user.email }}|{{ event.slug }}|{% for f in flashMessages %}{{ f.level }}:{{ f.message }};{% endfor %}",
    );
    let flashes = Arc::new(Flashes::default());
    flashes.push(FlashMessage::new(FlashLevel::Success, "Saved"));
    flashes.warning("Check <email>");

    let view = renderer(&paths, &app(false, true), Some(participant()), flashes);
    let html = view.render("page.html.twig", ()).unwrap();
    assert_eq!(html, "scout@example.com|cej26|success:Saved;warning:Check &lt;email&gt;;");
}

#[test]
fn event_global_only_exists_with_a_user() {
    let (_dir, paths) = fixture();
    write(
        &paths.translatable_dir(),
        "anon.html.twig",
        "{% if user is none %}anon{% endif %}|{% if event is defined %}event{% endif %}",
    );

    let view = renderer(&paths, &app(false, true), None, Arc::default());
    assert_eq!(view.render("anon.html.twig", ()).unwrap(), "anon|");
    assert!(!view.globals().contains_key("event"));
}

#[test]
fn caller_variables_shadow_globals() {
    let (_dir, paths) = fixture();
    write(&paths.translatable_dir(), "shadow.html.twig", "{{ user }}-{{ amount }}");

    let view = renderer(&paths, &app(false, true), Some(participant()), Arc::default());
    let html = view.render("shadow.html.twig", vars(&[("user", "guest"), ("amount", "100")])).unwrap();
    assert_eq!(html, "guest-100");
}

fn vars(pairs: &[(&str, &str)]) -> std::collections::BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn trans_filter_uses_the_current_locale() {
    let (_dir, paths) = fixture();
    write(
        &paths.translatable_dir(),
        "mail.html.twig",
        "{{ 'mail.subject'|trans }} / {{ 'greeting'|trans({'%name%': user.email}) }}",
    );

    let view = renderer(&paths, &app(false, true), Some(participant()), Arc::default());
    assert_eq!(view.render("mail.html.twig", ()).unwrap(), "Payment info / Hello scout@example.com");

    view.translator().set_locale(Locale::Cs);
    assert_eq!(view.render("mail.html.twig", ()).unwrap(), "Platební údaje / Ahoj scout@example.com");
}

#[test]
fn disabled_cache_reloads_templates_from_disk() {
    let (_dir, paths) = fixture();
    let dir = paths.translatable_dir();
    write(&dir, "live.html.twig", "first");

    let live = renderer(&paths, &app(false, false), None, Arc::default());
    let cached = renderer(&paths, &app(false, true), None, Arc::default());
    assert_eq!(live.render("live.html.twig", ()).unwrap(), "first");
    assert_eq!(cached.render("live.html.twig", ()).unwrap(), "first");

    write(&dir, "live.html.twig", "second");
    assert_eq!(live.render("live.html.twig", ()).unwrap(), "second");
    assert_eq!(cached.render("live.html.twig", ()).unwrap(), "first");
}

#[test]
fn dump_is_only_registered_in_debug() {
    let (_dir, paths) = fixture();
    write(&paths.translatable_dir(), "dump.html.twig", "{{ dump(1) }}");

    let debug = renderer(&paths, &app(true, true), None, Arc::default());
    assert_eq!(debug.render("dump.html.twig", ()).unwrap(), "1");

    let production = renderer(&paths, &app(false, true), None, Arc::default());
    assert!(matches!(production.render("dump.html.twig", ()), Err(ViewError::Template { .. })));
}

#[test]
fn missing_template_is_a_template_error() {
    let (_dir, paths) = fixture();
    let view = renderer(&paths, &app(false, true), None, Arc::default());
    let err = view.render("nope.html.twig", ()).unwrap_err();
    assert!(matches!(err, ViewError::Template { .. }));
    assert!(err.to_string().contains("nope.html.twig"));
}
