use kissj_domain::settings::{InsecureMailOptions, MailerSettings};
use kissj_domain::{AppPaths, Locale};
use secrecy::SecretString;
use std::path::PathBuf;

fn mailer(insecure: Option<InsecureMailOptions>) -> MailerSettings {
    MailerSettings {
        smtp: true,
        server: "smtp.example.org".to_owned(),
        port: 587,
        auth: true,
        username: "mailer".to_owned(),
        password: SecretString::from("hunter2"),
        secure: "tls".to_owned(),
        from_mail: "registration@example.org".to_owned(),
        from_name: "Registration".to_owned(),
        bcc_mail: "archive@example.org".to_owned(),
        bcc_name: "Archive".to_owned(),
        send_mail_to_main_recipient: true,
        insecure,
    }
}

#[test]
fn insecure_mail_options_default_to_safe_values() {
    let settings = mailer(None);
    assert!(!settings.disable_tls());
    assert_eq!(settings.debug_output_level(), 0);

    let relaxed = mailer(Some(InsecureMailOptions { disable_tls: true, debug_output_level: 2 }));
    assert!(relaxed.disable_tls());
    assert_eq!(relaxed.debug_output_level(), 2);
}

#[test]
fn secrets_are_redacted_in_debug_output() {
    let rendered = format!("{:?}", mailer(None));
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn paths_point_at_catalogs_and_translatable_templates() {
    let paths = AppPaths::new("/srv/db.sqlite", "/srv/templates", "/srv/uploads");
    assert_eq!(paths.catalog(Locale::Cs), PathBuf::from("/srv/templates/cs.yaml"));
    assert_eq!(paths.translatable_dir(), PathBuf::from("/srv/templates/translatable"));
}
