use kissj_domain::settings::MailerSettings;
use secrecy::SecretString;

/// Negotiated encryption. STARTTLS is the only mode the sender speaks.
pub const ENCRYPTION: &str = "tls";
pub const CHARSET: &str = "UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Talk to the configured SMTP relay.
    Smtp,
    /// Hand the message to the local `sendmail` binary.
    LocalSubmission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Certificate chain and hostname are verified.
    Verified,
    /// UNSAFE: self-signed certificates and mismatched hostnames are accepted.
    /// Only reachable through `INSECURE_DEV_MODE`.
    AcceptInvalid,
}

/// How a message will travel, derived from the mailer settings before any transport exists.
#[derive(Debug, Clone)]
pub struct TransportPlan {
    pub mode: DeliveryMode,
    pub host: String,
    pub port: u16,
    pub auth: bool,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsPolicy,
    pub encryption: &'static str,
}

impl TransportPlan {
    pub fn from_settings(settings: &MailerSettings) -> Self {
        Self {
            mode: if settings.smtp { DeliveryMode::Smtp } else { DeliveryMode::LocalSubmission },
            host: settings.server.clone(),
            port: settings.port,
            auth: settings.auth,
            username: settings.username.clone(),
            password: settings.password.clone(),
            tls: if settings.disable_tls() { TlsPolicy::AcceptInvalid } else { TlsPolicy::Verified },
            encryption: ENCRYPTION,
        }
    }

    pub const fn verifies_certificates(&self) -> bool {
        matches!(self.tls, TlsPolicy::Verified)
    }
}
