use crate::error::RegistryError;
use kissj_mailer::MailSender;
use kissj_view::ViewRenderer;
use serde::Serialize;
use std::sync::Arc;

/// The mail sender bundled with the view renderer, so bodies can come from templates.
#[derive(Debug)]
pub struct Mailer {
    sender: MailSender,
    view: Arc<ViewRenderer>,
}

impl Mailer {
    pub(crate) const fn new(sender: MailSender, view: Arc<ViewRenderer>) -> Self {
        Self { sender, view }
    }

    pub const fn sender(&self) -> &MailSender {
        &self.sender
    }

    /// # Errors
    /// Returns [`RegistryError::Mailer`]; a delivery failure reads `Error sending email`.
    pub async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), RegistryError> {
        Ok(self.sender.send(recipient, subject, html_body).await?)
    }

    /// Renders `template` with `context` and sends the result as the HTML body.
    ///
    /// # Errors
    /// Returns [`RegistryError::View`] if rendering fails (nothing is sent) and
    /// [`RegistryError::Mailer`] if delivery fails.
    pub async fn send_template<S: Serialize>(
        &self,
        recipient: &str,
        subject: &str,
        template: &str,
        context: S,
    ) -> Result<(), RegistryError> {
        let body = self.view.render(template, context)?;
        self.send(recipient, subject, &body).await
    }
}
