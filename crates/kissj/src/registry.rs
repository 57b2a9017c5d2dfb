use crate::error::RegistryError;
use crate::locale::LocaleResolver;
use crate::mailer::Mailer;
use crate::session::{AnonymousUser, InMemoryFlashMessages};
use kissj_database::ConnectionDescriptor;
use kissj_domain::session::{CurrentUserResolver, FlashMessageStore};
use kissj_domain::settings::PaymentSettings;
use kissj_domain::{AppPaths, FileHandlerType, Locale, Settings};
use kissj_logger::{LevelFilter, Logger};
use kissj_mailer::MailSender;
use kissj_storage::{FileHandler, LocalFileHandler, S3FileHandler, S3Options};
use kissj_view::{Translator, ViewRenderer};
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub struct RegistryInner {
    pub settings: Settings,
    pub paths: AppPaths,
    users: Arc<dyn CurrentUserResolver>,
    flashes: Arc<dyn FlashMessageStore>,
    file_handler: OnceCell<FileHandler>,
    translator: OnceCell<Translator>,
    view: OnceCell<Arc<ViewRenderer>>,
    logger: OnceCell<Logger>,
    mailer: OnceCell<Mailer>,
}

/// Every service the application needs, constructed on first request and then kept.
///
/// The database descriptor is the exception: [`Registry::database`] builds a fresh one on
/// each call. The local file handler is opened by [`RegistryBuilder::build`] itself.
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn database(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::from_settings(&self.settings.database)
    }

    /// # Errors
    /// Returns [`RegistryError::Storage`] if the local upload directory cannot be opened.
    pub async fn file_handler(&self) -> Result<&FileHandler, RegistryError> {
        self.inner.file_handler.get_or_try_init(|| self.open_file_handler()).await
    }

    /// Whether the file handler has been constructed yet.
    pub fn file_handler_ready(&self) -> bool {
        self.inner.file_handler.initialized()
    }

    /// # Errors
    /// Returns [`RegistryError::View`] if a translation catalog cannot be loaded.
    pub async fn translator(&self) -> Result<&Translator, RegistryError> {
        self.inner
            .translator
            .get_or_try_init(|| async {
                let translator = Translator::load(&self.paths, self.settings.app.default_locale)?;
                debug!(locale = %translator.locale(), "Translator ready");
                Ok::<_, RegistryError>(translator)
            })
            .await
    }

    /// # Errors
    /// Returns [`RegistryError::View`] if the translator behind it cannot be loaded.
    pub async fn view(&self) -> Result<&Arc<ViewRenderer>, RegistryError> {
        self.inner
            .view
            .get_or_try_init(|| async {
                let translator = self.translator().await?.clone();
                Ok::<_, RegistryError>(Arc::new(ViewRenderer::new(
                    &self.paths,
                    &self.settings.app,
                    translator,
                    Arc::clone(&self.inner.users),
                    Arc::clone(&self.inner.flashes),
                )))
            })
            .await
    }

    /// The application logger. Attaches to an existing global subscriber if one is set.
    ///
    /// # Errors
    /// Returns [`RegistryError::Logger`] if the logger configuration is rejected.
    pub async fn logger(&self) -> Result<&Logger, RegistryError> {
        self.inner
            .logger
            .get_or_try_init(|| async {
                let directive = self.settings.logger.level.filter_directive();
                let level = directive.parse::<LevelFilter>().map_err(|e| RegistryError::Validation {
                    message: e.to_string().into(),
                    context: Some("LOGGER_LEVEL".into()),
                })?;
                let logger = Logger::builder().name(&self.settings.app.name).level(level).init_or_reuse()?;
                info!(name = logger.name(), uid = logger.uid(), %level, "Logger ready");
                Ok::<_, RegistryError>(logger)
            })
            .await
    }

    /// # Errors
    /// Returns [`RegistryError::Mailer`] if the transport cannot be configured and
    /// [`RegistryError::View`] if the view renderer cannot be built.
    pub async fn mailer(&self) -> Result<&Mailer, RegistryError> {
        self.inner
            .mailer
            .get_or_try_init(|| async {
                let sender = MailSender::from_settings(self.settings.mail.clone())?;
                let view = Arc::clone(self.view().await?);
                debug!(smtp = self.settings.mail.smtp, "Mailer ready");
                Ok::<_, RegistryError>(Mailer::new(sender, view))
            })
            .await
    }

    pub fn payment_account(&self) -> &PaymentSettings {
        &self.settings.payment
    }

    pub fn flash_messages(&self) -> &Arc<dyn FlashMessageStore> {
        &self.inner.flashes
    }

    pub fn user_resolver(&self) -> &Arc<dyn CurrentUserResolver> {
        &self.inner.users
    }

    pub fn locale_resolver(&self) -> LocaleResolver {
        LocaleResolver::new(self.inner.settings.app.default_locale)
    }

    /// Resolves the request locale and switches the translator to it.
    ///
    /// # Errors
    /// Returns [`RegistryError::View`] if the translator cannot be loaded.
    pub async fn localize(&self, accept_language: Option<&str>) -> Result<Locale, RegistryError> {
        let locale = self.locale_resolver().resolve(accept_language);
        self.translator().await?.set_locale(locale);
        Ok(locale)
    }

    #[instrument(skip(self), fields(kind = self.settings.storage.file_handler.as_str()))]
    async fn open_file_handler(&self) -> Result<FileHandler, RegistryError> {
        let handler: FileHandler = match self.settings.storage.file_handler {
            FileHandlerType::Local => {
                LocalFileHandler::builder().root(&self.paths.uploads_dir).open().await?.into()
            },
            FileHandlerType::S3Bucket => {
                let s3 = &self.settings.storage.s3;
                let handler = S3FileHandler::new(S3Options {
                    bucket: s3.bucket.clone(),
                    region: s3.region.clone(),
                    endpoint: s3.endpoint.clone(),
                    access_key: s3.key.clone(),
                    secret_key: s3.secret.clone(),
                });
                handler.connect().clone().into()
            },
        };
        info!("File handler ready");
        Ok(handler)
    }
}

impl Deref for Registry {
    type Target = RegistryInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    settings: Option<Settings>,
    paths: Option<AppPaths>,
    users: Option<Arc<dyn CurrentUserResolver>>,
    flashes: Option<Arc<dyn FlashMessageStore>>,
}

impl RegistryBuilder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn paths(mut self, paths: AppPaths) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Defaults to [`AnonymousUser`].
    pub fn user_resolver(mut self, users: Arc<dyn CurrentUserResolver>) -> Self {
        self.users = Some(users);
        self
    }

    /// Defaults to an empty [`InMemoryFlashMessages`].
    pub fn flash_messages(mut self, flashes: Arc<dyn FlashMessageStore>) -> Self {
        self.flashes = Some(flashes);
        self
    }

    /// # Errors
    /// Returns [`RegistryError::Validation`] if settings or paths are missing, and
    /// [`RegistryError::Storage`] if the local file handler cannot be opened.
    pub async fn build(self) -> Result<Registry, RegistryError> {
        let settings = self.settings.ok_or_else(|| RegistryError::Validation {
            message: "Settings not provided".into(),
            context: None,
        })?;
        let paths = self.paths.ok_or_else(|| RegistryError::Validation {
            message: "Application paths not provided".into(),
            context: None,
        })?;

        let registry = Registry {
            inner: Arc::new(RegistryInner {
                settings,
                paths,
                users: self.users.unwrap_or_else(|| Arc::new(AnonymousUser)),
                flashes: self.flashes.unwrap_or_else(|| Arc::new(InMemoryFlashMessages::default())),
                file_handler: OnceCell::new(),
                translator: OnceCell::new(),
                view: OnceCell::new(),
                logger: OnceCell::new(),
                mailer: OnceCell::new(),
            }),
        };

        if registry.settings.storage.file_handler == FileHandlerType::Local {
            registry.file_handler().await?;
        }
        Ok(registry)
    }
}
