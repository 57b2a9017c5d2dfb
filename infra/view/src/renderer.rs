use crate::error::{ViewError, ViewErrorExt};
use crate::translator::Translator;
use kissj_domain::AppPaths;
use kissj_domain::session::{CurrentUserResolver, FlashMessageStore};
use kissj_domain::settings::AppSettings;
use minijinja::value::{Rest, Value, ValueKind};
use minijinja::{AutoEscape, Environment, Error, ErrorKind};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const FLASH_MESSAGES_GLOBAL: &str = "flashMessages";
pub const USER_GLOBAL: &str = "user";
pub const EVENT_GLOBAL: &str = "event";

/// Renders templates from `<templates>/translatable`.
///
/// Every render sees three globals resolved at that moment: `flashMessages`, `user`
/// and, when a user is signed in, `event`. Variables passed by the caller shadow them.
#[derive(Debug)]
pub struct ViewRenderer {
    env: RwLock<Environment<'static>>,
    template_dir: PathBuf,
    cache: bool,
    debug: bool,
    translator: Translator,
    users: Arc<dyn CurrentUserResolver>,
    flashes: Arc<dyn FlashMessageStore>,
}

impl ViewRenderer {
    pub fn new(
        paths: &AppPaths,
        app: &AppSettings,
        translator: Translator,
        users: Arc<dyn CurrentUserResolver>,
        flashes: Arc<dyn FlashMessageStore>,
    ) -> Self {
        let template_dir = paths.translatable_dir();

        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&template_dir));
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".twig") { AutoEscape::Html } else { minijinja::default_auto_escape_callback(name) }
        });

        let trans = translator.clone();
        env.add_filter("trans", move |id: String, params: Option<Value>| -> Result<String, Error> {
            let params = params.map(|p| string_pairs(&p)).transpose()?.unwrap_or_default();
            let params: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            Ok(trans.trans(&id, &params))
        });

        if app.debug {
            env.add_function("dump", |values: Rest<Value>| -> String {
                values.iter().map(|v| format!("{v:#?}")).collect::<Vec<_>>().join("\n")
            });
        }

        debug!(dir = %template_dir.display(), cache = app.template_cache, debug = app.debug, "View renderer ready");
        Self {
            env: RwLock::new(env),
            template_dir,
            cache: app.template_cache,
            debug: app.debug,
            translator,
            users,
            flashes,
        }
    }

    pub const fn is_cached(&self) -> bool {
        self.cache
    }

    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn template_dir(&self) -> &std::path::Path {
        &self.template_dir
    }

    pub const fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Globals as they stand right now.
    pub fn globals(&self) -> BTreeMap<String, Value> {
        let mut globals = BTreeMap::new();
        globals.insert(FLASH_MESSAGES_GLOBAL.to_owned(), Value::from_serialize(self.flashes.messages()));

        let user = self.users.current_user();
        if let Some(user) = &user {
            globals.insert(EVENT_GLOBAL.to_owned(), Value::from_serialize(&user.event));
        }
        globals.insert(USER_GLOBAL.to_owned(), Value::from_serialize(&user));
        globals
    }

    /// # Errors
    /// Returns [`ViewError::Template`] if the template is missing, fails to parse or
    /// fails to render.
    #[instrument(skip(self, context), fields(cache = self.cache))]
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, ViewError> {
        if !self.cache {
            self.env.write().clear_templates();
        }

        let mut vars = self.globals();
        let context = Value::from_serialize(context);
        if context.kind() == ValueKind::Map {
            for key in context.try_iter()? {
                let value = context.get_item(&key)?;
                vars.insert(key.to_string(), value);
            }
        }

        let env = self.env.read();
        let template = env.get_template(name).context(name.to_owned())?;
        template.render(&vars).context(name.to_owned())
    }
}

fn string_pairs(params: &Value) -> Result<Vec<(String, String)>, Error> {
    if params.kind() != ValueKind::Map {
        return Err(Error::new(ErrorKind::InvalidOperation, "trans parameters must be a mapping"));
    }

    params
        .try_iter()?
        .map(|key| Ok((key.to_string(), params.get_item(&key)?.to_string())))
        .collect()
}
