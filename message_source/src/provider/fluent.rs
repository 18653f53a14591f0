//! Static provider backed by Fluent bundles.
//!
//! Fluent catalogues are compiled once at build time and never reloaded, so
//! this provider does not offer the resource-backed capability. Positional
//! arguments are exposed to patterns as `$arg0`, `$arg1`, and so on, and
//! dotted message codes are looked up under their dashed Fluent form
//! (`cli.about` → `cli-about`).

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentError, FluentResource, FluentValue};
use indexmap::IndexMap;
use unic_langid::LanguageIdentifier;

use super::MessageProvider;
use crate::{I18nError, MessageArgs, fallback_chain};

/// Captures formatting failures encountered when resolving Fluent patterns.
#[derive(Debug, Clone)]
pub struct FormattingIssue {
    /// Code that failed to format.
    pub code: String,
    /// Locale of the bundle that produced the failure.
    pub locale: LanguageIdentifier,
    /// Source name of the provider.
    pub provider: String,
    /// Formatting or resolver errors emitted by Fluent.
    pub errors: Vec<FluentError>,
}

/// Reporter invoked when Fluent raises formatting errors.
pub type FormattingIssueReporter = Arc<dyn Fn(&FormattingIssue) + Send + Sync>;

type Bundle = FluentBundle<Arc<FluentResource>>;

/// Provider resolving codes from per-locale Fluent bundles.
///
/// # Examples
///
/// ```
/// use message_source::{FluentMessageProvider, MessageArgs, MessageProvider, langid};
///
/// let provider = FluentMessageProvider::builder("cli", langid!("en"))
///     .with_resources(langid!("en"), ["cli.greeting = Hello, { $arg0 }!"])
///     .try_build()
///     .expect("valid Fluent");
/// let args = MessageArgs::new().with("Ada");
/// assert_eq!(
///     provider.message("cli.greeting", &langid!("en-GB"), &args).as_deref(),
///     Some("Hello, Ada!")
/// );
/// ```
pub struct FluentMessageProvider {
    source: String,
    default_locale: LanguageIdentifier,
    supported_locales: Vec<LanguageIdentifier>,
    bundles: IndexMap<LanguageIdentifier, Bundle>,
    report_issue: FormattingIssueReporter,
}

/// Builds a [`FluentMessageProvider`].
pub struct FluentMessageProviderBuilder {
    source: String,
    default_locale: LanguageIdentifier,
    resources: IndexMap<LanguageIdentifier, Vec<String>>,
    report_issue: FormattingIssueReporter,
}

impl FluentMessageProvider {
    /// Starts building a provider named `source`.
    #[must_use]
    pub fn builder(
        source: impl Into<String>,
        default_locale: LanguageIdentifier,
    ) -> FluentMessageProviderBuilder {
        FluentMessageProviderBuilder {
            source: source.into(),
            default_locale,
            resources: IndexMap::new(),
            report_issue: default_reporter(),
        }
    }

    fn format(
        &self,
        code: &str,
        locale: &LanguageIdentifier,
        bundle: &Bundle,
        args: Option<&FluentArgs<'_>>,
    ) -> Option<String> {
        let pattern = bundle.get_message(code)?.value()?;
        let mut errors = Vec::new();
        let rendered = bundle.format_pattern(pattern, args, &mut errors);
        if errors.is_empty() {
            return Some(rendered.into_owned());
        }
        (self.report_issue)(&FormattingIssue {
            code: code.to_owned(),
            locale: locale.clone(),
            provider: self.source.clone(),
            errors,
        });
        None
    }
}

impl FluentMessageProviderBuilder {
    /// Adds Fluent resource text for `locale`.
    #[must_use]
    pub fn with_resources<I, S>(mut self, locale: LanguageIdentifier, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources
            .entry(locale)
            .or_default()
            .extend(resources.into_iter().map(Into::into));
        self
    }

    /// Installs a hook to report formatting issues surfaced by Fluent.
    #[must_use]
    pub fn with_error_reporter(mut self, reporter: FormattingIssueReporter) -> Self {
        self.report_issue = reporter;
        self
    }

    /// Parses and registers every resource.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::FluentParse`] or
    /// [`I18nError::FluentRegistration`] for the first locale whose text
    /// Fluent rejects, and [`I18nError::Configuration`] for an empty source
    /// name.
    pub fn try_build(self) -> Result<FluentMessageProvider, I18nError> {
        if self.source.trim().is_empty() {
            return Err(I18nError::configuration(
                self.source,
                "source name must not be empty",
            ));
        }

        let mut bundles = IndexMap::with_capacity(self.resources.len());
        for (locale, texts) in self.resources {
            let bundle = bundle_from_resources(&self.source, &locale, texts)?;
            bundles.insert(locale, bundle);
        }

        Ok(FluentMessageProvider {
            supported_locales: bundles.keys().cloned().collect(),
            source: self.source,
            default_locale: self.default_locale,
            bundles,
            report_issue: self.report_issue,
        })
    }
}

impl MessageProvider for FluentMessageProvider {
    fn message(
        &self,
        code: &str,
        locale: &LanguageIdentifier,
        args: &MessageArgs,
    ) -> Option<String> {
        let fluent_code = normalize_identifier(code);
        let fluent_args = positional_args(args);
        fallback_chain(locale, &self.default_locale)
            .iter()
            .find_map(|candidate| {
                let bundle = self.bundles.get(candidate)?;
                self.format(&fluent_code, candidate, bundle, fluent_args.as_ref())
            })
    }

    fn supported_locales(&self) -> &[LanguageIdentifier] {
        &self.supported_locales
    }

    fn default_locale(&self) -> &LanguageIdentifier {
        &self.default_locale
    }

    fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for FluentMessageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentMessageProvider")
            .field("source", &self.source)
            .field("default_locale", &self.default_locale)
            .field("supported_locales", &self.supported_locales)
            .field("report_issue", &"<reporter>")
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for FluentMessageProviderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentMessageProviderBuilder")
            .field("source", &self.source)
            .field("default_locale", &self.default_locale)
            .field("locales", &self.resources.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[must_use]
fn default_reporter() -> FormattingIssueReporter {
    Arc::new(|issue: &FormattingIssue| {
        tracing::warn!(
            code = %issue.code,
            locale = %issue.locale,
            provider = %issue.provider,
            errors = ?issue.errors,
            "failed to format Fluent message"
        );
    })
}

fn bundle_from_resources(
    source: &str,
    locale: &LanguageIdentifier,
    texts: Vec<String>,
) -> Result<Bundle, I18nError> {
    let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
    bundle.set_use_isolating(false);
    for text in texts {
        let parsed = FluentResource::try_new(normalize_resource_ids(&text)).map_err(
            |(_resource, errors)| I18nError::FluentParse {
                provider: source.to_owned(),
                locale: locale.clone(),
                errors,
            },
        )?;
        bundle
            .add_resource(Arc::new(parsed))
            .map_err(|errors| I18nError::FluentRegistration {
                provider: source.to_owned(),
                locale: locale.clone(),
                errors,
            })?;
    }
    Ok(bundle)
}

fn positional_args(args: &MessageArgs) -> Option<FluentArgs<'_>> {
    if args.is_empty() {
        return None;
    }
    let mut fluent_args = FluentArgs::with_capacity(args.len());
    for (position, value) in args.into_iter().enumerate() {
        fluent_args.set(format!("arg{position}"), FluentValue::from(value.as_str()));
    }
    Some(fluent_args)
}

/// Maps a dotted message code to the dashed form Fluent accepts.
fn normalize_identifier(code: &str) -> Cow<'_, str> {
    if code.contains('.') {
        Cow::Owned(code.replace('.', "-"))
    } else {
        Cow::Borrowed(code)
    }
}

/// Rewrites dotted top-level message identifiers in Fluent text.
///
/// Indented lines belong to message bodies, attributes or variants, and
/// terms (`-name`) or comments are not message identifiers, so all of those
/// are left untouched.
fn normalize_resource_ids(text: &str) -> String {
    text.lines()
        .map(|line| {
            let Some((left, right)) = line.split_once('=') else {
                return Cow::Borrowed(line);
            };
            let id = left.trim_end();
            let starts_as_identifier = id.chars().next().is_some_and(char::is_alphabetic);
            let is_identifier = id
                .chars()
                .all(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.'));
            if !starts_as_identifier || !is_identifier || !id.contains('.') {
                return Cow::Borrowed(line);
            }
            let padding = left.get(id.len()..).unwrap_or_default();
            Cow::Owned(format!("{}{padding}={right}", id.replace('.', "-")))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
