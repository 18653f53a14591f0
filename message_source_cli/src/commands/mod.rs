//! Execution of `msgsource` subcommands.

use std::io::Write;
use std::sync::Arc;

use message_source::{
    CompositeMessageSource, DirResourceStore, EnvLocaleContext, I18nError, I18nSettings,
    LanguageIdentifier, MessageArgs, ResourceStore,
};
use serde::Serialize;

use crate::cli::{Args, Command, OutputFormat};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct Resolved<'a> {
    code: &'a str,
    locale: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
struct Resource {
    resource: String,
    messages: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
struct Diagnostic {
    source: String,
    resource: Option<String>,
    locale: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct Stored<'a> {
    source: &'a str,
    locale: String,
    code: &'a str,
}

/// Builds the resolver described by `args` and runs its subcommand,
/// writing the result to `out`.
///
/// # Errors
///
/// Returns [`CliError`] when the resolver cannot be built, the subcommand
/// fails, or the output cannot be written.
pub fn run(args: &Args, out: &mut dyn Write) -> Result<(), CliError> {
    let messages = open(args)?;
    match &args.command {
        Command::Get {
            code,
            locale,
            args: values,
        } => {
            let requested = parse_optional(locale.as_deref())?;
            let message_args: MessageArgs = values.iter().collect();
            let message = messages.message(code, requested.as_ref(), &message_args);
            let view = Resolved {
                code,
                locale: requested.map(|tag| tag.to_string()),
                message,
            };
            emit(out, args.format, &view, |text| writeln!(text, "{}", view.message))
        }
        Command::Locales => {
            let locales: Vec<String> = messages
                .supported_locales()
                .iter()
                .map(ToString::to_string)
                .collect();
            emit(out, args.format, &locales, |text| {
                locales.iter().try_for_each(|locale| writeln!(text, "{locale}"))
            })
        }
        Command::Resources => {
            let resources = resource_views(&messages);
            emit(out, args.format, &resources, |text| {
                for entry in &resources {
                    writeln!(text, "{}", entry.resource)?;
                    for (code, message) in &entry.messages {
                        writeln!(text, "  {code} = {message}")?;
                    }
                }
                Ok(())
            })
        }
        Command::Diagnose { code, locale } => {
            let requested = parse_optional(locale.as_deref())?;
            let records: Vec<Diagnostic> = messages
                .diagnose(code, requested.as_ref())
                .into_iter()
                .map(|record| Diagnostic {
                    source: record.source,
                    resource: record.resource,
                    locale: record.locale.map(|tag| tag.to_string()),
                    message: record.message,
                })
                .collect();
            emit(out, args.format, &records, |text| {
                records.iter().try_for_each(|record| {
                    writeln!(
                        text,
                        "{}\t{}\t{}\t{}",
                        record.source,
                        record.locale.as_deref().unwrap_or("-"),
                        record.resource.as_deref().unwrap_or("-"),
                        record.message.as_deref().unwrap_or("-"),
                    )
                })
            })
        }
        Command::Put {
            source,
            locale,
            code,
            message,
        } => {
            let target = I18nError::parse_locale(locale)?;
            messages.put_message(source, &target, code, message)?;
            let view = Stored {
                source,
                locale: target.to_string(),
                code,
            };
            emit(out, args.format, &view, |text| {
                writeln!(text, "stored {code} for {source} ({target})")
            })
        }
    }
}

fn open(args: &Args) -> Result<CompositeMessageSource, CliError> {
    let settings = I18nSettings::load(Some(args.config.as_path()))?;
    let root = args.resource_root();
    let dir = DirResourceStore::open(root).map_err(|cause| CliError::ResourceRoot {
        path: root.to_owned(),
        cause,
    })?;
    let store: Arc<dyn ResourceStore> = Arc::new(dir);
    tracing::debug!(config = %args.config, resources = %root, "building resolver");
    Ok(settings.build_composite(&store, Arc::new(EnvLocaleContext))?)
}

fn parse_optional(locale: Option<&str>) -> Result<Option<LanguageIdentifier>, CliError> {
    Ok(locale.map(I18nError::parse_locale).transpose()?)
}

fn resource_views(messages: &CompositeMessageSource) -> Vec<Resource> {
    messages
        .localized_resource_messages()
        .into_iter()
        .map(|(resource, map)| {
            let mut entries: Vec<(String, String)> = map
                .iter()
                .map(|(code, message)| (code.clone(), message.clone()))
                .collect();
            entries.sort();
            Resource {
                resource,
                messages: entries,
            }
        })
        .collect()
}

fn emit<T, F>(out: &mut dyn Write, format: OutputFormat, value: &T, text: F) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    match format {
        OutputFormat::Text => text(out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
