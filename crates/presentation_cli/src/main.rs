//! Pronunciation CLI
//!
//! Looks up pronunciation audio from the command line and optionally stores
//! it in a media directory.

#![allow(clippy::print_stdout)]

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use domain::{Pronunciation, ProviderKind};
use integration_pronunciation::{
    DirectoryMediaStore, LookupOutcome, PronunciationClient, PronunciationError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Pronunciation audio lookup
#[derive(Parser)]
#[command(name = "pronounce")]
#[command(author, version, about = "Pronunciation audio lookup", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./pronounce.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up pronunciations of a term
    ///
    /// Example: pronounce lookup 猫 --provider japanesepod101 --kana ねこ
    /// Example: pronounce lookup 사랑 --provider krdict --provider naver --fallback --download
    Lookup {
        /// Term to look up
        term: String,

        /// Provider to query (repeatable; default: all providers for the language)
        #[arg(short, long = "provider")]
        providers: Vec<ProviderKind>,

        /// Language tag for the produced records
        #[arg(short, long)]
        language: Option<String>,

        /// Kana reading (JapanesePod101 only)
        #[arg(short, long)]
        kana: Option<String>,

        /// Store the audio in the media directory
        #[arg(short, long)]
        download: bool,

        /// Stop at the first provider that has audio
        #[arg(short, long)]
        fallback: bool,
    },

    /// List available providers
    Providers,

    /// Delete staged audio from the scratch directory
    Cleanup,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Providers to query when none are named on the command line
fn default_providers(language: Option<&str>) -> Vec<ProviderKind> {
    ProviderKind::ALL
        .into_iter()
        .filter(|kind| {
            language.is_none_or(|language| {
                let primary = language.split(['-', '_']).next().unwrap_or(language);
                kind.default_language().eq_ignore_ascii_case(primary)
            })
        })
        .collect()
}

/// One-line description of a record
fn describe_record(record: &Pronunciation) -> String {
    let source = record
        .source
        .url()
        .map_or_else(|| "<inline audio>".to_string(), ToString::to_string);
    let mut line = format!(
        "[{}] {} | {} | {}",
        record.provider,
        record.headword(),
        record.speaker_label,
        source
    );
    if let Some(media_ref) = record.media_ref() {
        line.push_str(&format!(" -> {media_ref}"));
    }
    line
}

fn describe_outcome(kind: Option<ProviderKind>, outcome: &LookupOutcome) -> String {
    let label = kind.map_or_else(|| "all".to_string(), |kind| kind.to_string());
    match outcome {
        LookupOutcome::Found(records) => format!("🔊 {label}: {} pronunciation(s)", records.len()),
        LookupOutcome::NoResults => format!("🔇 {label}: no recordings"),
        LookupOutcome::Empty => format!("🔇 {label}: nothing found"),
    }
}

async fn download_records(client: &PronunciationClient, records: &mut [Pronunciation]) {
    let results = client.download_all(records).await;
    for (record, result) in records.iter().zip(results) {
        if let Err(e) = result {
            println!("   ⚠️  Download failed for {}: {e}", record.headword());
        }
    }
}

fn print_records(records: &[Pronunciation]) {
    for record in records {
        println!("   {}", describe_record(record));
    }
}

async fn lookup(
    client: &PronunciationClient,
    term: &str,
    providers: Vec<ProviderKind>,
    language: Option<&str>,
    kana: Option<&str>,
    download: bool,
    fallback: bool,
) -> Result<(), PronunciationError> {
    let providers = if providers.is_empty() {
        default_providers(language)
    } else {
        providers
    };

    if fallback {
        let outcome = client.lookup_first(&providers, term, language, kana).await?;
        println!("{}", describe_outcome(None, &outcome));
        let mut records = outcome.into_records();
        if download {
            download_records(client, &mut records).await;
        }
        print_records(&records);
        return Ok(());
    }

    for kind in providers {
        match client.lookup(kind, term, language, kana).await {
            Ok(outcome) => {
                println!("{}", describe_outcome(Some(kind), &outcome));
                let mut records = outcome.into_records();
                if download {
                    download_records(client, &mut records).await;
                }
                print_records(&records);
            },
            Err(e) => println!("❌ {kind}: {e}"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let store = Arc::new(DirectoryMediaStore::new(&app_config.media_dir));
    let client = PronunciationClient::new(app_config.pronunciation, store)?;

    match cli.command {
        Commands::Lookup {
            term,
            providers,
            language,
            kana,
            download,
            fallback,
        } => {
            lookup(
                &client,
                &term,
                providers,
                language.as_deref(),
                kana.as_deref(),
                download,
                fallback,
            )
            .await?;
        },

        Commands::Providers => {
            println!("📚 Providers:");
            for kind in ProviderKind::ALL {
                println!("   {:<20} {}", kind.id(), kind.default_language());
            }
        },

        Commands::Cleanup => {
            let removed = client.cleanup().await?;
            println!("🧹 Removed {removed} scratch file(s)");
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use domain::AudioSource;

    use super::*;

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn default_providers_by_language() {
        assert_eq!(
            default_providers(Some("ko")),
            vec![ProviderKind::Krdict, ProviderKind::Naver]
        );
        assert_eq!(
            default_providers(Some("ja-JP")),
            vec![ProviderKind::JapanesePod101, ProviderKind::JapanesePod101Alt]
        );
        assert_eq!(default_providers(None).len(), ProviderKind::ALL.len());
        assert!(default_providers(Some("xx")).is_empty());
    }

    #[test]
    fn describe_record_with_url() {
        let record = Pronunciation::new(
            ProviderKind::Naver,
            "ko",
            "[사랑] - love",
            AudioSource::Url("https://dict-dn.pstatic.net/v/sarang.mp3".to_string()),
            "사랑",
        )
        .unwrap();

        assert_eq!(
            describe_record(&record),
            "[naver] 사랑 | [사랑] - love | https://dict-dn.pstatic.net/v/sarang.mp3"
        );
    }

    #[test]
    fn describe_record_inline_and_downloaded() {
        let mut record = Pronunciation::new(
            ProviderKind::JapanesePod101,
            "ja",
            "ねこ",
            AudioSource::Inline(bytes::Bytes::from_static(b"mp3")),
            "猫",
        )
        .unwrap();
        record.attach_media("jp101-u732b.mp3".into()).unwrap();

        assert_eq!(
            describe_record(&record),
            "[japanesepod101] 猫 | ねこ | <inline audio> -> jp101-u732b.mp3"
        );
    }

    #[test]
    fn describe_outcomes() {
        assert_eq!(
            describe_outcome(Some(ProviderKind::Krdict), &LookupOutcome::NoResults),
            "🔇 krdict: no recordings"
        );
        assert_eq!(
            describe_outcome(None, &LookupOutcome::Empty),
            "🔇 all: nothing found"
        );
    }
}
