// ABOUTME: CLI for checking and resolving video embed URLs with embedguard-resolver.
// ABOUTME: Each subcommand prints JSON; resolve can also print a ready-to-use iframe element.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use embedguard_resolver::{EmbedParameters, Resolver, ResolverOptions};
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Sanitize, validate, and resolve third-party video links.
#[derive(Parser, Debug)]
#[command(name = "embedguard")]
#[command(about = "Turn untrusted video links into safe embed URLs", long_about = None)]
struct Cli {
    /// Resolver options as JSON (allowed_domains, default_params, allow_full_screen).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output compact JSON instead of pretty.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Strip script-injection fragments from a URL.
    Sanitize { url: String },
    /// Check a URL against the allowlist. Exits 1 when not allowed.
    Check { url: String },
    /// Report which provider a URL belongs to.
    Classify { url: String },
    /// Build an embed URL without the allowlist gate.
    Embed {
        url: String,
        #[command(flatten)]
        playback: PlaybackArgs,
    },
    /// Print the hardened iframe attribute set.
    Attrs {
        #[arg(long, default_value = "Embedded video")]
        title: String,
        /// Disallow fullscreen.
        #[arg(long, default_value_t = false)]
        no_fullscreen: bool,
    },
    /// Run the full sanitize, allowlist, and embed pipeline. Exits 1 if any target is rejected.
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,
        #[arg(long, default_value = "Embedded video")]
        title: String,
        #[command(flatten)]
        playback: PlaybackArgs,
        /// Print an <iframe> element instead of JSON (single target only).
        #[arg(long, default_value_t = false)]
        html: bool,
    },
}

#[derive(Args, Debug)]
struct PlaybackArgs {
    #[arg(long)]
    autoplay: bool,
    /// Leave the video unmuted.
    #[arg(long)]
    no_mute: bool,
    #[arg(long = "loop")]
    loop_playback: bool,
}

impl PlaybackArgs {
    /// Applies the flags on top of the resolver's defaults.
    fn params(&self, defaults: EmbedParameters) -> EmbedParameters {
        EmbedParameters {
            autoplay: defaults.autoplay || self.autoplay,
            muted: defaults.muted && !self.no_mute,
            loop_playback: defaults.loop_playback || self.loop_playback,
        }
    }
}

fn main() -> Result<ExitCode> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolver = load_resolver(cli.config.as_deref())?;

    let (output, ok) = match &cli.command {
        Command::Sanitize { url } => (
            json!({ "input": url, "sanitized": resolver.sanitize(url) }),
            true,
        ),
        Command::Check { url } => {
            let allowed = resolver.is_allowed(url);
            (json!({ "url": url, "allowed": allowed }), allowed)
        }
        Command::Classify { url } => (
            json!({ "url": url, "provider": resolver.classify(url) }),
            true,
        ),
        Command::Embed { url, playback } => {
            let params = playback.params(resolver.default_params());
            (serde_json::to_value(resolver.embed_url(url, Some(&params)))?, true)
        }
        Command::Attrs {
            title,
            no_fullscreen,
        } => {
            let mut attrs = resolver.attributes(title);
            if *no_fullscreen {
                attrs.allow_full_screen = false;
            }
            (serde_json::to_value(attrs)?, true)
        }
        Command::Resolve {
            urls,
            title,
            playback,
            html,
        } => {
            let params = playback.params(resolver.default_params());
            if *html {
                anyhow::ensure!(urls.len() == 1, "--html is only valid with a single target");
                return print_iframe(&resolver, &urls[0], &params, title);
            }
            resolve_all(&resolver, urls, &params, title)
        }
    };

    if cli.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

fn load_resolver(config: Option<&Path>) -> Result<Resolver> {
    let opts = match config {
        Some(path) => {
            debug!(path = %path.display(), "loading resolver config");
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ResolverOptions::from_json_str(&raw)?
        }
        None => ResolverOptions::default(),
    };
    Ok(Resolver::new(opts)?)
}

fn print_iframe(
    resolver: &Resolver,
    url: &str,
    params: &EmbedParameters,
    title: &str,
) -> Result<ExitCode> {
    match resolver.resolve(url, Some(params), title) {
        Ok(resolved) => {
            println!("{}", resolved.attributes.to_html(&resolved.result.embed_url));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            Ok(ExitCode::from(1))
        }
    }
}

/// Output format:
/// - Single target resolved => the resolved object itself
/// - Otherwise an envelope with per-target results and counts
fn resolve_all(
    resolver: &Resolver,
    urls: &[String],
    params: &EmbedParameters,
    title: &str,
) -> (Value, bool) {
    let results: Vec<Value> = urls
        .iter()
        .map(|url| match resolver.resolve(url, Some(params), title) {
            Ok(resolved) => json!({ "url": url, "ok": true, "embed": resolved, "error": null }),
            Err(err) => json!({ "url": url, "ok": false, "embed": null, "error": err.to_string() }),
        })
        .collect();

    let resolved = results
        .iter()
        .filter(|r| r.get("ok").and_then(Value::as_bool) == Some(true))
        .count();
    let rejected = results.len() - resolved;

    if results.len() == 1 && resolved == 1 {
        let embed = results[0].get("embed").cloned().unwrap_or_else(|| json!({}));
        return (embed, true);
    }

    (
        json!({
            "results": results,
            "total": results.len(),
            "resolved": resolved,
            "rejected": rejected,
        }),
        rejected == 0,
    )
}
