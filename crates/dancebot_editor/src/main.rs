// SPDX-License-Identifier: MIT OR Apache-2.0
//! `DanceBot` Editor - headless choreography shell
//!
//! Replays a scripted editing session against the choreography engine and
//! prints the resulting light and motion timelines.
//!
//! ```text
//! dancebot_editor [SESSION.ron] [SETTINGS.ron]
//! ```
//!
//! Without arguments a built-in demo session is replayed with default
//! settings.

mod session;

use dancebot_choreography::{ChoreographySettings, EditorContext, SlotKind};
use session::{Replayed, Session};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let session = match args.next() {
        Some(path) => match Session::load(Path::new(&path)) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Failed to load session {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Session::demo(),
    };

    let settings = match args.next() {
        Some(path) => match ChoreographySettings::load_or_default(Path::new(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Failed to load settings {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => ChoreographySettings::default(),
    };

    let mut ctx = EditorContext::new(settings, session.music_file());

    for (i, edit) in session.edits.iter().enumerate() {
        match edit.apply(&mut ctx) {
            Ok(Replayed::Edited(outcome)) => {
                let d = outcome.descriptor;
                tracing::info!(
                    "Edit {}: {:?} beats {}..{}{}",
                    i,
                    outcome.action,
                    d.start,
                    d.end(),
                    if outcome.clamped() { " (clamped)" } else { "" }
                );
            }
            Ok(Replayed::Cleared(d)) => {
                tracing::info!("Edit {}: cleared beats {}..{}", i, d.start, d.end());
            }
            // A rejected edit leaves the timeline untouched; keep replaying
            Err(e) => tracing::warn!("Edit {} rejected: {}", i, e),
        }
    }

    for kind in [SlotKind::Light, SlotKind::Motion] {
        println!("{:<7}| {}", kind.name(), render_row(&ctx, kind));
    }

    ExitCode::SUCCESS
}

fn render_row(ctx: &EditorContext, kind: SlotKind) -> String {
    ctx.coordinator()
        .slot_views(kind)
        .iter()
        .map(|view| view.color_tag.unwrap_or('.'))
        .collect::<Vec<_>>()
        .chunks(4)
        .map(|bar| bar.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
