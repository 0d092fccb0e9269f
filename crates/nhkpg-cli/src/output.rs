//! Result reporting.
//!
//! Tables are emitted as `tracing` events, which the subscriber writes to
//! stderr. `--json` output is the only thing written to stdout.

use std::io::Write;

use anyhow::{Context, Result};
use nhkpg_api::nhk::{CREDIT, DescriptionList, NowOnAirList, Program, ProgramList};
use serde::Serialize;

/// Formats one program as a tab-separated row.
pub fn program_line(program: &Program) -> String {
    let service = if program.service.id.is_empty() {
        "-"
    } else {
        program.service.id.as_str()
    };
    let title = if program.subtitle.is_empty() {
        program.title.clone()
    } else {
        format!("{} / {}", program.title, program.subtitle)
    };
    format!(
        "{}\t{}\t{}\t{}\t{}",
        program.start_time.format("%Y-%m-%d %H:%M"),
        program.end_time.format("%H:%M"),
        service,
        program.id,
        title,
    )
}

/// Formats an optional now-on-air slot.
fn slot_line(program: Option<&Program>) -> String {
    program.map_or_else(|| String::from("-"), program_line)
}

/// Reports a program or genre list.
pub fn report_programs(list: &ProgramList) {
    tracing::info!("Start\t\t\tEnd\tService\tID\t\tTitle");
    for program in list.programs() {
        tracing::info!("{}", program_line(program));
    }
    tracing::info!("Total: {} programs", list.programs().count());
}

/// Reports program descriptions with their links.
pub fn report_descriptions(list: &DescriptionList) {
    for description in list.descriptions() {
        tracing::info!("{}", program_line(&description.program));
        if !description.program.genres.is_empty() {
            tracing::info!("  Genres: {}", description.program.genres.join(","));
        }
        if !description.program_url.is_empty() {
            tracing::info!("  Program URL: {}", description.program_url);
        }
        if !description.episode_url.is_empty() {
            tracing::info!("  Episode URL: {}", description.episode_url);
        }
        if !description.hashtags.is_empty() {
            tracing::info!("  Hashtags: {}", description.hashtags.join(" "));
        }
        let ondemand = &description.extras.ondemand_episode;
        if !ondemand.url.is_empty() {
            tracing::info!("  On demand: {} ({})", ondemand.title, ondemand.url);
        }
    }
    tracing::info!("Total: {} descriptions", list.descriptions().count());
}

/// Reports the previous/present/following programs per service.
pub fn report_now_on_air(list: &NowOnAirList) {
    for (service, now) in &list.now_on_air_list {
        tracing::info!("[{}]", service);
        tracing::info!("  Previous:  {}", slot_line(now.previous.as_ref()));
        tracing::info!("  Present:   {}", slot_line(now.present.as_ref()));
        tracing::info!("  Following: {}", slot_line(now.following.as_ref()));
    }
}

/// Reports the attribution line.
pub fn report_credit() {
    tracing::info!("{}", CREDIT);
}

/// Writes a value as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize>(value: &T, mut writer: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    writeln!(writer, "{json}").context("failed to write JSON output")
}
