use crate::pipeline::{PipelineError, Services, artist, track};
use crate::user::PromptError;
use console::style;
use std::process::exit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuChoice {
    AddTrack,
    AddArtist,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuInput {
    Choice(MenuChoice),
    /// A number with no menu entry behind it.
    OutOfRange,
    NotANumber,
}

pub(crate) fn parse_menu_option(raw: &str) -> MenuInput {
    match raw.trim().parse::<i64>() {
        Ok(1) => MenuInput::Choice(MenuChoice::AddTrack),
        Ok(2) => MenuInput::Choice(MenuChoice::AddArtist),
        Ok(3) => MenuInput::Choice(MenuChoice::Exit),
        Ok(_) => MenuInput::OutOfRange,
        Err(_) => MenuInput::NotANumber,
    }
}

/// Serves the menu until the user picks "Exit".
///
/// A failed pipeline ends the process with status 1.
pub(crate) async fn run(services: &Services) -> Result<(), PromptError> {
    loop {
        let raw = services.prompter.ask_menu_option().await?;
        match parse_menu_option(&raw) {
            MenuInput::NotANumber => println!("{}", style("Please enter a valid option").red()),
            MenuInput::OutOfRange => tracing::debug!(%raw, "menu option out of range"),
            MenuInput::Choice(MenuChoice::AddTrack) => {
                let url = services.prompter.ask_video_url().await?;
                let outcome = exit_on_failure(track::run_track_pipeline(services, &url).await);
                tracing::debug!(catalog = %outcome.catalog_path.display(), record = ?outcome.record, "track added");
            }
            MenuInput::Choice(MenuChoice::AddArtist) => {
                let name = services.prompter.ask_artist_name().await?;
                let outcome = exit_on_failure(artist::run_artist_pipeline(services, name.trim()).await);
                tracing::debug!(catalog = %outcome.catalog_path.display(), record = ?outcome.record, "artist added");
            }
            MenuInput::Choice(MenuChoice::Exit) => return Ok(()),
        }
    }
}

fn exit_on_failure<T>(result: Result<T, PipelineError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{} {}", style("Error:").for_stderr().red().bold(), style(&err).for_stderr().red());
            tracing::debug!(?err, "pipeline failed");
            exit(1)
        }
    }
}
