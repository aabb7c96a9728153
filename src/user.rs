use console::style;

#[derive(Debug, thiserror::Error)]
pub(crate) enum PromptError {
    #[error("Failed to read user input: {0}")]
    Dialoguer(#[from] dialoguer::Error),
    #[error("Prompt task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything the tool asks the user.
#[async_trait::async_trait]
pub(crate) trait Prompter: Send + Sync {
    async fn ask_menu_option(&self) -> Result<String, PromptError>;

    async fn ask_video_url(&self) -> Result<String, PromptError>;

    async fn ask_artist_name(&self) -> Result<String, PromptError>;

    /// `None` keeps the name inferred from the download.
    async fn ask_track_name(&self, inferred: &str) -> Result<Option<String>, PromptError>;

    /// `None` accepts the artist resolved from the catalog.
    async fn ask_artist_override(&self, resolved: &str) -> Result<Option<String>, PromptError>;
}

fn non_empty(answer: String) -> Option<String> {
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

/// Dialoguer-backed prompts on the controlling terminal.
pub(crate) struct TerminalPrompter;

impl TerminalPrompter {
    async fn ask(prompt: String, allow_empty: bool) -> Result<String, PromptError> {
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Input::<String>::with_theme(&dialoguer::theme::ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(allow_empty)
                .report(true)
                .interact_text()
        })
        .await??;

        Ok(answer)
    }
}

#[async_trait::async_trait]
impl Prompter for TerminalPrompter {
    async fn ask_menu_option(&self) -> Result<String, PromptError> {
        println!("1 - Add Track");
        println!("2 - Add Artist");
        println!("3 - Exit");
        Self::ask("Option".to_string(), true).await
    }

    async fn ask_video_url(&self) -> Result<String, PromptError> {
        Self::ask("YouTube URL".to_string(), false).await
    }

    async fn ask_artist_name(&self) -> Result<String, PromptError> {
        Self::ask("Artist Name".to_string(), false).await
    }

    async fn ask_track_name(&self, inferred: &str) -> Result<Option<String>, PromptError> {
        let prompt = format!("Name (or {})", style(inferred).cyan());
        Self::ask(prompt, true).await.map(non_empty)
    }

    async fn ask_artist_override(&self, resolved: &str) -> Result<Option<String>, PromptError> {
        let prompt = format!("Artist Name (or {})", style(resolved).cyan());
        Self::ask(prompt, true).await.map(non_empty)
    }
}
