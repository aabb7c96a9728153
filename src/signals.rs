use std::process::exit;
use tokio::task::JoinHandle;

/// Ctrl-C ends the session cleanly, whatever is in progress.
pub(crate) fn spawn_ctrlc_listener() -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "failed to register CTRL-C handler");
            return;
        }

        // dialoguer hides the cursor while a prompt is active
        let _ = console::Term::stdout().show_cursor();
        println!();
        exit(0)
    })
}
