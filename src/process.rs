use console::style;
use std::path::Path;
use std::process::ExitStatus;

#[derive(Clone, Copy, Debug)]
pub(crate) struct WithExitStatus<T> {
    pub(crate) exit_status: ExitStatus,
    pub(crate) data: T,
}

pub(crate) async fn wait_for_child(mut child: tokio::process::Child) -> Result<WithExitStatus<()>, std::io::Error> {
    child.wait().await.map(|exit_status| WithExitStatus { exit_status, data: () })
}

pub(crate) async fn wait_for_child_output(
    child: tokio::process::Child,
) -> Result<WithExitStatus<std::process::Output>, std::io::Error> {
    child.wait_with_output().await.map(|output| WithExitStatus {
        exit_status: output.status,
        data: output,
    })
}

fn separator() -> &'static str {
    static SEPARATOR: once_cell::sync::OnceCell<String> = once_cell::sync::OnceCell::new();

    SEPARATOR.get_or_init(|| {
        let width = match console::Term::stdout().size().1 as usize {
            0 => 32,
            width => width,
        };
        "=".repeat(width)
    })
}

/// Runs an external tool inside `work_dir`, framing its own terminal output
/// between separators so the user can tell it apart from ours.
pub(crate) async fn wrap_command_print_context<T, Ex, FT>(
    full_command: &[impl AsRef<str>],
    work_dir: &Path,
    user_settings: impl FnOnce(&mut tokio::process::Command),
    extract: Ex,
) -> Result<WithExitStatus<T>, std::io::Error>
where
    Ex: FnOnce(tokio::process::Child) -> FT,
    FT: Future<Output = Result<WithExitStatus<T>, std::io::Error>>,
{
    let full_command = full_command.iter().map(AsRef::as_ref).collect::<Vec<_>>();
    let Some((program, args)) = full_command.split_first() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "cannot execute an empty command",
        ));
    };

    tracing::debug!(command = ?full_command, work_dir = %work_dir.display(), "spawning child process");

    println!();
    println!("{}", style(separator()).cyan());
    println!("Entering command context.");
    println!("Executing: ['{}']", full_command.join("', '"));
    println!("{}", style(separator()).cyan());
    println!();

    let mut command = tokio::process::Command::new(program);
    command.args(args);
    command.current_dir(work_dir);
    command.kill_on_drop(true);
    user_settings(&mut command);

    let child = command.spawn()?;
    let result = extract(child).await?;

    let message = match result.exit_status.code() {
        Some(0) => style("Command returned exit code 0.".to_string()).green(),
        Some(code) => style(format!("Command returned exit code {}.", code)).red(),
        None => style("Command was terminated by signal.".to_string()).red(),
    };

    println!();
    println!("{}", style(separator()).yellow());
    println!("Returned to xmp3 context.");
    println!("{}", message);
    println!("{}", style(separator()).yellow());
    println!();

    Ok(result)
}
