//! `tradenest` terminal client.

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use tradenest_client::{ActivityEvent, AppShell, ClientConfig, CurrentUser, Navigation};

const USAGE: &str = "usage: tradenest login <email> <password> [--remember] | logout | whoami | open <path> | watch";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tradenest_observability::init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    tracing::debug!(api = %config.api_base_url, session_file = %config.session_file.display(), "client configured");

    let mut shell = AppShell::from_config(config).context("failed to build HTTP client")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["login", email, password, rest @ ..] => {
            let remember = match rest {
                [] => false,
                ["--remember"] => true,
                _ => bail!(USAGE),
            };
            let outcome = shell.login(email, password, remember).await?;
            if let Some(message) = &outcome.message {
                println!("{message}");
            }
            println!("logged in as {} ({}); continue at {}", outcome.email, outcome.role, outcome.landing);
        }
        ["logout"] => {
            if let Navigation::Redirect(target) = shell.logout().context("failed to clear session")? {
                println!("logged out; continue at {target}");
            }
        }
        ["whoami"] => match shell.session().current().context("failed to read session")? {
            Some(CurrentUser {
                email,
                role: Some(role),
            }) => println!("{email} ({role})"),
            Some(CurrentUser { email, role: None }) => println!("{email} (no role)"),
            None => println!("not logged in"),
        },
        ["open", path] => match shell.navigate(path) {
            Navigation::Render(view) => println!("render {}", serde_json::to_string(&view)?),
            Navigation::Redirect(target) => println!("redirect {target}"),
        },
        ["watch"] => watch(&mut shell).await?,
        _ => bail!(USAGE),
    }

    Ok(())
}

/// Keep the Session Guard mounted; each stdin line counts as a key press.
async fn watch(shell: &mut AppShell) -> anyhow::Result<()> {
    let activity = shell.mount();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "watching session; refresh after {}s of inactivity (Ctrl-C or EOF to stop)",
        shell.config().refresh_after.as_secs()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line.context("failed to read stdin")? {
                Some(_) => activity.notify(ActivityEvent::KeyPress),
                None => break,
            },
        }
    }

    shell.unmount();
    Ok(())
}
