use tracing::debug;

use crate::config::Config;

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

fn env_token(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Look up an API token, trying in order:
/// 1. the environment variable named by `token_env`
/// 2. the output of `token_command`
///
/// `None` means requests go out unauthenticated.
pub fn load_token(config: &Config) -> Option<String> {
    if let Some(token) = config.token_env.as_deref().and_then(env_token) {
        debug!("using token from environment");
        return Some(token);
    }

    if let Some(token) = config.token_command.as_deref().and_then(try_cli_token) {
        debug!("using token from token_command");
        return Some(token);
    }

    debug!("no token found, requests will be unauthenticated");
    None
}
