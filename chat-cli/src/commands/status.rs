//! Show the effective configuration.

use std::path::Path;

use crate::config::ChatConfig;

/// Run the status command.
pub fn run(config: &ChatConfig, config_path: &Path) {
    println!("=== revalue-chat status ===");
    println!();

    let source = if config_path.exists() {
        "loaded"
    } else {
        "not found, using defaults"
    };
    println!("Config: {} ({})", config_path.display(), source);
    println!();

    let backend = config.backend_config();
    println!("Backend:");
    println!("  URL:     {}", backend.base_url);
    println!("  Timeout: {}s", backend.timeout.as_secs());
    println!();

    let sync = config.synchronizer_config();
    println!("Chat:");
    println!("  Poll interval: {}ms", sync.poll_interval.as_millis());
    println!("  Merge policy:  {:?}", sync.merge);
    match config.sender_id() {
        Some(sender) => println!("  Sender:        {}", sender),
        None => println!("  Sender:        NOT SET"),
    }
    println!();

    match config.session() {
        Some(session) => {
            let user = session.user();
            println!("Session:");
            println!("  User:  {} ({})", user.name, user.id);
            if let Some(email) = &user.email {
                println!("  Email: {}", email);
            }
        }
        None => {
            println!("Session: NOT LOGGED IN");
            println!();
            println!("Add a [session] section to the config to send authenticated requests.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn status_with_defaults() {
        let dir = tempdir().unwrap();
        run(&ChatConfig::default(), &dir.path().join("chat.toml"));
    }

    #[test]
    fn status_with_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.toml");
        std::fs::write(
            &path,
            "[session]\ntoken = \"tok\"\nuser_id = \"u1\"\nuser_name = \"Aoi\"\n",
        )
        .unwrap();

        let config = ChatConfig::from_file(&path).unwrap();
        run(&config, &path);
    }
}
