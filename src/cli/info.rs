use crate::{
    export::projector::{ARTIST_NAME_PATH, FEATURED_ARTISTS_COLUMN, PRIMARY_ARTIST_COLUMN},
    info,
    management::TokenManager,
    utils::AttributePaths,
    warning,
};

/// Displays helper information about the exporter's state and configuration.
///
/// - `--attributes` shows the default attribute list and explains the column
///   expansion applied to the artist name path
/// - `--auth` shows whether a token is cached, when it expires, and which
///   scope was granted
///
/// Flags are checked in that order and the first match wins.
pub async fn info(attributes: bool, auth: bool) {
    if attributes {
        info!("Default attribute list: {}", AttributePaths::default());
        info!(
            "Columns are attribute paths with '.' replaced by '-'; '{}' expands to '{}' and '{}'.",
            ARTIST_NAME_PATH, PRIMARY_ARTIST_COLUMN, FEATURED_ARTISTS_COLUMN
        );
        return;
    }

    if auth {
        match TokenManager::load().await {
            Ok(mgr) => {
                let remaining = mgr.seconds_until_expiry();
                if remaining > 0 {
                    info!("Token cached; access token expires in {} seconds.", remaining);
                } else {
                    warning!(
                        "Token cached but expired {} seconds ago; it refreshes on next use.",
                        -remaining
                    );
                }
                info!("Granted scope: {}", mgr.current_token().scope);
            }
            Err(_) => warning!("No cached token. Run spexcli auth."),
        }
        return;
    }

    info!("Use --attributes or --auth to select what to show.");
}
