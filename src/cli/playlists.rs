use crate::{
    error,
    management::TokenManager,
    spotify,
    types::PlaylistTableRow,
    warning,
};

pub async fn list_playlists(search: Option<String>) {
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run spexcli auth\n Error: {}",
                e
            );
        }
    };

    match spotify::playlists::get_user_playlists(&mut token_mgr).await {
        Ok(playlists) => {
            // sort playlists by name
            let mut sorted_playlists = playlists.clone();
            sorted_playlists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            if let Some(playlist_search) = search {
                let search_term = playlist_search.to_lowercase();
                sorted_playlists.retain(|p| p.name.to_lowercase().contains(&search_term));
            }

            // convert playlists to table rows
            let table_rows: Vec<PlaylistTableRow> = sorted_playlists
                .into_iter()
                .map(|p| PlaylistTableRow {
                    name: p.name,
                    tracks: p
                        .tracks
                        .map(|t| t.total.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    id: p.id,
                })
                .collect();

            let table = tabled::Table::new(table_rows);
            println!("{}", table);
        }
        Err(e) => warning!("Failed to load playlists. Err: {}", e),
    }
}
