use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::{
    backend::BackendRequest,
    models::{MovieDetail, User},
    page::{Entry, PanelHandle},
    populate::{notices, RowPopulator},
    render::{fragments, Html, Links},
};

/// Texts for the two ways a detail fetch can come back without a panel
struct PanelNotices {
    failed: &'static str,
    missing: &'static str,
}

impl RowPopulator {
    /// Fetches one movie and prepends its detail panel to `panel`
    pub fn add_movie_details(&self, panel: PanelHandle, movie_id: u64) -> JoinHandle<()> {
        self.render_panel::<MovieDetail>(
            panel,
            BackendRequest::movie(movie_id),
            PanelNotices {
                failed: notices::MOVIE_DETAILS_FAILED,
                missing: notices::MOVIE_DATA_MISSING,
            },
            fragments::movie_detail_panel,
        )
    }

    /// Fetches one user and prepends their detail panel to `panel`
    pub fn add_user_details(&self, panel: PanelHandle, user_id: u64) -> JoinHandle<()> {
        self.render_panel::<User>(
            panel,
            BackendRequest::user(user_id),
            PanelNotices {
                failed: notices::USER_DETAILS_FAILED,
                missing: notices::USER_DATA_MISSING,
            },
            fragments::user_detail_panel,
        )
    }

    /// Single fetch, single render: exactly one entry lands in the panel
    fn render_panel<T>(
        &self,
        panel: PanelHandle,
        request: BackendRequest,
        texts: PanelNotices,
        render: fn(&T, &Links) -> Html,
    ) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let backend = self.backend.clone();
        let links = self.links.clone();

        tokio::spawn(async move {
            let entry = match backend.get_json(&request).await {
                Ok(Some(value)) => match serde_json::from_value::<T>(value) {
                    Ok(record) => Entry::Data(render(&record, &links)),
                    Err(e) => {
                        tracing::warn!(panel = %panel.key(), request = %request, error = %e, "Malformed detail payload");
                        Entry::Error(fragments::panel_error_notice(texts.failed))
                    }
                },
                Ok(None) => {
                    tracing::info!(panel = %panel.key(), request = %request, "Detail payload empty");
                    Entry::Error(fragments::panel_error_notice(texts.missing))
                }
                Err(e) => {
                    tracing::warn!(panel = %panel.key(), request = %request, error = %e, "Detail fetch failed");
                    Entry::Error(fragments::panel_error_notice(texts.failed))
                }
            };
            panel.prepend(entry).await;
        })
    }
}
