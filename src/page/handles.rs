use crate::page::{Entry, ModelOption, ModelWidget, Page, StatusLine};

/// Reference to a row on a page
///
/// Held by exactly one populator. Cloning the handle does not clone the row;
/// populating through two clones appends twice.
#[derive(Debug, Clone)]
pub struct RowHandle {
    page: Page,
    key: String,
}

impl RowHandle {
    pub(crate) fn new(page: Page, key: &str) -> Self {
        Self {
            page,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Appends one entry at the end of the row body
    pub async fn append(&self, entry: Entry) {
        let mut inner = self.page.inner().write().await;
        match inner.row_mut(&self.key) {
            Some(row) => row.entries.push(entry),
            None => tracing::error!(row = %self.key, "Append to missing row dropped"),
        }
    }
}

/// Reference to a detail panel container on a page
#[derive(Debug, Clone)]
pub struct PanelHandle {
    page: Page,
    key: String,
}

impl PanelHandle {
    pub(crate) fn new(page: Page, key: &str) -> Self {
        Self {
            page,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Puts an entry in front of whatever the container already holds
    pub async fn prepend(&self, entry: Entry) {
        let mut inner = self.page.inner().write().await;
        match inner.panel_mut(&self.key) {
            Some(panel) => panel.entries.push_front(entry),
            None => tracing::error!(panel = %self.key, "Prepend to missing panel dropped"),
        }
    }
}

/// Reference to the model selector control on a page
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    page: Page,
    key: String,
}

impl WidgetHandle {
    pub(crate) fn new(page: Page, key: &str) -> Self {
        Self {
            page,
            key: key.to_string(),
        }
    }

    async fn update(&self, f: impl FnOnce(&mut ModelWidget)) {
        let mut inner = self.page.inner().write().await;
        match inner.widget_mut(&self.key) {
            Some(widget) => f(widget),
            None => tracing::error!(widget = %self.key, "Update to missing widget dropped"),
        }
    }

    pub async fn set_options(&self, options: Vec<ModelOption>) {
        self.update(|widget| widget.options = options).await;
    }

    pub async fn set_status(&self, status: StatusLine) {
        self.update(|widget| widget.status = status).await;
    }

    /// Marks `version` as the selected option, if present
    pub async fn select(&self, version: &str) {
        self.update(|widget| {
            if widget.options.iter().any(|o| o.value == version) {
                for option in &mut widget.options {
                    option.selected = option.value == version;
                }
            }
        })
        .await;
    }

    pub async fn snapshot(&self) -> ModelWidget {
        self.page.widget(&self.key).await.unwrap_or_default()
    }
}
