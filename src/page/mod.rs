//! In-memory page model
//!
//! A page is an ordered list of keyed sections (rows, detail panels, the model
//! selector). Populators mutate it through handles; the front server
//! serializes it once every populator for the page has settled.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    render::{self, escape_html, Html},
};

pub mod handles;

pub use handles::{PanelHandle, RowHandle, WidgetHandle};

/// One piece of content inside a row or panel
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A rendered record (card or detail panel)
    Data(Html),
    /// An inline failure notice
    Error(Html),
}

impl Entry {
    fn html(&self) -> &Html {
        match self {
            Entry::Data(html) | Entry::Error(html) => html,
        }
    }
}

/// Append-only container of cards
#[derive(Debug, Clone)]
pub struct Row {
    pub key: String,
    pub header: Html,
    pub entries: Vec<Entry>,
}

impl Row {
    pub fn items(&self) -> impl Iterator<Item = &Html> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Data(html) => Some(html),
            Entry::Error(_) => None,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Error(_)))
            .count()
    }
}

/// Container for a single detail panel; content is prepended
#[derive(Debug, Clone)]
pub struct Panel {
    pub key: String,
    pub entries: VecDeque<Entry>,
}

impl Panel {
    pub fn data_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Data(_)))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.entries.len() - self.data_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Neutral,
    Pending,
    Ok,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub color: StatusColor,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, color: StatusColor) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// State of the model selector control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelWidget {
    pub options: Vec<ModelOption>,
    pub status: StatusLine,
}

impl Default for ModelWidget {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            status: StatusLine::new("", StatusColor::Neutral),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Section {
    Row(Row),
    Panel(Panel),
    Widget(String, ModelWidget),
}

impl Section {
    fn key(&self) -> &str {
        match self {
            Section::Row(row) => &row.key,
            Section::Panel(panel) => &panel.key,
            Section::Widget(key, _) => key,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PageInner {
    title: String,
    sections: Vec<Section>,
}

impl PageInner {
    fn insert(&mut self, section: Section) -> AppResult<()> {
        if self.sections.iter().any(|s| s.key() == section.key()) {
            return Err(AppError::InvalidInput(format!(
                "Section '{}' already exists on this page",
                section.key()
            )));
        }
        self.sections.push(section);
        Ok(())
    }

    pub(crate) fn row_mut(&mut self, key: &str) -> Option<&mut Row> {
        self.sections.iter_mut().find_map(|s| match s {
            Section::Row(row) if row.key == key => Some(row),
            _ => None,
        })
    }

    pub(crate) fn panel_mut(&mut self, key: &str) -> Option<&mut Panel> {
        self.sections.iter_mut().find_map(|s| match s {
            Section::Panel(panel) if panel.key == key => Some(panel),
            _ => None,
        })
    }

    pub(crate) fn widget_mut(&mut self, key: &str) -> Option<&mut ModelWidget> {
        self.sections.iter_mut().find_map(|s| match s {
            Section::Widget(k, widget) if k == key => Some(widget),
            _ => None,
        })
    }
}

/// Shared, mutable page
///
/// Cloning is cheap and every clone sees the same page. Mutations take the
/// write lock only for the duration of one append, never across a fetch.
#[derive(Debug, Clone)]
pub struct Page {
    inner: Arc<RwLock<PageInner>>,
}

impl Page {
    pub fn new(title: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(PageInner {
                title: title.to_string(),
                sections: Vec::new(),
            })),
        }
    }

    pub(crate) fn inner(&self) -> &Arc<RwLock<PageInner>> {
        &self.inner
    }

    /// Inserts an empty row frame; must complete before the row is populated
    pub async fn insert_row_frame(&self, key: &str, header: Html) -> AppResult<RowHandle> {
        self.inner.write().await.insert(Section::Row(Row {
            key: key.to_string(),
            header,
            entries: Vec::new(),
        }))?;
        tracing::debug!(row = %key, "Row frame inserted");
        Ok(RowHandle::new(self.clone(), key))
    }

    pub async fn insert_panel(&self, key: &str) -> AppResult<PanelHandle> {
        self.inner.write().await.insert(Section::Panel(Panel {
            key: key.to_string(),
            entries: VecDeque::new(),
        }))?;
        Ok(PanelHandle::new(self.clone(), key))
    }

    pub async fn insert_model_widget(&self, key: &str) -> AppResult<WidgetHandle> {
        self.inner
            .write()
            .await
            .insert(Section::Widget(key.to_string(), ModelWidget::default()))?;
        Ok(WidgetHandle::new(self.clone(), key))
    }

    pub async fn row(&self, key: &str) -> Option<Row> {
        self.inner.read().await.sections.iter().find_map(|s| match s {
            Section::Row(row) if row.key == key => Some(row.clone()),
            _ => None,
        })
    }

    pub async fn panel(&self, key: &str) -> Option<Panel> {
        self.inner.read().await.sections.iter().find_map(|s| match s {
            Section::Panel(panel) if panel.key == key => Some(panel.clone()),
            _ => None,
        })
    }

    pub async fn widget(&self, key: &str) -> Option<ModelWidget> {
        self.inner.read().await.sections.iter().find_map(|s| match s {
            Section::Widget(k, widget) if k == key => Some(widget.clone()),
            _ => None,
        })
    }

    /// Keys of all sections in page order
    pub async fn section_keys(&self) -> Vec<String> {
        self.inner
            .read()
            .await
            .sections
            .iter()
            .map(|s| s.key().to_string())
            .collect()
    }

    /// Serializes the current state of the page as a full HTML document
    pub async fn render_html(&self) -> String {
        let inner = self.inner.read().await;

        let mut body = String::new();
        for section in &inner.sections {
            match section {
                Section::Row(row) => {
                    let entries: String = row.entries.iter().map(|e| e.html().as_str()).collect();
                    body.push_str(render::fragments::row_frame(&row.key, &row.header, &entries).as_str());
                }
                Section::Panel(panel) => {
                    let entries: String =
                        panel.entries.iter().map(|e| e.html().as_str()).collect();
                    body.push_str(&format!(
                        r#"<div id="{}">{}</div>"#,
                        escape_html(&panel.key),
                        entries
                    ));
                }
                Section::Widget(_, widget) => {
                    body.push_str(render::widget::model_widget(widget).as_str());
                }
            }
            body.push('\n');
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/css/style.css">
</head>
<body>
<div id="recPage">
{body}</div>
</body>
</html>"#,
            title = escape_html(&inner.title),
            body = body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fragments::plain_row_header;

    #[tokio::test]
    async fn test_row_frame_starts_empty() {
        let page = Page::new("test");
        page.insert_row_frame("drama-collection", plain_row_header("Drama"))
            .await
            .unwrap();

        let row = page.row("drama-collection").await.unwrap();
        assert_eq!(row.item_count(), 0);
        assert_eq!(row.error_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_section_key_rejected() {
        let page = Page::new("test");
        page.insert_row_frame("r", plain_row_header("a")).await.unwrap();
        let err = page.insert_panel("r").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        page.insert_model_widget("w").await.unwrap();
        let err = page.insert_row_frame("w", plain_row_header("b")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = page.insert_model_widget("r").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        assert_eq!(page.section_keys().await, vec!["r", "w"]);
    }

    #[tokio::test]
    async fn test_sections_render_in_insertion_order() {
        let page = Page::new("Sparrow <home>");
        page.insert_panel("details").await.unwrap();
        page.insert_row_frame("related", plain_row_header("相关电影"))
            .await
            .unwrap();

        assert_eq!(page.section_keys().await, vec!["details", "related"]);

        let html = page.render_html().await;
        assert!(html.contains("<title>Sparrow &lt;home&gt;</title>"));
        let details_at = html.find(r#"<div id="details">"#).unwrap();
        let related_at = html.find(r#"id="related""#).unwrap();
        assert!(details_at < related_at);
    }
}
