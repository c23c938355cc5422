//! Recommendation model selector
//!
//! Loads the list of model versions into the selector control and switches
//! the backend's active model. Every switch ends in exactly one
//! [`SwitchOutcome`], which is rendered into the status line once. Switches
//! carry a generation number; an outcome that arrives after a newer switch
//! was issued is dropped.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    backend::{BackendRequest, RecsysBackend},
    error::AppResult,
    models::{CurrentModel, ModelList, SwitchAck},
    page::{ModelOption, StatusColor, StatusLine, WidgetHandle},
    render::labels::model_label,
};

/// Terminal state of one switch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Backend accepted; carries the model now active
    Switched { model: String },
    /// Backend answered but refused
    Rejected { message: String },
    /// Request never produced a usable answer
    TransportError,
}

impl SwitchOutcome {
    fn from_response(response: AppResult<Option<serde_json::Value>>, version: &str) -> Self {
        let value = match response {
            Ok(Some(value)) => value,
            Ok(None) => {
                return SwitchOutcome::Rejected {
                    message: String::new(),
                }
            }
            Err(e) => {
                tracing::warn!(version, error = %e, "Model switch request failed");
                return SwitchOutcome::TransportError;
            }
        };

        match serde_json::from_value::<SwitchAck>(value) {
            Ok(ack) if ack.success => SwitchOutcome::Switched {
                model: ack.active_model().unwrap_or(version).to_string(),
            },
            Ok(ack) => SwitchOutcome::Rejected {
                message: ack.message.unwrap_or_default(),
            },
            Err(e) => {
                tracing::warn!(version, error = %e, "Unexpected switch acknowledgement");
                SwitchOutcome::Rejected {
                    message: String::new(),
                }
            }
        }
    }

    pub fn status_line(&self) -> StatusLine {
        match self {
            SwitchOutcome::Switched { model } => {
                StatusLine::new(format!("已切换到：{}", model), StatusColor::Ok)
            }
            SwitchOutcome::Rejected { message } => {
                StatusLine::new(format!("切换失败：{}", message), StatusColor::Failed)
            }
            SwitchOutcome::TransportError => {
                StatusLine::new("切换请求失败", StatusColor::Failed)
            }
        }
    }
}

/// Drives one selector control on a page
pub struct ModelSelector {
    backend: Arc<dyn RecsysBackend>,
    widget: WidgetHandle,
    generation: Arc<AtomicU64>,
}

impl ModelSelector {
    pub fn new(backend: Arc<dyn RecsysBackend>, widget: WidgetHandle) -> Self {
        Self::with_generation(backend, widget, Arc::new(AtomicU64::new(0)))
    }

    /// Shares a generation counter with other selectors, so a switch from any
    /// of them supersedes in-flight switches from the rest
    pub fn with_generation(
        backend: Arc<dyn RecsysBackend>,
        widget: WidgetHandle,
        generation: Arc<AtomicU64>,
    ) -> Self {
        Self {
            backend,
            widget,
            generation,
        }
    }

    /// Fills the selector from `getmodel?action=list`
    pub async fn load_list(&self) {
        match self.backend.get_json(&BackendRequest::model_list()).await {
            Ok(Some(value)) => match serde_json::from_value::<ModelList>(value) {
                Ok(list) if list.success => self.render_list(list).await,
                Ok(list) => {
                    tracing::warn!(message = ?list.message, "Model list refused");
                    self.show_list_failure("加载失败", "加载模型失败").await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed model list");
                    self.show_list_failure("加载失败", "加载模型失败").await;
                }
            },
            Ok(None) => {
                self.show_list_failure("加载失败", "加载模型失败").await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model list request failed");
                self.show_list_failure("无法连接", "无法连接到服务器").await;
            }
        }
    }

    async fn show_list_failure(&self, option_text: &str, status: &str) {
        self.widget
            .set_options(vec![ModelOption {
                value: String::new(),
                label: option_text.to_string(),
                selected: true,
            }])
            .await;
        self.widget
            .set_status(StatusLine::new(status, StatusColor::Failed))
            .await;
    }

    async fn render_list(&self, list: ModelList) {
        let current_version = match &list.current_model {
            Some(CurrentModel::Version(v)) => Some(v.as_str()),
            Some(CurrentModel::Detail { version, .. }) => version.as_deref(),
            None => None,
        };
        let any_flagged = list.models.iter().any(|m| m.is_current);

        let options: Vec<ModelOption> = list
            .models
            .iter()
            .map(|model| ModelOption {
                value: model.version.clone(),
                label: model_label(&model.version)
                    .map(str::to_string)
                    .or_else(|| model.display_name.clone())
                    .unwrap_or_else(|| model.version.clone()),
                selected: if any_flagged {
                    model.is_current
                } else {
                    current_version == Some(model.version.as_str())
                },
            })
            .collect();

        let current_name = list
            .current_model
            .as_ref()
            .and_then(|c| c.display_name())
            .map(str::to_string)
            .or_else(|| options.iter().find(|o| o.selected).map(|o| o.label.clone()))
            .unwrap_or_else(|| "未设置".to_string());

        tracing::info!(models = options.len(), current = %current_name, "Model list loaded");

        self.widget.set_options(options).await;
        self.widget
            .set_status(StatusLine::new(
                format!("当前模型：{}", current_name),
                StatusColor::Ok,
            ))
            .await;
    }

    /// Asks the backend to switch to `version`
    ///
    /// Returns the outcome that was applied to the status line, or `None` when
    /// nothing was sent (empty version) or the outcome was superseded.
    pub async fn switch(&self, version: &str) -> Option<SwitchOutcome> {
        let version = version.trim();
        if version.is_empty() {
            self.widget
                .set_status(StatusLine::new("请选择模型", StatusColor::Neutral))
                .await;
            return None;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.widget
            .set_status(StatusLine::new("正在切换模型...", StatusColor::Pending))
            .await;

        let response = self
            .backend
            .post_form(&BackendRequest::model_switch(version))
            .await;
        let outcome = SwitchOutcome::from_response(response, version);

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(version, generation, "Discarding stale switch outcome");
            return None;
        }

        if let SwitchOutcome::Switched { .. } = &outcome {
            self.widget.select(version).await;
        }
        self.widget.set_status(outcome.status_line()).await;
        tracing::info!(version, outcome = ?outcome, "Model switch finished");

        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::MockRecsysBackend, error::AppError, page::Page};
    use serde_json::json;

    async fn make_selector(backend: MockRecsysBackend) -> (Page, ModelSelector) {
        let page = Page::new("models");
        let widget = page.insert_model_widget("model-selector").await.unwrap();
        (page, ModelSelector::new(Arc::new(backend), widget))
    }

    #[tokio::test]
    async fn test_load_list_localizes_and_selects_current() {
        let mut backend = MockRecsysBackend::new();
        backend
            .expect_get_json()
            .withf(|req| req.to_string() == "getmodel?action=list")
            .returning(|_| {
                Ok(Some(json!({
                    "success": true,
                    "models": [
                        { "version": "STANDARD", "displayName": "Standard Version", "isCurrent": false },
                        { "version": "NCF", "displayName": "NCF Version", "isCurrent": true },
                        { "version": "CUSTOM", "displayName": "Custom Build", "isCurrent": false }
                    ],
                    "currentModel": "NCF"
                })))
            });

        let (page, selector) = make_selector(backend).await;
        selector.load_list().await;

        let widget = page.widget("model-selector").await.unwrap();
        let labels: Vec<&str> = widget.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["标准版本", "NCF 深度学习版本", "Custom Build"]);
        assert!(widget.options[1].selected);
        assert_eq!(widget.status.text, "当前模型：NCF 深度学习版本");
        assert_eq!(widget.status.color, StatusColor::Ok);
    }

    #[tokio::test]
    async fn test_load_list_refused_and_unreachable() {
        let mut refused = MockRecsysBackend::new();
        refused
            .expect_get_json()
            .returning(|_| Ok(Some(json!({ "success": false, "message": "no models" }))));
        let (page, selector) = make_selector(refused).await;
        selector.load_list().await;
        let widget = page.widget("model-selector").await.unwrap();
        assert_eq!(widget.options[0].label, "加载失败");
        assert_eq!(widget.status, StatusLine::new("加载模型失败", StatusColor::Failed));

        let mut unreachable = MockRecsysBackend::new();
        unreachable
            .expect_get_json()
            .returning(|_| Err(AppError::Backend { status: 503, body: "refused".to_string() }));
        let (page, selector) = make_selector(unreachable).await;
        selector.load_list().await;
        let widget = page.widget("model-selector").await.unwrap();
        assert_eq!(widget.options[0].label, "无法连接");
        assert_eq!(widget.status.text, "无法连接到服务器");
    }

    #[tokio::test]
    async fn test_switch_rejected_shows_message() {
        let mut backend = MockRecsysBackend::new();
        backend
            .expect_post_form()
            .withf(|req| {
                req.get_param("action") == Some("switch") && req.get_param("version") == Some("LARGE")
            })
            .times(1)
            .returning(|_| Ok(Some(json!({ "success": false, "message": "busy" }))));

        let (page, selector) = make_selector(backend).await;
        let outcome = selector.switch("LARGE").await;

        assert_eq!(
            outcome,
            Some(SwitchOutcome::Rejected {
                message: "busy".to_string()
            })
        );
        let widget = page.widget("model-selector").await.unwrap();
        assert!(widget.status.text.contains("busy"));
        assert_eq!(widget.status.color, StatusColor::Failed);
        // still interactive: another switch goes through
        assert!(page.render_html().await.contains(r#"<select id="modelSelect""#));
    }

    #[tokio::test]
    async fn test_switch_success_and_transport_error() {
        let mut backend = MockRecsysBackend::new();
        backend
            .expect_post_form()
            .withf(|req| req.get_param("version") == Some("NCF"))
            .returning(|_| Ok(Some(json!({ "success": true, "currentModel": "NCF" }))));
        backend
            .expect_post_form()
            .withf(|req| req.get_param("version") == Some("LARGE"))
            .returning(|_| Err(AppError::Backend { status: 503, body: "timeout".to_string() }));

        let (page, selector) = make_selector(backend).await;

        assert_eq!(
            selector.switch("NCF").await,
            Some(SwitchOutcome::Switched {
                model: "NCF".to_string()
            })
        );
        assert_eq!(
            page.widget("model-selector").await.unwrap().status,
            StatusLine::new("已切换到：NCF", StatusColor::Ok)
        );

        assert_eq!(selector.switch("LARGE").await, Some(SwitchOutcome::TransportError));
        assert_eq!(
            page.widget("model-selector").await.unwrap().status.text,
            "切换请求失败"
        );
    }

    #[tokio::test]
    async fn test_switch_without_version_sends_nothing() {
        let backend = MockRecsysBackend::new();
        let (page, selector) = make_selector(backend).await;

        assert_eq!(selector.switch("  ").await, None);
        assert_eq!(
            page.widget("model-selector").await.unwrap().status.text,
            "请选择模型"
        );
    }

    #[test]
    fn test_outcome_from_empty_response() {
        assert_eq!(
            SwitchOutcome::from_response(Ok(None), "NCF"),
            SwitchOutcome::Rejected {
                message: String::new()
            }
        );
        assert_eq!(
            SwitchOutcome::from_response(Ok(Some(json!({ "success": true }))), "NCF"),
            SwitchOutcome::Switched {
                model: "NCF".to_string()
            }
        );
    }
}
