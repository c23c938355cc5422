use crate::{
    page::{ModelWidget, StatusColor},
    render::escape::{escape_html, Html},
};

impl StatusColor {
    pub fn css(&self) -> &'static str {
        match self {
            StatusColor::Neutral => "inherit",
            StatusColor::Pending => "blue",
            StatusColor::Ok => "green",
            StatusColor::Failed => "red",
        }
    }
}

/// Model selector form with its status line
pub fn model_widget(widget: &ModelWidget) -> Html {
    let options: String = widget
        .options
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{value}"{selected}>{label}</option>"#,
                value = escape_html(&option.value),
                selected = if option.selected { " selected" } else { "" },
                label = escape_html(&option.label),
            )
        })
        .collect();

    Html::trusted(format!(
        r#"<form class="model-selector" method="post" action="/models/switch">
  <select id="modelSelect" name="version">{options}</select>
  <button id="switchModelBtn" type="submit">切换模型</button>
  <span id="modelStatus" style="color:{color}">{status}</span>
</form>"#,
        options = options,
        color = widget.status.color.css(),
        status = escape_html(&widget.status.text),
    ))
}
