// Category code -> display label. Codes go to the backend untouched; only the
// label is shown.

const GENRE_LABELS: &[(&str, &str)] = &[
    ("Action", "动作"),
    ("Adventure", "冒险"),
    ("Animation", "动画"),
    ("Children", "儿童"),
    ("Comedy", "喜剧"),
    ("Crime", "犯罪"),
    ("Documentary", "纪录片"),
    ("Drama", "剧情"),
    ("Fantasy", "奇幻"),
    ("Horror", "恐怖"),
    ("Musical", "音乐剧"),
    ("Mystery", "悬疑"),
    ("Romance", "爱情"),
    ("Sci-Fi", "科幻"),
    ("Thriller", "惊悚"),
    ("War", "战争"),
    ("Western", "西部"),
    ("Film-Noir", "黑色电影"),
];

/// Display label for a genre code, or the code itself when it has no label
pub fn genre_label(code: &str) -> &str {
    GENRE_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

/// Localized name for a recommendation model version
pub fn model_label(version: &str) -> Option<&'static str> {
    match version {
        "STANDARD" => Some("标准版本"),
        "LARGE" => Some("大数据集版本"),
        "NCF" => Some("NCF 深度学习版本"),
        _ => None,
    }
}
