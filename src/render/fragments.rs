use crate::{
    models::{Movie, MovieDetail, User},
    render::{
        escape::{escape_html, Html},
        format,
        labels::genre_label,
    },
};

const POSTER_MISSING: &str = "images/poster-missing.png";

/// Builds site-relative links from a base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    base: String,
}

impl Default for Links {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Links {
    pub fn new(base: &str) -> Self {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        Self { base }
    }

    pub fn asset(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn movie(&self, movie_id: u64) -> String {
        format!("{}movie.html?movieId={}", self.base, movie_id)
    }

    pub fn user(&self, user_id: u64) -> String {
        format!("{}user.html?id={}", self.base, user_id)
    }

    /// Collection page for an untranslated genre code
    pub fn genre_collection(&self, code: &str) -> String {
        format!(
            "{}collection.html?type=genre&value={}",
            self.base,
            urlencoding::encode(code)
        )
    }

    pub fn poster(&self, movie_id: u64) -> String {
        self.asset(&crate::models::movie::poster_path(movie_id))
    }
}

/// `<img>` with a one-shot client-side swap to the placeholder poster
fn poster_img(links: &Links, movie_id: u64, attrs: &str) -> String {
    format!(
        r#"<img {attrs}src="{src}" onerror="this.onerror=null;this.src='{missing}';" />"#,
        attrs = attrs,
        src = escape_html(&links.poster(movie_id)),
        missing = escape_html(&links.asset(POSTER_MISSING)),
    )
}

/// Genre links for a card, one block per genre
pub fn genre_list(genres: &[String], links: &Links) -> Html {
    let mut out = String::new();
    for genre in genres {
        out.push_str(&format!(
            r#"<div class="genre"><a href="{href}"><b>{label}</b></a></div>"#,
            href = escape_html(&links.genre_collection(genre)),
            label = escape_html(genre_label(genre)),
        ));
    }
    Html::trusted(out)
}

/// Wraps each piece in a `<span>`; the separator sits inside every span but the last
fn comma_spans(pieces: &[String]) -> String {
    let last = pieces.len().saturating_sub(1);
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let sep = if i < last { ", " } else { "" };
            format!("<span>{}{}</span>", piece, sep)
        })
        .collect()
}

/// Inline genre links for the detail panel
fn genre_inline(genres: &[String], links: &Links) -> String {
    let pieces: Vec<String> = genres
        .iter()
        .map(|genre| {
            format!(
                r#"<a href="{href}"><b>{label}</b></a>"#,
                href = escape_html(&links.genre_collection(genre)),
                label = escape_html(genre_label(genre)),
            )
        })
        .collect();
    comma_spans(&pieces)
}

/// Movie card shown in a row
///
/// `rating_text` is what the star indicator shows: the formatted average for
/// recommendation rows, the user's own score for history rows.
pub fn movie_card(movie: &Movie, rating_text: &str, links: &Links) -> Html {
    let href = escape_html(&links.movie(movie.movie_id));
    let rating_text = escape_html(rating_text);

    Html::trusted(format!(
        r#"<div class="movie-row-item" style="margin-right:5px" data-movie-id="{id}">
  <div class="movie-card-md1">
    <div class="card">
      <a href="{href}"><div class="poster">{poster}</div></a>
      <div class="overlay">
        <div class="above-fold">
          <a href="{href}"><p class="title">{title}</p></a>
          <div class="rating-indicator"><div class="rating-or-prediction predicted"><div class="rating-value">{rating}</div></div></div>
          <p class="year">{year} 年</p>
        </div>
        <div class="below-fold">
          <div class="genre-list">{genres}</div>
          <div class="ratings-display">
            <div class="rating-average">
              <span class="rating-large">{rating}</span>
              <span class="rating-total">/5 星</span>
              <p class="rating-caption"> {count} 人评分 </p>
            </div>
          </div>
        </div>
      </div>
    </div>
  </div>
</div>"#,
        id = movie.movie_id,
        href = href,
        poster = poster_img(links, movie.movie_id, ""),
        title = escape_html(&movie.title),
        rating = rating_text,
        year = movie.release_year,
        genres = genre_list(&movie.genres, links),
        count = movie.rating_number,
    ))
}

/// Card for a recommendation row, showing the average rating
pub fn recommendation_card(movie: &Movie, links: &Links) -> Html {
    movie_card(movie, &format::rating(movie.average_rating), links)
}

/// Header for a genre row, linking to the full collection
pub fn linked_row_header(code: &str, links: &Links) -> Html {
    Html::trusted(format!(
        r#"<a class="plainlink" title="查看完整列表" href="{href}">{label}</a>"#,
        href = escape_html(&links.genre_collection(code)),
        label = escape_html(genre_label(code)),
    ))
}

pub fn plain_row_header(text: &str) -> Html {
    Html::trusted(format!(
        r#"<span class="plainlink">{}</span>"#,
        escape_html(text)
    ))
}

/// The scaffolding around a row: header, scroll container, body
pub fn row_frame(key: &str, header: &Html, body: &str) -> Html {
    Html::trusted(format!(
        r#"<div class="frontpage-section-top">
  <div class="explore-header frontpage-section-header">{header}</div>
  <div class="movie-row">
    <div class="movie-row-bounds">
      <div class="movie-row-scrollable" id="{key}" style="margin-left: 0px;">{body}</div>
    </div>
    <div class="clearfix"></div>
  </div>
</div>"#,
        header = header,
        key = escape_html(key),
        body = body,
    ))
}

/// Inline failure notice for a row body
pub fn row_error_notice(text: &str) -> Html {
    Html::trusted(format!(
        r#"<div class="load-error" style="padding:12px;color:#a00">{}</div>"#,
        escape_html(text)
    ))
}

/// Inline failure notice for a detail panel
pub fn panel_error_notice(text: &str) -> Html {
    Html::trusted(format!(
        r#"<div class="load-error" style="color:#a00">{}</div>"#,
        escape_html(text)
    ))
}

fn heading_and_data(heading: &str, data: &str) -> String {
    format!(
        r#"<div class="heading-and-data"><div class="movie-details-heading">{}</div>{}</div>"#,
        heading, data
    )
}

pub fn movie_detail_panel(detail: &MovieDetail, links: &Links) -> Html {
    let movie = &detail.movie;

    let top_raters = if detail.top_ratings.is_empty() {
        "<span>暂无数据</span>".to_string()
    } else {
        let pieces: Vec<String> = detail
            .top_ratings
            .iter()
            .map(|entry| {
                let user_id = entry.rating.user_id;
                format!(
                    r#"<a href="{}"><b>用户{}</b></a>"#,
                    escape_html(&links.user(user_id)),
                    user_id
                )
            })
            .collect();
        comma_spans(&pieces)
    };

    let mut external = Vec::new();
    if let Some(imdb_id) = &detail.imdb_id {
        external.push(format!(
            r#"<a target="_blank" href="http://www.imdb.com/title/tt{}">IMDb</a>"#,
            urlencoding::encode(imdb_id)
        ));
    }
    if let Some(tmdb_id) = &detail.tmdb_id {
        external.push(format!(
            r#"<span><a target="_blank" href="http://www.themoviedb.org/movie/{}">TMDb</a></span>"#,
            urlencoding::encode(tmdb_id)
        ));
    }

    Html::trusted(format!(
        r#"<div class="row movie-details-header movie-details-block" data-movie-id="{id}">
  <div class="col-md-2 header-backdrop">{poster}</div>
  <div class="col-md-9"><h1 class="movie-title"> {title} </h1>
    <div class="row movie-highlights">
      <div class="col-md-2">{year}{external}</div>
      <div class="col-md-3">{average}</div>
      <div class="col-md-6">{genres}{raters}</div>
    </div>
  </div>
</div>"#,
        id = movie.movie_id,
        poster = poster_img(links, movie.movie_id, r#"alt="电影海报" height="250" "#),
        title = escape_html(&movie.title),
        year = heading_and_data("上映年份", &format!("<div> {} </div>", movie.release_year)),
        external = heading_and_data("外部链接", &external.join(",\n")),
        average = heading_and_data(
            &format!("平均评分（{} 人）", movie.rating_number),
            &format!("<div> {} 星</div>", format::rating(movie.average_rating)),
        ),
        genres = heading_and_data("类型", &genre_inline(&movie.genres, links)),
        raters = heading_and_data("最喜欢此片的用户", &top_raters),
    ))
}

pub fn user_detail_panel(user: &User, links: &Links) -> Html {
    let favorite = match user.favorite_genre.as_deref() {
        Some(code) if !code.is_empty() => genre_label(code),
        _ => "未知",
    };

    Html::trusted(format!(
        r#"<div class="row movie-details-header movie-details-block" data-user-id="{id}">
  <div class="col-md-2 header-backdrop"><img alt="用户头像" height="200" src="{avatar}" /></div>
  <div class="col-md-9"><h1 class="movie-title"> 用户{id} </h1>
    <div class="row movie-highlights">
      <div class="col-md-2">{count}{average}</div>
      <div class="col-md-3">{highest}{lowest}</div>
      <div class="col-md-6">{favorite}</div>
    </div>
  </div>
</div>"#,
        id = user.user_id,
        avatar = escape_html(&links.asset(&user.avatar_path())),
        count = heading_and_data("已看电影数", &format!("<div> {} </div>", user.rating_count)),
        average = heading_and_data(
            "平均评分",
            &format!("<div> {} 星</div>", format::rating(user.average_rating)),
        ),
        highest = heading_and_data("最高评分", &format!("<div> {} 星</div>", user.highest_rating)),
        lowest = heading_and_data("最低评分", &format!("<div> {} 星</div>", user.lowest_rating)),
        favorite = heading_and_data(
            "最喜爱类型",
            &format!("<div> {} </div>", escape_html(favorite)),
        ),
    ))
}
