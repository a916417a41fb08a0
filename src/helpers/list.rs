//! List helpers: paginator and count labels

/// Link to page `page` of a listing (`<base>?page=N`, page 1 is the bare URL)
pub fn page_url(base_url: &str, page: usize) -> String {
    if page <= 1 {
        base_url.to_string()
    } else {
        format!("{}?page={}", base_url, page)
    }
}

/// Generate a paginator
///
/// Shows previous/next links and up to `mid_size` page numbers on each side of
/// the current page, with the first and last page always reachable.
pub fn paginator(
    current: usize,
    total: usize,
    base_url: &str,
    prev_text: &str,
    next_text: &str,
    mid_size: usize,
) -> String {
    if total <= 1 {
        return String::new();
    }

    let mut html = r#"<nav class="pagination">"#.to_string();

    if current > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-prev" href="{}">{}</a>"#,
            page_url(base_url, current - 1),
            prev_text
        ));
    }

    html.push_str(r#"<span class="pagination-numbers">"#);

    let start = (current.saturating_sub(mid_size)).max(1);
    let end = (current + mid_size).min(total);

    if start > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">1</a>"#,
            page_url(base_url, 1)
        ));
        if start > 2 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
    }

    for page in start..=end {
        if page == current {
            html.push_str(&format!(
                r#"<span class="pagination-number current">{}</span>"#,
                page
            ));
        } else {
            html.push_str(&format!(
                r#"<a class="pagination-number" href="{}">{}</a>"#,
                page_url(base_url, page),
                page
            ));
        }
    }

    if end < total {
        if end < total - 1 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">{}</a>"#,
            page_url(base_url, total),
            total
        ));
    }

    html.push_str("</span>");

    if current < total {
        html.push_str(&format!(
            r#"<a class="pagination-next" href="{}">{}</a>"#,
            page_url(base_url, current + 1),
            next_text
        ));
    }

    html.push_str("</nav>");
    html
}

/// Call to action on a category card: "Coming Soon", "View 1 Project",
/// "View 12 Projects", capped at "View 99+ Projects"
pub fn count_label(count: usize, singular: &str, plural: &str) -> String {
    match count {
        0 => "Coming Soon".to_string(),
        1 => format!("View 1 {}", singular),
        n if n > 99 => format!("View 99+ {}", plural),
        n => format!("View {} {}", n, plural),
    }
}
