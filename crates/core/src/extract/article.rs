use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::{
    error::ExtractionError,
    extract::{Extraction, PageFetcher},
    text::char_len,
    types::SourceKind,
};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tags whose subtrees never contribute text.
const NON_CONTENT_TAGS: [&str; 6] = ["script", "style", "nav", "footer", "header", "aside"];

/// Fragments this short or shorter are navigation crumbs, captions and the like.
const MIN_FRAGMENT_CHARS: usize = 20;

static CONTENT_ROOTS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "article",
        "main",
        "[role='main']",
        ".post-content",
        ".entry-content",
        ".article-content",
        ".content",
        "#content",
    ]
    .into_iter()
    .map(|s| Selector::parse(s).expect("content root selector"))
    .collect()
});

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("body selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector"));
static TEXT_BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, li").expect("text block selector")
});
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline pattern"));

#[tracing::instrument(skip(fetcher))]
pub async fn extract_article<F: PageFetcher>(
    url: &str,
    fetcher: &F,
) -> Result<Extraction, ExtractionError> {
    let html = fetcher.fetch_text(url, FETCH_TIMEOUT).await?;
    let extraction = parse_article(&html);
    tracing::info!(chars = char_len(&extraction.raw_content), "Article extracted");
    Ok(extraction)
}

/// Pull the title and readable body text out of an HTML page.
pub fn parse_article(html: &str) -> Extraction {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| SourceKind::Article.placeholder_title().to_string());

    let root = CONTENT_ROOTS
        .iter()
        .find_map(|selector| document.select(selector).find(|el| !is_stripped(el)))
        .or_else(|| document.select(&BODY).next());

    let raw_content = match root {
        Some(root) => root
            .select(&TEXT_BLOCKS)
            .map(|block| visible_text(&block).trim().to_string())
            .filter(|text| text.chars().count() > MIN_FRAGMENT_CHARS)
            .collect::<Vec<_>>()
            .join("\n\n"),
        None => visible_text(&document.root_element())
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    };

    Extraction {
        title,
        raw_content: EXCESS_NEWLINES.replace_all(&raw_content, "\n\n").into_owned(),
    }
}

fn is_non_content(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
}

fn is_stripped(element: &ElementRef<'_>) -> bool {
    NON_CONTENT_TAGS.contains(&element.value().name())
        || element.ancestors().any(|n| is_non_content(n.value()))
}

/// Text of `element` with every non-content subtree removed.
fn visible_text(element: &ElementRef<'_>) -> String {
    if is_stripped(element) {
        return String::new();
    }

    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|a| a.id() != element.id())
                .any(|a| is_non_content(a.value()));
            (!hidden).then_some(&**text)
        })
        .collect()
}
