//! Input file collection.
//!
//! Flattens the site's pages, articles, translations and template pages into
//! the `[[input.files]]` records Stork indexes.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use sitesearch_core::{ContentItem, IndexMode, SiteContext, TemplatePages};

/// One `[[input.files]]` entry of the Stork configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    /// Path relative to `base_directory`.
    pub path: String,

    /// URL the search result links to.
    pub url: String,

    /// Result title.
    pub title: String,
}

impl InputFile {
    /// Record for a page, article or translation.
    pub fn from_content(item: &ContentItem, mode: IndexMode) -> Self {
        let path = match mode {
            IndexMode::Output => &item.save_as,
            IndexMode::Source => &item.relative_source_path,
        };

        Self {
            path: path.clone(),
            url: format!("/{}", item.url),
            title: quote_title(&item.title),
        }
    }
}

/// Collect the records for every indexable document of the site.
///
/// Order: pages, articles, then each article's translations in article
/// order, then template pages in mapping order. Template page URLs are the
/// raw destination paths and carry no title.
pub fn collect_input_files(
    context: &SiteContext,
    template_pages: &TemplatePages,
    mode: IndexMode,
) -> Vec<InputFile> {
    let translations = context
        .articles
        .iter()
        .flat_map(|article| article.translations.iter());

    let mut files: Vec<InputFile> = context
        .pages
        .iter()
        .chain(context.articles.iter())
        .chain(translations)
        .map(|item| InputFile::from_content(item, mode))
        .collect();

    files.extend(template_pages.iter().map(|page| {
        let path = match mode {
            IndexMode::Output => &page.destination,
            IndexMode::Source => &page.source,
        };
        InputFile {
            path: path.clone(),
            url: page.destination.clone(),
            title: String::new(),
        }
    }));

    files
}

/// Strip markup from a title and encode it as a quoted string literal.
pub fn quote_title(title: &str) -> String {
    let stripped = strip_tags(title);
    serde_json::to_string(&stripped).expect("strings always serialize to JSON")
}

/// Remove HTML comments and tags, decode entities, collapse whitespace.
pub fn strip_tags(html: &str) -> String {
    static COMMENT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

    let without_comments = COMMENT_RE.replace_all(html, "");
    let text = TAG_RE.replace_all(&without_comments, "");
    let text = unescape_entities(&text);

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode numeric character references and named entities in one pass, so
/// "&amp;lt;" becomes "&lt;". Unknown or invalid references are kept as is.
fn unescape_entities(text: &str) -> String {
    static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([A-Za-z][A-Za-z0-9]{1,31}));")
            .expect("valid regex")
    });

    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "lsquo" => '‘',
        "rsquo" => '’',
        "sbquo" => '‚',
        "ldquo" => '“',
        "rdquo" => '”',
        "bdquo" => '„',
        "laquo" => '«',
        "raquo" => '»',
        "lsaquo" => '‹',
        "rsaquo" => '›',
        "bull" => '•',
        "middot" => '·',
        "dagger" => '†',
        "deg" => '°',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "sect" => '§',
        "para" => '¶',
        "euro" => '€',
        "pound" => '£',
        "yen" => '¥',
        "cent" => '¢',
        "times" => '×',
        "divide" => '÷',
        "plusmn" => '±',
        "iexcl" => '¡',
        "iquest" => '¿',
        "szlig" => 'ß',
        "Agrave" => 'À',
        "Aacute" => 'Á',
        "Acirc" => 'Â',
        "Atilde" => 'Ã',
        "Auml" => 'Ä',
        "Aring" => 'Å',
        "AElig" => 'Æ',
        "Ccedil" => 'Ç',
        "Egrave" => 'È',
        "Eacute" => 'É',
        "Ecirc" => 'Ê',
        "Euml" => 'Ë',
        "Igrave" => 'Ì',
        "Iacute" => 'Í',
        "Icirc" => 'Î',
        "Iuml" => 'Ï',
        "Ntilde" => 'Ñ',
        "Ograve" => 'Ò',
        "Oacute" => 'Ó',
        "Ocirc" => 'Ô',
        "Otilde" => 'Õ',
        "Ouml" => 'Ö',
        "Oslash" => 'Ø',
        "Ugrave" => 'Ù',
        "Uacute" => 'Ú',
        "Ucirc" => 'Û',
        "Uuml" => 'Ü',
        "Yacute" => 'Ý',
        "agrave" => 'à',
        "aacute" => 'á',
        "acirc" => 'â',
        "atilde" => 'ã',
        "auml" => 'ä',
        "aring" => 'å',
        "aelig" => 'æ',
        "ccedil" => 'ç',
        "egrave" => 'è',
        "eacute" => 'é',
        "ecirc" => 'ê',
        "euml" => 'ë',
        "igrave" => 'ì',
        "iacute" => 'í',
        "icirc" => 'î',
        "iuml" => 'ï',
        "ntilde" => 'ñ',
        "ograve" => 'ò',
        "oacute" => 'ó',
        "ocirc" => 'ô',
        "otilde" => 'õ',
        "ouml" => 'ö',
        "oslash" => 'ø',
        "ugrave" => 'ù',
        "uacute" => 'ú',
        "ucirc" => 'û',
        "uuml" => 'ü',
        "yacute" => 'ý',
        "yuml" => 'ÿ',
        "OElig" => 'Œ',
        "oelig" => 'œ',
        "Scaron" => 'Š',
        "scaron" => 'š',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> ContentItem {
        ContentItem::new(title, "url", "save_as", "relative")
    }

    fn record(title: &str) -> InputFile {
        InputFile {
            path: "save_as".to_string(),
            url: "/url".to_string(),
            title: format!("\"{title}\""),
        }
    }

    #[test]
    fn test_path_is_save_as_on_index_output() {
        let context = SiteContext::new(vec![item("title")], vec![]);
        let files = collect_input_files(&context, &TemplatePages::new(), IndexMode::Output);

        assert_eq!(files, vec![record("title")]);
    }

    #[test]
    fn test_path_is_relative_on_index_source() {
        let context = SiteContext::new(vec![item("title")], vec![]);
        let files = collect_input_files(&context, &TemplatePages::new(), IndexMode::Source);

        assert_eq!(
            files,
            vec![InputFile {
                path: "relative".to_string(),
                url: "/url".to_string(),
                title: "\"title\"".to_string(),
            }]
        );
    }

    #[test]
    fn test_articles_and_pages_are_collected() {
        let context = SiteContext::new(vec![item("page")], vec![item("article")]);
        let files = collect_input_files(&context, &TemplatePages::new(), IndexMode::Output);

        assert_eq!(files, vec![record("page"), record("article")]);
    }

    #[test]
    fn test_translations_for_articles_are_collected() {
        let article = item("article").with_translations(vec![item("article-fr")]);
        let context = SiteContext::new(vec![], vec![article]);
        let files = collect_input_files(&context, &TemplatePages::new(), IndexMode::Output);

        assert_eq!(files, vec![record("article"), record("article-fr")]);
    }

    #[test]
    fn test_translations_follow_all_articles() {
        let first = item("first").with_translations(vec![item("first-fr"), item("first-de")]);
        let second = item("second").with_translations(vec![item("second-fr")]);
        let context = SiteContext::new(vec![item("page")], vec![first, second]);

        let titles: Vec<_> =
            collect_input_files(&context, &TemplatePages::new(), IndexMode::Output)
                .into_iter()
                .map(|f| f.title)
                .collect();

        assert_eq!(
            titles,
            vec![
                "\"page\"",
                "\"first\"",
                "\"second\"",
                "\"first-fr\"",
                "\"first-de\"",
                "\"second-fr\"",
            ]
        );
    }

    #[test]
    fn test_page_translations_are_not_collected() {
        let page = item("page").with_translations(vec![item("page-fr")]);
        let context = SiteContext::new(vec![page], vec![]);
        let files = collect_input_files(&context, &TemplatePages::new(), IndexMode::Output);

        assert_eq!(files, vec![record("page")]);
    }

    #[test]
    fn test_template_pages_collected() {
        let template_pages: TemplatePages = [
            ("src/books.html", "dest/books.html"),
            ("src/resume.html", "dest/resume.html"),
        ]
        .into_iter()
        .collect();

        for (mode, expected) in [(IndexMode::Output, "dest"), (IndexMode::Source, "src")] {
            let files = collect_input_files(&SiteContext::default(), &template_pages, mode);
            assert_eq!(
                files,
                vec![
                    InputFile {
                        path: format!("{expected}/books.html"),
                        url: "dest/books.html".to_string(),
                        title: String::new(),
                    },
                    InputFile {
                        path: format!("{expected}/resume.html"),
                        url: "dest/resume.html".to_string(),
                        title: String::new(),
                    },
                ]
            );
        }
    }

    #[test]
    fn test_template_pages_come_after_content() {
        let template_pages: TemplatePages =
            [("src/books.html", "dest/books.html")].into_iter().collect();
        let context = SiteContext::new(vec![item("page")], vec![]);
        let files = collect_input_files(&context, &template_pages, IndexMode::Output);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0], record("page"));
        assert_eq!(files[1].path, "dest/books.html");
    }

    #[test]
    fn test_collection_is_idempotent() {
        let article = item("article").with_translations(vec![item("article-fr")]);
        let context = SiteContext::new(vec![item("page")], vec![article]);
        let template_pages: TemplatePages =
            [("src/books.html", "dest/books.html")].into_iter().collect();

        let first = collect_input_files(&context, &template_pages, IndexMode::Output);
        let second = collect_input_files(&context, &template_pages, IndexMode::Output);
        assert_eq!(first, second);
    }

    #[test]
    fn test_quote_title_strips_markup_and_escapes_quotes() {
        assert_eq!(quote_title("<em>Hello</em>  world"), "\"Hello world\"");
        assert_eq!(quote_title(r#"Say "hi""#), r#""Say \"hi\"""#);
        assert_eq!(quote_title("Tom &amp; Jerry"), "\"Tom & Jerry\"");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>One</p>\n<p>Two</p>"), "One Two");
        assert_eq!(strip_tags("a <!-- note --> b"), "a b");
        assert_eq!(strip_tags("&amp;lt;code&amp;gt;"), "&lt;code&gt;");
        assert_eq!(strip_tags("plain"), "plain");
    }

    #[test]
    fn test_quote_title_decodes_numeric_references() {
        assert_eq!(quote_title("Don&#8217;t panic"), "\"Don’t panic\"");
        assert_eq!(quote_title("Before &#x2014; after"), "\"Before — after\"");
        assert_eq!(quote_title("It&#X27;s"), "\"It's\"");
    }

    #[test]
    fn test_strip_tags_decodes_named_entities() {
        assert_eq!(strip_tags("Caf&eacute;"), "Café");
        assert_eq!(strip_tags("<b>R&eacute;sum&eacute;</b> &mdash; 2024"), "Résumé — 2024");
        assert_eq!(strip_tags("&ldquo;Quoted&rdquo;"), "“Quoted”");
        assert_eq!(strip_tags("a&nbsp;&nbsp;b"), "a b");
    }

    #[test]
    fn test_strip_tags_keeps_unknown_entities() {
        assert_eq!(strip_tags("&bogus; &#xD800; &#99999999;"), "&bogus; &#xD800; &#99999999;");
        assert_eq!(strip_tags("AT&T"), "AT&T");
    }
}
