use nd_core::Article;
use std::fmt::Write;

/// Payload bound sent to the backend: everything past the first 30 articles
/// is dropped.
pub const MAX_ARTICLES: usize = 30;

/// Per-article summary cap inside the prompt, in characters.
pub const SUMMARY_CHARS: usize = 200;

const TEMPLATE_HEADER: &str = "\
You are a senior technology journalist. Using the list of news articles
below, write today's tech news briefing.

Rules:
1. **🔍 Three-line summary**: open with the three key trends running through
   the news, one bullet each (start every line with '•').
2. **📂 Topic deep-dives**: group the articles into 3 to 5 sections by
   subject. Title each section in bold with a fitting emoji
   (e.g. **🤖 Generative AI**).
3. **🔗 Sources**: end each item with a link in the form [Read article](URL).
4. **Tone**: professional but easy to read, magazine-style, rendered as
   markdown.
5. **Readability**: put the important keywords in **bold**.

Articles:
";

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Render the fixed instruction template over at most [`MAX_ARTICLES`]
/// articles, in the order received.
pub fn build_prompt(articles: &[Article]) -> String {
    let mut prompt = String::from(TEMPLATE_HEADER);
    for (idx, article) in articles.iter().take(MAX_ARTICLES).enumerate() {
        // write! to a String cannot fail
        let _ = write!(
            prompt,
            "\n{}. Title: {}\n   Link: {}\n   Summary: {}\n",
            idx + 1,
            article.title,
            article.link,
            truncate_chars(&article.summary, SUMMARY_CHARS),
        );
    }
    prompt
}
